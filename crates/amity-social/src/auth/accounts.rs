//! Account lifecycle: signup, login, logout.

use std::sync::Arc;

use amity_core::auth::JwtManager;
use amity_core::{Authenticator, Error, Principal, Result};
use tracing::{info, warn};

use super::password;
use crate::storage::{SocialDatabase, User};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 8;

pub struct AccountService {
    db: SocialDatabase,
    jwt: Arc<JwtManager>,
    auth: Authenticator,
}

impl AccountService {
    pub fn new(db: SocialDatabase, jwt: Arc<JwtManager>, auth: Authenticator) -> Self {
        Self { db, jwt, auth }
    }

    /// Register a new account.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let username = username.trim();
        let email = email.trim();

        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(Error::InvalidRequest(format!(
                "Username must be at least {MIN_USERNAME_LEN} characters"
            )));
        }
        if email.is_empty() {
            return Err(Error::InvalidRequest("Email is required".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidRequest(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let hash = password::hash_password(password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {e}")))?;

        let user = self
            .db
            .create_user(username, email, &hash)
            .await?
            .ok_or_else(|| Error::Conflict("Username or email already taken".into()))?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check credentials and issue an access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let invalid = || Error::Unauthenticated("Invalid username or password".into());

        let user = match self.db.get_user_by_username(username).await {
            Ok(user) => user,
            Err(amity_core::db::DatabaseError::NotFound(_)) => {
                warn!(username = %username, "Login for unknown user");
                return Err(invalid());
            }
            Err(e) => return Err(e.into()),
        };

        let valid = password::verify_password(password, &user.password_hash)
            .map_err(|_| Error::Internal("Password verification failed".into()))?;
        if !valid {
            warn!(username = %username, "Failed login attempt");
            return Err(invalid());
        }

        let (token, _) = self
            .jwt
            .issue_access_token(user.id)
            .map_err(|e| Error::Internal(format!("Failed to generate token: {e}")))?;

        self.db.touch_last_login(user.id).await?;

        info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    /// Revoke the presented token until its natural expiry.
    pub fn logout(&self, principal: &Principal) {
        self.auth.revoke(principal);
        info!(user_id = principal.user_id, "User logged out");
    }
}
