//! Combined token validation and revocation check.

use std::sync::Arc;

use super::jwt::TokenValidator;
use super::revocation::RevocationGate;
use crate::db::unix_timestamp;
use crate::error::Error;

/// An authenticated caller recovered from a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Account id from the token's principal claim.
    pub user_id: i64,
    /// The raw bearer token, kept so the caller can revoke it.
    pub token: String,
    /// Natural expiry of the token (unix timestamp).
    pub expires_at: i64,
}

/// Validates bearer credentials against the signing key and the
/// revocation table.
///
/// Cheap to clone; both services share one instance.
#[derive(Clone)]
pub struct Authenticator {
    validator: Arc<dyn TokenValidator>,
    gate: Arc<dyn RevocationGate>,
}

impl Authenticator {
    pub fn new(validator: Arc<dyn TokenValidator>, gate: Arc<dyn RevocationGate>) -> Self {
        Self { validator, gate }
    }

    /// Authenticate the value of an `Authorization` header.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, Error> {
        let token = bearer_token(authorization)?;
        let claims = self.validator.validate(token)?;

        if self.gate.is_revoked(token, unix_timestamp()) {
            return Err(Error::Unauthenticated("Token has been revoked".into()));
        }

        Ok(Principal {
            user_id: claims.user_id,
            token: token.to_string(),
            expires_at: claims.exp,
        })
    }

    /// Reject the principal's token from now until its natural expiry.
    pub fn revoke(&self, principal: &Principal) {
        self.gate.revoke(&principal.token, principal.expires_at);
    }

    /// The underlying revocation table (used by the periodic sweep).
    pub fn gate(&self) -> &Arc<dyn RevocationGate> {
        &self.gate
    }
}

fn bearer_token(authorization: Option<&str>) -> Result<&str, Error> {
    let header =
        authorization.ok_or_else(|| Error::Unauthenticated("Missing authorization header".into()))?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Unauthenticated("Malformed authorization header".into()))
}
