//! JWT token issuance and validation.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::claims::Claims;
use crate::db::unix_timestamp;
use crate::error::Error;

/// Verifies a bearer credential and recovers its claims.
pub trait TokenValidator: Send + Sync {
    /// Validate `token`, failing with [`Error::Unauthenticated`] on a bad
    /// signature, wrong algorithm, expiry, or missing principal claim.
    fn validate(&self, token: &str) -> Result<Claims, Error>;
}

/// Manages HS256 token creation and validation.
///
/// The signing secret is fixed at construction.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_secs: i64,
}

impl JwtManager {
    /// Create a new `JwtManager` with the given secret.
    ///
    /// Expiry is enforced to the second: revocations end at `exp`, so any
    /// leeway would let a logged-out token back in.
    pub fn new(secret: &[u8], access_ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl_secs,
        }
    }

    /// Issue an access token for the given account.
    ///
    /// Returns the encoded token and its expiry timestamp.
    pub fn issue_access_token(
        &self,
        user_id: i64,
    ) -> Result<(String, i64), jsonwebtoken::errors::Error> {
        let now = unix_timestamp();
        let exp = now + self.access_ttl_secs;

        let claims = Claims {
            user_id,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp,
        };

        let token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, exp))
    }

    /// Configured access-token lifetime in seconds.
    pub const fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    /// Hash a token so raw credentials are never kept in memory tables.
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl TokenValidator for JwtManager {
    fn validate(&self, token: &str) -> Result<Claims, Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                Error::Unauthenticated("Invalid token".into())
            })
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-testing";

    fn test_jwt() -> JwtManager {
        JwtManager::new(SECRET, 3600)
    }

    fn encode_with(header: &Header, claims: &serde_json::Value) -> String {
        jsonwebtoken::encode(header, claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    #[test]
    fn issue_and_validate_access_token() {
        let jwt = test_jwt();
        let (token, exp) = jwt.issue_access_token(7).unwrap();

        let claims = jwt.validate(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.exp, exp);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn tokens_for_same_user_are_distinct() {
        let jwt = test_jwt();
        let (t1, _) = jwt.issue_access_token(7).unwrap();
        let (t2, _) = jwt.issue_access_token(7).unwrap();
        assert_ne!(t1, t2);
    }

    #[test]
    fn malformed_token_fails_validation() {
        let jwt = test_jwt();
        assert!(matches!(
            jwt.validate("not-a-valid-token"),
            Err(Error::Unauthenticated(_))
        ));
    }

    #[test]
    fn wrong_secret_fails_validation() {
        let jwt1 = test_jwt();
        let jwt2 = JwtManager::new(b"different-secret", 3600);

        let (token, _) = jwt1.issue_access_token(7).unwrap();
        assert!(jwt2.validate(&token).is_err());
    }

    #[test]
    fn wrong_algorithm_fails_validation() {
        let exp = unix_timestamp() + 3600;
        let token = encode_with(
            &Header::new(Algorithm::HS512),
            &serde_json::json!({ "userID": 7, "jti": "x", "iat": 0, "exp": exp }),
        );
        assert!(test_jwt().validate(&token).is_err());
    }

    #[test]
    fn expired_token_fails_validation() {
        let exp = unix_timestamp() - 3600;
        let token = encode_with(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "userID": 7, "jti": "x", "iat": exp - 10, "exp": exp }),
        );
        assert!(test_jwt().validate(&token).is_err());
    }

    #[test]
    fn recently_expired_token_fails_validation() {
        let exp = unix_timestamp() - 5;
        let token = encode_with(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "userID": 7, "jti": "x", "iat": exp - 10, "exp": exp }),
        );
        assert!(matches!(
            test_jwt().validate(&token),
            Err(Error::Unauthenticated(_))
        ));
    }

    #[test]
    fn missing_principal_claim_fails_validation() {
        let exp = unix_timestamp() + 3600;
        let token = encode_with(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "jti": "x", "iat": 0, "exp": exp }),
        );
        assert!(test_jwt().validate(&token).is_err());
    }

    #[test]
    fn token_hash_is_deterministic() {
        let h1 = JwtManager::hash_token("same-token");
        let h2 = JwtManager::hash_token("same-token");
        assert_eq!(h1, h2);
        assert_ne!(h1, JwtManager::hash_token("different-token"));
    }
}
