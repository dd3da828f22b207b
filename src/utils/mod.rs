use crate::models::{Claims, ServiceError};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::env;

pub mod auth;
pub mod authorize;
pub mod list_storage;
pub mod sessions;
pub mod team_storage;
pub mod user_storage;

pub use auth::{AuthedUser, RenewedSession};
pub use authorize::{require_team_role, TeamContext};

// Base directory for the document store
lazy_static::lazy_static! {
    static ref STORAGE_ROOT: String =
        env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".to_string());
}

pub fn storage_root() -> &'static str {
    &STORAGE_ROOT
}

// JWT utility functions
pub mod jwt {
    use super::*;

    // Access tokens are short-lived; consumers rely on this window
    pub const ACCESS_TOKEN_TTL_MINS: i64 = 15;

    // Signing and verification keys, built once at startup and injected
    pub struct TokenKeys {
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
        validation: Validation,
    }

    impl TokenKeys {
        pub fn new(secret: &str) -> Self {
            Self {
                encoding_key: EncodingKey::from_secret(secret.as_bytes()),
                decoding_key: DecodingKey::from_secret(secret.as_bytes()),
                validation: Validation::default(),
            }
        }

        // Generate a new access token for a user
        pub fn issue_access_token(&self, user_id: &str) -> Result<String, ServiceError> {
            let now = Utc::now();
            let expiration = now
                .checked_add_signed(Duration::minutes(ACCESS_TOKEN_TTL_MINS))
                .ok_or(ServiceError::InternalServerError)?
                .timestamp() as usize;

            let claims = Claims {
                sub: user_id.to_string(),
                exp: expiration,
                iat: now.timestamp() as usize,
            };

            self.sign_claims(&claims)
        }

        pub(crate) fn sign_claims(&self, claims: &Claims) -> Result<String, ServiceError> {
            encode(&Header::default(), claims, &self.encoding_key)
                .map_err(|_| ServiceError::InternalServerError)
        }

        // Validate a token and resolve the user id. Bad signature, malformed
        // payload and past expiry all surface as the same error class.
        pub fn verify_access_token(&self, token: &str) -> Result<String, ServiceError> {
            decode::<Claims>(token, &self.decoding_key, &self.validation)
                .map(|data| data.claims.sub)
                .map_err(|_| ServiceError::InvalidOrExpiredToken)
        }
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        if !auth_header.starts_with("Bearer ") {
            return Err(ServiceError::InvalidOrExpiredToken);
        }

        Ok(auth_header.trim_start_matches("Bearer ").to_string())
    }
}

// Password utility functions
pub mod password {
    use super::*;

    // Hash a password using bcrypt
    pub fn hash_password(password: &str) -> Result<String, ServiceError> {
        hash(password, DEFAULT_COST).map_err(|_| ServiceError::InternalServerError)
    }

    // Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
        verify(password, hash).map_err(|_| ServiceError::InternalServerError)
    }
}
