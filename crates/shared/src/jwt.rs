//! JWT token generation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expires_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expires_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_secs: 3600,
            refresh_token_expires_secs: 2_592_000,
        }
    }
}

impl From<&crate::config::JwtConfig> for JwtConfig {
    fn from(config: &crate::config::JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            access_token_expires_secs: i64::try_from(config.access_token_expiry_secs)
                .unwrap_or(i64::MAX),
            refresh_token_expires_secs: i64::try_from(config.refresh_token_expiry_secs)
                .unwrap_or(i64::MAX),
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expires_secs", &self.config.access_token_expires_secs)
            .field("refresh_token_expires_secs", &self.config.refresh_token_expires_secs)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates an access token bound to a session.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        email: &str,
    ) -> Result<String, JwtError> {
        self.sign(
            user_id,
            session_id,
            email,
            self.config.access_token_expires_secs,
        )
    }

    /// Generates a refresh token bound to a session.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        email: &str,
    ) -> Result<String, JwtError> {
        self.sign(
            user_id,
            session_id,
            email,
            self.config.refresh_token_expires_secs,
        )
    }

    fn sign(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        email: &str,
        lifetime_secs: i64,
    ) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::seconds(lifetime_secs);
        let claims = Claims::new(user_id, session_id, email, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed or forged.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Returns the access token lifetime in seconds.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> i64 {
        self.config.access_token_expires_secs
    }

    /// Returns the refresh token lifetime in seconds.
    #[must_use]
    pub const fn refresh_token_expires_in(&self) -> i64 {
        self.config.refresh_token_expires_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_expires_secs: 900,
            refresh_token_expires_secs: 86_400,
        })
    }

    #[test]
    fn test_access_token_round_trip_keeps_session() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();

        let token = service
            .generate_access_token(user_id, session_id, "owner@example.fr")
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.session_id(), session_id);
        assert_eq!(claims.email, "owner@example.fr");
    }

    #[test]
    fn test_refresh_token_outlives_access_token() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();

        let access = service
            .generate_access_token(user_id, session_id, "a@b.fr")
            .unwrap();
        let refresh = service
            .generate_refresh_token(user_id, session_id, "a@b.fr")
            .unwrap();

        let access_claims = service.validate_token(&access).unwrap();
        let refresh_claims = service.validate_token(&refresh).unwrap();
        assert!(refresh_claims.exp > access_claims.exp);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let service = create_test_service();
        let other = JwtService::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..JwtConfig::default()
        });

        let token = other
            .generate_access_token(Uuid::new_v4(), Uuid::new_v4(), "a@b.fr")
            .unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expires_secs: -120,
            refresh_token_expires_secs: 60,
        });

        let token = service
            .generate_access_token(Uuid::new_v4(), Uuid::new_v4(), "a@b.fr")
            .unwrap();
        assert!(matches!(service.validate_token(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_from_settings() {
        let settings = crate::config::JwtConfig {
            secret: "s".to_string(),
            access_token_expiry_secs: 60,
            refresh_token_expiry_secs: 120,
        };
        let config = JwtConfig::from(&settings);
        assert_eq!(config.access_token_expires_secs, 60);
        assert_eq!(config.refresh_token_expires_secs, 120);
    }
}
