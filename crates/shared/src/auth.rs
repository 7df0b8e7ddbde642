//! Authentication payloads and token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Session the token was issued for.
    pub sid: Uuid,
    /// Account email.
    pub email: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a session.
    #[must_use]
    pub fn new(user_id: Uuid, session_id: Uuid, email: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            sid: session_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the session ID from claims.
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.sid
    }
}

/// Sign-up request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Sign-in request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Password change payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    /// New password.
    pub new_password: String,
    /// Repetition of the new password.
    pub confirm_password: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

/// Account info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Account email.
    pub email: String,
}

/// Response returned after sign-up, sign-in or refresh.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Authenticated account.
    pub user: UserInfo,
    /// Session ID.
    pub session_id: Uuid,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}
