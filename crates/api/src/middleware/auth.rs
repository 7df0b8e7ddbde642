//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use immoloc_core::Session;
use immoloc_db::SessionRepository;
use immoloc_shared::{Claims, JwtError};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn reject(status: StatusCode, error: &str, message: &str) -> Response {
    (status, Json(json!({ "error": error, "message": message }))).into_response()
}

/// Authentication middleware that validates JWT tokens.
///
/// The token must be well formed, unexpired, and bound to a session that has
/// not been revoked by sign-out. Valid claims are stored in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return reject(
            StatusCode::UNAUTHORIZED,
            "missing_token",
            "Authorization header with Bearer token is required",
        );
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(JwtError::Expired) => {
            return reject(StatusCode::UNAUTHORIZED, "token_expired", "Token has expired");
        }
        Err(_) => {
            return reject(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or malformed token",
            );
        }
    };

    let sessions = SessionRepository::new((*state.db).clone());
    match sessions.is_active(claims.session_id()).await {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %claims.user_id(), session_id = %claims.session_id(), "Token for revoked session");
            return reject(
                StatusCode::UNAUTHORIZED,
                "session_revoked",
                "Votre session a expiré. Veuillez vous reconnecter.",
            );
        }
        Err(e) => {
            error!(error = %e, "Session lookup failed");
            return reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                immoloc_shared::error::GENERIC_USER_MESSAGE,
            );
        }
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Extractor for the authenticated owner.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let session = auth.session();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The session every core service expects.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::new(
            self.0.user_id().into(),
            self.0.session_id().into(),
            self.0.email.clone(),
        )
    }

    /// Returns the inner claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_session_from_claims() {
        let user_id = uuid::Uuid::new_v4();
        let session_id = uuid::Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            session_id,
            "owner@example.fr",
            chrono::Utc::now() + chrono::Duration::hours(1),
        );

        let session = AuthUser(claims).session();
        assert_eq!(session.user_id.into_inner(), user_id);
        assert_eq!(session.session_id.into_inner(), session_id);
        assert_eq!(session.email, "owner@example.fr");
    }
}
