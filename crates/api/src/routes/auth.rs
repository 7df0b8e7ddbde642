//! Account routes: sign-up, sign-in, token refresh, sign-out, password change.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
};
use chrono::{Duration, Utc};
use immoloc_core::auth::{
    AuthError, hash_password, validate_credentials, validate_password_change, verify_password,
};
use immoloc_db::{SessionRepository, UserRepository, entities::users};
use immoloc_shared::auth::{
    AuthResponse, ChangePasswordRequest, RefreshRequest, SignInRequest, SignUpRequest, UserInfo,
};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Routes reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/refresh", post(refresh))
}

/// Routes that need a live session.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-out", post(sign_out))
        .route("/auth/password", put(change_password))
}

/// Starts a session for `user` and returns its tokens.
async fn open_session(state: &AppState, user: users::Model) -> ApiResult<AuthResponse> {
    let session_id = Uuid::now_v7();
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, session_id, &user.email)?;
    let refresh_token = state
        .jwt_service
        .generate_refresh_token(user.id, session_id, &user.email)?;
    let expires_at = Utc::now() + Duration::seconds(state.jwt_service.refresh_token_expires_in());

    SessionRepository::new((*state.db).clone())
        .create(session_id, user.id, &refresh_token, expires_at)
        .await?;

    Ok(AuthResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
        },
        session_id,
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}

/// POST /auth/sign-up - Create an account and sign in.
async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_credentials(&payload.email, &payload.password)?;
    let email = payload.email.trim().to_lowercase();

    let users = UserRepository::new((*state.db).clone());
    if users.email_exists(&email).await? {
        info!(email = %email, "Sign-up for an existing account");
        return Err(AuthError::AlreadyRegistered.into());
    }

    let password_hash = hash_password(&payload.password).map_err(AuthError::from)?;
    let user = users.create(&email, &password_hash).await?;
    info!(user_id = %user.id, "Account created");

    let response = open_session(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/sign-in - Authenticate and return tokens.
async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> ApiResult<Json<AuthResponse>> {
    validate_credentials(&payload.email, &payload.password)?;
    let email = payload.email.trim().to_lowercase();

    let Some(user) = UserRepository::new((*state.db).clone())
        .find_by_email(&email)
        .await?
    else {
        info!(email = %email, "Sign-in attempt for unknown account");
        return Err(AuthError::InvalidCredentials.into());
    };

    if !verify_password(&payload.password, &user.password_hash).map_err(AuthError::from)? {
        info!(user_id = %user.id, "Failed sign-in attempt");
        return Err(AuthError::InvalidCredentials.into());
    }

    info!(user_id = %user.id, "Signed in");
    Ok(Json(open_session(&state, user).await?))
}

/// POST /auth/refresh - Exchange a refresh token for new tokens.
///
/// The session keeps its ID; the old refresh token stops working.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token)
        .map_err(|_| AuthError::SessionRevoked)?;

    let sessions = SessionRepository::new((*state.db).clone());
    let session = sessions
        .find_by_token(&payload.refresh_token)
        .await?
        .filter(|s| s.id == claims.session_id() && s.user_id == claims.user_id())
        .ok_or(AuthError::SessionRevoked)?;

    let user = UserRepository::new((*state.db).clone())
        .find_by_id(session.user_id)
        .await?
        .ok_or(AuthError::SessionRevoked)?;

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, session.id, &user.email)?;
    let refresh_token = state
        .jwt_service
        .generate_refresh_token(user.id, session.id, &user.email)?;
    let expires_at = Utc::now() + Duration::seconds(state.jwt_service.refresh_token_expires_in());
    sessions.rotate(session.id, &refresh_token, expires_at).await?;

    Ok(Json(AuthResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
        },
        session_id: session.id,
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}

/// POST /auth/sign-out - Revoke the current session.
async fn sign_out(State(state): State<AppState>, auth: AuthUser) -> ApiResult<StatusCode> {
    let session = auth.session();
    SessionRepository::new((*state.db).clone())
        .revoke(session.session_id.into_inner())
        .await?;
    info!(user_id = %session.user_id, session_id = %session.session_id, "Signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /auth/password - Change the password of the signed-in account.
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    validate_password_change(&payload.new_password, &payload.confirm_password)?;
    let password_hash = hash_password(&payload.new_password).map_err(AuthError::from)?;

    let session = auth.session();
    UserRepository::new((*state.db).clone())
        .update_password(session.user_id.into_inner(), &password_hash)
        .await?;
    info!(user_id = %session.user_id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}
