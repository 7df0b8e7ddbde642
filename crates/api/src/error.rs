//! JSON rendering of failures.
//!
//! Every handler error becomes `{ "error": CODE, "message": text }`. Server-side
//! failures are logged and replaced by a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use immoloc_core::archive::ArchiveError;
use immoloc_core::attachment::AttachmentError;
use immoloc_core::auth::AuthError;
use immoloc_core::bilan::{BilanError, WizardError};
use immoloc_core::document::DocumentError;
use immoloc_core::entry::EntryError;
use immoloc_core::profile::ProfileError;
use immoloc_core::property::PropertyError;
use immoloc_core::storage::StorageError;
use immoloc_shared::error::GENERIC_USER_MESSAGE;
use immoloc_shared::{AppError, JwtError};
use sea_orm::DbErr;
use serde_json::{Value, json};
use tracing::error;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn new(status: u16, code: &'static str, message: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = message.into();
        if status.is_server_error() {
            error!(code, error = %message, "Request failed");
            return Self {
                status,
                code,
                message: GENERIC_USER_MESSAGE.to_string(),
                details: None,
            };
        }
        Self {
            status,
            code,
            message,
            details: None,
        }
    }

    /// Attaches structured data to the response body.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Object storage is not configured on this server.
    #[must_use]
    pub fn storage_unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: "STORAGE_NOT_CONFIGURED",
            message: "Le stockage de fichiers n'est pas configuré".to_string(),
            details: None,
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code of the response.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Text shown to the owner.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.code,
            "message": self.message,
        });
        if let (Some(details), Some(map)) = (self.details, body.as_object_mut()) {
            map.insert("details".to_string(), details);
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let message = if err.is_server_error() {
            err.to_string()
        } else {
            err.user_message().to_string()
        };
        Self::new(err.status_code(), err.error_code(), message)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::from(AppError::Database(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self::from(AppError::Internal(err.to_string()))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = if err.http_status_code() >= 500 {
            err.to_string()
        } else {
            err.user_message()
        };
        Self::new(err.http_status_code(), err.error_code(), message)
    }
}

impl From<BilanError> for ApiError {
    fn from(err: BilanError) -> Self {
        let details = match &err {
            BilanError::MissingAttachments { entry_ids } => Some(json!({ "entry_ids": entry_ids })),
            _ => None,
        };
        let api = Self::new(err.http_status_code(), err.error_code(), err.to_string());
        match details {
            Some(details) => api.with_details(details),
            None => api,
        }
    }
}

macro_rules! domain_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    Self::new(err.http_status_code(), err.error_code(), err.to_string())
                }
            }
        )+
    };
}

domain_error!(
    ArchiveError,
    AttachmentError,
    DocumentError,
    EntryError,
    ProfileError,
    PropertyError,
    StorageError,
    WizardError,
);

#[cfg(test)]
mod tests {
    use super::*;
    use immoloc_shared::types::{BilanId, EntryId};

    #[test]
    fn test_server_errors_hide_details() {
        let err = ApiError::from(EntryError::repository("connection reset by peer"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "REPOSITORY_ERROR");
        assert_eq!(err.message(), GENERIC_USER_MESSAGE);
    }

    #[test]
    fn test_domain_message_passes_through() {
        let err = ApiError::from(BilanError::AlreadyFinalized(BilanId::new()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(err.message().starts_with("Le bilan"));
    }

    #[test]
    fn test_missing_attachments_carry_entry_ids() {
        let id = EntryId::new();
        let err = ApiError::from(BilanError::MissingAttachments {
            entry_ids: vec![id],
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.details, Some(json!({ "entry_ids": [id] })));
    }

    #[test]
    fn test_auth_errors_are_localized() {
        let err = ApiError::from(AuthError::InvalidCredentials);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(err.message().starts_with("Email ou mot de passe incorrect"));
    }

    #[test]
    fn test_storage_errors_keep_their_status() {
        let err = ApiError::from(StorageError::InvalidMimeType {
            mime_type: "text/plain".to_string(),
        });
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_app_error_validation() {
        let err = ApiError::from(AppError::Validation("Fichier manquant".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Fichier manquant");
    }
}
