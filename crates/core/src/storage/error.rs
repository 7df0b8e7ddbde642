//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File size exceeds maximum allowed.
    #[error(
        "Le fichier est trop volumineux. Taille maximale autorisée : {} MB",
        .max / (1024 * 1024)
    )]
    FileTooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// MIME type not allowed.
    #[error("Type de fichier non autorisé. Formats acceptés : PDF, DOC, DOCX, JPG, PNG")]
    InvalidMimeType {
        /// The rejected MIME type.
        mime_type: String,
    },

    /// Object not found.
    #[error("file not found: {key}")]
    NotFound {
        /// Path that was not found.
        key: String,
    },

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create an invalid MIME type error.
    #[must_use]
    pub fn invalid_mime_type(mime_type: impl Into<String>) -> Self {
        Self::InvalidMimeType {
            mime_type: mime_type.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// True for rejections of the uploaded file itself.
    #[must_use]
    pub const fn is_rejected_file(&self) -> bool {
        matches!(self, Self::FileTooLarge { .. } | Self::InvalidMimeType { .. })
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::InvalidMimeType { .. } => "INVALID_MIME_TYPE",
            Self::NotFound { .. } => "FILE_NOT_FOUND",
            Self::Configuration(_) | Self::Operation(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::FileTooLarge { .. } => 413,
            Self::InvalidMimeType { .. } => 415,
            Self::NotFound { .. } => 404,
            Self::Configuration(_) | Self::Operation(_) => 500,
        }
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::Operation(err.to_string()),
        }
    }
}
