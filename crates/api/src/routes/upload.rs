//! Multipart form reading shared by the document and attachment uploads.

use std::collections::HashMap;

use axum::extract::Multipart;
use immoloc_core::attachment::FileUpload;
use immoloc_shared::AppError;

use crate::error::{ApiError, ApiResult};

/// Request body limit for upload routes: the 5 MiB file cap plus form overhead.
pub const UPLOAD_BODY_LIMIT: usize = 6 * 1024 * 1024;

/// Name of the form part holding the file.
pub const FILE_FIELD: &str = "file";

/// A parsed upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// Text parts by name.
    pub fields: HashMap<String, String>,
    /// The file part, if any.
    pub file: Option<FileUpload>,
}

impl UploadForm {
    /// Takes the file part.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the form had no file.
    pub fn require_file(&mut self) -> ApiResult<FileUpload> {
        self.file
            .take()
            .ok_or_else(|| AppError::Validation("Aucun fichier sélectionné".to_string()).into())
    }
}

/// Reads every part of a multipart body.
///
/// # Errors
///
/// Returns a validation error for a malformed body.
pub async fn read_upload_form(mut multipart: Multipart) -> ApiResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == FILE_FIELD {
            let file_name = field.file_name().unwrap_or("fichier").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field.bytes().await.map_err(invalid_form)?;
            form.file = Some(FileUpload::new(file_name, content_type, data));
        } else {
            let value = field.text().await.map_err(invalid_form)?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

fn invalid_form(err: axum::extract::multipart::MultipartError) -> ApiError {
    AppError::Validation(format!("Formulaire d'envoi invalide : {err}")).into()
}
