//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{Operator, services};
use serde::Serialize;
use uuid::Uuid;

use super::config::{Bucket, StorageConfig, StorageProvider};
use super::error::StorageError;

/// An object written to a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    /// Bucket.
    pub bucket: Bucket,
    /// Path inside the bucket.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
}

/// Storage service for documents and attachments.
pub struct StorageService {
    legal_documents: Operator,
    amortization_schedules: Operator,
    entry_attachments: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        Ok(Self {
            legal_documents: Self::create_operator(&config, Bucket::LegalDocuments)?,
            amortization_schedules: Self::create_operator(&config, Bucket::AmortizationSchedules)?,
            entry_attachments: Self::create_operator(&config, Bucket::EntryAttachments)?,
            config,
        })
    }

    /// Create an OpenDAL operator for one bucket.
    fn create_operator(config: &StorageConfig, bucket: Bucket) -> Result<Operator, StorageError> {
        let name = config.bucket_name(bucket);
        let operator = match &config.provider {
            StorageProvider::S3 {
                endpoint,
                region,
                access_key_id,
                secret_access_key,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(name)
                    .region(region)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key);
                Operator::new(builder).map(|b| b.finish())
            }
            StorageProvider::AzureBlob {
                endpoint,
                account,
                access_key,
            } => {
                let builder = services::Azblob::default()
                    .endpoint(endpoint)
                    .account_name(account)
                    .account_key(access_key)
                    .container(name);
                Operator::new(builder).map(|b| b.finish())
            }
            StorageProvider::LocalFs { root } => {
                let root = root.join(name);
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                Operator::new(services::Fs::default().root(root)).map(|b| b.finish())
            }
            StorageProvider::Memory => {
                Operator::new(services::Memory::default().root(&format!("/{name}")))
                    .map(|b| b.finish())
            }
        };

        operator.map_err(|e| StorageError::configuration(e.to_string()))
    }

    fn operator(&self, bucket: Bucket) -> &Operator {
        match bucket {
            Bucket::LegalDocuments => &self.legal_documents,
            Bucket::AmortizationSchedules => &self.amortization_schedules,
            Bucket::EntryAttachments => &self.entry_attachments,
        }
    }

    /// Validate a file against the size and MIME type limits.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Build `{prefix}/{unique}.{ext}`, keeping the extension of `file_name`.
    ///
    /// A name without extension is stored with `bin`.
    #[must_use]
    pub fn object_path(prefix: &[String], file_name: &str) -> String {
        let extension = sanitize_filename(file_name)
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| "bin".to_string());

        let mut segments = prefix.to_vec();
        segments.push(format!("{}.{extension}", Uuid::new_v4()));
        segments.join("/")
    }

    /// Write an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredObject, StorageError> {
        let size = data.len() as u64;
        self.operator(bucket)
            .write_with(path, data)
            .content_type(content_type)
            .await?;

        Ok(StoredObject {
            bucket,
            path: path.to_string(),
            size,
        })
    }

    /// Delete objects. Missing objects are not an error.
    ///
    /// # Errors
    ///
    /// Returns the first failure; objects after it are not attempted.
    pub async fn remove(&self, bucket: Bucket, paths: &[String]) -> Result<(), StorageError> {
        let operator = self.operator(bucket);
        for path in paths {
            operator.delete(path).await?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn exists(&self, bucket: Bucket, path: &str) -> bool {
        self.operator(bucket).stat(path).await.is_ok()
    }

    /// Public URL of an object: `{public_base_url}/{bucket}/{path}`.
    #[must_use]
    pub fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            self.config.bucket_name(bucket),
            path
        )
    }

    /// Get the storage provider name.
    #[must_use]
    pub const fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Sanitize a user-supplied filename.
///
/// Only ASCII alphanumerics, dots, hyphens and underscores are kept; anything
/// else becomes `_`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
