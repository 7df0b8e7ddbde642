//! Storage configuration types.

use std::path::PathBuf;

use immoloc_shared::config::{BucketNames, StorageSettings};
use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// One of the three buckets files are stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Leases, ownership certificates, notarial statements.
    LegalDocuments,
    /// Amortization schedules.
    AmortizationSchedules,
    /// Supporting files of accounting entries.
    EntryAttachments,
}

impl Bucket {
    /// All buckets.
    pub const ALL: [Self; 3] = [
        Self::LegalDocuments,
        Self::AmortizationSchedules,
        Self::EntryAttachments,
    ];
}

/// Storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage. Each bucket maps to an S3 bucket of the same name.
    S3 {
        /// Endpoint URL.
        endpoint: String,
        /// Region.
        region: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
    },
    /// Azure Blob Storage. Each bucket maps to a container of the same name.
    AzureBlob {
        /// Blob endpoint.
        endpoint: String,
        /// Storage account name.
        account: String,
        /// Storage account key.
        access_key: String,
    },
    /// Local filesystem, one subdirectory per bucket (development only).
    LocalFs {
        /// Root directory.
        root: PathBuf,
    },
    /// Process memory (tests).
    Memory,
}

impl StorageProvider {
    /// Create S3-compatible provider.
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            region: region.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Provider name as written in configuration.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azblob",
            Self::LocalFs { .. } => "fs",
            Self::Memory => "memory",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend.
    pub provider: StorageProvider,
    /// Bucket names.
    pub buckets: BucketNames,
    /// Base URL under which `{bucket}/{path}` is publicly readable.
    pub public_base_url: String,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Accepted MIME types.
    pub allowed_mime_types: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 5 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

    /// Create a config with default buckets and limits.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            buckets: BucketNames::default(),
            public_base_url: "http://localhost:8080/storage".to_string(),
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Self::default_mime_types(),
        }
    }

    /// Build from the `[storage]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` for an unknown provider or a
    /// missing credential.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let required = |value: &Option<String>, key: &str| {
            value
                .clone()
                .ok_or_else(|| StorageError::configuration(format!("storage.{key} is required")))
        };

        let provider = match settings.provider.as_str() {
            "fs" => StorageProvider::local_fs(&settings.root),
            "memory" => StorageProvider::Memory,
            "s3" => StorageProvider::S3 {
                endpoint: required(&settings.endpoint, "endpoint")?,
                region: settings.region.clone().unwrap_or_else(|| "auto".to_string()),
                access_key_id: required(&settings.access_key_id, "access_key_id")?,
                secret_access_key: required(&settings.secret_access_key, "secret_access_key")?,
            },
            "azblob" => StorageProvider::AzureBlob {
                endpoint: required(&settings.endpoint, "endpoint")?,
                account: required(&settings.access_key_id, "access_key_id")?,
                access_key: required(&settings.secret_access_key, "secret_access_key")?,
            },
            other => {
                return Err(StorageError::configuration(format!(
                    "unknown storage provider '{other}'"
                )));
            }
        };

        Ok(Self::new(provider)
            .with_buckets(settings.buckets.clone())
            .with_public_base_url(settings.public_base_url.clone())
            .with_max_file_size(settings.max_file_size))
    }

    /// Set bucket names.
    #[must_use]
    pub fn with_buckets(mut self, buckets: BucketNames) -> Self {
        self.buckets = buckets;
        self
    }

    /// Set the public base URL.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into();
        self
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Default accepted MIME types: PDF, Word, JPEG and PNG.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        [
            "application/pdf",
            "application/msword",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "image/jpeg",
            "image/png",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|t| t == mime_type)
    }

    /// Configured name of a bucket.
    #[must_use]
    pub fn bucket_name(&self, bucket: Bucket) -> &str {
        match bucket {
            Bucket::LegalDocuments => &self.buckets.legal_documents,
            Bucket::AmortizationSchedules => &self.buckets.amortization_schedules,
            Bucket::EntryAttachments => &self.buckets.entry_attachments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::new(StorageProvider::Memory);
        assert_eq!(config.max_file_size, 5 * 1024 * 1024);
        assert_eq!(
            config.bucket_name(Bucket::LegalDocuments),
            "documents-juridiques"
        );
        assert_eq!(
            config.bucket_name(Bucket::AmortizationSchedules),
            "tableaux-amortissement"
        );
        assert_eq!(
            config.bucket_name(Bucket::EntryAttachments),
            "comptabilite-attachments"
        );
    }

    #[test]
    fn test_mime_types() {
        let config = StorageConfig::new(StorageProvider::Memory);
        assert!(config.is_mime_type_allowed("application/pdf"));
        assert!(config.is_mime_type_allowed("image/jpeg"));
        assert!(config.is_mime_type_allowed(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        ));
        assert!(!config.is_mime_type_allowed("image/gif"));
        assert!(!config.is_mime_type_allowed("text/html"));
    }

    #[test]
    fn test_from_settings_fs() {
        let settings = StorageSettings::default();
        let config = StorageConfig::from_settings(&settings).unwrap();
        assert_eq!(config.provider.name(), "fs");
        assert_eq!(config.public_base_url, settings.public_base_url);
    }

    #[test]
    fn test_from_settings_s3_requires_credentials() {
        let settings = StorageSettings {
            provider: "s3".to_string(),
            endpoint: Some("https://s3.example.com".to_string()),
            ..StorageSettings::default()
        };
        let err = StorageConfig::from_settings(&settings).unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_from_settings_unknown_provider() {
        let settings = StorageSettings {
            provider: "ftp".to_string(),
            ..StorageSettings::default()
        };
        assert!(StorageConfig::from_settings(&settings).is_err());
    }
}
