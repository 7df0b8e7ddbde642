//! Application configuration management.
//!
//! Sources are layered: `config/default.toml`, then `config/{RUN_MODE}.toml`,
//! then `IMMOLOC__SECTION__KEY` environment variables.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600
}

fn default_refresh_token_expiry() -> u64 {
    2_592_000 // 30 days
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backend: `fs`, `s3`, `azblob` or `memory`.
    #[serde(default = "default_storage_provider")]
    pub provider: String,
    /// Root directory (`fs`) or key prefix (`s3`, `azblob`).
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// Endpoint for S3-compatible or Azure services.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// S3 region.
    #[serde(default)]
    pub region: Option<String>,
    /// S3 access key ID or Azure account name.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// S3 secret access key or Azure account key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Base URL under which objects are publicly readable.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Bucket names.
    #[serde(default)]
    pub buckets: BucketNames,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: default_storage_provider(),
            root: default_storage_root(),
            endpoint: None,
            region: None,
            access_key_id: None,
            secret_access_key: None,
            public_base_url: default_public_base_url(),
            max_file_size: default_max_file_size(),
            buckets: BucketNames::default(),
        }
    }
}

fn default_storage_provider() -> String {
    "fs".to_string()
}

fn default_storage_root() -> String {
    "./storage".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/storage".to_string()
}

fn default_max_file_size() -> u64 {
    5 * 1024 * 1024
}

/// Names of the three buckets files are stored in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BucketNames {
    /// Leases, ownership certificates and notarial statements.
    #[serde(default = "default_legal_documents_bucket")]
    pub legal_documents: String,
    /// Amortization schedules.
    #[serde(default = "default_amortization_bucket")]
    pub amortization_schedules: String,
    /// Supporting files for accounting entries.
    #[serde(default = "default_entry_attachments_bucket")]
    pub entry_attachments: String,
}

impl Default for BucketNames {
    fn default() -> Self {
        Self {
            legal_documents: default_legal_documents_bucket(),
            amortization_schedules: default_amortization_bucket(),
            entry_attachments: default_entry_attachments_bucket(),
        }
    }
}

fn default_legal_documents_bucket() -> String {
    "documents-juridiques".to_string()
}

fn default_amortization_bucket() -> String {
    "tableaux-amortissement".to_string()
}

fn default_entry_attachments_bucket() -> String {
    "comptabilite-attachments".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("IMMOLOC").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("IMMOLOC__DATABASE__URL", Some("postgres://localhost/immoloc")),
                ("IMMOLOC__JWT__SECRET", Some("secret")),
                ("RUN_MODE", Some("test-does-not-exist")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/immoloc");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.jwt.access_token_expiry_secs, 3600);
                assert_eq!(config.storage.provider, "fs");
                assert_eq!(config.storage.max_file_size, 5 * 1024 * 1024);
                assert_eq!(config.storage.buckets, BucketNames::default());
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("IMMOLOC__DATABASE__URL", None::<&str>),
                ("IMMOLOC__JWT__SECRET", Some("secret")),
                ("RUN_MODE", Some("test-does-not-exist")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_default_bucket_names() {
        let buckets = BucketNames::default();
        assert_eq!(buckets.legal_documents, "documents-juridiques");
        assert_eq!(buckets.amortization_schedules, "tableaux-amortissement");
        assert_eq!(buckets.entry_attachments, "comptabilite-attachments");
    }
}
