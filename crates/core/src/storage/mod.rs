//! Object storage for property documents and entry attachments, on Apache OpenDAL.
//!
//! Files live in three buckets:
//!
//! ```text
//! documents-juridiques       {user}/{property}/{category}/{unique}.{ext}
//! tableaux-amortissement     {user}/{property}/{category}/{unique}.{ext}
//! comptabilite-attachments   {user}/{entry}/{unique}.{ext}
//! ```
//!
//! Supported backends: S3-compatible services, Azure Blob Storage, the local
//! filesystem and an in-memory store for tests.

mod config;
mod error;
mod service;

pub use config::{Bucket, StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{StorageService, StoredObject, sanitize_filename};
