//! Core business logic for Immoloc.
//!
//! This crate holds the domain rules with no web or database dependencies.
//! Persistence is reached through the repository traits each module declares.
//!
//! # Modules
//!
//! - `entry` - accounting entries, their validation and the edit buffer
//! - `bilan` - yearly ledger lifecycle, intake wizard and finalization gate
//! - `property` - rental properties
//! - `profile` - owner profile
//! - `document` - files filed against a property
//! - `attachment` - files supporting an entry
//! - `archive` - finalized ledgers grouped by property
//! - `storage` - object storage on OpenDAL
//! - `auth` - password hashing and credential checks

pub mod archive;
pub mod attachment;
pub mod auth;
pub mod bilan;
pub mod document;
pub mod entry;
pub mod profile;
pub mod property;
pub mod session;
pub mod storage;
mod vocabulary;

pub use session::Session;
