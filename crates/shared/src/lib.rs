//! Shared types, errors, and configuration for Immoloc.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for owners, properties, ledgers, entries and files
//! - Authentication payloads and JWT handling
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
