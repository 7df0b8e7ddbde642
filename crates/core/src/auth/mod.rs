//! Authentication helpers.
//!
//! - Password hashing with Argon2id
//! - Credential checks run before any call to the account store
//! - French messages for account store failures

mod credentials;
mod password;

pub use credentials::{
    AuthError, GENERIC_AUTH_MESSAGE, MIN_PASSWORD_LEN, localize_auth_error, validate_credentials,
    validate_password_change,
};
pub use password::{PasswordError, hash_password, verify_password};
