//! Authenticated session passed explicitly to every operation.

use immoloc_shared::types::{SessionId, UserId};
use serde::Serialize;

/// The signed-in owner on whose behalf an operation runs.
///
/// Built from validated token claims at the request boundary and handed to
/// services by reference; there is no ambient "current user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Account.
    pub user_id: UserId,
    /// Login session, revoked at sign-out.
    pub session_id: SessionId,
    /// Account email.
    pub email: String,
}

impl Session {
    /// Creates a session.
    #[must_use]
    pub fn new(user_id: UserId, session_id: SessionId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            session_id,
            email: email.into(),
        }
    }
}
