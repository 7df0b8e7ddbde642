//! Typed IDs for type-safe entity references.
//!
//! A `PropertyId` can never be passed where a `BilanId` is expected, even though
//! both are UUIDs on the wire and in the database.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new time-ordered ID (UUID v7).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Identifier of an authenticated account.");
typed_id!(SessionId, "Identifier of a login session.");
typed_id!(PropertyId, "Identifier of a rental property.");
typed_id!(BilanId, "Identifier of an annual accounting ledger.");
typed_id!(EntryId, "Identifier of an accounting entry.");
typed_id!(AttachmentId, "Identifier of a file attached to an accounting entry.");
typed_id!(DocumentId, "Identifier of a legal document attached to a property.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_ids_are_time_ordered() {
        let first = EntryId::new();
        let second = EntryId::new();
        assert!(first <= second);
    }

    #[test]
    fn test_uuid_conversions() {
        let uuid = Uuid::new_v4();
        let id = PropertyId::from(uuid);
        assert_eq!(id.into_inner(), uuid);
        assert_eq!(Uuid::from(id), uuid);
    }

    #[test]
    fn test_display_and_parse() {
        let id = BilanId::new();
        let parsed = BilanId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
        assert!(BilanId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&DocumentId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }
}
