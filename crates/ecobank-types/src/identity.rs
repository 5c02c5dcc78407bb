//! Identity types for EcoBank
//!
//! All identity types are strongly typed wrappers around UUIDs so an owner
//! can never be passed where a transaction is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID types with common implementations
macro_rules! define_id_type {
    ($name:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse from a string (with or without prefix)
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                let s = s.strip_prefix(concat!($prefix, "_")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Get the inner UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id_type!(OwnerId, "owner", "Unique identifier for the owner of a transaction set");
define_id_type!(TransactionId, "tx", "Unique identifier for a transaction record");
define_id_type!(FactorId, "factor", "Unique identifier for a stored emission factor row");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_prefixed() {
        let id = OwnerId::from(Uuid::nil());
        assert_eq!(id.to_string(), "owner_00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_parse_with_and_without_prefix() {
        let id = TransactionId::new();
        let prefixed = TransactionId::parse(&id.to_string()).unwrap();
        let bare = TransactionId::parse(&id.as_uuid().to_string()).unwrap();
        assert_eq!(prefixed, id);
        assert_eq!(bare, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(OwnerId::parse("owner_not-a-uuid").is_err());
    }
}
