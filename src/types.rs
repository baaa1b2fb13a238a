//! NewType wrappers for strong typing throughout the service.
//!
//! These types prevent accidental mixing of semantically different strings
//! (e.g., passing a content id where an owner id is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(
    /// Record key of a user (the `user` table).
    ///
    /// This is the identifier embedded in bearer tokens and stored as the
    /// owner reference on content and share links.
    UserId
);

newtype_string!(
    /// Record key of a saved content item.
    ContentId
);

newtype_string!(
    /// Record key of a tag.
    TagId
);

newtype_string!(
    /// Opaque random string granting read-only access to one user's brain.
    ///
    /// Anyone holding this token can list the owner's content and username,
    /// so it is treated as a capability rather than an identifier.
    ShareToken
);

newtype_string!(
    /// Human-chosen login name, unique across users.
    Username
);

/// Generate a fresh record key.
///
/// Keys are simple-form UUIDv4 strings so they can be passed back verbatim
/// in request bodies and URLs.
pub fn new_record_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
