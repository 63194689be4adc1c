//! Strongly-typed id newtypes for backend entities.
//!
//! The backend hands out opaque string ids. Wrapping them keeps a
//! `CourseId` from being passed where a `SessionId` is expected.
//!
//! # Example
//!
//! ```ignore
//! use rollcall_models::ids::{CourseId, SessionId};
//!
//! fn open_session(id: &SessionId) { /* ... */ }
//!
//! let session = SessionId::from("64f1c2");
//! open_session(&session);          // OK
//! // open_session(&CourseId::from("64f1c2")); // Compile error! Type mismatch.
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to define a strongly-typed id newtype over a string.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// An empty id disables queries keyed on it.
            #[inline]
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            #[inline]
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Identifier of a user account (admin, faculty or student).
    UserId
}

define_id! {
    /// Identifier of a department.
    DepartmentId
}

define_id! {
    /// Identifier of a course.
    CourseId
}

define_id! {
    /// Identifier of a class session.
    SessionId
}

define_id! {
    /// Identifier of an attendance record.
    AttendanceId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = CourseId::from("c-101");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"c-101\"");

        let back: CourseId = serde_json::from_str("\"c-101\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_blank_id_is_empty() {
        assert!(SessionId::from("").is_empty());
        assert!(SessionId::from("  ").is_empty());
        assert!(!SessionId::from("s1").is_empty());
    }

    #[test]
    fn test_debug_names_the_type() {
        assert_eq!(format!("{:?}", UserId::from("u1")), "UserId(u1)");
        assert_eq!(UserId::from("u1").to_string(), "u1");
    }
}
