// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID newtypes and generation abstractions

use smol_str::SmolStr;

// Re-exported for use inside `define_id!` expansions.
#[doc(hidden)]
pub use smol_str::SmolStr as IdStr;

/// Length of the random suffix appended after an ID prefix.
pub const ID_SUFFIX_LEN: usize = 19;

#[doc(hidden)]
pub fn random_suffix() -> String {
    nanoid::nanoid!(ID_SUFFIX_LEN)
}

/// Define a newtype ID wrapper with a type prefix.
///
/// Generates `new()` for random ID generation, `from_string()` for parsing,
/// `as_str()`, `short()`, `Display`, `From<&str>`/`From<String>`,
/// `PartialEq<str>`, `Borrow<str>`, and `AsRef<str>` implementations.
///
/// The generated format is `{prefix}{suffix}` where `prefix` is a short type
/// indicator (e.g. `"exp-"`) and `suffix` is a 19-character nanoid.
/// `from_string` accepts any opaque identifier, including caller-supplied
/// UUIDs that carry no prefix.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($prefix:literal);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name($crate::id::IdStr);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Generate a new random ID with the type prefix
            pub fn new() -> Self {
                Self($crate::id::IdStr::new(format!(
                    "{}{}",
                    Self::PREFIX,
                    $crate::id::random_suffix()
                )))
            }

            /// Create ID from existing string (for parsing/deserialization)
            pub fn from_string(id: impl AsRef<str>) -> Self {
                Self($crate::id::IdStr::new(id.as_ref()))
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Returns a string slice truncated to at most `n` characters.
            pub fn short(&self, n: usize) -> &str {
                let s = self.0.as_str();
                &s[..std::cmp::min(n, s.len())]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from_string(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from_string(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0.as_str() == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0.as_str() == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.0.as_str()
            }
        }
    };
}

define_id! {
    /// Identifier of a user-submitted expression.
    pub struct ExprId("exp-");
}

define_id! {
    /// Identifier of one binary node in an expression's dependency graph.
    pub struct SubId("sub-");
}

define_id! {
    /// Identifier of an external worker agent. Agents mint their own IDs;
    /// the orchestrator only ever sees them via [`from_string`](AgentId::from_string).
    pub struct AgentId("agt-");
}

/// Identifier of an authenticated caller, assigned by the auth collaborator.
/// Never generated locally, so it lives outside `define_id!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UserId(SmolStr);

impl UserId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Source of fresh identifiers for sub-expression graphs.
///
/// The splitter takes this as a seam so tests can produce deterministic
/// graphs while production uses random UUIDs.
pub trait IdGen: Send + Sync {
    fn next(&self) -> String;
}

/// Production ID generator backed by UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
