//! Resolved compile-time values of Go constants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The value a constant resolved to.
///
/// `Unresolved` marks a constant whose value could not be computed
/// (cross-package reference, float arithmetic, overflow, missing name).
/// It is never folded into `Int(0)` or an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ConstValue {
    Int(i128),
    Str(String),
    #[default]
    Unresolved,
}

impl ConstValue {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

impl From<i128> for ConstValue {
    fn from(v: i128) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ConstValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Str(s) => write!(f, "{:?}", s),
            Self::Unresolved => write!(f, "<unresolved>"),
        }
    }
}
