use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of a hyphenated UUID string.
const ID_LEN: usize = 36;

/// Unique identifier assigned to a transaction when it is created.
///
/// Stored as its string form so ids written by other producers survive a
/// load/persist cycle untouched. Fresh ids are always random version-4 UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a fresh identifier (lowercase hyphenated UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id has the canonical version-4 shape:
    /// `xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx` with `y` in `{8, 9, a, b}`.
    pub fn is_v4_shaped(&self) -> bool {
        let bytes = self.0.as_bytes();
        if bytes.len() != ID_LEN {
            return false;
        }

        for (i, &b) in bytes.iter().enumerate() {
            let ok = match i {
                8 | 13 | 18 | 23 => b == b'-',
                14 => b == b'4',
                19 => matches!(b, b'8' | b'9' | b'a' | b'b'),
                _ => b.is_ascii_digit() || (b'a'..=b'f').contains(&b),
            };
            if !ok {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
