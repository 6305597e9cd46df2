use serde::{Deserialize, Serialize};

use crate::error::{InvalidColumnError, ReconError};

// ---------------------------------------------------------------------------
// Column mapper
// ---------------------------------------------------------------------------

/// Translate a single column letter into a zero-based index ("A" → 0, "c" → 2).
///
/// Only one ASCII letter is accepted; columns past "Z" are not addressable.
pub fn column_index(letter: &str) -> Result<usize, InvalidColumnError> {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Ok((c.to_ascii_lowercase() as u8 - b'a') as usize)
        }
        _ => Err(InvalidColumnError(letter.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Column config
// ---------------------------------------------------------------------------

/// Column letters for the four cells the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub roll_identifier: String,
    pub roll_names: String,
    pub manifest_name: String,
    pub manifest_identifiers: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            roll_identifier: "A".into(),
            roll_names: "C".into(),
            manifest_name: "B".into(),
            manifest_identifiers: "C".into(),
        }
    }
}

impl ColumnConfig {
    /// Resolve every letter up front. The resulting layout is immutable for
    /// the whole run.
    pub fn resolve(&self) -> Result<ColumnLayout, ReconError> {
        let field = |field: &'static str, letter: &str| {
            column_index(letter).map_err(|source| ReconError::InvalidColumn { field, source })
        };

        Ok(ColumnLayout {
            roll_identifier: field("roll_identifier", &self.roll_identifier)?,
            roll_names: field("roll_names", &self.roll_names)?,
            manifest_name: field("manifest_name", &self.manifest_name)?,
            manifest_identifiers: field("manifest_identifiers", &self.manifest_identifiers)?,
        })
    }
}

/// Zero-based column indices, resolved from a [`ColumnConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub roll_identifier: usize,
    pub roll_names: usize,
    pub manifest_name: usize,
    pub manifest_identifiers: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            roll_identifier: 0,
            roll_names: 2,
            manifest_name: 1,
            manifest_identifiers: 2,
        }
    }
}
