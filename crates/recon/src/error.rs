use serde::Serialize;
use thiserror::Error;

use crate::source::SourceKind;

/// Run-level failures. Any of these stops the analysis before the cross-check.
#[derive(Debug, Error)]
pub enum ReconError {
    /// A configured column letter cannot address a cell.
    #[error("column '{field}': {source}")]
    InvalidColumn {
        field: &'static str,
        #[source]
        source: InvalidColumnError,
    },
    /// A row source could not supply rows at all.
    #[error("cannot read {kind} source: {message}")]
    SourceUnavailable { kind: SourceKind, message: String },
}

/// A column designator that is not exactly one ASCII letter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid column designator '{0}': expected a single letter A-Z")]
pub struct InvalidColumnError(pub String);

/// One row that could not be decomposed into key and tokens.
///
/// Row errors are local: the row is skipped and ingestion continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("cannot parse {side} row {row}: {fault}")]
pub struct RowParseError {
    pub side: SourceKind,
    pub row: usize,
    pub fault: RowFault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowFault {
    #[error("{column} cell is missing")]
    MissingCell { column: &'static str },
    #[error("{column} cell holds {found}, expected text")]
    NotText {
        column: &'static str,
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_error_message_names_side_and_row() {
        let err = RowParseError {
            side: SourceKind::Manifest,
            row: 14,
            fault: RowFault::MissingCell { column: "name" },
        };
        assert_eq!(err.to_string(), "cannot parse manifest row 14: name cell is missing");
    }

    #[test]
    fn invalid_column_message_names_field() {
        let err = ReconError::InvalidColumn {
            field: "roll_names",
            source: InvalidColumnError("AA".into()),
        };
        assert_eq!(
            err.to_string(),
            "column 'roll_names': invalid column designator 'AA': expected a single letter A-Z"
        );
    }
}
