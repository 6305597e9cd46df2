use std::fmt;

use serde::Serialize;

use crate::error::ReconError;
use crate::model::SourceRow;

/// Which side of the reconciliation a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Roll,
    Manifest,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Roll => write!(f, "roll"),
            Self::Manifest => write!(f, "manifest"),
        }
    }
}

/// Supplies the ordered rows of one tabular source.
///
/// Implementations decide how the rows are obtained (spreadsheet, CSV, memory).
/// Failing here is fatal to the run and reported as
/// [`ReconError::SourceUnavailable`].
pub trait RowSource {
    fn read_rows(&self) -> Result<Vec<SourceRow>, ReconError>;
}

impl RowSource for Vec<SourceRow> {
    fn read_rows(&self) -> Result<Vec<SourceRow>, ReconError> {
        Ok(self.clone())
    }
}
