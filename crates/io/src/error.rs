use std::path::PathBuf;

use thiserror::Error;

/// Reader failures. Any of these makes the source unavailable for a run.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("{}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file '{0}' (expected xlsx, xlsm, xls, xlsb, ods, csv or tsv)")]
    Unsupported(String),

    #[error("failed to open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("delimiter {0:?} cannot be used (expected an ASCII character other than a quote or line break)")]
    InvalidDelimiter(char),

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("sheet '{name}' not found (available: {})", .available.join(", "))]
    SheetNotFound { name: String, available: Vec<String> },

    #[error("malformed delimited file: {0}")]
    Csv(#[from] ::csv::Error),
}
