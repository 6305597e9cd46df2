//! CLI Exit Code Registry
//!
//! Single source of truth for every exit code `rollcheck` returns.
//! Scripts rely on these values.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success (discrepancies alone do not fail a run)          |
//! | 1    | General error                                            |
//! | 2    | Usage error (bad arguments, bad path, bad settings file) |
//! | 3    | Discrepancies or row errors found, with `--strict`       |
//! | 4    | A source could not be read                               |
//! | 5    | Invalid column configuration                             |

use rollcheck_recon::ReconError;

/// Success - command completed.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unsupported path, malformed settings file.
pub const EXIT_USAGE: u8 = 2;

/// The check completed but found discrepancies or row errors (`--strict` only).
pub const EXIT_CHECK_FINDINGS: u8 = 3;

/// Roll or manifest could not be opened or read.
pub const EXIT_SOURCE_UNAVAILABLE: u8 = 4;

/// A column letter in the configuration is not a single letter A-Z.
pub const EXIT_INVALID_COLUMN: u8 = 5;

/// Map a fatal engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::InvalidColumn { .. } => EXIT_INVALID_COLUMN,
        ReconError::SourceUnavailable { .. } => EXIT_SOURCE_UNAVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcheck_recon::{InvalidColumnError, SourceKind};

    #[test]
    fn engine_errors_have_distinct_codes() {
        let column = ReconError::InvalidColumn {
            field: "roll_names",
            source: InvalidColumnError("CC".into()),
        };
        let source = ReconError::SourceUnavailable {
            kind: SourceKind::Roll,
            message: "gone".into(),
        };
        assert_eq!(recon_exit_code(&column), EXIT_INVALID_COLUMN);
        assert_eq!(recon_exit_code(&source), EXIT_SOURCE_UNAVAILABLE);
        assert_ne!(EXIT_INVALID_COLUMN, EXIT_USAGE);
    }
}
