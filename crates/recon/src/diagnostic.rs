use std::fmt;

use serde::Serialize;

use crate::error::RowParseError;

/// Log target used by [`LogSink`].
pub const LOG_TARGET: &str = "rollcheck";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Discrepancies
// ---------------------------------------------------------------------------

/// A mismatch between roll and manifest. Always reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    /// A roll name has no manifest entry at all.
    MissingNameInManifest {
        identifier: String,
        name: String,
        roll_row: usize,
    },
    /// The manifest entry for a roll name does not list the roll identifier.
    MissingIdentifierInManifest {
        identifier: String,
        name: String,
        manifest_row: usize,
    },
    /// The manifest claims an identifier the roll does not have.
    UnknownIdentifierInManifest {
        identifier: String,
        manifest_row: usize,
    },
    /// The manifest claims an identifier whose roll names do not include it.
    NameMissingFromRoll {
        identifier: String,
        name: String,
        manifest_row: usize,
    },
    /// The manifest lists valid identifiers more often than the roll records them.
    SurplusIdentifierInManifest {
        name: String,
        manifest_row: usize,
        surplus: usize,
    },
}

impl Discrepancy {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingNameInManifest { .. } => "missing_name_in_manifest",
            Self::MissingIdentifierInManifest { .. } => "missing_identifier_in_manifest",
            Self::UnknownIdentifierInManifest { .. } => "unknown_identifier_in_manifest",
            Self::NameMissingFromRoll { .. } => "name_missing_from_roll",
            Self::SurplusIdentifierInManifest { .. } => "surplus_identifier_in_manifest",
        }
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNameInManifest { identifier, name, roll_row } => write!(
                f,
                "missing name {name} in manifest; roll position: {identifier} (roll row {roll_row})"
            ),
            Self::MissingIdentifierInManifest { identifier, name, manifest_row } => write!(
                f,
                "missing roll position {identifier} for name {name} in manifest; manifest row: {manifest_row}"
            ),
            Self::UnknownIdentifierInManifest { identifier, manifest_row } => write!(
                f,
                "nonexistent roll position {identifier} in manifest; manifest row: {manifest_row}"
            ),
            Self::NameMissingFromRoll { identifier, name, manifest_row } => write!(
                f,
                "name {name} is not on the roll for position {identifier}; manifest row: {manifest_row}"
            ),
            Self::SurplusIdentifierInManifest { name, manifest_row, surplus } => write!(
                f,
                "name {name} claims {surplus} more position(s) than the roll records; manifest row: {manifest_row}"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// A leveled message emitted during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    AnalysisStarted,
    AnalysisFinished,
    AnalysisFailed,
    /// Run-level failure (bad column, unreadable source).
    Fatal(String),
    RowParse(RowParseError),
    Discrepancy(Discrepancy),
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Self::AnalysisStarted | Self::AnalysisFinished | Self::AnalysisFailed => Severity::Info,
            Self::Fatal(_) | Self::RowParse(_) | Self::Discrepancy(_) => Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnalysisStarted => write!(f, "---- analysis started ----"),
            Self::AnalysisFinished => write!(f, "---- analysis finished ----"),
            Self::AnalysisFailed => write!(f, "---- analysis failed ----"),
            Self::Fatal(msg) => write!(f, "{msg}"),
            Self::RowParse(err) => write!(f, "{err}"),
            Self::Discrepancy(d) => write!(f, "{d}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Receives diagnostics as a run produces them. Emission is fire-and-forget.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Collects everything, in emission order.
impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

/// Forwards diagnostics to the `log` facade under [`LOG_TARGET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Info => log::info!(target: LOG_TARGET, "{diagnostic}"),
            Severity::Error => log::error!(target: LOG_TARGET, "{diagnostic}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowFault;
    use crate::source::SourceKind;

    #[test]
    fn markers_are_info_everything_else_error() {
        assert_eq!(Diagnostic::AnalysisStarted.severity(), Severity::Info);
        assert_eq!(Diagnostic::AnalysisFinished.severity(), Severity::Info);
        assert_eq!(Diagnostic::AnalysisFailed.severity(), Severity::Info);
        assert!(Diagnostic::Fatal("x".into()).is_error());
        assert!(Diagnostic::RowParse(RowParseError {
            side: SourceKind::Roll,
            row: 1,
            fault: RowFault::MissingCell { column: "names" },
        })
        .is_error());
    }

    #[test]
    fn messages_carry_identifier_name_and_row() {
        let d = Discrepancy::MissingIdentifierInManifest {
            identifier: "7".into(),
            name: "Nowak".into(),
            manifest_row: 3,
        };
        let msg = d.to_string();
        assert!(msg.contains("7"));
        assert!(msg.contains("Nowak"));
        assert!(msg.contains("manifest row: 3"));

        let d = Discrepancy::MissingNameInManifest {
            identifier: "7".into(),
            name: "Nowak".into(),
            roll_row: 9,
        };
        assert_eq!(
            d.to_string(),
            "missing name Nowak in manifest; roll position: 7 (roll row 9)"
        );
    }

    #[test]
    fn discrepancy_serializes_with_kind_tag() {
        let d = Discrepancy::UnknownIdentifierInManifest {
            identifier: "99".into(),
            manifest_row: 2,
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "unknown_identifier_in_manifest");
        assert_eq!(json["identifier"], "99");
        assert_eq!(json["manifest_row"], 2);
        assert_eq!(d.kind(), "unknown_identifier_in_manifest");
    }
}
