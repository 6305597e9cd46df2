//! `rollcheck-recon`: roll/manifest cross-validation engine.
//!
//! Pure engine crate: receives pre-parsed rows, emits leveled diagnostics and
//! returns a structured report. No spreadsheet or CLI dependencies.

pub mod builder;
pub mod checker;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod model;
pub mod source;

pub use config::{column_index, ColumnConfig, ColumnLayout};
pub use diagnostic::{Diagnostic, DiagnosticSink, Discrepancy, LogSink, Severity};
pub use engine::{analyze_rows, run};
pub use error::{InvalidColumnError, ReconError, RowFault, RowParseError};
pub use model::{Cell, ManifestEntry, ManifestTable, ReconReport, RollEntry, RollTable, SourceRow};
pub use source::{RowSource, SourceKind};
