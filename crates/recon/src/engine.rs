use crate::builder::RecordBuilder;
use crate::checker::cross_check;
use crate::config::{ColumnConfig, ColumnLayout};
use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::model::{ReconMeta, ReconReport, SourceRow};
use crate::source::RowSource;

/// Run one analysis: resolve columns, read both sources, build the tables and
/// cross-check them.
///
/// The sink sees an "analysis started" marker first and either "analysis
/// finished" or a fatal error followed by "analysis failed" last. `Ok` means the
/// run completed; discrepancies are part of a successful report.
pub fn run(
    columns: &ColumnConfig,
    roll: &dyn RowSource,
    manifest: &dyn RowSource,
    sink: &mut dyn DiagnosticSink,
) -> Result<ReconReport, ReconError> {
    sink.emit(Diagnostic::AnalysisStarted);

    match load(columns, roll, manifest) {
        Ok((layout, roll_rows, manifest_rows)) => {
            let mut report = analyze_rows(layout, &roll_rows, &manifest_rows, sink);
            report.meta.columns = Some(columns.clone());
            sink.emit(Diagnostic::AnalysisFinished);
            Ok(report)
        }
        Err(e) => {
            sink.emit(Diagnostic::Fatal(e.to_string()));
            sink.emit(Diagnostic::AnalysisFailed);
            Err(e)
        }
    }
}

/// Columns are resolved before either source is touched.
fn load(
    columns: &ColumnConfig,
    roll: &dyn RowSource,
    manifest: &dyn RowSource,
) -> Result<(ColumnLayout, Vec<SourceRow>, Vec<SourceRow>), ReconError> {
    let layout = columns.resolve()?;
    let roll_rows = roll.read_rows()?;
    let manifest_rows = manifest.read_rows()?;
    log::debug!(
        "loaded {} roll rows and {} manifest rows",
        roll_rows.len(),
        manifest_rows.len()
    );
    Ok((layout, roll_rows, manifest_rows))
}

/// Build both tables from already-read rows and cross-check them.
///
/// Emits row errors and discrepancies but no bracketing markers.
pub fn analyze_rows(
    layout: ColumnLayout,
    roll_rows: &[SourceRow],
    manifest_rows: &[SourceRow],
    sink: &mut dyn DiagnosticSink,
) -> ReconReport {
    let mut builder = RecordBuilder::new(layout, sink);
    let roll = builder.roll(roll_rows);
    let mut manifest = builder.manifest(manifest_rows);
    let row_errors = builder.finish();

    let discrepancies = cross_check(&roll, &mut manifest, sink);
    let summary = compute_summary(&roll, &manifest, &discrepancies, &row_errors);

    log::debug!(
        "cross-check: {} roll entries, {} manifest entries, {} discrepancies",
        summary.roll_entries,
        summary.manifest_entries,
        summary.discrepancies
    );

    ReconReport {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            columns: None,
        },
        summary,
        discrepancies,
        row_errors,
    }
}
