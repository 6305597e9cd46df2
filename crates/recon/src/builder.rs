use crate::config::ColumnLayout;
use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::error::{RowFault, RowParseError};
use crate::model::{Cell, ManifestTable, RollTable, SourceRow};
use crate::source::SourceKind;

/// Builds the roll and manifest tables from raw rows.
///
/// Row-level failures are emitted to the sink as they occur and collected for
/// the report; they never stop ingestion.
pub struct RecordBuilder<'a> {
    layout: ColumnLayout,
    sink: &'a mut dyn DiagnosticSink,
    row_errors: Vec<RowParseError>,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(layout: ColumnLayout, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            layout,
            sink,
            row_errors: Vec::new(),
        }
    }

    pub fn roll(&mut self, rows: &[SourceRow]) -> RollTable {
        let mut table = RollTable::new();
        for row in rows {
            match self.parse_roll_row(row) {
                Ok(Some((identifier, names))) => table.insert_or_merge(identifier, names, row.number),
                Ok(None) => {}
                Err(fault) => self.reject(SourceKind::Roll, row.number, fault),
            }
        }
        log::debug!("roll: {} rows -> {} entries", rows.len(), table.len());
        table
    }

    pub fn manifest(&mut self, rows: &[SourceRow]) -> ManifestTable {
        let mut table = ManifestTable::new();
        for row in rows {
            match self.parse_manifest_row(row) {
                Ok((name, identifiers)) => table.insert_or_append(name, identifiers, row.number),
                Err(fault) => self.reject(SourceKind::Manifest, row.number, fault),
            }
        }
        log::debug!("manifest: {} rows -> {} entries", rows.len(), table.len());
        table
    }

    /// Row errors seen so far, in source order.
    pub fn finish(self) -> Vec<RowParseError> {
        self.row_errors
    }

    /// `Ok(None)` when the identifier cell is empty: the row is skipped silently.
    fn parse_roll_row(&self, row: &SourceRow) -> Result<Option<(String, Vec<String>)>, RowFault> {
        let identifier = match row.cell(self.layout.roll_identifier) {
            None => return Ok(None),
            Some(cell) if cell.is_empty() => return Ok(None),
            Some(cell) => text_of(cell, "identifier")?,
        };
        let identifier = identifier.trim().to_string();

        let names = match row.cell(self.layout.roll_names) {
            None => Vec::new(),
            Some(cell) if cell.is_empty() => Vec::new(),
            Some(cell) => split_names(&text_of(cell, "names")?),
        };

        Ok(Some((identifier, names)))
    }

    fn parse_manifest_row(&self, row: &SourceRow) -> Result<(String, Vec<String>), RowFault> {
        let name = match row.cell(self.layout.manifest_name) {
            None | Some(Cell::Empty) => return Err(RowFault::MissingCell { column: "name" }),
            Some(Cell::Text(s)) => s.trim_end().to_string(),
            Some(other) => {
                return Err(RowFault::NotText {
                    column: "name",
                    found: other.type_name(),
                })
            }
        };
        if name.is_empty() {
            return Err(RowFault::MissingCell { column: "name" });
        }

        let identifiers = match row.cell(self.layout.manifest_identifiers) {
            None => Vec::new(),
            Some(cell) if cell.is_empty() => Vec::new(),
            Some(cell) => split_identifiers(&text_of(cell, "identifiers")?),
        };

        Ok((name, identifiers))
    }

    fn reject(&mut self, side: SourceKind, row: usize, fault: RowFault) {
        let err = RowParseError { side, row, fault };
        self.sink.emit(Diagnostic::RowParse(err.clone()));
        self.row_errors.push(err);
    }
}

fn text_of(cell: &Cell, column: &'static str) -> Result<String, RowFault> {
    cell.as_text()
        .map(|t| t.into_owned())
        .ok_or(RowFault::NotText {
            column,
            found: cell.type_name(),
        })
}

/// One name per line of the cell; blank lines dropped.
fn split_names(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma-separated identifiers; empty tokens dropped, repeats kept.
fn split_identifiers(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
