use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::config::ColumnConfig;
use crate::diagnostic::Discrepancy;
use crate::error::RowParseError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single cell as delivered by a row source.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Error(String),
}

impl Cell {
    /// Textual form used as a key or token source. `None` for content that has
    /// no textual reading (booleans, spreadsheet errors) and for empty cells.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Self::Number(n) => Some(Cow::Owned(format_number(*n))),
            Self::Empty | Self::Bool(_) | Self::Error(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "nothing",
            Self::Text(_) => "text",
            Self::Number(_) => "a number",
            Self::Bool(_) => "a boolean",
            Self::Error(_) => "a spreadsheet error",
        }
    }
}

/// Integers without decimals, everything else in its shortest float form.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// One row of a source, numbered as in the original sheet (1-based).
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub number: usize,
    pub cells: Vec<Cell>,
}

impl SourceRow {
    pub fn new(number: usize, cells: Vec<Cell>) -> Self {
        Self { number, cells }
    }

    /// Cell at a zero-based column; `None` past the end of the row.
    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }
}

// ---------------------------------------------------------------------------
// Roll
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollEntry {
    pub identifier: String,
    /// Ordered set: first-seen order, no duplicates, no empty strings.
    pub names: Vec<String>,
    pub source_row: usize,
}

impl RollEntry {
    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn merge_names(&mut self, names: impl IntoIterator<Item = String>) {
        for name in names {
            if !name.is_empty() && !self.has_name(&name) {
                self.names.push(name);
            }
        }
    }
}

/// identifier → RollEntry, iterated in first-insertion order.
#[derive(Debug, Default)]
pub struct RollTable {
    entries: Vec<RollEntry>,
    index: HashMap<String, usize>,
}

impl RollTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the entry on first sight, otherwise merge the names into it.
    /// The stored row is always the first row the identifier appeared on.
    pub fn insert_or_merge(&mut self, identifier: String, names: Vec<String>, row: usize) {
        match self.index.get(&identifier) {
            Some(&i) => self.entries[i].merge_names(names),
            None => {
                let mut entry = RollEntry {
                    identifier: identifier.clone(),
                    names: Vec::with_capacity(names.len()),
                    source_row: row,
                };
                entry.merge_names(names);
                self.index.insert(identifier, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&RollEntry> {
        self.index.get(identifier).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RollEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub name: String,
    /// Every claimed identifier, repeats included.
    pub identifiers: Vec<String>,
    pub source_row: usize,
    /// Roll (identifier, name) pairs confirmed against this entry.
    pub matched_count: usize,
}

impl ManifestEntry {
    pub fn claims(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|i| i == identifier)
    }
}

/// name → ManifestEntry, iterated in first-insertion order.
#[derive(Debug, Default)]
pub struct ManifestTable {
    entries: Vec<ManifestEntry>,
    index: HashMap<String, usize>,
}

impl ManifestTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the entry on first sight, otherwise append the identifiers (no dedup).
    pub fn insert_or_append(&mut self, name: String, identifiers: Vec<String>, row: usize) {
        match self.index.get(&name) {
            Some(&i) => self.entries[i].identifiers.extend(identifiers),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push(ManifestEntry {
                    name,
                    identifiers,
                    source_row: row,
                    matched_count: 0,
                });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Only `matched_count` is meant to change through this handle.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ManifestEntry> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub roll_entries: usize,
    pub manifest_entries: usize,
    pub row_errors: usize,
    pub discrepancies: usize,
    pub by_kind: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub discrepancies: Vec<Discrepancy>,
    pub row_errors: Vec<RowParseError>,
}

impl ReconReport {
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty() && self.row_errors.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    /// Column letters the run was configured with; absent when the engine was
    /// driven with a pre-resolved layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<ColumnConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_cells_render_without_trailing_zero() {
        assert_eq!(Cell::Number(12.0).as_text().as_deref(), Some("12"));
        assert_eq!(Cell::Number(12.5).as_text().as_deref(), Some("12.5"));
        assert_eq!(Cell::Number(-3.0).as_text().as_deref(), Some("-3"));
    }

    #[test]
    fn non_text_cells_have_no_text() {
        assert!(Cell::Bool(true).as_text().is_none());
        assert!(Cell::Error("#REF!".into()).as_text().is_none());
        assert!(Cell::Empty.as_text().is_none());
    }

    #[test]
    fn blank_text_counts_as_empty() {
        assert!(Cell::Text("   ".into()).is_empty());
        assert!(!Cell::Text(" 7 ".into()).is_empty());
        assert!(!Cell::Number(0.0).is_empty());
    }

    #[test]
    fn roll_table_merges_and_keeps_first_row() {
        let mut table = RollTable::new();
        table.insert_or_merge("7".into(), vec!["Nowak".into(), "Kowal".into()], 2);
        table.insert_or_merge("8".into(), vec!["Lis".into()], 3);
        table.insert_or_merge("7".into(), vec!["Kowal".into(), "Wrona".into()], 5);

        assert_eq!(table.len(), 2);
        let entry = table.get("7").unwrap();
        assert_eq!(entry.names, vec!["Nowak", "Kowal", "Wrona"]);
        assert_eq!(entry.source_row, 2);

        let order: Vec<&str> = table.iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(order, vec!["7", "8"]);
    }

    #[test]
    fn roll_entry_drops_duplicates_within_one_row() {
        let mut table = RollTable::new();
        table.insert_or_merge("1".into(), vec!["Zima".into(), "Zima".into()], 1);
        assert_eq!(table.get("1").unwrap().names, vec!["Zima"]);
    }

    #[test]
    fn manifest_table_keeps_repeats() {
        let mut table = ManifestTable::new();
        table.insert_or_append("Nowak".into(), vec!["12".into()], 1);
        table.insert_or_append("Nowak".into(), vec!["12".into(), "13".into()], 4);

        let entry = table.get("Nowak").unwrap();
        assert_eq!(entry.identifiers, vec!["12", "12", "13"]);
        assert_eq!(entry.source_row, 1);
        assert_eq!(entry.matched_count, 0);
    }
}
