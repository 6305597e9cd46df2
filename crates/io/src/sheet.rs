//! Format dispatch and the [`RowSource`] adapter the engine reads from.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rollcheck_recon::{ReconError, RowSource, SourceKind, SourceRow};

use crate::error::IoError;

/// Per-source reading options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetOptions {
    /// Worksheet to read; the first sheet when unset. Ignored for CSV/TSV.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// Leading rows (by original row number) to drop.
    pub header_rows: usize,
    /// Field delimiter for CSV/TSV; sniffed (CSV) or tab (TSV) when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Workbook,
    Csv,
    Tsv,
}

impl FileFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(IoError::Unsupported(path.display().to_string())),
        }
    }
}

/// Read all rows of a file, then drop the header rows.
pub fn read_rows(path: &Path, options: &SheetOptions) -> Result<Vec<SourceRow>, IoError> {
    let format = FileFormat::from_path(path)?;
    if options.sheet.is_some() && format != FileFormat::Workbook {
        log::warn!("{}: sheet option ignored for delimited files", path.display());
    }
    if options.delimiter.is_some() && format == FileFormat::Workbook {
        log::warn!("{}: delimiter option ignored for workbooks", path.display());
    }
    let delimiter = options.delimiter.map(delimiter_byte).transpose()?;

    let mut rows = match (format, delimiter) {
        (FileFormat::Workbook, _) => crate::xlsx::read_rows(path, options.sheet.as_deref())?,
        (FileFormat::Csv | FileFormat::Tsv, Some(d)) => crate::csv::read_rows_with_delimiter(path, d)?,
        (FileFormat::Csv, None) => crate::csv::read_rows(path)?,
        (FileFormat::Tsv, None) => crate::csv::read_rows_tsv(path)?,
    };

    if options.header_rows > 0 {
        rows.retain(|row| row.number > options.header_rows);
    }
    Ok(rows)
}

/// The csv reader splits on a single byte.
fn delimiter_byte(c: char) -> Result<u8, IoError> {
    match u8::try_from(c) {
        Ok(b) if b.is_ascii() && !matches!(b, b'"' | b'\r' | b'\n') => Ok(b),
        _ => Err(IoError::InvalidDelimiter(c)),
    }
}

/// A file on disk feeding one side of the check.
#[derive(Debug, Clone)]
pub struct SheetSource {
    pub kind: SourceKind,
    pub path: PathBuf,
    pub options: SheetOptions,
}

impl SheetSource {
    pub fn new(kind: SourceKind, path: impl Into<PathBuf>, options: SheetOptions) -> Self {
        Self {
            kind,
            path: path.into(),
            options,
        }
    }
}

impl RowSource for SheetSource {
    fn read_rows(&self) -> Result<Vec<SourceRow>, ReconError> {
        log::info!("reading {} from {}", self.kind, self.path.display());
        read_rows(&self.path, &self.options).map_err(|e| ReconError::SourceUnavailable {
            kind: self.kind,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcheck_recon::Cell;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.xlsx")).unwrap(), FileFormat::Workbook);
        assert_eq!(FileFormat::from_path(Path::new("a.XLS")).unwrap(), FileFormat::Workbook);
        assert_eq!(FileFormat::from_path(Path::new("a.ods")).unwrap(), FileFormat::Workbook);
        assert_eq!(FileFormat::from_path(Path::new("a.csv")).unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("a.tsv")).unwrap(), FileFormat::Tsv);
        assert!(matches!(
            FileFormat::from_path(Path::new("a.txt")),
            Err(IoError::Unsupported(_))
        ));
        assert!(FileFormat::from_path(Path::new("roll")).is_err());
    }

    #[test]
    fn test_header_rows_are_dropped_by_row_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roll.csv");
        fs::write(&path, "Nr,,Names\n\n1,,Nowak\n2,,Kowal\n").unwrap();

        let options = SheetOptions {
            header_rows: 2,
            ..SheetOptions::default()
        };
        let rows = read_rows(&path, &options).unwrap();
        let numbers: Vec<usize> = rows.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![3, 4]);
    }

    #[test]
    fn test_source_failure_maps_to_unavailable() {
        let dir = tempdir().unwrap();
        let source = SheetSource::new(
            SourceKind::Manifest,
            dir.path().join("missing.csv"),
            SheetOptions::default(),
        );

        match source.read_rows() {
            Err(ReconError::SourceUnavailable { kind, message }) => {
                assert_eq!(kind, SourceKind::Manifest);
                assert!(message.contains("missing.csv"));
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_extension_is_unavailable() {
        let source = SheetSource::new(SourceKind::Roll, "roll.txt", SheetOptions::default());
        assert!(matches!(
            source.read_rows(),
            Err(ReconError::SourceUnavailable { kind: SourceKind::Roll, .. })
        ));
    }

    #[test]
    fn test_header_rows_with_crlf_keep_first_data_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roll.csv");
        fs::write(&path, "Nr,,Names\r\n1,,Nowak\r\n2,,Kowal\r\n").unwrap();

        let options = SheetOptions {
            header_rows: 1,
            ..SheetOptions::default()
        };
        let rows = read_rows(&path, &options).unwrap();
        let numbers: Vec<usize> = rows.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![2, 3]);
        assert_eq!(rows[0].cells[2], Cell::Text("Nowak".into()));
    }

    #[test]
    fn test_delimiter_option_overrides_sniffing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.csv");
        fs::write(&path, "Nowak|1;2, 3\nKowal|4\n").unwrap();

        let options = SheetOptions {
            delimiter: Some('|'),
            ..SheetOptions::default()
        };
        let rows = read_rows(&path, &options).unwrap();
        assert_eq!(rows[0].cells, vec![Cell::Text("Nowak".into()), Cell::Text("1;2, 3".into())]);
        assert_eq!(rows[1].number, 2);
    }

    #[test]
    fn test_unusable_delimiter_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.csv");
        fs::write(&path, "Nowak,1\n").unwrap();

        for bad in ['\u{e9}', '"', '\n'] {
            let options = SheetOptions {
                delimiter: Some(bad),
                ..SheetOptions::default()
            };
            assert!(matches!(read_rows(&path, &options), Err(IoError::InvalidDelimiter(c)) if c == bad));
        }
    }
}
