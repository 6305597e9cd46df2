// Workbook row reading (xlsx, xlsm, xls, xlsb, ods) via calamine

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rollcheck_recon::{Cell, SourceRow};

use crate::error::IoError;

/// Read one worksheet: the named sheet, or the first sheet of the workbook.
///
/// Row numbers and column positions are absolute: the used range's start
/// offset is applied to row numbers, and leading columns outside the used
/// range are padded with `Cell::Empty`.
pub fn read_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<SourceRow>, IoError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let target = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| IoError::SheetNotFound {
                name: name.to_string(),
                available: sheet_names.clone(),
            })?,
        None => sheet_names.first().cloned().ok_or(IoError::NoSheets)?,
    };

    let range = workbook.worksheet_range(&target)?;
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let (height, width) = range.get_size();
    log::debug!(
        "{}: sheet '{}', {}x{} used range at ({}, {})",
        path.display(),
        target,
        height,
        width,
        start_row,
        start_col
    );

    let rows = range
        .rows()
        .enumerate()
        .map(|(row_idx, row)| {
            let mut cells = vec![Cell::Empty; start_col as usize];
            cells.extend(row.iter().map(convert));
            SourceRow::new(start_row as usize + row_idx + 1, cells)
        })
        .collect();

    Ok(rows)
}

fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::Error(format!("#{:?}", e)),
        // Serial number; the 1904 flag is not exposed by calamine
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    #[test]
    fn test_convert_scalar_cells() {
        assert_eq!(convert(&Data::Empty), Cell::Empty);
        assert_eq!(convert(&Data::String("Nowak".into())), text("Nowak"));
        assert_eq!(convert(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(convert(&Data::Float(7.5)), Cell::Number(7.5));
        assert_eq!(convert(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(
            convert(&Data::Error(CellErrorType::Value)),
            Cell::Error("#Value".into())
        );
    }

    #[test]
    fn test_first_sheet_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roll.xlsx");

        let mut workbook = Workbook::new();
        let roll = workbook.add_worksheet();
        roll.set_name("Roll").unwrap();
        roll.write_number(0, 0, 7.0).unwrap();
        roll.write_string(0, 2, "Nowak\nKowal").unwrap();
        roll.write_string(1, 0, "8").unwrap();
        roll.write_string(1, 2, "Lis").unwrap();
        let other = workbook.add_worksheet();
        other.set_name("Other").unwrap();
        other.write_string(0, 0, "ignored").unwrap();
        workbook.save(&path).unwrap();

        let rows = read_rows(&path, None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[0].cells, vec![Cell::Number(7.0), Cell::Empty, text("Nowak\nKowal")]);
        assert_eq!(rows[1].cells[0], text("8"));
    }

    #[test]
    fn test_named_sheet_and_offset_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Cover").unwrap();
        let manifest = workbook.add_worksheet();
        manifest.set_name("Manifest").unwrap();
        // Used range starts at B3
        manifest.write_string(2, 1, "Nowak").unwrap();
        manifest.write_string(2, 2, "1, 2").unwrap();
        manifest.write_string(3, 1, "Kowal").unwrap();
        workbook.save(&path).unwrap();

        let rows = read_rows(&path, Some("Manifest")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 3);
        assert_eq!(rows[0].cells, vec![Cell::Empty, text("Nowak"), text("1, 2")]);
        assert_eq!(rows[1].number, 4);
        assert_eq!(rows[1].cell(1), Some(&text("Kowal")));
    }

    #[test]
    fn test_unknown_sheet_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roll.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Roll").unwrap();
        workbook.save(&path).unwrap();

        match read_rows(&path, Some("Manifest")) {
            Err(IoError::SheetNotFound { name, available }) => {
                assert_eq!(name, "Manifest");
                assert_eq!(available, vec!["Roll".to_string()]);
            }
            other => panic!("expected SheetNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_not_a_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, "not a zip archive").unwrap();

        assert!(matches!(read_rows(&path, None), Err(IoError::Workbook(_))));
    }
}
