// CSV/TSV row reading

use std::io::Read;
use std::path::Path;

use rollcheck_recon::{Cell, SourceRow};

use crate::error::IoError;

/// Read a delimited file, sniffing the delimiter.
pub fn read_rows(path: &Path) -> Result<Vec<SourceRow>, IoError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    log::info!("{}: sniffed delimiter {:?}", path.display(), delimiter as char);
    rows_from_str(&content, delimiter)
}

pub fn read_rows_tsv(path: &Path) -> Result<Vec<SourceRow>, IoError> {
    read_rows_with_delimiter(path, b'\t')
}

pub fn read_rows_with_delimiter(path: &Path, delimiter: u8) -> Result<Vec<SourceRow>, IoError> {
    let content = read_file_as_utf8(path)?;
    rows_from_str(&content, delimiter)
}

/// Guess the field delimiter of a roll or manifest export from its first lines.
///
/// Each candidate (tab, semicolon, comma, pipe) is scored by how many sampled
/// lines share the first line's field count (>1 field), times that count.
/// Manifest identifier lists are comma-separated inside a cell, often unquoted,
/// so a non-comma candidate that splits every sampled line evenly beats the comma.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;
    let mut best_even: Option<(u8, u64)> = None;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // More columns breaks ties
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count();
        let score = (consistent * target) as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
        if delim != b',' && consistent == counts.len() && best_even.map_or(true, |(_, s)| score > s) {
            best_even = Some((delim, score));
        }
    }

    best_even.map_or(best, |(delim, _)| delim)
}

/// Read file and convert to UTF-8 if needed (Excel-exported CSVs are often Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |source| IoError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Every field becomes a text cell (empty fields become `Cell::Empty`).
/// Row numbers are the file line each record starts on, so blank lines, CRLF
/// endings and quoted multi-line fields do not shift them.
fn rows_from_str(content: &str, delimiter: u8) -> Result<Vec<SourceRow>, IoError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut lines = LineCounter::new(content.as_bytes());
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        // The reader's own line count skips blank lines and counts CRLF twice
        let offset = record.position().map_or(0, |p| p.byte() as usize);
        let number = lines.line_of_record_at(offset);
        let cells = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        rows.push(SourceRow::new(number, cells));
    }
    Ok(rows)
}

/// Maps record byte offsets to 1-based line numbers in one forward pass.
/// `\n`, `\r\n` and a lone `\r` each end one line.
struct LineCounter<'a> {
    bytes: &'a [u8],
    scanned: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, scanned: 0, line: 1 }
    }

    /// The reader reports a record's offset before any line terminators it
    /// skipped, so those are stepped over first. Offsets must not decrease.
    fn line_of_record_at(&mut self, offset: usize) -> usize {
        let mut start = offset.max(self.scanned).min(self.bytes.len());
        while start < self.bytes.len() && matches!(self.bytes[start], b'\r' | b'\n') {
            start += 1;
        }

        for i in self.scanned..start {
            match self.bytes[i] {
                b'\n' => self.line += 1,
                b'\r' if self.bytes.get(i + 1) != Some(&b'\n') => self.line += 1,
                _ => {}
            }
        }
        self.scanned = start;
        self.line
    }
}
