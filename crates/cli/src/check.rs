//! `rollcheck check`: cross-check a roll against a manifest.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use rollcheck_io::{FileFormat, SheetSource};
use rollcheck_recon::{LogSink, ReconError, ReconReport, SourceKind};

use crate::exit_codes::{recon_exit_code, EXIT_CHECK_FINDINGS, EXIT_ERROR};
use crate::settings::Settings;
use crate::CliError;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Roll file (xlsx, xlsm, xls, xlsb, ods, csv, tsv)
    #[arg(short = 'p', long = "roll", value_name = "PATH")]
    pub roll: PathBuf,

    /// Manifest file (xlsx, xlsm, xls, xlsb, ods, csv, tsv)
    #[arg(short = 'z', long = "manifest", value_name = "PATH")]
    pub manifest: PathBuf,

    /// Roll column holding the position identifier
    #[arg(long, value_name = "COL")]
    pub roll_identifier_col: Option<String>,

    /// Roll column holding the names, one per line
    #[arg(long, value_name = "COL")]
    pub roll_names_col: Option<String>,

    /// Manifest column holding the name
    #[arg(long, value_name = "COL")]
    pub manifest_name_col: Option<String>,

    /// Manifest column holding the comma-separated identifiers
    #[arg(long, value_name = "COL")]
    pub manifest_identifiers_col: Option<String>,

    /// Roll worksheet (default: first sheet)
    #[arg(long, value_name = "NAME")]
    pub roll_sheet: Option<String>,

    /// Manifest worksheet (default: first sheet)
    #[arg(long, value_name = "NAME")]
    pub manifest_sheet: Option<String>,

    /// Leading roll rows to skip
    #[arg(long, value_name = "N")]
    pub roll_header_rows: Option<usize>,

    /// Leading manifest rows to skip
    #[arg(long, value_name = "N")]
    pub manifest_header_rows: Option<usize>,

    /// Roll field delimiter for CSV/TSV (default: sniffed for CSV, tab for TSV)
    #[arg(long, value_name = "CHAR")]
    pub roll_delimiter: Option<char>,

    /// Manifest field delimiter for CSV/TSV (default: sniffed for CSV, tab for TSV)
    #[arg(long, value_name = "CHAR")]
    pub manifest_delimiter: Option<char>,

    /// Print the JSON report to stdout
    #[arg(long)]
    pub json: bool,

    /// Exit with code 3 when discrepancies or row errors are found
    #[arg(long)]
    pub strict: bool,
}

impl CheckArgs {
    /// Command-line values win over the settings file.
    fn apply(&self, settings: &mut Settings) {
        let columns = &mut settings.columns;
        for (flag, slot) in [
            (&self.roll_identifier_col, &mut columns.roll_identifier),
            (&self.roll_names_col, &mut columns.roll_names),
            (&self.manifest_name_col, &mut columns.manifest_name),
            (&self.manifest_identifiers_col, &mut columns.manifest_identifiers),
        ] {
            if let Some(letter) = flag {
                *slot = letter.clone();
            }
        }

        if let Some(sheet) = &self.roll_sheet {
            settings.roll.sheet = Some(sheet.clone());
        }
        if let Some(sheet) = &self.manifest_sheet {
            settings.manifest.sheet = Some(sheet.clone());
        }
        if let Some(n) = self.roll_header_rows {
            settings.roll.header_rows = n;
        }
        if let Some(n) = self.manifest_header_rows {
            settings.manifest.header_rows = n;
        }
        if let Some(d) = self.roll_delimiter {
            settings.roll.delimiter = Some(d);
        }
        if let Some(d) = self.manifest_delimiter {
            settings.manifest.delimiter = Some(d);
        }
    }
}

/// Machine-readable failure, printed to stdout in `--json` mode.
#[derive(Debug, Serialize)]
struct CheckErrorOutput<'a> {
    error: &'static str,
    message: String,
    exit_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a SourceKind>,
}

impl<'a> CheckErrorOutput<'a> {
    fn from_recon_error(err: &'a ReconError) -> Self {
        let (error, source) = match err {
            ReconError::InvalidColumn { .. } => ("invalid_column", None),
            ReconError::SourceUnavailable { kind, .. } => ("source_unavailable", Some(kind)),
        };
        Self {
            error,
            message: err.to_string(),
            exit_code: recon_exit_code(err),
            source,
        }
    }
}

pub fn cmd_check(args: CheckArgs, config: Option<&Path>) -> Result<(), CliError> {
    let mut settings = Settings::load(config).map_err(|e| {
        CliError::args(e.to_string()).with_hint("fix the file or run `rollcheck config init --force`")
    })?;
    args.apply(&mut settings);

    validate_path(&args.roll, "--roll")?;
    validate_path(&args.manifest, "--manifest")?;

    let roll = SheetSource::new(SourceKind::Roll, &args.roll, settings.roll.clone());
    let manifest = SheetSource::new(SourceKind::Manifest, &args.manifest, settings.manifest.clone());

    let mut sink = LogSink;
    let report = match rollcheck_recon::run(&settings.columns, &roll, &manifest, &mut sink) {
        Ok(report) => report,
        Err(e) => {
            if args.json {
                if let Ok(out) = serde_json::to_string_pretty(&CheckErrorOutput::from_recon_error(&e)) {
                    println!("{out}");
                }
            }
            // Already logged by the sink
            return Err(CliError::silent(recon_exit_code(&e)));
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json}");
    }

    eprintln!("{}", summary_line(&report));

    if args.strict && !report.is_clean() {
        return Err(CliError::new(EXIT_CHECK_FINDINGS, "discrepancies found (--strict)"));
    }
    Ok(())
}

/// Reject a path before the run: it must be non-empty and carry a readable extension.
fn validate_path(path: &Path, flag: &str) -> Result<(), CliError> {
    if path.as_os_str().is_empty() {
        return Err(CliError::args(format!("{flag} path is empty")));
    }
    FileFormat::from_path(path).map(|_| ()).map_err(|e| {
        CliError::args(format!("{flag}: {e}")).with_hint("convert the file to xlsx or csv")
    })
}

fn summary_line(report: &ReconReport) -> String {
    let s = &report.summary;
    let mut line = format!(
        "checked {} roll positions against {} manifest names: {} discrepancies, {} row errors",
        s.roll_entries, s.manifest_entries, s.discrepancies, s.row_errors
    );
    if !s.by_kind.is_empty() {
        let kinds: Vec<String> = s.by_kind.iter().map(|(k, n)| format!("{k}={n}")).collect();
        line.push_str(&format!(" ({})", kinds.join(", ")));
    }
    line
}
