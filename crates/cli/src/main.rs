// rollcheck CLI - cross-check a roll spreadsheet against a manifest

mod check;
mod exit_codes;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use settings::Settings;

#[derive(Parser)]
#[command(name = "rollcheck")]
#[command(about = "Cross-check a roll of positions against a manifest of names")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Settings file [default: <config dir>/rollcheck/settings.toml]
    #[arg(long, global = true, env = "ROLLCHECK_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cross-check a roll against a manifest
    #[command(after_help = "\
Examples:
  rollcheck check -p roll.xlsx -z manifest.xlsx
  rollcheck check -p roll.csv -z manifest.csv --manifest-header-rows 1
  rollcheck check -p roll.xlsx -z manifest.ods --roll-names-col D --json
  rollcheck check -p roll.xlsx -z manifest.xlsx --strict")]
    Check(check::CheckArgs),

    /// Show or create the settings file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective settings as TOML
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

/// Log to stderr without timestamps. `ROLLCHECK_LOG` (env_logger filter
/// syntax) overrides the level chosen by `-v`/`-q`.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .parse_env("ROLLCHECK_LOG")
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Check(args) => check::cmd_check(args, config),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => cmd_config_show(config),
            ConfigCommands::Path => cmd_config_path(config),
            ConfigCommands::Init { force } => cmd_config_init(config, force),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Exit code only; the failure was already reported.
    pub fn silent(code: u8) -> Self {
        Self::new(code, "")
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// config
// ============================================================================

fn settings_path(config: Option<&std::path::Path>) -> PathBuf {
    config.map(PathBuf::from).unwrap_or_else(Settings::config_path)
}

fn cmd_config_show(config: Option<&std::path::Path>) -> Result<(), CliError> {
    let settings = Settings::load(config).map_err(|e| CliError::args(e.to_string()))?;
    let text = settings
        .to_toml()
        .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    print!("{text}");
    Ok(())
}

fn cmd_config_path(config: Option<&std::path::Path>) -> Result<(), CliError> {
    println!("{}", settings_path(config).display());
    Ok(())
}

fn cmd_config_init(config: Option<&std::path::Path>, force: bool) -> Result<(), CliError> {
    let path = settings_path(config);
    if path.exists() && !force {
        return Err(CliError::args(format!("{} already exists", path.display()))
            .with_hint("pass --force to overwrite it"));
    }
    Settings::default()
        .save_to(&path)
        .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
