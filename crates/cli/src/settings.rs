// Settings file: column letters and per-source reading options.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rollcheck_io::SheetOptions;
use rollcheck_recon::ColumnConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: ColumnConfig,
    pub roll: SheetOptions,
    pub manifest: SheetOptions,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Settings {
    /// Default settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rollcheck")
            .join("settings.toml")
    }

    /// Load settings.
    ///
    /// An explicit path must exist and parse. The default file is optional:
    /// when missing or malformed, defaults are used (the latter with a warning).
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let path = Self::config_path();
        if !path.exists() {
            log::debug!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        match Self::load_from(&path) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log::warn!("{e}");
                log::warn!("using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write settings, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, self.to_toml()?).map_err(write_err)
    }
}
