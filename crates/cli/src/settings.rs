//! Config file discovery, store location and input expansion.

use std::path::{Path, PathBuf};

use uidmatch_io::InputFile;
use uidmatch_recon::EngineConfig;

use crate::exit_codes::{EXIT_IO, EXIT_USAGE};
use crate::CliError;

const APP_DIR: &str = "uidmatch";
const CONFIG_FILE: &str = "config.toml";
const STORE_FILE: &str = "reports.db";

/// `<config_dir>/uidmatch/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

/// `<data_dir>/uidmatch/reports.db`
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR).join(STORE_FILE))
}

/// Explicit `--config` must exist; the default location is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<EngineConfig, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => {
                log::debug!("no config file, using defaults");
                return Ok(EngineConfig::default());
            }
        },
    };

    let text = std::fs::read_to_string(&path).map_err(|e| {
        CliError::new(EXIT_IO, format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = EngineConfig::from_toml(&text).map_err(|e| {
        CliError::new(EXIT_USAGE, format!("{}: {e}", path.display()))
            .with_hint("see `uidm --help` for the config keys")
    })?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

pub fn store_path(explicit: Option<&Path>) -> Result<PathBuf, CliError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_store_path().ok_or_else(|| {
            CliError::new(EXIT_USAGE, "cannot determine a data directory for the report store")
                .with_hint("pass --store <path>")
        }),
    }
}

/// Files as given; directories expand to their regular files, sorted by name.
pub fn expand_inputs(paths: &[PathBuf]) -> Result<Vec<InputFile>, CliError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries = std::fs::read_dir(path).map_err(|e| {
                CliError::new(EXIT_IO, format!("cannot list {}: {e}", path.display()))
            })?;
            let mut inner: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .collect();
            inner.sort();
            if inner.is_empty() {
                log::warn!("{}: directory has no files", path.display());
            }
            files.extend(inner.into_iter().map(InputFile::from_path));
        } else {
            // Missing files are reported per file by the engine.
            files.push(InputFile::from_path(path));
        }
    }
    Ok(files)
}
