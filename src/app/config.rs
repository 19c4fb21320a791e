use crate::app::cli::Cli;
use crate::app::models::{OutputFormat, RuntimeConfig, ScanSettings};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional `config.toml` in the user's config directory.
#[derive(Deserialize, Debug, Clone, Default)]
struct SettingsFile {
    steam_dir: Option<PathBuf>,
    library_config: Option<PathBuf>,
    artwork_cache: Option<PathBuf>,
    warn: Option<bool>,
    format: Option<OutputFormat>,
}

fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("steam_library_scan").join("config.toml"))
}

/// Loads the settings file. A missing default file is fine; a missing file
/// the user asked for explicitly is not.
fn load_settings_file(explicit: Option<&Path>) -> Result<SettingsFile> {
    let config_path = match explicit.map(Path::to_path_buf).or_else(default_settings_path) {
        Some(path) => path,
        None => return Ok(SettingsFile::default()),
    };

    if !config_path.exists() {
        if explicit.is_some() {
            bail!("Settings file {:?} does not exist", config_path);
        }
        return Ok(SettingsFile::default());
    }

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read settings at {:?}", config_path))?;

    toml::from_str(&content).context(format!("Failed to parse {:?}", config_path))
}

/// Where Steam normally lives on this OS. Empty when it cannot be derived,
/// which makes the scan report a missing config.
pub fn default_steam_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from(r"C:\Program Files (x86)\Steam")
    } else if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|home| home.join("Library/Application Support/Steam"))
            .unwrap_or_default()
    } else {
        dirs::data_dir()
            .map(|data| data.join("Steam"))
            .unwrap_or_default()
    }
}

fn merge(cli: Cli, file: SettingsFile) -> RuntimeConfig {
    // CLI flag > settings file > platform default
    let steam_dir = cli
        .steam_dir
        .or(file.steam_dir)
        .unwrap_or_else(default_steam_dir);

    let mut scan = ScanSettings::for_steam_dir(steam_dir);
    if let Some(path) = cli.library_config.or(file.library_config) {
        scan.library_config = path;
    }
    if let Some(path) = cli.artwork_cache.or(file.artwork_cache) {
        scan.artwork_cache = path;
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        cli.format.or(file.format).unwrap_or_default()
    };

    RuntimeConfig {
        scan,
        warn_on_error: !cli.quiet && file.warn.unwrap_or(true),
        format,
        installed_only: cli.installed_only,
    }
}

pub fn resolve_config(cli: Cli) -> Result<RuntimeConfig> {
    let file = load_settings_file(cli.config.as_deref())?;
    Ok(merge(cli, file))
}
