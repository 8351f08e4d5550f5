//! # Configuration
//!
//! Optional YAML configuration for the `handparts` tool. Every key may be
//! left out:
//!
//! ```yaml
//! data-dir: /home/me/.local/share/Synthesia
//! extensions: [mid, midi]
//! import:
//!   finger-hints: true
//!   hand-parts: true
//!   parts: true
//! ```
//!
//! Command-line flags override values read from the file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PartsError, Result};
use crate::import::ImportOptions;

const DEFAULT_EXTENSIONS: [&str; 2] = ["mid", "midi"];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Synthesia data directory holding `songInfo.xml` and `fingers.xml`.
    pub data_dir: PathBuf,
    /// Song file extensions, lowercase and without the leading dot.
    pub extensions: Vec<String>,
    pub import: ImportOptions,
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    data_dir: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    import: Option<ImportOptions>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            import: ImportOptions::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Config> {
        // an empty document deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| PartsError::ConfigError(e.to_string()))?;

        let mut config = Config::default();
        if let Some(data_dir) = raw.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(extensions) = raw.extensions {
            config.extensions = parse_extensions(&extensions)?;
        }
        if let Some(import) = raw.import {
            config.import = import;
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| PartsError::io(path, e))?;
        Config::from_yaml(&content)
    }

    /// Whether `path` has one of the configured song extensions.
    pub fn is_song_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|known| *known == ext)
            })
            .unwrap_or(false)
    }
}

fn parse_extensions(extensions: &[String]) -> Result<Vec<String>> {
    let parsed: Vec<String> = extensions
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();

    if parsed.is_empty() {
        return Err(PartsError::ConfigError(
            "extensions must name at least one file extension".to_string(),
        ));
    }
    Ok(parsed)
}

/// Where Synthesia keeps its data files on this platform.
pub fn default_data_dir() -> PathBuf {
    let var = |name: &str| env::var_os(name).filter(|value| !value.is_empty()).map(PathBuf::from);
    let home = var("HOME").unwrap_or_else(|| PathBuf::from("."));

    if cfg!(target_os = "windows") {
        var("LOCALAPPDATA")
            .unwrap_or_else(|| home.join("AppData").join("Local"))
            .join("Synthesia")
    } else if cfg!(target_os = "macos") {
        home.join("Library")
            .join("Application Support")
            .join("Synthesia")
    } else {
        var("XDG_DATA_HOME")
            .unwrap_or_else(|| home.join(".local").join("share"))
            .join("Synthesia")
    }
}
