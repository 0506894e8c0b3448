//! User-level program settings, read from `settings.toml` in the config folder.
use crate::get_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Placed at the top of a freshly written settings file
const SETTINGS_FILE_PREAMBLE: &str = "# Program settings for rooftop_solar
# Uncomment a setting to change it. The ROOFTOP_SOLAR_LOG_LEVEL environment variable takes
# precedence over log_level.
";

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Where the settings file lives
pub fn get_settings_file_path() -> PathBuf {
    get_config_dir().join(SETTINGS_FILE_NAME)
}

/// Settings which apply to every run, whatever the model
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether to overwrite output files by default
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            overwrite: false,
        }
    }
}

impl Settings {
    /// Load the settings file, using defaults if the user has not created one.
    ///
    /// A file which exists but cannot be parsed is an error.
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if file_path.is_file() {
            read_toml(file_path)
        } else {
            Ok(Settings::default())
        }
    }

    /// A settings file listing every setting at its default value, commented out.
    ///
    /// Each setting is preceded by its doc comment.
    pub fn default_file_contents() -> Result<String> {
        let defaults =
            toml::to_string(&Settings::default()).context("Could not convert settings to TOML")?;

        let mut contents = SETTINGS_FILE_PREAMBLE.to_string();
        for entry in defaults.lines().map(str::trim) {
            let Some((key, _)) = entry.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let docs = Settings::get_field_docs(key)
                .with_context(|| format!("Missing doc comment for field {key}"))?;

            contents.push('\n');
            for doc_line in docs.lines() {
                writeln!(contents, "# # {}", doc_line.trim())?;
            }
            writeln!(contents, "# {entry}")?;
        }

        Ok(contents)
    }
}
