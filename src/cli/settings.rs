//! The `settings` subcommands, for working with the program settings file.
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Open the settings file in a text editor, creating it first if needed
    Edit,
    /// Print the location of the settings file
    Path,
    /// Print a settings file with every option commented out
    DumpDefault,
}

impl SettingsSubcommands {
    /// Run the subcommand
    pub fn execute(self) -> Result<()> {
        let file_path = get_settings_file_path();
        match self {
            Self::Edit => {
                write_default_file_if_missing(&file_path)?;
                println!("Opening settings file for editing: {}", file_path.display());
                edit::edit_file(&file_path)
                    .with_context(|| format!("Failed to edit {}", file_path.display()))?;
            }
            Self::Path => println!("{}", file_path.display()),
            Self::DumpDefault => print!("{}", Settings::default_file_contents()?),
        }

        Ok(())
    }
}

/// Write the commented default settings to `file_path`, unless a file is already there
fn write_default_file_if_missing(file_path: &Path) -> Result<()> {
    if file_path.is_file() {
        return Ok(());
    }

    if let Some(dir_path) = file_path.parent() {
        fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {}", dir_path.display()))?;
    }
    fs::write(file_path, Settings::default_file_contents()?)
        .with_context(|| format!("Failed to write settings file: {}", file_path.display()))
}
