//! The `example` subcommands, for the models bundled with the program.
use super::{RunOpts, handle_run_command};
use crate::settings::Settings;
use anyhow::{Context, Result, bail, ensure};
use clap::Subcommand;
use include_dir::{Dir, DirEntry, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The bundled example models, one per subfolder of `demos/`
const EXAMPLES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/demos");

#[derive(Subcommand)]
pub enum ExampleSubcommands {
    /// Print the names of the bundled examples.
    List,
    /// Print the README for an example.
    Info {
        /// Example name, as shown by `example list`.
        name: String,
    },
    /// Copy an example's input files to a new folder.
    Extract {
        /// Example name, as shown by `example list`.
        name: String,
        /// Folder to create [default: the example name]
        new_path: Option<PathBuf>,
    },
    /// Run an example without extracting it first.
    Run {
        /// Example name, as shown by `example list`.
        name: String,
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl ExampleSubcommands {
    /// Run the subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => example_names().for_each(|name| println!("{name}")),
            Self::Info { name } => println!("{}", get_readme(&name)?),
            Self::Extract { name, new_path } => {
                let dest = new_path.unwrap_or_else(|| PathBuf::from(&name));
                extract_example(&name, &dest)?;
            }
            Self::Run { name, opts } => handle_example_run_command(&name, &opts, None)?,
        }

        Ok(())
    }
}

/// The names of the bundled examples
fn example_names() -> impl Iterator<Item = String> {
    EXAMPLES_DIR
        .dirs()
        .map(|entry| entry.path().display().to_string())
}

/// Get the README for the specified example
fn get_readme(name: &str) -> Result<&'static str> {
    let path: PathBuf = [name, "README.txt"].iter().collect();
    EXAMPLES_DIR
        .get_file(path)
        .context("Example not found.")?
        .contents_utf8()
        .context("README.txt is not UTF-8 encoded")
}

/// Write the files of the named example into a new folder at `new_path`
fn extract_example(name: &str, new_path: &Path) -> Result<()> {
    let sub_dir = EXAMPLES_DIR.get_dir(name).context("Example not found.")?;

    ensure!(
        !new_path.exists(),
        "Destination directory {} already exists",
        new_path.display()
    );

    fs::create_dir(new_path)
        .with_context(|| format!("Failed to create {}", new_path.display()))?;
    for entry in sub_dir.entries() {
        match entry {
            DirEntry::Dir(_) => bail!("Subdirectories in examples not supported"),
            DirEntry::File(f) => {
                let file_name = f.path().file_name().context("Invalid file in example")?;
                fs::write(new_path.join(file_name), f.contents())?;
            }
        }
    }

    Ok(())
}

/// Handle the `example run` command.
///
/// The example is extracted to a temporary folder and run from there. As the temporary folder
/// keeps the example's name, default output goes to `rooftop_solar_results/<example name>`.
pub fn handle_example_run_command(
    name: &str,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let model_path = temp_dir.path().join(name);
    extract_example(name, &model_path)?;
    handle_run_command(&model_path, opts, settings)
}
