//! The command line interface for `rooftop_solar`.
use crate::input::load_model;
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{create_output_directory, get_output_dir};
use crate::settings::Settings;
use crate::simulation::{self, cloud_cover::create_cloud_cover_source};
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// Estimate how much of a city's electricity use rooftop solar could cover.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Print the CLI documentation as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for running a model
#[derive(Args, Default)]
pub struct RunOpts {
    /// Folder to write results to [default: rooftop_solar_results/<model name>]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Replace the output folder if it already contains files
    #[arg(long)]
    pub overwrite: bool,
    /// Use this cloud cover (%) for every city instead of drawing it at random
    #[arg(long, value_name = "PCT")]
    pub cloud_cover: Option<f64>,
    /// Seed for drawing cloud cover, overriding any seed in model.toml
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the model in the given folder.
    Run {
        /// Folder containing model.toml, cities.csv and buildings.csv.
        model_dir: PathBuf,
        #[command(flatten)]
        opts: RunOpts,
    },
    /// List, inspect, extract or run the bundled example models.
    Example {
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Check that the model in the given folder loads without running it.
    Validate {
        /// Folder containing model.toml, cities.csv and buildings.csv.
        model_dir: PathBuf,
    },
    /// Manage the program settings file.
    Settings {
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { model_dir, opts } => handle_run_command(&model_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { model_dir } => handle_validate_command(&model_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse command-line arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    match cli.command {
        Some(command) => command.execute(),
        None => {
            println!("{}", Cli::command().render_long_help());
            Ok(())
        }
    }
}

/// Use the given settings, or read them from the settings file
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
///
/// # Arguments
///
/// * `model_path` - Folder containing the model
/// * `opts` - Options from the command line
/// * `settings` - Program settings. If `None`, they are read from the settings file.
pub fn handle_run_command(
    model_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = match &opts.output_dir {
        Some(output_dir) => output_dir.clone(),
        None => get_output_dir(model_path)?,
    };

    // Either the flag or the settings file can allow overwriting
    let overwritten = create_output_directory(&output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    log::init(Some(settings.log_level.as_str()), Some(&output_path))
        .context("Failed to initialise logging.")?;
    if overwritten {
        warn!("Replaced existing output folder {}", output_path.display());
    }

    let model = load_model(model_path).context("Failed to load model.")?;
    info!(
        "Loaded {} cities from {}",
        model.cities.len(),
        model_path.display()
    );
    info!("Output folder: {}", output_path.display());

    let seed = opts.seed.or(model.parameters.seed);
    let mut source = create_cloud_cover_source(&model.parameters, opts.cloud_cover, seed);
    simulation::run(&model, source.as_mut(), &output_path)?;
    write_metadata(&output_path, model_path, seed, opts.cloud_cover)
        .context("Failed to save metadata.")?;
    info!("Simulation complete!");

    Ok(())
}

/// Handle the `validate` command.
///
/// No log files are written, as there is no output folder.
pub fn handle_validate_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;
    log::init(Some(settings.log_level.as_str()), None)
        .context("Failed to initialise logging.")?;

    let model = load_model(model_path).context("Failed to validate model.")?;
    info!(
        "Model validation successful: {} cities loaded from {}",
        model.cities.len(),
        model_path.display()
    );

    Ok(())
}
