//! Logging for the program, built on `fern`.
//!
//! Messages at `info` and below go to stdout and warnings and errors go to stderr, coloured when
//! writing to a terminal. When a run has an output folder, two log files are also written there:
//! one for ordinary messages and one for warnings and errors.
use anyhow::{Context, Result};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::fs::File;
use std::io::{IsTerminal, stderr, stdout};
use std::path::Path;
use std::sync::OnceLock;

/// Set once the global logger is in place
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The log level used if neither the environment variable nor the settings file gives one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The environment variable which overrides the log level
pub const LOG_LEVEL_ENV_VAR: &str = "ROOFTOP_SOLAR_LOG_LEVEL";

/// Log file for messages about the ordinary operation of a run
const LOG_INFO_FILE_NAME: &str = "rooftop_solar_info.log";

/// Log file for warnings and errors
const LOG_ERROR_FILE_NAME: &str = "rooftop_solar_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Initialise the program logger.
///
/// The level is taken from the `ROOFTOP_SOLAR_LOG_LEVEL` environment variable if set, otherwise
/// from `settings.toml`, otherwise [`DEFAULT_LOG_LEVEL`]. Valid levels are `off`, `error`, `warn`,
/// `info`, `debug` and `trace` (case insensitive).
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `log_dir`: If given, log files are created in this folder
///
/// # Returns
///
/// An error if the level is invalid, a log file can't be created or a logger is already set.
pub fn init(log_level_from_settings: Option<&str>, log_dir: Option<&Path>) -> Result<()> {
    let env_level = env::var(LOG_LEVEL_ENV_VAR).ok();
    let log_level = resolve_log_level(env_level.as_deref(), log_level_from_settings)?;

    let mut dispatch = console_dispatch(log_level);
    if let Some(log_dir) = log_dir {
        dispatch = dispatch.chain(file_dispatch(log_dir, log_level)?);
    }

    dispatch.apply().context("Logger already initialised")?;
    let _ = LOGGER_INIT.set(());

    Ok(())
}

/// Pick the log level, with the environment variable taking precedence over settings
fn resolve_log_level(from_env: Option<&str>, from_settings: Option<&str>) -> Result<LevelFilter> {
    let log_level = from_env.or(from_settings).unwrap_or(DEFAULT_LOG_LEVEL);
    log_level
        .parse()
        .with_context(|| format!("Unknown log level: {log_level}"))
}

/// Whether a message should go to the ordinary (non-warning) outputs
fn is_ordinary(metadata: &log::Metadata) -> bool {
    metadata.level() > LevelFilter::Warn
}

/// Logging to stdout and stderr
fn console_dispatch(log_level: LevelFilter) -> Dispatch {
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let colour_stdout = stdout().is_terminal().then_some(colours);
    let colour_stderr = stderr().is_terminal().then_some(colours);

    let to_stdout = Dispatch::new()
        .filter(is_ordinary)
        .format(move |out, message, record| {
            write_log(out, message, record, colour_stdout.as_ref());
        })
        .level(log_level)
        .chain(stdout());
    let to_stderr = Dispatch::new()
        .format(move |out, message, record| {
            write_log(out, message, record, colour_stderr.as_ref());
        })
        .level(log_level.min(LevelFilter::Warn))
        .chain(stderr());

    Dispatch::new().chain(to_stdout).chain(to_stderr)
}

/// Logging to the info and error files in `log_dir`.
///
/// The info file always records at least `info` messages, whatever the console level.
fn file_dispatch(log_dir: &Path, log_level: LevelFilter) -> Result<Dispatch> {
    let create = |file_name| {
        let file_path = log_dir.join(file_name);
        File::create(&file_path)
            .with_context(|| format!("Failed to create log file {}", file_path.display()))
    };

    let info_file = Dispatch::new()
        .filter(is_ordinary)
        .format(|out, message, record| write_log(out, message, record, None))
        .level(log_level.max(LevelFilter::Info))
        .chain(create(LOG_INFO_FILE_NAME)?);
    let error_file = Dispatch::new()
        .format(|out, message, record| write_log(out, message, record, None))
        .level(LevelFilter::Warn)
        .chain(create(LOG_ERROR_FILE_NAME)?);

    Ok(Dispatch::new().chain(info_file).chain(error_file))
}

/// Write a timestamped message, colouring the level if `colours` is given
fn write_log(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    colours: Option<&ColoredLevelConfig>,
) {
    match colours {
        Some(colours) => finish(out, colours.color(record.level()), record.target(), message),
        None => finish(out, record.level(), record.target(), message),
    }
}

fn finish<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");
    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}
