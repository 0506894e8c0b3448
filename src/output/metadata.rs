//! Code for writing metadata to file
use anyhow::{Result, anyhow};
use chrono::prelude::*;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Constants generated by `build.rs`
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Get the short git commit hash, marking builds from a dirty working tree
fn get_git_hash() -> String {
    let Some(hash) = built_info::GIT_COMMIT_HASH_SHORT else {
        return "unknown".into();
    };

    if built_info::GIT_DIRTY == Some(true) {
        format!("{hash}-dirty")
    } else {
        hash.into()
    }
}

/// The contents of `metadata.toml`
#[derive(Serialize)]
struct Metadata<'a> {
    run: RunInfo<'a>,
    program: BuildInfo,
    platform: PlatformDetails,
}

/// How the model was run
#[derive(Serialize)]
struct RunInfo<'a> {
    model_path: &'a Path,
    /// When the run started (RFC 2822, local time)
    datetime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_cloud_cover: Option<f64>,
}

/// How this copy of the program was built
#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
    target: &'static str,
    is_debug: bool,
    rustc_version: &'static str,
    build_time_utc: &'static str,
    git_commit_hash: String,
}

impl BuildInfo {
    fn new() -> Self {
        Self {
            name: built_info::PKG_NAME,
            version: built_info::PKG_VERSION,
            target: built_info::TARGET,
            is_debug: built_info::DEBUG,
            rustc_version: built_info::RUSTC_VERSION,
            build_time_utc: built_info::BUILT_TIME_UTC,
            git_commit_hash: get_git_hash(),
        }
    }
}

/// The machine the simulation ran on, as reported by `uname`
#[derive(Serialize)]
struct PlatformDetails {
    sysname: String,
    nodename: String,
    release: String,
    version: String,
    machine: String,
    osname: String,
}

impl PlatformDetails {
    fn new() -> Result<Self> {
        let info = PlatformInfo::new()
            .map_err(|err| anyhow!("Unable to determine platform info: {err}"))?;
        let text = |value: &std::ffi::OsStr| value.to_string_lossy().into_owned();

        Ok(Self {
            sysname: text(info.sysname()),
            nodename: text(info.nodename()),
            release: text(info.release()),
            version: text(info.version()),
            machine: text(info.machine()),
            osname: text(info.osname()),
        })
    }
}

/// Write metadata about a run to `metadata.toml` in the output folder.
///
/// # Arguments
///
/// * `output_path` - The output folder
/// * `model_path` - The model which was run
/// * `seed` - The seed used for cloud cover, if any
/// * `fixed_cloud_cover` - The cloud cover used for all cities, if fixed
pub fn write_metadata(
    output_path: &Path,
    model_path: &Path,
    seed: Option<u64>,
    fixed_cloud_cover: Option<f64>,
) -> Result<()> {
    let metadata = Metadata {
        run: RunInfo {
            model_path,
            datetime: Local::now().to_rfc2822(),
            seed,
            fixed_cloud_cover,
        },
        program: BuildInfo::new(),
        platform: PlatformDetails::new()?,
    };
    fs::write(
        output_path.join(METADATA_FILE_NAME),
        toml::to_string(&metadata)?,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_metadata() {
        let dir = tempdir().unwrap();
        write_metadata(dir.path(), Path::new("model"), Some(42), None).unwrap();

        let contents = fs::read_to_string(dir.path().join(METADATA_FILE_NAME)).unwrap();
        let metadata: toml::Table = toml::from_str(&contents).unwrap();
        let run = metadata["run"].as_table().unwrap();
        assert_eq!(run["model_path"].as_str(), Some("model"));
        assert_eq!(run["seed"].as_integer(), Some(42));
        assert!(!run.contains_key("fixed_cloud_cover"));
        assert_eq!(
            metadata["program"]["name"].as_str(),
            Some(built_info::PKG_NAME)
        );
    }
}
