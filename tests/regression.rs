//! Common code for running regression tests.
use float_cmp::approx_eq;
use itertools::{EitherOrBoth, Itertools};
use rooftop_solar::cli::RunOpts;
use rooftop_solar::cli::example::handle_example_run_command;
use rooftop_solar::settings::Settings;
use std::fs::read_dir;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FLOAT_CMP_TOLERANCE: f64 = 1e-10;

/// Yearly totals sum 365 values, so allow for a little accumulated rounding
const FLOAT_CMP_ULPS: i64 = 1000;

/// The cloud cover used for every city in regression runs
const REGRESSION_CLOUD_COVER: f64 = 40.0;

/// Run a regression test for an example model.
///
/// Cloud cover is fixed so that output is deterministic.
pub fn run_regression_test(example_name: &str) {
    unsafe { std::env::set_var("ROOFTOP_SOLAR_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(tempdir.path().to_path_buf()),
        cloud_cover: Some(REGRESSION_CLOUD_COVER),
        ..RunOpts::default()
    };
    handle_example_run_command(example_name, &opts, Some(Settings::default())).unwrap();

    let expected_dir = PathBuf::from(format!("tests/data/{example_name}"));
    compare_output_dirs(tempdir.path(), &expected_dir);
}

/// Check that the CSV files in `actual_dir` match those in `expected_dir`
fn compare_output_dirs(actual_dir: &Path, expected_dir: &Path) {
    let file_names = get_csv_file_names(actual_dir);
    assert_eq!(
        file_names,
        get_csv_file_names(expected_dir),
        "Output files have been added or removed"
    );

    let errors = file_names
        .iter()
        .flat_map(|file_name| {
            compare_files(&actual_dir.join(file_name), &expected_dir.join(file_name))
                .into_iter()
                .map(move |err| format!("{file_name}: {err}"))
        })
        .collect_vec();
    assert!(
        errors.is_empty(),
        "The following errors occurred:\n  * {}",
        errors.join("\n  * ")
    );
}

/// Compare two CSV files record by record, returning a description of each mismatch
fn compare_files(actual: &Path, expected: &Path) -> Vec<String> {
    let actual = read_records(actual);
    let expected = read_records(expected);

    // Headers are record 0
    actual
        .iter()
        .zip_longest(&expected)
        .enumerate()
        .filter_map(|(num, pair)| match pair {
            EitherOrBoth::Both(a, e) if records_match(a, e) => None,
            EitherOrBoth::Both(a, e) => Some(format!("record {num}:\n    + {a:?}\n    - {e:?}")),
            EitherOrBoth::Left(a) => Some(format!("record {num}: unexpected {a:?}")),
            EitherOrBoth::Right(e) => Some(format!("record {num}: missing {e:?}")),
        })
        .collect()
}

/// Whether two records have the same fields, comparing numbers with a tolerance
fn records_match(actual: &csv::StringRecord, expected: &csv::StringRecord) -> bool {
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected)
            .all(|(a, e)| fields_match(a, e).unwrap_or_else(|| a == e))
}

/// Compare two fields as finite floats, or `None` if either isn't one
fn fields_match(actual: &str, expected: &str) -> Option<bool> {
    let parse = |s: &str| s.parse().ok().filter(|f: &f64| f.is_finite());
    let actual = parse(actual)?;
    let expected = parse(expected)?;

    Some(approx_eq!(
        f64,
        actual,
        expected,
        epsilon = FLOAT_CMP_TOLERANCE,
        ulps = FLOAT_CMP_ULPS
    ))
}

/// Read all records of a CSV file, including the header
fn read_records(file_path: &Path) -> Vec<csv::StringRecord> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(file_path)
        .unwrap()
        .into_records()
        .try_collect()
        .unwrap()
}

/// Get the sorted names of the CSV files in the given folder
fn get_csv_file_names(dir_path: &Path) -> Vec<String> {
    read_dir(dir_path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|file_name| file_name.ends_with(".csv"))
        .sorted()
        .collect()
}
