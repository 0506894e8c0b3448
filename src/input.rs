//! Common routines for handling input data.
use crate::model::{Model, ModelParameters};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fs;
use std::path::Path;

mod building;
mod city;
use city::read_cities;

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(
    file_path: &Path,
) -> Result<impl Iterator<Item = T> + use<T>> {
    let mut reader =
        csv::Reader::from_path(file_path).with_context(|| input_err_msg(file_path))?;

    let vec: Vec<T> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .with_context(|| input_err_msg(file_path))?;
    ensure!(
        !vec.is_empty(),
        "CSV file {} cannot be empty",
        file_path.display()
    );

    Ok(vec.into_iter())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Read a [`Dimensionless`] value, checking that it is between 0 (exclusive) and 1 (inclusive)
pub fn deserialise_proportion_nonzero<'de, D>(deserialiser: D) -> Result<Dimensionless, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !(value > 0.0 && value <= 1.0) {
        Err(serde::de::Error::custom("Value must be > 0 and <= 1"))?;
    }

    Ok(Dimensionless(value))
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a model from the specified directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The static model data ([`Model`]) or an error.
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
    let model_dir = model_dir.as_ref();
    let parameters = ModelParameters::from_path(model_dir)?;
    let cities = read_cities(model_dir)?;

    Ok(Model {
        model_path: model_dir.to_path_buf(),
        parameters,
        cities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde::de::IntoDeserializer;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: String,
        value: u32,
    }

    #[test]
    fn test_read_csv() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.csv");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id,value\nhello,1\nworld,2\n").unwrap();
        }
        let records: Vec<Record> = read_csv(&file_path).unwrap().collect();
        assert_eq!(
            records,
            &[
                Record {
                    id: "hello".to_string(),
                    value: 1,
                },
                Record {
                    id: "world".to_string(),
                    value: 2,
                }
            ]
        );

        // File with no data rows
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id,value").unwrap();
        }
        assert!(read_csv::<Record>(&file_path).is_err());
    }

    #[test]
    fn test_read_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id = \"hello\"\nvalue = 1").unwrap();
        }

        assert_eq!(
            read_toml::<Record>(&file_path).unwrap(),
            Record {
                id: "hello".to_string(),
                value: 1,
            }
        );

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "bad toml syntax").unwrap();
        }

        assert!(read_toml::<Record>(&file_path).is_err());
    }

    /// Deserialise value with `deserialise_proportion_nonzero()`
    fn deserialise_f64(value: f64) -> Result<Dimensionless, serde::de::value::Error> {
        let deserialiser: serde::de::value::F64Deserializer<serde::de::value::Error> =
            value.into_deserializer();
        deserialise_proportion_nonzero(deserialiser)
    }

    #[test]
    fn test_deserialise_proportion_nonzero() {
        // Valid inputs
        assert_eq!(deserialise_f64(0.01), Ok(Dimensionless(0.01)));
        assert_eq!(deserialise_f64(0.5), Ok(Dimensionless(0.5)));
        assert_eq!(deserialise_f64(1.0), Ok(Dimensionless(1.0)));

        // Invalid inputs
        assert!(deserialise_f64(0.0).is_err());
        assert!(deserialise_f64(-1.0).is_err());
        assert!(deserialise_f64(2.0).is_err());
        assert!(deserialise_f64(f64::NAN).is_err());
        assert!(deserialise_f64(f64::INFINITY).is_err());
    }
}
