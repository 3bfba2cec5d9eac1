//! JSON configuration loader
//!
//! A config file holds any subset of [`SimulationConfig`] fields; missing
//! fields take their defaults. Loaded configs are validated before return.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::SimulationConfig;
use crate::error::LoadError;

/// Load and validate a config from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimulationConfig, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: SimulationConfig =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Parse {
            origin: path.display().to_string(),
            source,
        })?;

    config.validate()?;
    Ok(config)
}

/// Load and validate a config from any reader (e.g. stdin, string buffer)
pub fn load_config_from_reader<R: Read>(reader: R) -> Result<SimulationConfig, LoadError> {
    let config: SimulationConfig =
        serde_json::from_reader(reader).map_err(|source| LoadError::Parse {
            origin: "<reader>".to_string(),
            source,
        })?;

    config.validate()?;
    Ok(config)
}
