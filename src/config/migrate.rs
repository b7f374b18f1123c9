//! Configuration file upgrades: detect keys added by newer releases and
//! fill them with their defaults without touching user-edited values.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys every current configuration file is expected to carry.
fn expected_keys() -> AppResult<Mapping> {
    let defaults = serde_yaml::to_value(Config::default())
        .map_err(|e| AppError::Config(format!("Cannot serialize defaults: {}", e)))?;

    match defaults {
        Value::Mapping(m) => Ok(m),
        _ => Err(AppError::Config("Defaults are not a mapping".into())),
    }
}

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(m)) => Ok(m),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        ))),
        Err(e) => Err(AppError::Config(format!("{}: {}", path.display(), e))),
    }
}

/// Return the names of the keys missing from the configuration file at `path`.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let current = read_mapping(path)?;
    let expected = expected_keys()?;

    Ok(expected
        .keys()
        .filter(|k| !current.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Add every missing key with its default value.
/// Returns:
///   Ok(n) → number of keys added (0 = nothing to do)
pub fn migrate_config_file(path: &Path) -> AppResult<usize> {
    let mut current = read_mapping(path)?;
    let expected = expected_keys()?;

    let mut added = 0;
    for (k, v) in expected {
        if !current.contains_key(&k) {
            if let Some(name) = k.as_str() {
                info(format!("Adding missing key '{}'", name));
            }
            current.insert(k, v);
            added += 1;
        }
    }

    if added == 0 {
        return Ok(0);
    }

    let serialized = serde_yaml::to_string(&Value::Mapping(current))
        .map_err(|e| AppError::Config(format!("Failed to serialize {:?}: {}", path, e)))?;
    fs::write(path, serialized).map_err(|_| AppError::ConfigSave)?;

    success(format!("Configuration migrated: {} key(s) added", added));
    Ok(added)
}
