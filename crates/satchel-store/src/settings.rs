//! Key/value configuration collaborator.
//!
//! Flat string pairs persisted as one JSON object. A missing key is a
//! lookup failure; an empty key is malformed input.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use satchel_core::{Error, Result};

use crate::fsio;

/// String key/value settings backed by a JSON file.
#[derive(Debug, Default)]
pub struct Settings {
    values: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl Settings {
    /// Empty, unbacked settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from `path`. A missing file yields empty settings
    /// bound to that path.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fsio::read_optional(&path)? {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => BTreeMap::new(),
        };
        Ok(Self {
            values,
            path: Some(path),
        })
    }

    /// Fetch a value. Missing keys are lookup failures.
    pub fn get(&self, key: &str) -> Result<&str> {
        require_key(key)?;
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::NotFound(format!("setting '{}'", key)))
    }

    /// Set a value in memory; call [`Settings::save`] to persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        require_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Remove a key. Missing keys are lookup failures.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        require_key(key)?;
        self.values
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("setting '{}'", key)))
    }

    /// Persist to the bound file.
    pub fn save(&self) -> Result<()> {
        let path: &Path = self
            .path
            .as_deref()
            .ok_or_else(|| Error::IllegalOperation("settings are not file-backed".into()))?;
        let bytes = serde_json::to_vec_pretty(&self.values)?;
        fsio::write_atomic(path, &bytes)
    }
}

fn require_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::IllegalArgument("setting key must not be empty".into()));
    }
    Ok(())
}
