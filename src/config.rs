//! Layered driver configuration.
//!
//! Driver paths live in `drivers.toml` in the install root, one section per
//! browser, keyed by platform name:
//!
//! ```toml
//! [chrome]
//! linux = "drivers/chromedriver"
//! mac = "drivers/chromedriver"
//! windows = "drivers/chromedriver.exe"
//!
//! [MicrosoftEdge]
//! windows = "drivers/msedgedriver.exe"
//! windowsInsider = "drivers/msedgedriver-insider.exe"
//! ```
//!
//! A `drivers.local.toml` next to it, if present, replaces the base table
//! entirely. Replace, not merge: a local file is always a full statement of
//! the driver set.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::LifecycleError;

/// Base driver table, always read
pub const BASE_FILE: &str = "drivers.toml";
/// Optional local override; replaces the base table when present
pub const OVERRIDE_FILE: &str = "drivers.local.toml";

/// Parsed driver table: browser section name → platform key → relative path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DriverConfig {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl DriverConfig {
    /// Load the driver table from an install root.
    ///
    /// Reads `drivers.toml`; if `drivers.local.toml` exists it is read
    /// instead of the base file.
    pub fn load(base_dir: &Path) -> Result<Self, LifecycleError> {
        let override_path = base_dir.join(OVERRIDE_FILE);
        let path = if override_path.exists() {
            override_path
        } else {
            base_dir.join(BASE_FILE)
        };

        let raw = std::fs::read_to_string(&path).map_err(|source| LifecycleError::ConfigIo {
            path: path.clone(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| LifecycleError::ConfigParse { path, source })
    }

    /// Parse a driver table from TOML text
    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Look up a relative driver path by browser section and platform key
    pub fn entry(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|keys| keys.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
