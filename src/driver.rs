//! Browser driver resolution.
//!
//! Maps a (browser, platform) pair to the system property the selenium server
//! expects and the driver binary path from the layered config. Pure lookup:
//! the only I/O is whoever loaded the [`DriverConfig`] beforehand.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::DriverConfig;
use crate::errors::LifecycleError;

/// Supported browsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Browser {
    /// Google Chrome/Chromium
    Chrome,
    /// Mozilla Firefox
    Firefox,
    /// Microsoft Edge
    Edge,
    /// Internet Explorer
    Ie,
}

impl Browser {
    /// Section name in drivers.toml (the selenium capability spelling)
    pub fn config_section(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Edge => "MicrosoftEdge",
            Browser::Ie => "internet explorer",
        }
    }

    /// System property the server reads the driver path from
    pub fn driver_property(&self) -> &'static str {
        match self {
            Browser::Chrome => "webdriver.chrome.driver",
            Browser::Firefox => "webdriver.gecko.driver",
            Browser::Edge => "webdriver.edge.driver",
            Browser::Ie => "webdriver.ie.driver",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_section())
    }
}

impl std::str::FromStr for Browser {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Browser::Chrome),
            "firefox" => Ok(Browser::Firefox),
            "microsoftedge" | "edge" => Ok(Browser::Edge),
            "internet explorer" | "internetexplorer" | "ie" => Ok(Browser::Ie),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

/// Host platform, as keyed in drivers.toml
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    /// Detect the platform this process is running on
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Linux
        }
    }

    /// Key within a browser section of drivers.toml
    pub fn config_key(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Mac => "mac",
            Platform::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// Config key for the edge insider-channel driver path
const INSIDER_KEY: &str = "windowsInsider";

/// A resolved driver: the system property to set and the binary to point it at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDriver {
    /// System property name, e.g. `webdriver.chrome.driver`
    pub property: String,
    /// Absolute path to the driver binary, anchored at the install root
    pub path: PathBuf,
}

impl ResolvedDriver {
    /// Render as the `-Dproperty=path` flag the server command line takes
    pub fn as_jvm_flag(&self) -> String {
        format!("-D{}={}", self.property, self.path.display())
    }
}

/// Resolve the driver for a browser on a platform.
///
/// Edge on the insider channel uses the dedicated `windowsInsider` entry no
/// matter the platform; everything else goes through the per-platform key.
/// The returned path is anchored at `base_dir`, never the caller's working
/// directory.
pub fn resolve(
    base_dir: &Path,
    browser: Browser,
    insider: bool,
    platform: Platform,
    config: &DriverConfig,
) -> Result<ResolvedDriver, LifecycleError> {
    let section = browser.config_section();

    let relative = if browser == Browser::Edge && insider {
        config.entry(section, INSIDER_KEY)
    } else {
        config.entry(section, platform.config_key())
    };

    let relative = relative.ok_or_else(|| LifecycleError::NoDriverForBrowser {
        browser: browser.to_string(),
        platform: platform.to_string(),
    })?;

    Ok(ResolvedDriver {
        property: browser.driver_property().to_string(),
        path: base_dir.join(relative),
    })
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;
