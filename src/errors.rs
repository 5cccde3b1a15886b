use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the lifecycle controller and driver resolution.
///
/// Transport and parse failures from the status/shutdown probes never show up
/// here: the controller collapses them to "not ready" because it cannot tell
/// a server that is still booting apart from a transient network hiccup.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// No browser was requested (exit code 2)
    #[error("you need to specify a browser")]
    MissingBrowser,

    /// The driver config has no entry for this browser/platform (exit code 3)
    #[error("no driver for {browser} on {platform}; check your drivers.toml")]
    NoDriverForBrowser { browser: String, platform: String },

    /// The server never reported ready within the start window (exit code 5)
    #[error("selenium server did not become ready within {secs}s")]
    StartTimeout { secs: u64 },

    /// The port was still listening when the stop window closed (exit code 5)
    #[error("port {port} still listening {secs}s after shutdown request")]
    ShutdownTimeout { port: u16, secs: u64 },

    /// Another launch already holds the lock for this port (exit code 4)
    #[error("another launch is already in progress on port {port}")]
    AlreadyLaunching { port: u16 },

    /// Driver config file could not be read (exit code 1)
    #[error("failed to read driver config {}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Driver config file is not valid TOML (exit code 1)
    #[error("failed to parse driver config {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Launching the server process failed (exit code 4)
    #[error("failed to launch selenium server")]
    Spawn(#[from] std::io::Error),
}

impl LifecycleError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            LifecycleError::MissingBrowser => 2,
            LifecycleError::NoDriverForBrowser { .. } => 3,
            LifecycleError::AlreadyLaunching { .. } | LifecycleError::Spawn(_) => 4,
            LifecycleError::StartTimeout { .. } | LifecycleError::ShutdownTimeout { .. } => 5,
            LifecycleError::ConfigIo { .. } | LifecycleError::ConfigParse { .. } => 1,
        }
    }
}
