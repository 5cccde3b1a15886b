//! # gridctl
#![allow(clippy::uninlined_format_args)]
//!
//! Launch and supervise a local Selenium server-standalone instance with the
//! right browser driver wired in for the host platform.
//!
//! One controller owns one server on one port. It resolves the driver binary
//! from a layered `drivers.toml`, spawns the server detached with its output
//! in `selenium.log`, waits for the `/wd/hub/status` endpoint to report
//! ready, and later shuts the server down through its lifecycle servlet,
//! waiting for the port to close. All waiting is bounded, polled once per
//! second.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Launch a server for chrome and wait until it accepts commands
//! gridctl start --browser chrome
//!
//! # Launch only if nothing is listening on the port yet
//! gridctl run --browser firefox
//!
//! # Edge insider channel uses its dedicated driver entry
//! gridctl start --browser MicrosoftEdge --insider
//!
//! # Extra server flags pass straight through
//! gridctl start --browser chrome --param debug --param log=grid.log
//!
//! # Ask the server to shut down and wait for the port to close
//! gridctl stop
//!
//! # Fail with a non-zero exit if the port never closes
//! gridctl stop --strict
//!
//! # Is anything listening, and is it ready?
//! gridctl status
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use gridctl::{Browser, DriverConfig, LaunchOptions, LifecycleController};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let options = LaunchOptions::builder().browser(Browser::Chrome).build()?;
//! let config = DriverConfig::load(std::path::Path::new("."))?;
//!
//! let mut controller = LifecycleController::new(".", options, config);
//! controller.ensure_running().await?;
//! // ... run tests against the server ...
//! controller.stop(10).await?;
//! # Ok(())
//! # }
//! ```

/// Layered driver path configuration
pub mod config;

/// Browser driver resolution
pub mod driver;

/// Error types with CLI exit codes
pub mod errors;

/// Start/ready/stop state machine for the managed server
pub mod lifecycle;

/// Validated launch options
pub mod options;

/// Port and HTTP status probes
pub mod probe;

pub use config::DriverConfig;
pub use driver::{Browser, Platform, ResolvedDriver};
pub use errors::LifecycleError;
pub use lifecycle::{ControllerState, LifecycleController};
pub use options::{LaunchOptions, Param};
pub use probe::{StatusClient, port_is_listening};
