//! Lifecycle controller for one selenium server instance on one port.
//!
//! The controller's only side effect is spawning the server process; its only
//! senses are the TCP port probe and the HTTP status endpoint. It never
//! watches the spawned process itself: exit tracking would tie the logic to
//! process-table details that differ per platform, while port/HTTP sensing
//! behaves identically everywhere and also covers instances this controller
//! did not launch.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::DriverConfig;
use crate::driver::{self, Platform, ResolvedDriver};
use crate::errors::LifecycleError;
use crate::options::LaunchOptions;
use crate::probe::{StatusClient, port_is_listening};

/// Default wait budget for both the ready and shutdown loops, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fixed polling cadence; deliberately no backoff or jitter for a local,
/// single-instance supervisor
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Combined stdout/stderr of the server, relative to the working directory
const SERVER_LOG: &str = "selenium.log";

/// Where the controller believes the managed server is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Stopped,
    Starting,
    Ready,
    Stopping,
}

/// Advisory lock bracketing the listen-check-then-launch window.
///
/// Two controllers racing on the same port would otherwise both see "not
/// listening" and both spawn a server. The lock file is keyed by port and
/// removed on drop.
struct LaunchGuard {
    path: PathBuf,
}

impl LaunchGuard {
    fn acquire(port: u16) -> Result<Self, LifecycleError> {
        let path = std::env::temp_dir().join(format!("gridctl-{port}.lock"));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(LifecycleError::AlreadyLaunching { port })
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for LaunchGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            debug!("failed to remove launch lock {}: {}", self.path.display(), e);
        }
    }
}

/// Supervises one selenium server process on one port.
pub struct LifecycleController {
    host: String,
    base_dir: PathBuf,
    options: LaunchOptions,
    config: DriverConfig,
    status: StatusClient,
    state: ControllerState,
    strict: bool,
    // Opaque handle to the spawned process; kept but never waited on
    child: Option<Child>,
}

impl LifecycleController {
    pub fn new(base_dir: impl Into<PathBuf>, options: LaunchOptions, config: DriverConfig) -> Self {
        let port = options.port();
        Self {
            host: "localhost".to_string(),
            base_dir: base_dir.into(),
            options,
            config,
            status: StatusClient::new("localhost", port),
            state: ControllerState::Stopped,
            strict: false,
            child: None,
        }
    }

    /// Surface a shutdown timeout as an error instead of swallowing it.
    ///
    /// Off by default for compatibility: `stop` then reports success even
    /// when the port never closed, logging a warning instead.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn port(&self) -> u16 {
        self.options.port()
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Whether anything is listening on the managed port right now
    pub fn is_listening(&self) -> bool {
        port_is_listening(&self.host, self.port())
    }

    /// Whether the managed server reports ready
    pub async fn is_ready(&self) -> bool {
        self.status.fetch_ready().await
    }

    /// Raw status document from the server, if reachable
    pub async fn status_info(&self) -> Option<serde_json::Value> {
        self.status.status_info().await
    }

    /// Resolve the driver, launch the server, and wait for readiness.
    ///
    /// Fails fast with `NoDriverForBrowser` before anything is spawned, and
    /// with `StartTimeout` if the server never reports ready in time.
    pub async fn start(&mut self) -> Result<(), LifecycleError> {
        self.start_with_timeout(DEFAULT_TIMEOUT_SECS).await
    }

    /// Same as [`start`](Self::start) with an explicit readiness budget
    pub async fn start_with_timeout(&mut self, timeout_secs: u64) -> Result<(), LifecycleError> {
        let _guard = LaunchGuard::acquire(self.port())?;
        self.launch_and_wait(timeout_secs).await
    }

    /// Launch the server only if nothing is listening on the port yet.
    ///
    /// Returns the readiness of whatever ends up on the port. When the port
    /// is already taken the launch is skipped and readiness is re-verified:
    /// something is running there, but not necessarily something ready. A
    /// launch that fails to come up in time is logged and reported through
    /// the readiness value; a driver resolution failure is propagated.
    pub async fn ensure_running(&mut self) -> Result<bool, LifecycleError> {
        let _guard = LaunchGuard::acquire(self.port())?;

        if self.is_listening() {
            debug!("port {} already listening, skipping launch", self.port());
            let ready = self.is_ready().await;
            if ready {
                self.state = ControllerState::Ready;
            }
            return Ok(ready);
        }

        match self.launch_and_wait(DEFAULT_TIMEOUT_SECS).await {
            // Resolution failure means no launch can ever succeed; that is
            // fatal, unlike a launch that merely did not come up in time
            Err(e @ LifecycleError::NoDriverForBrowser { .. }) => return Err(e),
            Err(e) => warn!("launch failed: {}", e),
            Ok(()) => {}
        }
        Ok(self.is_ready().await)
    }

    /// Ask the server to shut down and wait for the port to close.
    ///
    /// Nothing listening means already stopped: success, and no HTTP request
    /// is made. A listening but not-ready instance is left alone (it has no
    /// working shutdown servlet to talk to yet) and also reported as success.
    pub async fn stop(&mut self, timeout_secs: u64) -> Result<bool, LifecycleError> {
        if !self.is_listening() {
            debug!("port {} not listening, nothing to stop", self.port());
            self.state = ControllerState::Stopped;
            return Ok(true);
        }

        if !self.is_ready().await {
            debug!("server on port {} is not ready, skipping shutdown request", self.port());
            return Ok(true);
        }

        self.state = ControllerState::Stopping;
        self.send_shutdown().await;

        match self.wait_for_shutdown(timeout_secs).await {
            Ok(()) => {
                info!("selenium server on port {} stopped", self.port());
                self.state = ControllerState::Stopped;
                self.child = None;
                Ok(true)
            }
            Err(e) => {
                self.state = ControllerState::Ready;
                if self.strict {
                    Err(e)
                } else {
                    warn!(
                        "port {} still listening after {}s, reporting stop as successful anyway",
                        self.port(),
                        timeout_secs
                    );
                    Ok(true)
                }
            }
        }
    }

    /// Poll the status endpoint once per second until it reports ready.
    ///
    /// An already-ready server returns on the first probe without consuming
    /// the timeout budget.
    pub async fn wait_for_ready(&self, timeout_secs: u64) -> Result<(), LifecycleError> {
        for elapsed in 0..=timeout_secs {
            if self.is_ready().await {
                return Ok(());
            }
            if elapsed < timeout_secs {
                sleep(POLL_INTERVAL).await;
            }
        }
        Err(LifecycleError::StartTimeout { secs: timeout_secs })
    }

    /// Poll the port once per second until nothing is listening.
    pub async fn wait_for_shutdown(&self, timeout_secs: u64) -> Result<(), LifecycleError> {
        for elapsed in 0..=timeout_secs {
            if !self.is_listening() {
                return Ok(());
            }
            if elapsed < timeout_secs {
                sleep(POLL_INTERVAL).await;
            }
        }
        Err(LifecycleError::ShutdownTimeout {
            port: self.port(),
            secs: timeout_secs,
        })
    }

    async fn launch_and_wait(&mut self, timeout_secs: u64) -> Result<(), LifecycleError> {
        let driver = driver::resolve(
            &self.base_dir,
            self.options.browser(),
            self.options.insider(),
            Platform::current(),
            &self.config,
        )?;

        self.state = ControllerState::Starting;
        self.spawn_server(&driver)?;

        match self.wait_for_ready(timeout_secs).await {
            Ok(()) => {
                info!("selenium server ready on port {}", self.port());
                self.state = ControllerState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = ControllerState::Stopped;
                Err(e)
            }
        }
    }

    #[cfg(unix)]
    fn spawn_server(&mut self, driver: &ResolvedDriver) -> Result<(), LifecycleError> {
        use std::os::unix::process::CommandExt;

        let log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(SERVER_LOG)?;

        let mut cmd = Command::new(self.base_dir.join("bin").join("selenium-server-standalone"));
        cmd.arg(driver.as_jvm_flag())
            .args(self.options.args())
            .stdout(log.try_clone()?)
            .stderr(log);

        // Detach into its own process group so it outlives this CLI
        cmd.process_group(0);

        let child = cmd.spawn()?;
        info!(
            "launched selenium server for {} on port {} (pid {})",
            self.options.browser(),
            self.port(),
            child.id()
        );
        self.child = Some(child);
        Ok(())
    }

    #[cfg(windows)]
    fn spawn_server(&mut self, driver: &ResolvedDriver) -> Result<(), LifecycleError> {
        let jar = self
            .base_dir
            .join("bin")
            .join("selenium-server-standalone.jar");

        // START opens a new console so the server survives this process
        let mut cmd = Command::new("cmd");
        cmd.arg("/C")
            .arg("start")
            .arg("java.exe")
            .arg("-jar")
            .arg(&jar)
            .arg(driver.as_jvm_flag())
            .args(self.options.args());

        let child = cmd.spawn()?;
        info!(
            "launched selenium server for {} on port {} (pid {})",
            self.options.browser(),
            self.port(),
            child.id()
        );
        self.child = Some(child);
        Ok(())
    }

    /// Fire-and-forget GET to the lifecycle servlet; the response is ignored
    async fn send_shutdown(&self) {
        let url = format!(
            "http://{}:{}/extra/LifecycleServlet?action=shutdown",
            self.host,
            self.port()
        );
        debug!("requesting shutdown via {}", url);
        let _ = reqwest::Client::new()
            .get(&url)
            .timeout(Duration::from_secs(1))
            .send()
            .await;
    }
}

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;
