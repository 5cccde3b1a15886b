//! Validated, immutable launch options for the selenium server.

use crate::driver::Browser;
use crate::errors::LifecycleError;

/// Default port the selenium server listens on
pub const DEFAULT_PORT: u16 = 4444;

/// A single extra parameter passed through to the server command line.
///
/// `Pair("role", "node")` renders as `-role node`; `Switch("debug")` renders
/// as a bare `-debug`. Order is preserved exactly as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Value-less flag: `-name`
    Switch(String),
    /// Keyed flag: `-name value`
    Pair(String, String),
}

impl Param {
    /// Parse a CLI-style `key=value` or bare `flag` spelling
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('=') {
            Some((key, value)) => Param::Pair(key.to_string(), value.to_string()),
            None => Param::Switch(raw.to_string()),
        }
    }

    fn push_args(&self, args: &mut Vec<String>) {
        match self {
            Param::Switch(name) => args.push(format!("-{name}")),
            Param::Pair(name, value) => {
                args.push(format!("-{name}"));
                args.push(value.clone());
            }
        }
    }
}

/// Immutable launch configuration, validated at construction.
///
/// Built through [`LaunchOptionsBuilder`]; a missing browser fails the build
/// rather than producing a half-initialized value.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    browser: Browser,
    insider: bool,
    params: Vec<Param>,
    port: u16,
}

impl LaunchOptions {
    pub fn builder() -> LaunchOptionsBuilder {
        LaunchOptionsBuilder::default()
    }

    pub fn browser(&self) -> Browser {
        self.browser
    }

    /// Whether the edge insider-channel driver was requested
    pub fn insider(&self) -> bool {
        self.insider
    }

    /// Port the managed server will listen on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Render the extra parameters as command-line arguments, in order
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for param in &self.params {
            param.push_args(&mut args);
        }
        args
    }
}

/// Builder for [`LaunchOptions`].
#[derive(Debug)]
pub struct LaunchOptionsBuilder {
    browser: Option<Browser>,
    insider: bool,
    params: Vec<Param>,
    port: Option<u16>,
    register_shutdown: bool,
}

impl Default for LaunchOptionsBuilder {
    fn default() -> Self {
        Self {
            browser: None,
            insider: false,
            params: Vec::new(),
            port: None,
            register_shutdown: true,
        }
    }
}

impl LaunchOptionsBuilder {
    pub fn browser(mut self, browser: Browser) -> Self {
        self.browser = Some(browser);
        self
    }

    pub fn insider(mut self, insider: bool) -> Self {
        self.insider = insider;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params.extend(params);
        self
    }

    /// Register the server with the grid LifecycleServlet so it can be shut
    /// down over HTTP. On by default; without it `stop` has no endpoint to
    /// talk to.
    pub fn register_shutdown(mut self, register: bool) -> Self {
        self.register_shutdown = register;
        self
    }

    pub fn build(self) -> Result<LaunchOptions, LifecycleError> {
        let browser = self.browser.ok_or(LifecycleError::MissingBrowser)?;

        let mut params = self.params;

        // An explicit -port pair wins over the builder setting
        let port = params
            .iter()
            .find_map(|p| match p {
                Param::Pair(name, value) if name == "port" => value.parse::<u16>().ok(),
                _ => None,
            })
            .or(self.port)
            .unwrap_or(DEFAULT_PORT);

        if self.register_shutdown {
            params.push(Param::Pair("role".into(), "node".into()));
            params.push(Param::Pair(
                "servlet".into(),
                "org.openqa.grid.web.servlet.LifecycleServlet".into(),
            ));
            params.push(Param::Pair("registerCycle".into(), "0".into()));
            if !params
                .iter()
                .any(|p| matches!(p, Param::Pair(name, _) if name == "port"))
            {
                params.push(Param::Pair("port".into(), port.to_string()));
            }
        }

        Ok(LaunchOptions {
            browser,
            insider: self.insider,
            params,
            port,
        })
    }
}

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;
