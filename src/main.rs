#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod driver;
pub mod errors;
pub mod lifecycle;
pub mod options;
pub mod probe;

use config::DriverConfig;
use driver::Browser;
use errors::LifecycleError;
use lifecycle::{DEFAULT_TIMEOUT_SECS, LifecycleController};
use options::{LaunchOptions, Param};

const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;

#[derive(Parser)]
#[command(name = "gridctl")]
#[command(about = "Launch and supervise a local Selenium server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Selenium install root (contains bin/ and drivers.toml)
    #[arg(long, global = true, default_value = ".")]
    base_dir: PathBuf,

    /// Port the server listens on
    #[arg(long, global = true, default_value_t = options::DEFAULT_PORT)]
    port: u16,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the server and wait until it is ready
    Start {
        /// Browser to resolve a driver for (chrome, firefox, MicrosoftEdge, ie)
        #[arg(short, long)]
        browser: Option<Browser>,

        /// Use the edge insider-channel driver
        #[arg(long)]
        insider: bool,

        /// Extra server flag, as key=value or a bare flag name (repeatable)
        #[arg(long = "param")]
        params: Vec<String>,

        /// Do not register the lifecycle servlet (disables `stop`)
        #[arg(long)]
        no_register: bool,

        /// Seconds to wait for readiness
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
    },

    /// Launch the server only if nothing is listening on the port yet
    Run {
        /// Browser to resolve a driver for (chrome, firefox, MicrosoftEdge, ie)
        #[arg(short, long)]
        browser: Option<Browser>,

        /// Use the edge insider-channel driver
        #[arg(long)]
        insider: bool,

        /// Extra server flag, as key=value or a bare flag name (repeatable)
        #[arg(long = "param")]
        params: Vec<String>,
    },

    /// Ask the server to shut down and wait for the port to close
    Stop {
        /// Seconds to wait for the port to close
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        /// Treat a shutdown timeout as an error instead of reporting success
        #[arg(long)]
        strict: bool,
    },

    /// Report whether anything is listening and whether it is ready
    Status,
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let code = err
                .downcast_ref::<LifecycleError>()
                .map(LifecycleError::exit_code)
                .unwrap_or(EXIT_ERROR);
            std::process::exit(code);
        }
    }
}

async fn run() -> Result<()> {
    // Initialize tracing to stderr (so JSON output to stdout remains clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridctl=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            browser,
            insider,
            params,
            no_register,
            timeout,
        } => {
            let options = build_options(browser, insider, &params, !no_register, cli.port)?;
            let config = DriverConfig::load(&cli.base_dir)?;
            let mut controller = LifecycleController::new(&cli.base_dir, options, config);
            controller.start_with_timeout(timeout).await?;
            println!("ready on port {}", controller.port());
        }

        Commands::Run {
            browser,
            insider,
            params,
        } => {
            let options = build_options(browser, insider, &params, true, cli.port)?;
            let config = DriverConfig::load(&cli.base_dir)?;
            let mut controller = LifecycleController::new(&cli.base_dir, options, config);
            let ready = controller.ensure_running().await?;
            println!("{}", json!({ "port": controller.port(), "ready": ready }));
        }

        Commands::Stop { timeout, strict } => {
            // Stop needs no browser; build a throwaway option set for the port
            let options = LaunchOptions::builder()
                .browser(Browser::Chrome)
                .port(cli.port)
                .build()?;
            let mut controller =
                LifecycleController::new(&cli.base_dir, options, DriverConfig::default())
                    .strict(strict);
            let stopped = controller.stop(timeout).await?;
            println!("{}", json!({ "port": cli.port, "stopped": stopped }));
        }

        Commands::Status => {
            let listening = probe::port_is_listening("localhost", cli.port);
            let status = probe::StatusClient::new("localhost", cli.port);
            let ready = status.fetch_ready().await;
            let info = status.status_info().await;
            println!(
                "{}",
                json!({
                    "port": cli.port,
                    "listening": listening,
                    "ready": ready,
                    "status": info,
                })
            );
        }
    }

    Ok(())
}

fn build_options(
    browser: Option<Browser>,
    insider: bool,
    params: &[String],
    register_shutdown: bool,
    port: u16,
) -> Result<LaunchOptions> {
    let mut builder = LaunchOptions::builder()
        .insider(insider)
        .port(port)
        .register_shutdown(register_shutdown)
        .params(params.iter().map(|raw| Param::parse(raw)));

    if let Some(browser) = browser {
        builder = builder.browser(browser);
    }

    Ok(builder.build()?)
}
