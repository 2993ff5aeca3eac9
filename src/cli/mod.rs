//! cli
//!
//! Command-line interface layer for Craft CLI.
//!
//! # Responsibilities
//!
//! - Initialize logging
//! - Build the [`crate::engine::Application`] from the process environment
//! - Map every outcome to a process exit code
//!
//! # Architecture
//!
//! The CLI layer is thin. Root arguments live in [`args`], built-in
//! commands in [`commands`]; everything else is delegated to the
//! [`crate::engine`].

pub mod args;
pub mod commands;

use std::io::Write as _;

use tracing_subscriber::EnvFilter;

use crate::core::config::ConfigResolver;
use crate::engine::{AppError, Application, CommandCatalog, CraftBootstrapper};
use crate::ui::Output;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CRAFT_LOG";

/// Log filter used when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the global tracing subscriber, writing to stderr.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> i32 {
    init_tracing();

    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let mut output = Output::stdio();

    let code = match start(&args, &mut output) {
        Ok(code) => code,
        Err(AppError::EnvironmentOption(e)) => {
            let _ = write!(output.stderr(), "{}", e);
            e.exit_code()
        }
        Err(e) => {
            output.error(format!("{:#}", anyhow::Error::from(e)));
            1
        }
    };
    output.flush();
    code
}

fn start(args: &[String], output: &mut Output) -> Result<i32, AppError> {
    let resolver = ConfigResolver::from_env().map_err(AppError::WorkingDirectory)?;
    let catalog = CommandCatalog::with_builtins();
    let mut app = Application::new(args, &resolver, &catalog, Box::new(CraftBootstrapper))?;
    Ok(app.run(args, output))
}
