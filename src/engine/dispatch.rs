//! engine::dispatch
//!
//! The [`Application`]: one CLI invocation from raw arguments to exit code.
//!
//! # Lifecycle
//!
//! ```text
//! new:  extract --environment -> resolve config -> export SERVER_NAME
//!       -> register built-ins -> register from config -> build gate
//! run:  parse -> select command (default: list) -> gate -> execute
//! ```
//!
//! Construction fails only on a malformed `--environment` option. Every
//! failure in `run` is reported on the output and mapped to an exit code.

use std::io::Write as _;

use clap::ArgMatches;
use thiserror::Error;
use tracing::debug;

use super::command::{Command, CommandContext};
use super::gate::{BootstrapGate, Bootstrapper};
use super::registry::{CommandCatalog, CommandRegistry, RegistrationReport, Skip};
use crate::cli::args::{environment_option, root_command, QUIET_ARG};
use crate::core::config::{ConfigResolver, ResolvedConfig};
use crate::ui::{Output, Verbosity};

/// Command run when none is given.
pub const DEFAULT_COMMAND: &str = "list";

/// Errors from building the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// `--environment` could not be read from the arguments.
    #[error("invalid --environment option")]
    EnvironmentOption(#[source] clap::Error),

    /// The working directory is unavailable.
    #[error("cannot determine the working directory")]
    WorkingDirectory(#[source] std::io::Error),
}

/// A configured CLI application.
pub struct Application {
    config: ResolvedConfig,
    environment: String,
    registry: CommandRegistry,
    report: RegistrationReport,
    gate: BootstrapGate,
}

impl Application {
    /// Resolve configuration and populate the registry.
    ///
    /// `args` includes the binary name. Exports [`crate::core::config::ENVIRONMENT_VAR`]
    /// as a side effect.
    ///
    /// # Errors
    ///
    /// [`AppError::EnvironmentOption`] if `--environment` is malformed.
    pub fn new(
        args: &[String],
        resolver: &ConfigResolver,
        catalog: &CommandCatalog,
        bootstrapper: Box<dyn Bootstrapper>,
    ) -> Result<Self, AppError> {
        let cli_environment = environment_option(args).map_err(AppError::EnvironmentOption)?;
        let config = resolver.resolve(cli_environment.as_deref());
        let environment = config.export_environment();

        let mut registry = CommandRegistry::new();
        registry.register_builtins();
        let report = registry.register_from_config(catalog, &config);
        debug!(
            commands = registry.len(),
            skipped = report.skipped.len(),
            "registry populated"
        );

        let gate = BootstrapGate::new(config.paths.clone(), environment.clone(), bootstrapper);

        Ok(Self {
            config,
            environment,
            registry,
            report,
            gate,
        })
    }

    /// Parse `args` and run the selected command, returning the exit code.
    pub fn run(&mut self, args: &[String], output: &mut Output) -> i32 {
        let cli = self.cli();

        let matches = match cli.clone().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) => return report_parse_error(&e, output),
        };

        if matches.get_flag(QUIET_ARG) {
            output.set_verbosity(Verbosity::Quiet);
        }

        let (name, sub_matches) = match matches.subcommand() {
            Some((name, sub_matches)) => (name.to_string(), sub_matches.clone()),
            None => {
                let Some(command) = self.registry.get(DEFAULT_COMMAND) else {
                    output.error(format!("Command \"{}\" is not defined.", DEFAULT_COMMAND));
                    return 1;
                };
                match default_matches(command) {
                    Ok(matches) => (DEFAULT_COMMAND.to_string(), matches),
                    Err(e) => return report_parse_error(&e, output),
                }
            }
        };

        let Some(command) = self.registry.get(&name) else {
            output.error(format!("Command \"{}\" is not defined.", name));
            return 1;
        };

        if self.gate.should_bootstrap(command) {
            debug!(command = %name, "command requires bootstrap");
            if let Err(e) = self.gate.ensure_bootstrapped() {
                output.error(&e);
                return 1;
            }
        }

        let mut ctx = CommandContext {
            matches: &sub_matches,
            config: &self.config,
            environment: &self.environment,
            app: self.gate.app(),
            cli: &cli,
            output: &mut *output,
        };

        let code = match command.run(&mut ctx) {
            Ok(code) => code,
            Err(e) => {
                output.error(format!("{:#}", e));
                1
            }
        };
        output.flush();
        code
    }

    /// Register one more command, replacing any of the same name.
    ///
    /// # Errors
    ///
    /// [`Skip::ReservedOption`] if the command declares an option the root
    /// command already defines.
    pub fn add(&mut self, command: Box<dyn Command>) -> Result<Option<Box<dyn Command>>, Skip> {
        self.registry.register(command)
    }

    /// Root command-line definition for the current registry.
    pub fn cli(&self) -> clap::Command {
        root_command(&self.registry)
    }

    /// Registered commands.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Outcome of configuration-driven registration.
    pub fn registration_report(&self) -> &RegistrationReport {
        &self.report
    }

    /// Resolved configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Bootstrap gate.
    pub fn gate(&self) -> &BootstrapGate {
        &self.gate
    }

    /// Exported environment name.
    pub fn environment(&self) -> &str {
        &self.environment
    }
}

/// Matches for a command run without arguments.
fn default_matches(command: &dyn Command) -> Result<ArgMatches, clap::Error> {
    command
        .definition()
        .no_binary_name(true)
        .try_get_matches_from(Vec::<String>::new())
}

/// Print a clap error (or help/version text) and return its exit code.
fn report_parse_error(err: &clap::Error, output: &mut Output) -> i32 {
    let stream = if err.use_stderr() {
        output.stderr()
    } else {
        output.stdout()
    };
    let _ = write!(stream, "{}", err);
    output.flush();
    err.exit_code()
}
