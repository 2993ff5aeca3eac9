//! cli::args
//!
//! Root command-line definition.
//!
//! The set of subcommands is not known until configuration has been read,
//! so the root `clap::Command` is assembled at runtime from the registry
//! rather than derived.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version` / `-V`: Show version
//! - `--environment <NAME>`: Select the runtime profile
//! - `--quiet` / `-q`: Do not output any message

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};

use crate::engine::registry::CommandRegistry;

/// Application name shown in listings.
pub const NAME: &str = "Craft CLI";

/// Binary name.
pub const BIN_NAME: &str = "craft";

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Argument id of the environment option.
pub const ENVIRONMENT_ARG: &str = "environment";

/// Argument id of the quiet flag.
pub const QUIET_ARG: &str = "quiet";

fn environment_arg() -> Arg {
    Arg::new(ENVIRONMENT_ARG)
        .long("environment")
        .value_name("NAME")
        .num_args(1)
        .help("The environment name exported as SERVER_NAME")
}

/// Build the root command with one subcommand per registered command.
pub fn root_command(registry: &CommandRegistry) -> Command {
    let root = Command::new(BIN_NAME)
        .about(format!("{} - command-line companion for Craft installations", NAME))
        .version(VERSION)
        .disable_help_subcommand(true)
        .subcommand_value_name("COMMAND")
        .arg(environment_arg().global(true))
        .arg(
            Arg::new(QUIET_ARG)
                .short('q')
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Do not output any message"),
        );

    registry
        .iter()
        .fold(root, |root, command| root.subcommand(command.definition()))
}

/// The first option in `definition` that would collide with a root global
/// or with the generated help flag, rendered as it appears on the command
/// line.
///
/// clap asserts that option names are unique once globals are propagated,
/// so a colliding command must never reach [`root_command`].
pub fn reserved_option(definition: &Command) -> Option<String> {
    let help = !definition.is_disable_help_flag_set();

    definition.get_arguments().find_map(|arg| {
        let id = arg.get_id().as_str();
        if id == ENVIRONMENT_ARG || id == QUIET_ARG || (help && id == "help") {
            return Some(id.to_string());
        }

        let shorts = arg
            .get_short()
            .into_iter()
            .chain(arg.get_all_short_aliases().unwrap_or_default());
        for short in shorts {
            if short == 'q' || (help && short == 'h') {
                return Some(format!("-{}", short));
            }
        }

        let longs = arg
            .get_long()
            .into_iter()
            .chain(arg.get_all_aliases().unwrap_or_default());
        for long in longs {
            if long == "environment" || long == "quiet" || (help && long == "help") {
                return Some(format!("--{}", long));
            }
        }

        None
    })
}

/// Extract `--environment` from raw arguments before the full parse.
///
/// Runs before user commands are registered, so everything except the
/// environment option is dropped first. Unknown-argument and
/// too-many-values failures are treated as "no environment"; any other
/// failure, such as a missing value, is returned.
///
/// `args` includes the binary name.
pub fn environment_option(args: &[String]) -> Result<Option<String>, clap::Error> {
    let mut tokens = Vec::new();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }
        if arg == "--environment" {
            tokens.push(arg.clone());
            if let Some(value) = iter.next() {
                tokens.push(value.clone());
            }
        } else if arg.starts_with("--environment=") {
            tokens.push(arg.clone());
        }
    }

    let parser = Command::new(BIN_NAME)
        .no_binary_name(true)
        .args_override_self(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(environment_arg());

    match parser.try_get_matches_from(tokens) {
        Ok(matches) => Ok(matches.get_one::<String>(ENVIRONMENT_ARG).cloned()),
        Err(e) if matches!(e.kind(), ErrorKind::UnknownArgument | ErrorKind::TooManyValues) => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
