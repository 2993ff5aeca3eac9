//! engine::command
//!
//! The `Command` trait every dispatchable command implements.
//!
//! # Architecture
//!
//! A command is a named unit with three capabilities:
//!
//! 1. It declares its argument schema by configuring a `clap::Command`
//! 2. It runs against parsed arguments and an output sink
//! 3. It may opt out of application bootstrap
//!
//! The runnable capability is enforced by the type system: anything that
//! reaches the registry is a `Box<dyn Command>`. Nothing checks at runtime
//! whether a unit "is really a command".
//!
//! # Example
//!
//! ```
//! use anyhow::Result;
//! use clap::{Arg, ArgAction};
//! use craft_cli::engine::command::{Command, CommandContext};
//!
//! struct Greet;
//!
//! impl Command for Greet {
//!     fn name(&self) -> &str {
//!         "greet"
//!     }
//!
//!     fn about(&self) -> &str {
//!         "Say hello"
//!     }
//!
//!     fn configure(&self, cmd: clap::Command) -> clap::Command {
//!         cmd.arg(Arg::new("loud").long("loud").action(ArgAction::SetTrue))
//!     }
//!
//!     fn exempt_from_bootstrap(&self) -> bool {
//!         true
//!     }
//!
//!     fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
//!         let text = if ctx.matches.get_flag("loud") { "HELLO" } else { "hello" };
//!         ctx.output.print(text);
//!         Ok(0)
//!     }
//! }
//! ```

use anyhow::Result;
use clap::ArgMatches;

use super::gate::AppHandle;
use crate::core::config::ResolvedConfig;
use crate::ui::Output;

/// Everything a command body can see.
pub struct CommandContext<'a> {
    /// Arguments parsed against this command's definition.
    pub matches: &'a ArgMatches,
    /// Resolved configuration.
    pub config: &'a ResolvedConfig,
    /// Exported environment name.
    pub environment: &'a str,
    /// Bootstrapped application, if the gate ran.
    pub app: Option<&'a AppHandle>,
    /// Root CLI definition, for help and listing.
    pub cli: &'a clap::Command,
    /// Output sink.
    pub output: &'a mut Output,
}

impl<'a> CommandContext<'a> {
    /// The bootstrapped application.
    ///
    /// # Errors
    ///
    /// Fails for exempt commands, which run without bootstrap.
    pub fn require_app(&self) -> Result<&'a AppHandle> {
        self.app
            .ok_or_else(|| anyhow::anyhow!("the application has not been bootstrapped"))
    }
}

/// A command that can be registered and dispatched.
pub trait Command {
    /// Unique name used on the command line.
    fn name(&self) -> &str;

    /// One-line description for help and listing.
    fn about(&self) -> &str {
        ""
    }

    /// Add arguments and options to the command definition.
    fn configure(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Whether this command runs without bootstrapping the application.
    fn exempt_from_bootstrap(&self) -> bool {
        false
    }

    /// Execute the command, returning its exit code.
    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32>;

    /// Full argument schema for this command.
    fn definition(&self) -> clap::Command {
        let base = clap::Command::new(self.name().to_string()).about(self.about().to_string());
        self.configure(base)
    }
}

impl std::fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name())
            .field("exempt_from_bootstrap", &self.exempt_from_bootstrap())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Command for Plain {
        fn name(&self) -> &str {
            "plain"
        }

        fn run(&self, _ctx: &mut CommandContext<'_>) -> Result<i32> {
            Ok(0)
        }
    }

    #[test]
    fn defaults() {
        let cmd = Plain;
        assert_eq!(cmd.about(), "");
        assert!(!cmd.exempt_from_bootstrap());
    }

    #[test]
    fn definition_carries_name_and_about() {
        struct Described;

        impl Command for Described {
            fn name(&self) -> &str {
                "described"
            }

            fn about(&self) -> &str {
                "Has a description"
            }

            fn configure(&self, cmd: clap::Command) -> clap::Command {
                cmd.arg(clap::Arg::new("target"))
            }

            fn run(&self, _ctx: &mut CommandContext<'_>) -> Result<i32> {
                Ok(0)
            }
        }

        let def = Described.definition();
        assert_eq!(def.get_name(), "described");
        assert_eq!(
            def.get_about().map(|a| a.to_string()),
            Some("Has a description".to_string())
        );
        assert!(def.get_arguments().any(|a| a.get_id() == "target"));
    }

    #[test]
    fn debug_formats_name() {
        let boxed: Box<dyn Command> = Box::new(Plain);
        assert!(format!("{:?}", boxed).contains("plain"));
    }
}
