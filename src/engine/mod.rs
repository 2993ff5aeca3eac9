//! engine
//!
//! Orchestrates one invocation: Resolve -> Register -> Parse -> Gate -> Execute.
//!
//! # Architecture
//!
//! The engine is the central coordinator for every Craft CLI command:
//!
//! 1. **Resolve**: Merge configuration and export the environment
//! 2. **Register**: Populate the registry from built-ins, references and
//!    command directories
//! 3. **Parse**: Build the root CLI from the registry and parse arguments
//! 4. **Gate**: Bootstrap the Craft application if the command needs it
//! 5. **Execute**: Run the command body and map the result to an exit code
//!
//! # Invariants
//!
//! - The bootstrapper never runs for `help`, `list` or exempt commands
//! - The bootstrapper never runs without the marker file
//! - A command body never runs if bootstrap failed
//! - Registration is last-write-wins by command name
//!
//! # Example
//!
//! ```ignore
//! use craft_cli::engine::{Application, CommandCatalog, CraftBootstrapper};
//!
//! let catalog = CommandCatalog::with_builtins();
//! let mut app = Application::new(&args, &resolver, &catalog, Box::new(CraftBootstrapper))?;
//! let code = app.run(&args, &mut output);
//! ```

pub mod command;
pub mod discovery;
pub mod dispatch;
pub mod gate;
pub mod registry;

pub use command::{Command, CommandContext};
pub use dispatch::{AppError, Application, DEFAULT_COMMAND};
pub use gate::{
    should_bootstrap, AppHandle, BootstrapError, BootstrapGate, BootstrapState, Bootstrapper,
    CraftBootstrapper, META_COMMANDS,
};
pub use registry::{CommandCatalog, CommandRegistry, Factory, RegistrationReport, Skip, Unit};
