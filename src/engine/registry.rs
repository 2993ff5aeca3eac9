//! engine::registry
//!
//! Command catalog and command registry.
//!
//! # Catalog
//!
//! The [`CommandCatalog`] is the typed table of units the binary knows
//! about, keyed by a stable identifier such as `app::commands::deploy`.
//! Configuration refers to commands by these identifiers. A unit is one of:
//!
//! - a command with a [`Factory`] (zero-argument constructor or a callback
//!   receiving the resolved configuration)
//! - an abstract unit that exists but cannot be instantiated
//! - some other unit that is not a command
//!
//! Only command units can ever produce a `Box<dyn Command>`; the factory
//! signature is the capability check.
//!
//! # Registry
//!
//! The [`CommandRegistry`] maps command names to instances. Registration is
//! last-write-wins: registering a name again replaces the earlier command.
//! A command declaring an option the root already owns (`-q`, `--quiet`,
//! `--environment`, `-h`, `--help`) is refused.
//!
//! Population order:
//! 1. Meta-commands and built-ins ([`CommandRegistry::register_builtins`])
//! 2. Explicit references from `commands`
//! 3. Units discovered in `command_dirs`

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::{debug, warn};

use super::command::Command;
use super::discovery;
use crate::cli::args::reserved_option;
use crate::core::config::ResolvedConfig;

/// Constructs a command instance.
pub enum Factory {
    /// Zero-argument constructor.
    Type(fn() -> Box<dyn Command>),
    /// Callback receiving the resolved configuration.
    Callback(Box<dyn Fn(&ResolvedConfig) -> Box<dyn Command>>),
}

impl Factory {
    /// Build a command.
    pub fn build(&self, config: &ResolvedConfig) -> Box<dyn Command> {
        match self {
            Factory::Type(ctor) => ctor(),
            Factory::Callback(callback) => callback(config),
        }
    }

    /// Whether this factory wants the configuration.
    pub fn is_callback(&self) -> bool {
        matches!(self, Factory::Callback(_))
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factory::Type(_) => f.write_str("Factory::Type"),
            Factory::Callback(_) => f.write_str("Factory::Callback"),
        }
    }
}

/// A unit known to the catalog.
#[derive(Debug)]
pub enum Unit {
    /// An instantiable command.
    Command(Factory),
    /// Exists, but cannot be instantiated.
    Abstract,
    /// Exists, but is not a command.
    Other,
}

/// Why a catalog lookup did not yield a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// No unit with that identifier.
    Unknown,
    /// The unit cannot be instantiated.
    NotInstantiable,
    /// The unit is not a command.
    NotACommand,
    /// The command declares an option owned by the root command.
    ReservedOption,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::Unknown => write!(f, "no such unit"),
            Skip::NotInstantiable => write!(f, "unit cannot be instantiated"),
            Skip::NotACommand => write!(f, "unit is not a command"),
            Skip::ReservedOption => write!(f, "command declares a reserved option"),
        }
    }
}

/// Zero-argument constructor for any defaultable command.
fn construct<C: Command + Default + 'static>() -> Box<dyn Command> {
    Box::new(C::default())
}

/// Typed table of known units.
#[derive(Debug, Default)]
pub struct CommandCatalog {
    units: HashMap<String, Unit>,
}

impl CommandCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the built-in commands under `craft_cli::commands::*`.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        crate::cli::commands::catalog_builtins(&mut catalog);
        catalog
    }

    /// Add a defaultable command type.
    pub fn register<C: Command + Default + 'static>(&mut self, id: impl Into<String>) -> &mut Self {
        self.insert(id, Unit::Command(Factory::Type(construct::<C>)))
    }

    /// Add a zero-argument constructor.
    pub fn register_type(
        &mut self,
        id: impl Into<String>,
        ctor: fn() -> Box<dyn Command>,
    ) -> &mut Self {
        self.insert(id, Unit::Command(Factory::Type(ctor)))
    }

    /// Add a factory callback.
    pub fn register_callback<F>(&mut self, id: impl Into<String>, callback: F) -> &mut Self
    where
        F: Fn(&ResolvedConfig) -> Box<dyn Command> + 'static,
    {
        self.insert(id, Unit::Command(Factory::Callback(Box::new(callback))))
    }

    /// Record a unit that cannot be instantiated.
    pub fn declare_abstract(&mut self, id: impl Into<String>) -> &mut Self {
        self.insert(id, Unit::Abstract)
    }

    /// Record a unit that is not a command.
    pub fn declare_other(&mut self, id: impl Into<String>) -> &mut Self {
        self.insert(id, Unit::Other)
    }

    fn insert(&mut self, id: impl Into<String>, unit: Unit) -> &mut Self {
        self.units.insert(id.into(), unit);
        self
    }

    /// Look up a unit.
    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.units.get(id)
    }

    /// Check whether `id` names an instantiable command.
    pub fn is_command(&self, id: &str) -> bool {
        self.factory(id).is_ok()
    }

    /// The factory for `id`.
    pub fn factory(&self, id: &str) -> Result<&Factory, Skip> {
        match self.units.get(id) {
            Some(Unit::Command(factory)) => Ok(factory),
            Some(Unit::Abstract) => Err(Skip::NotInstantiable),
            Some(Unit::Other) => Err(Skip::NotACommand),
            None => Err(Skip::Unknown),
        }
    }

    /// Build the command for `id`.
    pub fn instantiate(&self, id: &str, config: &ResolvedConfig) -> Result<Box<dyn Command>, Skip> {
        self.factory(id).map(|factory| factory.build(config))
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Summary of configuration-driven registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Identifiers registered, in order.
    pub registered: Vec<String>,
    /// Identifiers skipped, with the reason.
    pub skipped: Vec<(String, Skip)>,
}

/// Command names to instances.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its own name.
    ///
    /// Returns the command previously registered under that name.
    ///
    /// # Errors
    ///
    /// [`Skip::ReservedOption`] if the command declares an option the root
    /// command already defines. The registry is left unchanged.
    pub fn register(
        &mut self,
        command: Box<dyn Command>,
    ) -> Result<Option<Box<dyn Command>>, Skip> {
        let name = command.name().to_string();
        if let Some(option) = reserved_option(&command.definition()) {
            warn!("refusing command '{}': option '{}' is reserved", name, option);
            return Err(Skip::ReservedOption);
        }

        let previous = self.commands.insert(name.clone(), command);
        if previous.is_some() {
            debug!(command = %name, "replaced registered command");
        }
        Ok(previous)
    }

    /// Register the meta-commands and the nine built-ins.
    pub fn register_builtins(&mut self) -> &mut Self {
        for command in crate::cli::commands::builtins() {
            let name = command.name().to_string();
            if let Err(skip) = self.register(command) {
                warn!("skipping built-in '{}': {}", name, skip);
            }
        }
        self
    }

    /// Register user commands named by configuration.
    ///
    /// Explicit references are registered first, then directory
    /// discoveries. Misses are logged and skipped, never raised.
    pub fn register_from_config(
        &mut self,
        catalog: &CommandCatalog,
        config: &ResolvedConfig,
    ) -> RegistrationReport {
        let mut report = RegistrationReport::default();

        for id in &config.config.commands {
            match catalog
                .instantiate(id, config)
                .and_then(|command| self.register(command))
            {
                Ok(_) => {
                    debug!(reference = %id, "registered command reference");
                    report.registered.push(id.clone());
                }
                Err(skip) => {
                    warn!("skipping command reference '{}': {}", id, skip);
                    report.skipped.push((id.clone(), skip));
                }
            }
        }

        for (namespace, dir) in &config.config.command_dirs {
            let dir = config.cwd.join(dir);
            for candidate in discovery::find_commands_in_dir(&dir, namespace) {
                match catalog
                    .instantiate(&candidate, config)
                    .and_then(|command| self.register(command))
                {
                    Ok(_) => {
                        debug!(unit = %candidate, "registered discovered command");
                        report.registered.push(candidate);
                    }
                    Err(skip) => {
                        debug!(unit = %candidate, reason = %skip, "skipping discovered unit");
                        report.skipped.push((candidate, skip));
                    }
                }
            }
        }

        report
    }

    /// Get a command by name.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|b| b.as_ref())
    }

    /// Check if a command exists.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// All command names, sorted.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(|k| k.as_str()).collect()
    }

    /// Iterate commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.values().map(|b| b.as_ref())
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.commands.keys()).finish()
    }
}
