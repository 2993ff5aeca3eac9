//! cli::commands
//!
//! Built-in commands.
//!
//! # Architecture
//!
//! Each built-in is a unit struct implementing [`Command`], with its
//! arguments declared as a `clap::Args` struct and merged into the command
//! definition in `configure`. Handlers:
//! 1. Parse their arguments from the dispatcher's matches
//! 2. Work against the resolved configuration or bootstrapped application
//! 3. Write results through the shared output
//!
//! Built-ins are registered by name on every run and are also available in
//! the catalog under `craft_cli::commands::<name>`, so configuration can
//! re-register or reference them like any user command.

mod clear_cache;
mod console;
mod db_backup;
mod generate_command;
mod init;
mod install;
mod install_plugin;
mod meta;
mod show_config;
mod tail;

pub use clear_cache::ClearCacheCommand;
pub use console::ConsoleCommand;
pub use db_backup::DbBackupCommand;
pub use generate_command::GenerateCommandCommand;
pub use init::InitCommand;
pub use install::InstallCommand;
pub use install_plugin::InstallPluginCommand;
pub use meta::{HelpCommand, ListCommand};
pub use show_config::ShowConfigCommand;
pub use tail::TailCommand;

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use walkdir::WalkDir;

use crate::engine::discovery::qualify;
use crate::engine::registry::CommandCatalog;
use crate::engine::Command;

/// Catalog namespace of the built-in commands.
pub const CATALOG_NAMESPACE: &str = "craft_cli::commands";

/// Fresh instances of the meta-commands followed by the built-ins.
pub fn builtins() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(HelpCommand),
        Box::new(ListCommand),
        Box::new(InitCommand),
        Box::new(ConsoleCommand),
        Box::new(ShowConfigCommand),
        Box::new(GenerateCommandCommand),
        Box::new(DbBackupCommand),
        Box::new(InstallCommand),
        Box::new(InstallPluginCommand),
        Box::new(ClearCacheCommand),
        Box::new(TailCommand),
    ]
}

/// Add every built-in to `catalog` under [`CATALOG_NAMESPACE`].
pub fn catalog_builtins(catalog: &mut CommandCatalog) {
    let id = |name: &str| qualify(CATALOG_NAMESPACE, name);

    catalog
        .register::<HelpCommand>(id("help"))
        .register::<ListCommand>(id("list"))
        .register::<InitCommand>(id("init"))
        .register::<ConsoleCommand>(id("console"))
        .register::<ShowConfigCommand>(id("show_config"))
        .register::<GenerateCommandCommand>(id("generate_command"))
        .register::<DbBackupCommand>(id("db_backup"))
        .register::<InstallCommand>(id("install"))
        .register::<InstallPluginCommand>(id("install_plugin"))
        .register::<ClearCacheCommand>(id("clear_cache"))
        .register::<TailCommand>(id("tail"));
}

/// Recursively copy the contents of `src` into `dst`.
///
/// Returns the number of files copied. Existing files are overwritten.
pub(crate) fn copy_dir(src: &Path, dst: &Path) -> Result<u64> {
    let mut copied = 0;

    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.with_context(|| format!("Failed to read {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .context("Walked outside the source directory")?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}
