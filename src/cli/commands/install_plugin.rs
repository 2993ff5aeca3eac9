//! install-plugin command - Copy a plugin into the installation

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::{Args, FromArgMatches};

use super::copy_dir;
use crate::engine::{Command, CommandContext};

#[derive(Args, Debug)]
struct InstallPluginArgs {
    /// Plugin directory to install
    source: PathBuf,

    /// Plugin folder name [default: source folder name, lowercased]
    #[arg(long)]
    name: Option<String>,

    /// Replace an installed plugin of the same name
    #[arg(long)]
    force: bool,
}

/// Folder name a plugin is installed under.
fn plugin_name(source: &Path, explicit: Option<String>) -> Result<String> {
    let name = match explicit {
        Some(name) => name,
        None => source
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .context("Cannot derive a plugin name from the source path; pass --name")?,
    };

    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        bail!("Invalid plugin name '{}'", name);
    }
    Ok(name)
}

/// Installs a plugin into `<target>/plugins/<name>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstallPluginCommand;

impl Command for InstallPluginCommand {
    fn name(&self) -> &str {
        "install-plugin"
    }

    fn about(&self) -> &str {
        "Install a plugin into the Craft installation"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        InstallPluginArgs::augment_args(cmd)
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let args = InstallPluginArgs::from_arg_matches(ctx.matches)?;
        let app = ctx.require_app()?;

        let source = ctx.config.cwd.join(&args.source);
        if !source.is_dir() {
            bail!("Plugin source {} is not a directory", source.display());
        }

        let name = plugin_name(&source, args.name)?;
        let dest = app.paths.plugin_dir(&name);

        if dest.exists() {
            if !args.force {
                bail!(
                    "Plugin '{}' is already installed. Use --force to replace it.",
                    name
                );
            }
            fs::remove_dir_all(&dest)
                .with_context(|| format!("Failed to remove {}", dest.display()))?;
        }

        let copied = copy_dir(&source, &dest)?;
        ctx.output
            .success(format!("Installed plugin '{}' ({} files)", name, copied));
        Ok(0)
    }
}
