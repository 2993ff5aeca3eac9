//! install command - Copy a Craft distribution into the target path

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, FromArgMatches};

use super::copy_dir;
use crate::core::paths::TargetPaths;
use crate::engine::{Command, CommandContext};

#[derive(Args, Debug)]
struct InstallArgs {
    /// Unpacked Craft distribution to install from
    #[arg(long, value_name = "DIR")]
    from: PathBuf,

    /// Install over an existing installation
    #[arg(long)]
    force: bool,
}

/// Installs Craft into the configured target path.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstallCommand;

impl Command for InstallCommand {
    fn name(&self) -> &str {
        "install"
    }

    fn about(&self) -> &str {
        "Install Craft into the target path"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        InstallArgs::augment_args(cmd)
    }

    fn exempt_from_bootstrap(&self) -> bool {
        true
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let args = InstallArgs::from_arg_matches(ctx.matches)?;
        let source = TargetPaths::new(ctx.config.cwd.join(&args.from));
        let target = &ctx.config.paths;

        if !source.has_marker() {
            bail!(
                "'{}' does not look like a Craft distribution (missing {})",
                source.root.display(),
                source.marker_path().display()
            );
        }
        if target.has_marker() && !args.force {
            bail!(
                "Craft is already installed at {}. Use --force to install over it.",
                target.root.display()
            );
        }

        let copied = copy_dir(source.root(), target.root())?;
        ctx.output.success(format!(
            "Installed Craft to {} ({} files)",
            target.root.display(),
            copied
        ));
        Ok(0)
    }
}
