//! init command - Create a starter configuration file

use std::fs;

use anyhow::{bail, Context as _, Result};
use clap::{Args, FromArgMatches};

use crate::core::config::CONFIG_FILENAME;
use crate::core::paths::DEFAULT_TARGET_PATH;
use crate::engine::{Command, CommandContext};

const TEMPLATE: &str = r#"# Craft CLI configuration
#
# Keys in this file override the same keys in ~/.craft-cli.toml.

# Path to the Craft installation, relative to this directory.
target_path = "{target_path}"

# Environment exported as SERVER_NAME. Overrides --environment.
# environment = "localhost"

# Commands registered by catalog identifier.
# commands = ["app::commands::deploy"]

# Author stamped into skeletons written by generate-command.
# addon_author_name = ""
# addon_author_url = ""

# Directories scanned for command units, keyed by namespace.
# [command_dirs]
# "app::commands" = "src/commands"
"#;

#[derive(Args, Debug)]
struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    force: bool,
}

/// Writes `.craft-cli.toml` into the working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct InitCommand;

impl Command for InitCommand {
    fn name(&self) -> &str {
        "init"
    }

    fn about(&self) -> &str {
        "Create a .craft-cli.toml config file in the current directory"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        InitArgs::augment_args(cmd)
    }

    fn exempt_from_bootstrap(&self) -> bool {
        true
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let args = InitArgs::from_arg_matches(ctx.matches)?;
        let path = ctx.config.cwd.join(CONFIG_FILENAME);

        if path.exists() && !args.force {
            bail!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            );
        }

        let contents = TEMPLATE.replace("{target_path}", DEFAULT_TARGET_PATH);
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        ctx.output.success(format!("Created {}", path.display()));
        Ok(0)
    }
}
