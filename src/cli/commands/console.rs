//! console command - Open a shell inside the Craft installation

use std::process;

use anyhow::{Context as _, Result};
use clap::{Args, FromArgMatches};
use tracing::debug;

use crate::core::config::ENVIRONMENT_VAR;
use crate::engine::{Command, CommandContext};

/// Shell used when neither `--shell` nor `$SHELL` is set.
pub const FALLBACK_SHELL: &str = "sh";

#[derive(Args, Debug)]
struct ConsoleArgs {
    /// Program to start instead of $SHELL
    #[arg(long)]
    shell: Option<String>,
}

/// Pick the shell program.
fn resolve_shell(explicit: Option<String>, env_shell: Option<String>) -> String {
    explicit
        .or(env_shell)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_SHELL.to_string())
}

/// Starts an interactive shell rooted at the installation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleCommand;

impl Command for ConsoleCommand {
    fn name(&self) -> &str {
        "console"
    }

    fn about(&self) -> &str {
        "Start an interactive shell in the Craft installation"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        ConsoleArgs::augment_args(cmd)
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let args = ConsoleArgs::from_arg_matches(ctx.matches)?;
        let app = ctx.require_app()?;
        let shell = resolve_shell(args.shell, std::env::var("SHELL").ok());

        debug!(shell = %shell, root = %app.root.display(), "starting console");
        ctx.output.flush();

        let status = process::Command::new(&shell)
            .current_dir(&app.root)
            .env(ENVIRONMENT_VAR, ctx.environment)
            .status()
            .with_context(|| format!("Failed to start {}", shell))?;

        Ok(status.code().unwrap_or(1))
    }
}
