//! help and list commands - Describe the available commands
//!
//! Both are exempt from bootstrap by name, so they work in a directory
//! with no Craft installation.

use anyhow::{anyhow, Result};
use clap::{Args, FromArgMatches};

use crate::cli::args::{BIN_NAME, NAME, VERSION};
use crate::engine::{Command, CommandContext};

#[derive(Args, Debug)]
struct HelpArgs {
    /// The command name
    #[arg(value_name = "COMMAND")]
    command_name: Option<String>,
}

/// Displays help for a command.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn about(&self) -> &str {
        "Displays help for a command"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        HelpArgs::augment_args(cmd)
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let args = HelpArgs::from_arg_matches(ctx.matches)?;

        let mut cli = ctx.cli.clone();
        cli.build();

        let help = match args.command_name.as_deref() {
            Some(name) => cli
                .find_subcommand_mut(name)
                .ok_or_else(|| anyhow!("Command \"{}\" is not defined.", name))?
                .render_help(),
            None => cli.render_help(),
        };

        ctx.output.print(help);
        Ok(0)
    }
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Output command names and descriptions without decoration
    #[arg(long)]
    raw: bool,
}

/// Lists commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListCommand;

impl Command for ListCommand {
    fn name(&self) -> &str {
        "list"
    }

    fn about(&self) -> &str {
        "Lists commands"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        ListArgs::augment_args(cmd)
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let args = ListArgs::from_arg_matches(ctx.matches)?;

        let rows: Vec<(String, String)> = ctx
            .cli
            .get_subcommands()
            .map(|sub| {
                let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
                (sub.get_name().to_string(), about)
            })
            .collect();
        let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

        if !args.raw {
            ctx.output.print(format!("{} {}", NAME, VERSION));
            ctx.output.print("");
            ctx.output.print("Usage:");
            ctx.output
                .print(format!("  {} <command> [options] [arguments]", BIN_NAME));
            ctx.output.print("");
            ctx.output.print("Available commands:");
        }

        let indent = if args.raw { "" } else { "  " };
        for (name, about) in rows {
            let line = format!("{}{:<width$}  {}", indent, name, about, width = width);
            ctx.output.print(line.trim_end());
        }

        Ok(0)
    }
}
