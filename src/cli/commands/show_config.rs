//! show-config command - Print the merged configuration

use anyhow::{bail, Context as _, Result};
use clap::{Args, FromArgMatches};

use crate::engine::{Command, CommandContext};

#[derive(Args, Debug)]
struct ShowConfigArgs {
    /// Print only this key
    key: Option<String>,

    /// Print as JSON instead of TOML
    #[arg(long)]
    json: bool,
}

/// Value in effect for a key that no file sets.
fn effective(ctx: &CommandContext<'_>, key: &str) -> Option<String> {
    match key {
        "target_path" => Some(ctx.config.config.target_path().to_string()),
        "environment" => Some(ctx.environment.to_string()),
        _ => None,
    }
}

/// Prints the configuration after merging every source.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShowConfigCommand;

impl Command for ShowConfigCommand {
    fn name(&self) -> &str {
        "show-config"
    }

    fn about(&self) -> &str {
        "Display the merged Craft CLI configuration"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        ShowConfigArgs::augment_args(cmd)
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let args = ShowConfigArgs::from_arg_matches(ctx.matches)?;
        let config = &ctx.config.config;

        if args.json {
            let value = serde_json::to_value(config).context("Failed to serialize config")?;
            let value = match args.key.as_deref() {
                Some(key) => match (value.get(key), effective(ctx, key)) {
                    (Some(v), _) => v.clone(),
                    (None, Some(fallback)) => serde_json::Value::String(fallback),
                    (None, None) => bail!("Unknown configuration key: {}", key),
                },
                None => value,
            };
            ctx.output.data(serde_json::to_string_pretty(&value)?);
            return Ok(0);
        }

        match args.key.as_deref() {
            Some(key) => {
                let value = toml::Value::try_from(config).context("Failed to serialize config")?;
                match (value.get(key), effective(ctx, key)) {
                    (Some(toml::Value::String(s)), _) => ctx.output.data(s),
                    (Some(other), _) => ctx.output.data(other),
                    (None, Some(fallback)) => ctx.output.data(fallback),
                    (None, None) => bail!("Unknown configuration key: {}", key),
                }
            }
            None => {
                for source in &ctx.config.sources {
                    ctx.output.print(format!("# {}", source.display()));
                }
                ctx.output
                    .print(format!("# environment: {}", ctx.environment));
                ctx.output
                    .print(format!("# target: {}", ctx.config.target_path().display()));

                let body = toml::to_string_pretty(config).context("Failed to serialize config")?;
                ctx.output.data(body.trim_end());
            }
        }

        Ok(0)
    }
}
