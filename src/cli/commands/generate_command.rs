//! generate-command command - Write a skeleton for a new user command
//!
//! The skeleton is a Rust source file implementing `Command`. Dropping it
//! into a configured command directory makes it discoverable once its type
//! is added to the binary's catalog under the printed identifier.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{Args, FromArgMatches};

use crate::engine::discovery::{qualify, UNIT_EXTENSION};
use crate::engine::{Command, CommandContext};

const DEFAULT_DIR: &str = "src/commands";
const DEFAULT_NAMESPACE: &str = "app::commands";

const TEMPLATE: &str = r#"//! {{name}} command - {{description}}
{{author}}
use anyhow::Result;
use craft_cli::engine::{Command, CommandContext};

/// {{description}}
#[derive(Debug, Default, Clone, Copy)]
pub struct {{type_name}};

impl Command for {{type_name}} {
    fn name(&self) -> &str {
        "{{name}}"
    }

    fn about(&self) -> &str {
        "{{description}}"
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        ctx.require_app()?;
        ctx.output.print("{{name}} ran");
        Ok(0)
    }
}
"#;

#[derive(Args, Debug)]
struct GenerateCommandArgs {
    /// Name of the new command, e.g. `cache:warm`
    name: String,

    /// One-line description
    #[arg(long, default_value = "Custom command")]
    description: String,

    /// Directory to write the file into
    #[arg(long, default_value = DEFAULT_DIR)]
    dir: PathBuf,

    /// Namespace the directory is registered under
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,
}

/// File stem for a command name: lowercase, separators folded to `_`.
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            'A'..='Z' => c.to_ascii_lowercase(),
            _ => '_',
        })
        .collect()
}

/// Type name for a command name: `cache:warm` becomes `CacheWarmCommand`.
pub fn type_name(name: &str) -> String {
    let mut out: String = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    out.push_str("Command");
    out
}

fn validate_name(name: &str) -> Result<()> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'));
    if !valid {
        bail!(
            "Invalid command name '{}': use letters, digits, '-', '_' or ':', starting with a letter",
            name
        );
    }
    Ok(())
}

fn author_line(name: &str, url: &str) -> String {
    match (name.is_empty(), url.is_empty()) {
        (true, true) => String::new(),
        (false, true) => format!("//!\n//! Author: {}\n", name),
        (true, false) => format!("//!\n//! Author: {}\n", url),
        (false, false) => format!("//!\n//! Author: {} <{}>\n", name, url),
    }
}

/// Writes a command skeleton.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenerateCommandCommand;

impl Command for GenerateCommandCommand {
    fn name(&self) -> &str {
        "generate-command"
    }

    fn about(&self) -> &str {
        "Generate a custom command skeleton"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        GenerateCommandArgs::augment_args(cmd)
    }

    fn exempt_from_bootstrap(&self) -> bool {
        true
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let args = GenerateCommandArgs::from_arg_matches(ctx.matches)?;
        validate_name(&args.name)?;

        let stem = file_stem(&args.name);
        let dir = ctx.config.cwd.join(&args.dir);
        let path = dir.join(format!("{}.{}", stem, UNIT_EXTENSION));

        if path.exists() {
            bail!("{} already exists", path.display());
        }

        let config = &ctx.config.config;
        let contents = TEMPLATE
            .replace(
                "{{author}}",
                &author_line(config.addon_author_name(), config.addon_author_url()),
            )
            .replace("{{name}}", &args.name)
            .replace("{{description}}", &args.description)
            .replace("{{type_name}}", &type_name(&args.name));

        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

        ctx.output.success(format!("Created {}", path.display()));
        ctx.output.print(format!(
            "Register it in the catalog as '{}'",
            qualify(&args.namespace, &stem)
        ));
        Ok(0)
    }
}
