//! tail command - Show the end of the Craft log

use std::fs;

use anyhow::{bail, Context as _, Result};
use clap::{Args, FromArgMatches};

use crate::engine::{Command, CommandContext};

#[derive(Args, Debug)]
struct TailArgs {
    /// Number of lines to show
    #[arg(short = 'n', long, default_value_t = 20)]
    lines: usize,
}

/// The last `count` lines of `text`.
fn last_lines(text: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].to_vec()
}

/// Prints the tail of `craft.log`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TailCommand;

impl Command for TailCommand {
    fn name(&self) -> &str {
        "tail"
    }

    fn about(&self) -> &str {
        "Display the last lines of the Craft log file"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        TailArgs::augment_args(cmd)
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let args = TailArgs::from_arg_matches(ctx.matches)?;
        let log = ctx.require_app()?.paths.log_path();

        if !log.is_file() {
            bail!("No log file found at {}", log.display());
        }

        let bytes = fs::read(&log).with_context(|| format!("Failed to read {}", log.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        for line in last_lines(&text, args.lines) {
            ctx.output.data(line);
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::testing::Fixture;

    #[test]
    fn last_lines_bounds() {
        assert_eq!(last_lines("a\nb\nc\n", 2), vec!["b", "c"]);
        assert_eq!(last_lines("a\nb", 10), vec!["a", "b"]);
        assert!(last_lines("a\nb", 0).is_empty());
        assert!(last_lines("", 5).is_empty());
    }

    #[test]
    fn prints_the_tail() {
        let fixture = Fixture::new();
        fixture.install_marker();
        let log = fixture.paths().log_path();
        fs::create_dir_all(log.parent().unwrap()).unwrap();
        let body: String = (1..=30).map(|i| format!("line {}\n", i)).collect();
        fs::write(&log, body).unwrap();

        let (result, out) = fixture.run(&TailCommand, &[]);
        assert_eq!(result.unwrap(), 0);
        assert_eq!(out.lines().count(), 20);
        assert!(out.starts_with("line 11\n"));

        let (_, out) = fixture.run(&TailCommand, &["-n", "3"]);
        assert_eq!(out, "line 28\nline 29\nline 30\n");
    }

    #[test]
    fn missing_log_fails() {
        let fixture = Fixture::new();
        fixture.install_marker();

        let (result, _) = fixture.run(&TailCommand, &[]);
        assert!(result.unwrap_err().to_string().contains("No log file"));
    }
}
