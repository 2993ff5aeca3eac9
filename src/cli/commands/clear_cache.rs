//! clear-cache command - Empty Craft's runtime caches

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use clap::{Args, FromArgMatches};
use tracing::debug;

use crate::engine::{Command, CommandContext};

#[derive(Args, Debug)]
struct ClearCacheArgs {
    /// Also clear compiled templates and state
    #[arg(long)]
    all: bool,
}

/// Remove everything inside `dir`, keeping the directory itself.
///
/// Returns the number of top-level entries removed. A missing directory
/// counts as already empty.
fn empty_dir(dir: &Path) -> Result<usize> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "cache directory absent");
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.with_context(|| format!("Failed to remove {}", path.display()))?;
        removed += 1;
    }
    Ok(removed)
}

/// Clears the runtime cache directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClearCacheCommand;

impl Command for ClearCacheCommand {
    fn name(&self) -> &str {
        "clear-cache"
    }

    fn about(&self) -> &str {
        "Clear the Craft cache"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        ClearCacheArgs::augment_args(cmd)
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let args = ClearCacheArgs::from_arg_matches(ctx.matches)?;
        let app = ctx.require_app()?;

        let dirs = if args.all {
            app.paths.all_cache_dirs()
        } else {
            vec![app.paths.cache_dir()]
        };

        for dir in dirs {
            let removed = empty_dir(&dir)?;
            ctx.output
                .print(format!("Cleared {} entries from {}", removed, dir.display()));
        }

        ctx.output.success("Cache cleared.");
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::testing::Fixture;

    fn seed(dir: &Path) {
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("a.bin"), "x").unwrap();
        fs::write(dir.join("nested/b.bin"), "y").unwrap();
    }

    #[test]
    fn clears_cache_only_by_default() {
        let fixture = Fixture::new();
        fixture.install_marker();
        let dirs = fixture.paths().all_cache_dirs();
        for dir in &dirs {
            seed(dir);
        }

        let (result, out) = fixture.run(&ClearCacheCommand, &[]);

        assert_eq!(result.unwrap(), 0);
        assert!(out.contains("Cleared 2 entries"));
        assert!(dirs[0].is_dir());
        assert_eq!(fs::read_dir(&dirs[0]).unwrap().count(), 0);
        assert!(dirs[1].join("a.bin").exists());
    }

    #[test]
    fn all_clears_every_runtime_dir() {
        let fixture = Fixture::new();
        fixture.install_marker();
        let dirs = fixture.paths().all_cache_dirs();
        for dir in &dirs {
            seed(dir);
        }

        let (result, _) = fixture.run(&ClearCacheCommand, &["--all"]);

        assert_eq!(result.unwrap(), 0);
        for dir in &dirs {
            assert_eq!(fs::read_dir(dir).unwrap().count(), 0);
        }
    }

    #[test]
    fn missing_dirs_are_fine() {
        let fixture = Fixture::new();
        fixture.install_marker();

        let (result, out) = fixture.run(&ClearCacheCommand, &["--all"]);
        assert_eq!(result.unwrap(), 0);
        assert!(out.contains("Cleared 0 entries"));
    }
}
