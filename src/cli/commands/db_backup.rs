//! db-backup command - Dump the Craft database with mysqldump

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context as _, Result};
use chrono::{DateTime, Local};
use clap::{Args, FromArgMatches};
use tracing::debug;

use crate::engine::{Command, CommandContext};

/// Dump program.
pub const MYSQLDUMP: &str = "mysqldump";

#[derive(Args, Debug)]
struct DbBackupArgs {
    /// Directory to write the dump into [default: <target>/storage/backups]
    #[arg(long)]
    path: Option<PathBuf>,

    /// Database name
    #[arg(long)]
    database: String,

    /// Database user
    #[arg(long, default_value = "root")]
    user: String,

    /// Database host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Prompt for the database password
    #[arg(long)]
    password: bool,
}

/// Everything needed to run one dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpPlan {
    pub database: String,
    pub user: String,
    pub host: String,
    pub password: Option<String>,
    pub file: PathBuf,
}

impl DumpPlan {
    /// The `mysqldump` invocation for this plan.
    ///
    /// The password travels in `MYSQL_PWD` rather than on the command line.
    pub fn command(&self) -> process::Command {
        let mut cmd = process::Command::new(MYSQLDUMP);
        cmd.arg(format!("--host={}", self.host))
            .arg(format!("--user={}", self.user))
            .arg(format!("--result-file={}", self.file.display()))
            .arg(&self.database);
        if let Some(password) = &self.password {
            cmd.env("MYSQL_PWD", password);
        }
        cmd
    }
}

/// `<database>_<YYYYmmdd_HHMMSS>.sql`
pub fn backup_file_name(database: &str, at: DateTime<Local>) -> String {
    format!("{}_{}.sql", database, at.format("%Y%m%d_%H%M%S"))
}

fn backup_dir(explicit: Option<PathBuf>, cwd: &Path, default: PathBuf) -> PathBuf {
    match explicit {
        Some(dir) => cwd.join(dir),
        None => default,
    }
}

/// Backs up the database to a timestamped SQL file.
#[derive(Debug, Default, Clone, Copy)]
pub struct DbBackupCommand;

impl Command for DbBackupCommand {
    fn name(&self) -> &str {
        "db-backup"
    }

    fn about(&self) -> &str {
        "Backup the Craft database"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        DbBackupArgs::augment_args(cmd)
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let args = DbBackupArgs::from_arg_matches(ctx.matches)?;
        let app = ctx.require_app()?;

        let dir = backup_dir(args.path, &ctx.config.cwd, app.paths.backups_dir());
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        let password = if args.password {
            write!(ctx.output.stderr(), "Database password: ")?;
            ctx.output.flush();
            Some(rpassword::read_password().context("Failed to read password")?)
        } else {
            None
        };

        let plan = DumpPlan {
            file: dir.join(backup_file_name(&args.database, Local::now())),
            database: args.database,
            user: args.user,
            host: args.host,
            password,
        };

        debug!(file = %plan.file.display(), database = %plan.database, "running mysqldump");
        let status = plan
            .command()
            .status()
            .with_context(|| format!("Failed to run {}", MYSQLDUMP))?;

        if !status.success() {
            bail!("{} exited with {}", MYSQLDUMP, status);
        }

        ctx.output
            .success(format!("Backed up {} to {}", plan.database, plan.file.display()));
        Ok(0)
    }
}
