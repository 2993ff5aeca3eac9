//! core::config
//!
//! Configuration discovery, merging, and environment resolution.
//!
//! # Overview
//!
//! craft-cli reads `.craft-cli.toml` from two places:
//! - **Home**: `<HOME>/.craft-cli.toml`
//! - **Local**: the nearest `.craft-cli.toml` found by walking up from the
//!   working directory
//!
//! # Precedence
//!
//! Sources are merged in this order (later overrides earlier):
//! 1. Defaults (empty)
//! 2. Home file
//! 3. Local file
//!
//! The merge is shallow: a top-level key present in a later source replaces
//! the earlier value wholesale. `commands` and `command_dirs` are never
//! merged element-wise.
//!
//! # Leniency
//!
//! A file that cannot be read or parsed contributes nothing. The failure is
//! logged and loading carries on.
//!
//! # Example
//!
//! ```no_run
//! use craft_cli::core::config::ConfigResolver;
//!
//! let resolver = ConfigResolver::from_env().unwrap();
//! let loaded = resolver.load();
//! println!("target: {}", loaded.config.target_path());
//! for source in &loaded.sources {
//!     println!("loaded {}", source.display());
//! }
//! ```

pub mod schema;

pub use schema::Config;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml::Table;
use tracing::{debug, warn};

use crate::core::paths::TargetPaths;

/// Name of the configuration file in both locations.
pub const CONFIG_FILENAME: &str = ".craft-cli.toml";

/// Process-visible variable consumed by the application bootstrap.
pub const ENVIRONMENT_VAR: &str = "SERVER_NAME";

/// Environment used when nothing else resolves.
pub const DEFAULT_ENVIRONMENT: &str = "localhost";

/// Errors from reading a configuration source.
///
/// These never abort loading; [`ConfigResolver::load`] logs and skips them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Result of loading configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadResult {
    /// The merged configuration.
    pub config: Config,
    /// Files that contributed keys, in merge order.
    pub sources: Vec<PathBuf>,
}

/// Locates and merges configuration files.
///
/// Inputs are explicit so tests can point the resolver at scratch
/// directories instead of the real home and working directory.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    home: Option<PathBuf>,
    cwd: PathBuf,
}

impl ConfigResolver {
    /// Create a resolver for the given home and working directories.
    pub fn new(home: Option<PathBuf>, cwd: PathBuf) -> Self {
        Self { home, cwd }
    }

    /// Create a resolver from the process home and working directory.
    pub fn from_env() -> std::io::Result<Self> {
        Ok(Self::new(dirs::home_dir(), std::env::current_dir()?))
    }

    /// The working directory the upward walk starts from.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Path of the home config file, if it exists.
    pub fn home_config_path(&self) -> Option<PathBuf> {
        let path = self.home.as_ref()?.join(CONFIG_FILENAME);
        path.is_file().then_some(path)
    }

    /// Path of the nearest config file at or above the working directory.
    pub fn local_config_path(&self) -> Option<PathBuf> {
        find_upward(&self.cwd, CONFIG_FILENAME)
    }

    /// Load and merge all configuration sources.
    ///
    /// Never fails: unreadable or malformed files are skipped.
    pub fn load(&self) -> ConfigLoadResult {
        let mut merged = Table::new();
        let mut sources = Vec::new();

        let candidates = [self.home_config_path(), self.local_config_path()];
        for path in candidates.into_iter().flatten() {
            match read_table(&path) {
                Ok(table) => {
                    debug!(path = %path.display(), keys = table.len(), "loaded config source");
                    merge_shallow(&mut merged, table);
                    sources.push(path);
                }
                Err(e) => warn!("ignoring config source: {}", e),
            }
        }

        ConfigLoadResult {
            config: Config::from_table(&merged),
            sources,
        }
    }

    /// Load configuration and resolve the target path and environment.
    ///
    /// `cli_environment` is the value of `--environment`, used only when
    /// the configuration does not name an environment.
    pub fn resolve(&self, cli_environment: Option<&str>) -> ResolvedConfig {
        let loaded = self.load();
        let paths = TargetPaths::resolve(&self.cwd, loaded.config.target_path());
        let environment = loaded
            .config
            .environment()
            .or(cli_environment.filter(|e| !e.is_empty()))
            .map(str::to_string);

        ResolvedConfig {
            config: loaded.config,
            sources: loaded.sources,
            environment,
            paths,
            cwd: self.cwd.clone(),
        }
    }
}

/// Configuration after environment and target resolution.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Merged configuration.
    pub config: Config,
    /// Files that contributed keys, in merge order.
    pub sources: Vec<PathBuf>,
    /// Environment from config or `--environment`, if any.
    pub environment: Option<String>,
    /// Paths inside the Craft installation.
    pub paths: TargetPaths,
    /// Working directory at resolution time.
    pub cwd: PathBuf,
}

impl ResolvedConfig {
    /// Root of the Craft installation.
    pub fn target_path(&self) -> &Path {
        self.paths.root()
    }

    /// Name of the Craft installation folder.
    pub fn target_folder(&self) -> String {
        self.paths.folder_name()
    }

    /// Export the environment to [`ENVIRONMENT_VAR`] and return its value.
    pub fn export_environment(&self) -> String {
        let existing = std::env::var(ENVIRONMENT_VAR).ok();
        let value = choose_environment(self.environment.as_deref(), existing);
        std::env::set_var(ENVIRONMENT_VAR, &value);
        debug!(environment = %value, "exported {}", ENVIRONMENT_VAR);
        value
    }
}

/// Pick the environment value to export.
///
/// A resolved environment always wins. Otherwise an already-set variable
/// is kept, falling back to [`DEFAULT_ENVIRONMENT`].
pub fn choose_environment(resolved: Option<&str>, existing: Option<String>) -> String {
    match resolved {
        Some(env) => env.to_string(),
        None => existing.unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
    }
}

/// Merge `overlay` over `base`, replacing top-level keys wholesale.
pub fn merge_shallow(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        base.insert(key, value);
    }
}

/// Walk up from `start` looking for `filename`.
///
/// Stops at the first match or if a directory is seen twice. The
/// filesystem root itself is never searched.
pub fn find_upward(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut visited = HashSet::new();
    let mut dir = start;

    while let Some(parent) = dir.parent() {
        if !visited.insert(dir.to_path_buf()) {
            break;
        }

        let candidate = dir.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }

        dir = parent;
    }

    None
}

/// Read a config file as a TOML table.
fn read_table(path: &Path) -> Result<Table, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str::<Table>(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
