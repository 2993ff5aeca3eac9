//! core::paths
//!
//! Centralized path routing for the Craft installation ("target path").
//!
//! # Architecture
//!
//! Every location inside the external application that craft-cli touches
//! is computed here, relative to the resolved target path:
//! - `app/Craft.php` - the bootstrap marker
//! - `plugins/` - installed plugins
//! - `storage/runtime/cache`, `storage/runtime/logs` - runtime state
//! - `storage/backups` - database dumps
//!
//! **Hard rule:** commands never hand-build paths under the target root.
//! All paths go through `TargetPaths`.
//!
//! # Example
//!
//! ```
//! use craft_cli::core::paths::TargetPaths;
//! use std::path::PathBuf;
//!
//! let paths = TargetPaths::new(PathBuf::from("/site/craft"));
//!
//! assert_eq!(
//!     paths.marker_path(),
//!     PathBuf::from("/site/craft/app/Craft.php")
//! );
//! ```

use std::path::{Path, PathBuf};

/// Default target folder, relative to the working directory.
pub const DEFAULT_TARGET_PATH: &str = "craft";

/// Directory under the target root holding the application sources.
pub const APP_DIR: &str = "app";

/// File whose presence proves a usable installation.
pub const ENTRYPOINT_MARKER: &str = "Craft.php";

/// Path routing for a Craft installation.
///
/// # Invariants
///
/// - `root` is already resolved against the working directory
/// - No code outside this module joins paths onto `root`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPaths {
    /// Root of the installation.
    pub root: PathBuf,
}

impl TargetPaths {
    /// Create paths for an installation rooted at `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve a configured target path against a working directory.
    ///
    /// Absolute paths are kept as-is.
    ///
    /// # Example
    ///
    /// ```
    /// use craft_cli::core::paths::TargetPaths;
    /// use std::path::{Path, PathBuf};
    ///
    /// let paths = TargetPaths::resolve(Path::new("/site"), "craft");
    /// assert_eq!(paths.root, PathBuf::from("/site/craft"));
    ///
    /// let paths = TargetPaths::resolve(Path::new("/site"), "/opt/craft");
    /// assert_eq!(paths.root, PathBuf::from("/opt/craft"));
    /// ```
    pub fn resolve(cwd: &Path, target: &str) -> Self {
        Self::new(cwd.join(target))
    }

    /// Get the root as a Path reference.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the target folder (last path component).
    pub fn folder_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    // =========================================================================
    // Application layout
    // =========================================================================

    /// `<root>/app`
    pub fn app_dir(&self) -> PathBuf {
        self.root.join(APP_DIR)
    }

    /// `<root>/app/Craft.php`
    pub fn marker_path(&self) -> PathBuf {
        self.app_dir().join(ENTRYPOINT_MARKER)
    }

    /// Check whether the bootstrap marker exists.
    pub fn has_marker(&self) -> bool {
        self.marker_path().is_file()
    }

    /// `<root>/plugins`
    pub fn plugins_dir(&self) -> PathBuf {
        self.root.join("plugins")
    }

    /// `<root>/plugins/<name>`
    pub fn plugin_dir(&self, name: &str) -> PathBuf {
        self.plugins_dir().join(name)
    }

    // =========================================================================
    // Storage layout
    // =========================================================================

    /// `<root>/storage`
    pub fn storage_dir(&self) -> PathBuf {
        self.root.join("storage")
    }

    /// `<root>/storage/runtime`
    pub fn runtime_dir(&self) -> PathBuf {
        self.storage_dir().join("runtime")
    }

    /// `<root>/storage/runtime/cache`
    pub fn cache_dir(&self) -> PathBuf {
        self.runtime_dir().join("cache")
    }

    /// Runtime directories cleared by `clear-cache --all`.
    pub fn all_cache_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.cache_dir(),
            self.runtime_dir().join("compiled_templates"),
            self.runtime_dir().join("state"),
        ]
    }

    /// `<root>/storage/runtime/logs/craft.log`
    pub fn log_path(&self) -> PathBuf {
        self.runtime_dir().join("logs").join("craft.log")
    }

    /// `<root>/storage/backups`
    pub fn backups_dir(&self) -> PathBuf {
        self.storage_dir().join("backups")
    }
}
