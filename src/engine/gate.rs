//! engine::gate
//!
//! Bootstrap gating for command execution.
//!
//! # Architecture
//!
//! Most commands need the Craft application initialized before their body
//! runs. Gating decides, per command, whether that is the case, and if so
//! performs the initialization exactly once.
//!
//! A command skips bootstrap when:
//! - its name is one of the meta-commands (`help`, `list`), or
//! - it reports [`Command::exempt_from_bootstrap`]
//!
//! # State machine
//!
//! ```text
//! NotBootstrapped --ensure_bootstrapped (marker present)--> Bootstrapped
//! ```
//!
//! There is no reverse transition. State lives in the [`BootstrapGate`]
//! owned by the application, never in a global.
//!
//! # Invariants
//!
//! - The bootstrapper never runs when the marker file is missing
//! - Once bootstrap succeeds the bootstrapper never runs again
//! - Exempt commands never change the state
//!
//! # Example
//!
//! ```ignore
//! let mut gate = BootstrapGate::new(paths, "staging".into(), Box::new(CraftBootstrapper));
//!
//! if gate.should_bootstrap(command) {
//!     gate.ensure_bootstrapped()?;
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use super::command::Command;
use crate::core::paths::TargetPaths;

/// Commands that never require bootstrap, by name.
pub const META_COMMANDS: &[&str] = &["help", "list"];

/// Errors from bootstrapping the application.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Your craft path could not be found. Expected '{}'.", marker.display())]
    TargetNotFound { marker: PathBuf },

    #[error("failed to bootstrap the application at '{}': {message}", root.display())]
    Failed { root: PathBuf, message: String },
}

/// Handle to an initialized Craft application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppHandle {
    /// Canonical root of the installation.
    pub root: PathBuf,
    /// Environment the application was started in.
    pub environment: String,
    /// Path layout of the installation.
    pub paths: TargetPaths,
}

/// Opaque initialization of the external application.
///
/// Called only after the marker file has been found.
pub trait Bootstrapper {
    /// Initialize the application.
    fn bootstrap(
        &mut self,
        paths: &TargetPaths,
        environment: &str,
    ) -> Result<AppHandle, BootstrapError>;
}

/// Default bootstrapper for a Craft installation on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct CraftBootstrapper;

impl Bootstrapper for CraftBootstrapper {
    fn bootstrap(
        &mut self,
        paths: &TargetPaths,
        environment: &str,
    ) -> Result<AppHandle, BootstrapError> {
        let root = paths
            .root()
            .canonicalize()
            .map_err(|e| BootstrapError::Failed {
                root: paths.root.clone(),
                message: e.to_string(),
            })?;

        Ok(AppHandle {
            paths: TargetPaths::new(root.clone()),
            root,
            environment: environment.to_string(),
        })
    }
}

/// Bootstrap lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    /// The application has not been initialized.
    NotBootstrapped,
    /// The application is initialized.
    Bootstrapped,
}

/// Check whether a command must run against a bootstrapped application.
pub fn should_bootstrap(command: &dyn Command) -> bool {
    if META_COMMANDS.iter().any(|meta| *meta == command.name()) {
        return false;
    }
    !command.exempt_from_bootstrap()
}

/// Decides on and performs application bootstrap.
pub struct BootstrapGate {
    paths: TargetPaths,
    environment: String,
    bootstrapper: Box<dyn Bootstrapper>,
    app: Option<AppHandle>,
}

impl BootstrapGate {
    /// Create a gate for the given installation and environment.
    pub fn new(
        paths: TargetPaths,
        environment: String,
        bootstrapper: Box<dyn Bootstrapper>,
    ) -> Self {
        Self {
            paths,
            environment,
            bootstrapper,
            app: None,
        }
    }

    /// See [`should_bootstrap`].
    pub fn should_bootstrap(&self, command: &dyn Command) -> bool {
        should_bootstrap(command)
    }

    /// Whether the marker file is present.
    pub fn can_be_bootstrapped(&self) -> bool {
        self.paths.has_marker()
    }

    /// Bootstrap the application if it has not been already.
    ///
    /// # Errors
    ///
    /// - [`BootstrapError::TargetNotFound`] if the marker file is missing
    /// - any error from the bootstrapper itself
    pub fn ensure_bootstrapped(&mut self) -> Result<&AppHandle, BootstrapError> {
        let handle = match self.app.take() {
            Some(handle) => handle,
            None => {
                if !self.can_be_bootstrapped() {
                    return Err(BootstrapError::TargetNotFound {
                        marker: self.paths.marker_path(),
                    });
                }

                debug!(
                    root = %self.paths.root.display(),
                    environment = %self.environment,
                    "bootstrapping"
                );
                self.bootstrapper.bootstrap(&self.paths, &self.environment)?
            }
        };

        let handle: &AppHandle = self.app.insert(handle);
        Ok(handle)
    }

    /// Current state.
    pub fn state(&self) -> BootstrapState {
        if self.app.is_some() {
            BootstrapState::Bootstrapped
        } else {
            BootstrapState::NotBootstrapped
        }
    }

    /// Check if bootstrap has happened.
    pub fn is_bootstrapped(&self) -> bool {
        self.app.is_some()
    }

    /// The bootstrapped application, if any.
    pub fn app(&self) -> Option<&AppHandle> {
        self.app.as_ref()
    }
}
