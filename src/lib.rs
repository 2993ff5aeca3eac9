//! Craft CLI - A command-line companion for Craft installations
//!
//! Craft CLI is a single-binary tool that discovers user commands from
//! configuration, decides per invocation whether the Craft application must
//! be bootstrapped, and dispatches to built-in or user commands.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (entry point, root arguments, built-ins)
//! - [`engine`] - Registry, discovery, bootstrap gate and dispatch
//! - [`core`] - Configuration and path layout
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! 1. Meta-commands and exempt commands never bootstrap the application
//! 2. Bootstrap happens at most once per invocation, and only when the
//!    marker file exists
//! 3. `SERVER_NAME` is exported before any bootstrap
//! 4. Configuration problems never abort the CLI

pub mod cli;
pub mod core;
pub mod engine;
pub mod ui;
