//! core
//!
//! Configuration and path layout for Craft CLI.
//!
//! # Modules
//!
//! - [`config`] - Configuration schema, discovery and resolution
//! - [`paths`] - Centralized path routing inside a Craft installation
//!
//! # Design Principles
//!
//! - Loading never fails; bad sources are skipped and logged
//! - Every input (home, working directory) is injectable for tests

pub mod config;
pub mod paths;
