//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output sink and formatting
//!
//! # Design
//!
//! All user-facing text flows through this module so quiet mode is honored
//! uniformly and output can be captured in tests. Diagnostics go to
//! `tracing` instead.

pub mod output;

pub use output::{Output, OutputBuffer, Verbosity};
