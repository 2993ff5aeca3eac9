//! core::config::schema
//!
//! Configuration schema types.
//!
//! # File format
//!
//! ```toml
//! target_path = "craft"
//! environment = "staging"
//! commands = ["app::commands::deploy"]
//! addon_author_name = "Jane Doe"
//! addon_author_url = "https://example.com"
//!
//! [command_dirs]
//! "app::commands" = "src/commands"
//! ```
//!
//! # Leniency
//!
//! Extraction is forgiving: unknown keys are ignored and a key holding a
//! value of the wrong type is treated as absent. Nothing in here fails.
//!
//! `command_dirs` keeps the order of the file it came from, so later
//! namespaces win name clashes.

use std::path::PathBuf;

use serde::{Serialize, Serializer};
use toml::{Table, Value};

use crate::core::paths::DEFAULT_TARGET_PATH;

/// Configuration merged from all sources.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Config {
    /// Path to the Craft installation, relative to the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,

    /// Named runtime profile exported as `SERVER_NAME`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Command references, resolved through the command catalog.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,

    /// Namespace prefix to directory, scanned for command units in order.
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "as_table")]
    pub command_dirs: Vec<(String, PathBuf)>,

    /// Author name stamped into generated command skeletons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addon_author_name: Option<String>,

    /// Author URL stamped into generated command skeletons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addon_author_url: Option<String>,
}

fn as_table<S>(dirs: &[(String, PathBuf)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(dirs.iter().map(|(namespace, dir)| (namespace, dir)))
}

impl Config {
    /// Build a config from a merged table, ignoring mistyped keys.
    pub fn from_table(table: &Table) -> Self {
        let string = |key: &str| table.get(key).and_then(Value::as_str).map(str::to_string);

        let commands = table
            .get("commands")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let command_dirs = table
            .get("command_dirs")
            .and_then(Value::as_table)
            .map(|dirs| {
                dirs.iter()
                    .filter_map(|(ns, dir)| dir.as_str().map(|d| (ns.clone(), PathBuf::from(d))))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            target_path: string("target_path"),
            environment: string("environment"),
            commands,
            command_dirs,
            addon_author_name: string("addon_author_name"),
            addon_author_url: string("addon_author_url"),
        }
    }

    /// Configured environment, if non-empty.
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref().filter(|e| !e.is_empty())
    }

    /// Configured target path, or the default folder.
    pub fn target_path(&self) -> &str {
        self.target_path.as_deref().unwrap_or(DEFAULT_TARGET_PATH)
    }

    /// Author name for generated skeletons (empty if unset).
    pub fn addon_author_name(&self) -> &str {
        self.addon_author_name.as_deref().unwrap_or("")
    }

    /// Author URL for generated skeletons (empty if unset).
    pub fn addon_author_url(&self) -> &str {
        self.addon_author_url.as_deref().unwrap_or("")
    }
}
