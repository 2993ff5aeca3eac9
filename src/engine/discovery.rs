//! engine::discovery
//!
//! Directory scanning for command units.
//!
//! A command directory holds one unit per `.rs` file, flat. Each file maps
//! to the identifier `<namespace>::<file stem>`, which is then looked up in
//! the command catalog by the registry. Scanning is non-recursive and
//! returns files in whatever order the filesystem lists them.

use std::fs;
use std::path::Path;

use tracing::debug;

/// Extension of files considered command units.
pub const UNIT_EXTENSION: &str = "rs";

/// Join a namespace prefix and a unit name.
///
/// Trailing `::` or `\` on the namespace is ignored. An empty namespace
/// yields the bare name.
///
/// # Example
///
/// ```
/// use craft_cli::engine::discovery::qualify;
///
/// assert_eq!(qualify("app::commands", "deploy"), "app::commands::deploy");
/// assert_eq!(qualify("app::commands::", "deploy"), "app::commands::deploy");
/// assert_eq!(qualify("", "deploy"), "deploy");
/// ```
pub fn qualify(namespace: &str, name: &str) -> String {
    let namespace = namespace.trim_end_matches(|c| c == ':' || c == '\\');
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}::{}", namespace, name)
    }
}

/// Candidate identifiers for every unit file in `dir`.
///
/// An unreadable or missing directory yields nothing.
pub fn find_commands_in_dir(dir: &Path, namespace: &str) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot scan command directory");
            return Vec::new();
        }
    };

    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == UNIT_EXTENSION))
        .filter_map(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(|stem| qualify(namespace, stem))
        })
        .collect()
}
