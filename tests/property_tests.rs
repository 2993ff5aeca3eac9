//! Property-based tests for configuration and argument handling.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::BTreeMap;
use std::fs;

use proptest::prelude::*;
use tempfile::TempDir;
use toml::{Table, Value};

use craft_cli::cli::args::environment_option;
use craft_cli::core::config::{find_upward, merge_shallow, CONFIG_FILENAME};
use craft_cli::engine::discovery::qualify;

/// Strategy for config-like keys.
fn key() -> impl Strategy<Value = String> {
    "[a-z_]{1,8}"
}

/// Strategy for small TOML tables with scalar or array values.
fn table() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map(key(), any::<i64>(), 0..8)
}

fn to_table(map: &BTreeMap<String, i64>) -> Table {
    map.iter()
        .map(|(k, v)| (k.clone(), Value::Integer(*v)))
        .collect()
}

/// Strategy for environment names.
fn environment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,10}"
}

/// Strategy for arguments that are not the environment option.
fn other_arg() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("tail".to_string()),
        Just("-q".to_string()),
        Just("--json".to_string()),
        Just("--database".to_string()),
        "[a-z]{1,6}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Overlay keys win, base-only keys survive, nothing else appears.
    #[test]
    fn shallow_merge_is_key_union_with_overlay_priority(base in table(), overlay in table()) {
        let mut merged = to_table(&base);
        merge_shallow(&mut merged, to_table(&overlay));

        for (k, v) in &overlay {
            prop_assert_eq!(merged.get(k), Some(&Value::Integer(*v)));
        }
        for (k, v) in &base {
            if !overlay.contains_key(k) {
                prop_assert_eq!(merged.get(k), Some(&Value::Integer(*v)));
            }
        }
        for k in merged.keys() {
            prop_assert!(base.contains_key(k) || overlay.contains_key(k));
        }
    }

    /// Nested tables are replaced wholesale, never merged.
    #[test]
    fn shallow_merge_replaces_nested_tables(
        base in table(),
        overlay in table(),
    ) {
        let mut merged = Table::new();
        merged.insert("command_dirs".into(), Value::Table(to_table(&base)));
        let mut top = Table::new();
        top.insert("command_dirs".into(), Value::Table(to_table(&overlay)));

        merge_shallow(&mut merged, top);

        prop_assert_eq!(
            merged.get("command_dirs"),
            Some(&Value::Table(to_table(&overlay)))
        );
    }

    /// The upward walk finds the nearest config at or above the start and
    /// terminates when there is none.
    #[test]
    fn upward_walk_finds_nearest_config(depth in 0usize..6, placed in prop::option::of(0usize..6)) {
        let temp = TempDir::new().unwrap();
        let mut levels = vec![temp.path().to_path_buf()];
        for i in 0..depth {
            let next = levels[i].join(format!("d{}", i));
            levels.push(next);
        }
        fs::create_dir_all(&levels[depth]).unwrap();

        let placed = placed.filter(|p| *p <= depth);
        if let Some(level) = placed {
            fs::write(levels[level].join(CONFIG_FILENAME), "").unwrap();
        }

        let found = find_upward(&levels[depth], CONFIG_FILENAME);
        match placed {
            Some(level) => prop_assert_eq!(found, Some(levels[level].join(CONFIG_FILENAME))),
            None => prop_assert!(found.map_or(true, |f| !f.starts_with(temp.path()))),
        }
    }

    /// The last `--environment` wins regardless of surrounding arguments.
    #[test]
    fn environment_option_takes_the_last_value(
        before in prop::collection::vec(other_arg(), 0..4),
        first in environment(),
        last in environment(),
        after in prop::collection::vec(other_arg(), 0..4),
    ) {
        let mut args = vec!["craft".to_string()];
        args.extend(before);
        args.push(format!("--environment={}", first));
        args.push("--environment".to_string());
        args.push(last.clone());
        args.extend(after);

        prop_assert_eq!(environment_option(&args).unwrap(), Some(last));
    }

    /// Trailing separators on a namespace never change the identifier.
    #[test]
    fn qualify_ignores_trailing_separators(ns in "[a-z]{1,6}(::[a-z]{1,6}){0,2}", name in "[a-z_]{1,8}") {
        let plain = qualify(&ns, &name);
        prop_assert_eq!(&qualify(&format!("{}::", ns), &name), &plain);
        prop_assert_eq!(&qualify(&format!("{}\\", ns), &name), &plain);
        let suffix = format!("::{}", name);
        prop_assert!(plain.ends_with(&suffix));
    }
}
