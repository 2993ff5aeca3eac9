//! Library-level tests of the invocation lifecycle.
//!
//! These drive [`Application`] directly with a recording bootstrapper so
//! the order of gate decisions and command bodies can be observed.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use anyhow::{bail, Result};
use tempfile::TempDir;

use craft_cli::core::config::{ConfigResolver, ResolvedConfig};
use craft_cli::core::paths::TargetPaths;
use craft_cli::engine::{
    AppHandle, Application, BootstrapError, Bootstrapper, Command, CommandCatalog,
    CommandContext, Skip,
};
use craft_cli::ui::Output;

// =============================================================================
// Test Fixtures
// =============================================================================

type Log = Rc<RefCell<Vec<String>>>;

/// Bootstrapper that records each call.
struct Recording {
    log: Log,
    fail: bool,
}

impl Bootstrapper for Recording {
    fn bootstrap(
        &mut self,
        paths: &TargetPaths,
        environment: &str,
    ) -> Result<AppHandle, BootstrapError> {
        self.log.borrow_mut().push(format!("bootstrap:{}", environment));
        if self.fail {
            return Err(BootstrapError::Failed {
                root: paths.root.clone(),
                message: "database unreachable".to_string(),
            });
        }
        Ok(AppHandle {
            root: paths.root.clone(),
            environment: environment.to_string(),
            paths: paths.clone(),
        })
    }
}

/// Command that records its run and returns a fixed outcome.
struct Scripted {
    name: String,
    exempt: bool,
    option: Option<clap::Arg>,
    outcome: std::result::Result<i32, &'static str>,
    log: Log,
}

impl Scripted {
    fn new(name: &str, log: &Log) -> Self {
        Self {
            name: name.to_string(),
            exempt: false,
            option: None,
            outcome: Ok(0),
            log: log.clone(),
        }
    }
}

impl Command for Scripted {
    fn name(&self) -> &str {
        &self.name
    }

    fn about(&self) -> &str {
        "Scripted command"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        match &self.option {
            Some(arg) => cmd.arg(arg.clone()),
            None => cmd,
        }
    }

    fn exempt_from_bootstrap(&self) -> bool {
        self.exempt
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        let bootstrapped = ctx.app.is_some();
        self.log
            .borrow_mut()
            .push(format!("run:{}:{}", self.name, bootstrapped));
        ctx.output.print(format!("{} ran", self.name));
        match self.outcome {
            Ok(code) => Ok(code),
            Err(message) => bail!(message),
        }
    }
}

struct Harness {
    dir: TempDir,
    log: Log,
}

impl Harness {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn install_marker(&self) {
        let paths = TargetPaths::new(self.dir.path().join("craft"));
        fs::create_dir_all(paths.app_dir()).unwrap();
        fs::write(paths.marker_path(), "").unwrap();
    }

    fn write_config(&self, toml: &str) {
        fs::write(self.dir.path().join(".craft-cli.toml"), toml).unwrap();
    }

    fn app(&self, args: &[String], catalog: &CommandCatalog, fail: bool) -> Application {
        let resolver = ConfigResolver::new(None, self.dir.path().to_path_buf());
        let bootstrapper = Recording {
            log: self.log.clone(),
            fail,
        };
        Application::new(args, &resolver, catalog, Box::new(bootstrapper)).unwrap()
    }

    fn events(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("craft")
        .chain(args.iter().copied())
        .map(String::from)
        .collect()
}

fn run(app: &mut Application, args: &[String]) -> (i32, String) {
    let (mut output, buffer) = Output::buffer();
    let code = app.run(args, &mut output);
    (code, buffer.contents())
}

// =============================================================================
// Gate ordering
// =============================================================================

#[test]
fn cli_environment_reaches_the_gate_before_the_command() {
    let harness = Harness::new();
    harness.install_marker();
    let args = argv(&["run", "--environment=prod"]);

    let mut app = harness.app(&args, &CommandCatalog::new(), false);
    app.add(Box::new(Scripted::new("run", &harness.log))).unwrap();

    assert_eq!(app.environment(), "prod");
    let (code, _) = run(&mut app, &args);

    assert_eq!(code, 0);
    assert_eq!(harness.events(), vec!["bootstrap:prod", "run:run:true"]);
}

#[test]
fn help_never_bootstraps_without_the_marker() {
    let harness = Harness::new();
    let args = argv(&["help"]);
    let mut app = harness.app(&args, &CommandCatalog::new(), false);

    let (code, out) = run(&mut app, &args);

    assert_eq!(code, 0);
    assert!(out.contains("Usage"));
    assert!(harness.events().is_empty());
    assert!(!app.gate().is_bootstrapped());
}

#[test]
fn list_never_bootstraps_even_with_the_marker() {
    let harness = Harness::new();
    harness.install_marker();
    let args = argv(&["list"]);
    let mut app = harness.app(&args, &CommandCatalog::new(), false);

    assert_eq!(run(&mut app, &args).0, 0);
    assert!(harness.events().is_empty());
}

#[test]
fn missing_marker_skips_the_command_body() {
    let harness = Harness::new();
    let args = argv(&["run"]);
    let mut app = harness.app(&args, &CommandCatalog::new(), false);
    app.add(Box::new(Scripted::new("run", &harness.log))).unwrap();

    let (code, out) = run(&mut app, &args);

    assert_eq!(code, 1);
    assert!(out.contains("could not be found"));
    assert!(harness.events().is_empty());
}

#[test]
fn failing_bootstrapper_skips_the_command_body() {
    let harness = Harness::new();
    harness.install_marker();
    let args = argv(&["run"]);
    let mut app = harness.app(&args, &CommandCatalog::new(), true);
    app.add(Box::new(Scripted::new("run", &harness.log))).unwrap();

    let (code, out) = run(&mut app, &args);

    assert_eq!(code, 1);
    assert!(out.contains("database unreachable"));
    assert_eq!(
        harness.events(),
        vec![format!("bootstrap:{}", app.environment())]
    );
}

#[test]
fn exempt_command_runs_unbootstrapped() {
    let harness = Harness::new();
    harness.install_marker();
    let args = argv(&["setup"]);
    let mut app = harness.app(&args, &CommandCatalog::new(), false);
    app.add(Box::new(Scripted {
        exempt: true,
        ..Scripted::new("setup", &harness.log)
    }))
    .unwrap();

    assert_eq!(run(&mut app, &args).0, 0);
    assert_eq!(harness.events(), vec!["run:setup:false"]);
}

#[test]
fn command_clashing_with_global_options_is_refused() {
    let harness = Harness::new();
    let args = argv(&["help"]);
    let mut app = harness.app(&args, &CommandCatalog::new(), false);

    let refused = app.add(Box::new(Scripted {
        option: Some(clap::Arg::new("quick").short('q')),
        ..Scripted::new("deploy", &harness.log)
    }));

    assert_eq!(refused.err(), Some(Skip::ReservedOption));
    assert!(!app.registry().contains("deploy"));

    let (code, out) = run(&mut app, &args);
    assert_eq!(code, 0);
    assert!(out.contains("Usage"));
}

// =============================================================================
// Exit codes
// =============================================================================

#[test]
fn command_exit_code_is_returned() {
    let harness = Harness::new();
    harness.install_marker();
    let args = argv(&["run"]);
    let mut app = harness.app(&args, &CommandCatalog::new(), false);
    app.add(Box::new(Scripted {
        outcome: Ok(3),
        ..Scripted::new("run", &harness.log)
    }))
    .unwrap();

    assert_eq!(run(&mut app, &args).0, 3);
}

#[test]
fn command_error_exits_one() {
    let harness = Harness::new();
    harness.install_marker();
    let args = argv(&["run"]);
    let mut app = harness.app(&args, &CommandCatalog::new(), false);
    app.add(Box::new(Scripted {
        outcome: Err("deploy target locked"),
        ..Scripted::new("run", &harness.log)
    }))
    .unwrap();

    let (code, out) = run(&mut app, &args);
    assert_eq!(code, 1);
    assert!(out.contains("error: deploy target locked"));
}

#[test]
fn unknown_command_is_a_parse_error() {
    let harness = Harness::new();
    let args = argv(&["frobnicate"]);
    let mut app = harness.app(&args, &CommandCatalog::new(), false);

    let (code, out) = run(&mut app, &args);
    assert_eq!(code, 2);
    assert!(out.contains("frobnicate"));
}

// =============================================================================
// Configuration-driven registration
// =============================================================================

#[test]
fn configured_reference_replaces_builtin() {
    let harness = Harness::new();
    harness.install_marker();
    harness.write_config("commands = [\"custom::tail\", \"custom::missing\"]\n");

    let log = harness.log.clone();
    let mut catalog = CommandCatalog::with_builtins();
    catalog.register_callback("custom::tail", move |_config: &ResolvedConfig| {
        Box::new(Scripted::new("tail", &log)) as Box<dyn Command>
    });

    let args = argv(&["tail"]);
    let mut app = harness.app(&args, &catalog, false);

    assert_eq!(
        app.registration_report().skipped,
        vec![("custom::missing".to_string(), Skip::Unknown)]
    );
    let (code, out) = run(&mut app, &args);
    assert_eq!(code, 0);
    assert!(out.contains("tail ran"));
}

#[test]
fn command_dirs_register_discovered_commands() {
    let harness = Harness::new();
    harness.install_marker();
    harness.write_config("[command_dirs]\n\"site::commands\" = \"commands\"\n");
    let dir = harness.dir.path().join("commands");
    fs::create_dir_all(&dir).unwrap();
    for file in ["deploy.rs", "base.rs", "support.rs"] {
        fs::write(dir.join(file), "").unwrap();
    }

    let log = harness.log.clone();
    let mut catalog = CommandCatalog::new();
    catalog
        .register_callback("site::commands::deploy", move |_config: &ResolvedConfig| {
            Box::new(Scripted::new("deploy", &log)) as Box<dyn Command>
        })
        .declare_abstract("site::commands::base")
        .declare_other("site::commands::support");

    let args = argv(&["deploy"]);
    let mut app = harness.app(&args, &catalog, false);

    assert!(app.registry().contains("deploy"));
    assert_eq!(app.registration_report().skipped.len(), 2);
    assert_eq!(run(&mut app, &args).0, 0);
    assert_eq!(
        harness.events(),
        vec![
            format!("bootstrap:{}", app.environment()),
            "run:deploy:true".to_string()
        ]
    );
}

#[test]
fn config_environment_wins_over_cli_option() {
    let harness = Harness::new();
    harness.write_config("environment = \"staging\"\n");
    let args = argv(&["list", "--environment=prod"]);

    let app = harness.app(&args, &CommandCatalog::new(), false);

    assert_eq!(app.environment(), "staging");
    assert_eq!(app.config().environment.as_deref(), Some("staging"));
}
