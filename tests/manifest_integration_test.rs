//! Manifest integration tests
//!
//! Commands are declared in TOML/JSON files on disk and bound to closure
//! handlers.

use cmdkit::command::{handler, CommandSet, Handler, Invocation, Severity};
use cmdkit::config::CommandManifest;
use cmdkit::error::CommandError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const TOML_MANIFEST: &str = r#"
version = "1"

[app]
name = "files"
about = "File helpers"

[[commands]]
name = "copy"
description = "Copy a file"

[[commands.args]]
name = "src"
type = "path"

[[commands.args]]
name = "dst"
type = "path"

[[commands.options]]
short = 'f'
long = "force"
type = "bool"
help = "Overwrite the destination"

[[commands]]
name = "cat"
description = "Print files"
handler = "print"

[[commands.args]]
name = "files"
type = "path"
vararg = true

[[commands.options]]
short = 'n'
long = "lines"
type = "integer"
help = "Lines to print"

[[commands]]
name = "orphan"
description = "No handler is registered for this one"
"#;

fn argv(input: &str) -> Vec<String> {
    input.split_whitespace().map(String::from).collect()
}

fn invoke(set: &CommandSet, input: &str) -> (Invocation, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let invocation = set.invoke_with(&argv(input), &mut out, &mut err).unwrap();
    (
        invocation,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

type Log = Arc<Mutex<Vec<String>>>;

fn handlers(log: &Log) -> HashMap<String, Handler> {
    let mut handlers: HashMap<String, Handler> = HashMap::new();

    let copy_log = Arc::clone(log);
    handlers.insert(
        "copy".to_string(),
        handler(move |ctx| {
            let src = ctx.arg_object::<PathBuf>("src").unwrap_or_default();
            let dst = ctx.arg_object::<PathBuf>("dst").unwrap_or_default();
            if src == dst {
                return Err(CommandError::failed("source and destination are the same"));
            }
            copy_log.lock().unwrap().push(format!(
                "copy {} {} force={}",
                src.display(),
                dst.display(),
                ctx.has_option("force")
            ));
            Ok(())
        }),
    );

    let print_log = Arc::clone(log);
    handlers.insert(
        "print".to_string(),
        handler(move |ctx| {
            let files = ctx.arg_objects::<PathBuf>("files");
            let lines = ctx.option_object::<i64>("lines").unwrap_or(10);
            print_log
                .lock()
                .unwrap()
                .push(format!("cat {} files, {} lines", files.len(), lines));
            Ok(())
        }),
    );

    handlers
}

#[test]
fn test_toml_manifest_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("commands.toml");
    std::fs::write(&path, TOML_MANIFEST).unwrap();

    let manifest = CommandManifest::from_file(&path).unwrap();
    assert_eq!(manifest.app.name, "files");
    assert_eq!(manifest.app.about.as_deref(), Some("File helpers"));
    assert_eq!(manifest.commands.len(), 3);

    let log: Log = Arc::default();
    let set = CommandSet::from_manifest(&manifest, handlers(&log));

    // "orphan" has no handler
    assert_eq!(set.len(), 2);
    let errors: Vec<_> = set.diagnostics().iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].command, "orphan");
    assert_eq!(errors[0].severity, Severity::Error);

    assert!(invoke(&set, "copy -f a.txt b.txt").0.is_success());
    assert!(invoke(&set, "cat -n 2 x y z").0.is_success());
    assert!(invoke(&set, "cat w").0.is_success());

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "copy a.txt b.txt force=true".to_string(),
            "cat 3 files, 2 lines".to_string(),
            "cat 1 files, 10 lines".to_string(),
        ]
    );
}

#[test]
fn test_handler_failure_exit_code() {
    let manifest = CommandManifest::from_toml_str(TOML_MANIFEST).unwrap();
    let log: Log = Arc::default();
    let set = CommandSet::from_manifest(&manifest, handlers(&log));

    let (invocation, out, err) = invoke(&set, "copy same same");
    assert!(matches!(invocation, Invocation::HandlerFailed { .. }));
    assert_eq!(invocation.exit_code(), 1);
    assert_eq!(err, "copy: error: source and destination are the same\n");
    assert!(out.contains("files copy [options] <src> <dst>"));
    assert!(log.lock().unwrap().is_empty());

    let (invocation, _, _) = invoke(&set, "cat");
    assert!(matches!(invocation, Invocation::ParseFailed { .. }));
}

#[test]
fn test_json_manifest_with_unknown_type() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("commands.json");
    std::fs::write(
        &path,
        r#"{
            "app": {"name": "clock"},
            "commands": [{
                "name": "at",
                "description": "Schedule something",
                "args": [{"name": "when", "type": "datetime"}]
            }]
        }"#,
    )
    .unwrap();

    let manifest = CommandManifest::from_file(&path).unwrap();
    let seen: Log = Arc::default();
    let seen_by_handler = Arc::clone(&seen);

    let mut handlers: HashMap<String, Handler> = HashMap::new();
    handlers.insert(
        "at".to_string(),
        handler(move |ctx| {
            let when = ctx.arg_value("when").unwrap_or_default().to_string();
            seen_by_handler.lock().unwrap().push(when);
            Ok(())
        }),
    );

    let set = CommandSet::from_manifest(&manifest, handlers);
    assert_eq!(set.diagnostics().len(), 1);
    assert_eq!(set.diagnostics()[0].severity, Severity::Warning);
    assert!(set.diagnostics()[0].message.contains("datetime"));

    assert!(invoke(&set, "at 2024-01-01T10:00").0.is_success());
    assert_eq!(*seen.lock().unwrap(), vec!["2024-01-01T10:00".to_string()]);
}

#[test]
fn test_unreadable_and_malformed_files() {
    let temp_dir = TempDir::new().unwrap();

    let missing = temp_dir.path().join("missing.toml");
    let err = CommandManifest::from_file(&missing).unwrap_err();
    assert!(err.to_string().starts_with("Failed to read config file"));

    let broken = temp_dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    let err = CommandManifest::from_file(&broken).unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse JSON"));
}

#[test]
fn test_commands_share_a_handler() {
    let manifest = CommandManifest::from_toml_str(
        r#"
[app]
name = "vcs"

[[commands]]
name = "add"
description = "Stage files"
handler = "stage"

[[commands.args]]
name = "files"
vararg = true

[[commands]]
name = "stage"
description = "Alias of add"

[[commands.args]]
name = "files"
vararg = true
"#,
    )
    .unwrap();

    let log: Log = Arc::default();
    let stage_log = Arc::clone(&log);
    let mut handlers: HashMap<String, Handler> = HashMap::new();
    handlers.insert(
        "stage".to_string(),
        handler(move |ctx| {
            stage_log.lock().unwrap().push(format!(
                "{} {}",
                ctx.command_name(),
                ctx.arg_values("files").join(",")
            ));
            Ok(())
        }),
    );

    let set = CommandSet::from_manifest(&manifest, handlers);
    assert!(set.diagnostics().is_empty(), "{:?}", set.diagnostics());
    assert_eq!(set.len(), 2);

    assert!(invoke(&set, "add a b").0.is_success());
    assert!(invoke(&set, "stage c").0.is_success());
    assert_eq!(
        *log.lock().unwrap(),
        vec!["add a,b".to_string(), "stage c".to_string()]
    );
}
