//! Dispatch against stand-in engine executables written as shell scripts.
#![cfg(unix)]

use smartfile_core::{
    format_result, Action, CancelToken, CoreError, Dispatcher, ExecutionResult, Outcome, Pipeline,
    ProcessEngine, RealHostFs, Result, Settings, ValidatedCommand,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

// Writing an executable while another test thread forks can make exec fail
// with ETXTBSY, so script creation and execution are serialized.
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

fn engine_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("smartfilecmd");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn copy_command() -> ValidatedCommand {
    ValidatedCommand {
        action: Action::Copy,
        pattern: ".pdf".into(),
        source: "~/Documents".into(),
        destination: "~/Backup".into(),
        dry_run: false,
        force: false,
        recursive: true,
        verbose: false,
    }
}

fn dispatch(body: &str, timeout: Duration) -> (TempDir, Result<ExecutionResult>) {
    let _guard = SPAWN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let engine = ProcessEngine::new(engine_script(dir.path(), body)).with_timeout(timeout);
    let result = Dispatcher::new(engine).execute(copy_command());
    (dir, result)
}

const COPIED: &str = r#"echo '{"success": true, "operation": "copy", "message": "Successfully copied 2 files", "files_scanned": 4, "files_matched": 2, "files_affected": 2, "start_time": "2024-03-01 10:00:00", "end_time": "2024-03-01 10:00:01"}'"#;

#[test]
fn request_reaches_engine_and_round_trips() {
    let body = format!("cat > \"$(dirname \"$0\")/request.json\"\n{COPIED}");
    let (dir, result) = dispatch(&body, Duration::from_secs(10));

    let result = result.unwrap();
    assert!(result.success);
    assert_eq!(result.files_affected, 2);
    assert!(format_result(&result, true).contains("⏱️ Duration: 1000ms"));

    let request = fs::read_to_string(dir.path().join("request.json")).unwrap();
    assert!(request.ends_with('\n'));
    let decoded: ValidatedCommand = serde_json::from_str(request.trim()).unwrap();
    assert_eq!(decoded, copy_command());
}

#[test]
fn stderr_chatter_does_not_disturb_decoding() {
    let body = format!("echo 'DEBUG: Parsed JSON' >&2\n{COPIED}");
    let (_dir, result) = dispatch(&body, Duration::from_secs(10));
    assert_eq!(result.unwrap().message, "Successfully copied 2 files");
}

#[test]
fn engine_failure_carries_stderr() {
    let (_dir, result) = dispatch("echo 'Invalid command' >&2\nexit 1", Duration::from_secs(10));
    match result {
        Err(CoreError::EngineError { code, stderr }) => {
            assert_eq!(code, Some(1));
            assert_eq!(stderr, "Invalid command");
        }
        other => panic!("expected EngineError, got {other:?}"),
    }
}

#[test]
fn reported_failure_is_formatted_not_raised() {
    let body = r#"echo '{"success": false, "operation": "copy", "error_message": "Permission denied"}'
exit 1"#;
    let (_dir, result) = dispatch(body, Duration::from_secs(10));
    let result = result.unwrap();
    assert_eq!(format_result(&result, false), "❌ Operation failed: Permission denied");
}

#[test]
fn malformed_output_is_protocol_error() {
    let (_dir, result) = dispatch("echo 'copied everything, trust me'", Duration::from_secs(10));
    match result {
        Err(CoreError::ProtocolError { raw, .. }) => assert!(raw.contains("trust me")),
        other => panic!("expected ProtocolError, got {other:?}"),
    }
}

#[test]
fn slow_engine_times_out() {
    let started = Instant::now();
    let (_dir, result) = dispatch("exec sleep 5", Duration::from_millis(200));
    assert!(matches!(result, Err(CoreError::Timeout { .. })));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[test]
fn output_held_open_by_a_grandchild_still_times_out() {
    let started = Instant::now();
    let body = format!("sleep 5 &\n{COPIED}");
    let (_dir, result) = dispatch(&body, Duration::from_millis(300));
    assert!(matches!(result, Err(CoreError::Timeout { .. })));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[test]
fn cancelling_mid_wait_kills_the_engine() {
    let _guard = SPAWN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("started");
    let script = engine_script(dir.path(), "touch \"$(dirname \"$0\")/started\"\nexec sleep 5");

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let raiser = thread::spawn(move || {
        while !marker.exists() {
            thread::sleep(Duration::from_millis(10));
        }
        trigger.cancel()
    });

    let started = Instant::now();
    let engine = ProcessEngine::new(script)
        .with_timeout(Duration::from_secs(10))
        .with_cancel(cancel);
    let result = Dispatcher::new(engine).execute(copy_command());

    assert!(matches!(result, Err(CoreError::UserCancelled)));
    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(raiser.join().unwrap(), "engine wait should be watching the flag");
}

#[test]
fn missing_executable_is_engine_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let engine = ProcessEngine::new(dir.path().join("smartfilecmd"));
    let result = Dispatcher::new(engine).execute(copy_command());
    assert!(matches!(result, Err(CoreError::EngineUnavailable { .. })));
}

#[test]
fn pipeline_uses_configured_engine() {
    let _guard = SPAWN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        engine_override: Some(engine_script(dir.path(), COPIED)),
        engine_timeout: Duration::from_secs(10),
        ..Settings::default()
    };

    let outcome = Pipeline::new(&RealHostFs, &settings)
        .run(copy_command(), &b""[..], Vec::new())
        .unwrap();
    match outcome {
        Outcome::Completed(result) => assert_eq!(result.operation, "copy"),
        other => panic!("expected Completed, got {other:?}"),
    }
}
