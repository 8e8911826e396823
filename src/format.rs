//! Human-readable rendering of results and dry-run previews.

use crate::helpers::elapsed_millis;
use crate::models::{Action, ExecutionResult, ValidatedCommand};

const UNKNOWN_ERROR: &str = "Unknown error";

/// Renders an engine result. Failures are always a single line; counts,
/// timing and per-file errors only appear when `verbose` is set.
pub fn format_result(result: &ExecutionResult, verbose: bool) -> String {
    if !result.success {
        let reason = result.error_message.as_deref().unwrap_or(UNKNOWN_ERROR);
        return format!("❌ Operation failed: {reason}");
    }

    let mut lines = Vec::new();
    if verbose {
        lines.push(format!("🔍 Operation: {}", result.operation));
        lines.push(format!("📊 Files scanned: {}", result.files_scanned));
        lines.push(format!("🎯 Files matched: {}", result.files_matched));
        lines.push(format!("⚡ Files affected: {}", result.files_affected));
        if let Some(ms) = duration_ms(result) {
            lines.push(format!("⏱️ Duration: {ms}ms"));
        }
    }

    lines.push(format!("✅ {}", result.message));

    if verbose && !result.errors.is_empty() {
        lines.push(String::new());
        lines.push("⚠️ Errors encountered:".to_string());
        lines.extend(result.errors.iter().map(|error| format!("  • {error}")));
    }

    lines.join("\n")
}

/// Reported duration, else the span between start and end timestamps.
fn duration_ms(result: &ExecutionResult) -> Option<u64> {
    result.duration_ms.or_else(|| {
        let start = result.start_time.as_deref()?;
        let end = result.end_time.as_deref()?;
        elapsed_millis(start, end)
    })
}

/// Describes what `cmd` would do, without contacting the engine.
pub fn format_dry_run(cmd: &ValidatedCommand) -> String {
    let ValidatedCommand {
        pattern,
        source,
        destination,
        ..
    } = cmd;

    match cmd.action {
        Action::Delete => format!("Would delete files matching '{pattern}' from '{source}'"),
        Action::Move | Action::Copy => format!(
            "Would {} files matching '{pattern}' from '{source}' to '{destination}'",
            cmd.action
        ),
        Action::CreateFolder => format!("Would create folder '{destination}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success() -> ExecutionResult {
        ExecutionResult {
            success: true,
            message: "Successfully moved 5 files".into(),
            operation: "move".into(),
            files_scanned: 100,
            files_matched: 5,
            files_affected: 5,
            duration_ms: Some(150),
            ..ExecutionResult::default()
        }
    }

    fn command(action: Action) -> ValidatedCommand {
        ValidatedCommand {
            action,
            pattern: ".png".into(),
            source: "~/Downloads".into(),
            destination: "~/Pictures".into(),
            dry_run: true,
            force: false,
            recursive: false,
            verbose: false,
        }
    }

    #[test]
    fn failure_is_one_line_with_reason() {
        let text = format_result(&ExecutionResult::failed("Permission denied"), true);
        assert_eq!(text, "❌ Operation failed: Permission denied");
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn failure_without_message_uses_default() {
        let text = format_result(&ExecutionResult::default(), false);
        assert_eq!(text, "❌ Operation failed: Unknown error");
    }

    #[test]
    fn quiet_success_is_just_the_message() {
        assert_eq!(format_result(&success(), false), "✅ Successfully moved 5 files");
    }

    #[test]
    fn verbose_success_lists_counts_and_duration() {
        let text = format_result(&success(), true);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "🔍 Operation: move",
                "📊 Files scanned: 100",
                "🎯 Files matched: 5",
                "⚡ Files affected: 5",
                "⏱️ Duration: 150ms",
                "✅ Successfully moved 5 files",
            ]
        );
    }

    #[test]
    fn duration_from_timestamps_when_not_reported() {
        let mut result = success();
        result.duration_ms = None;
        result.start_time = Some("2024-03-01 10:00:00".into());
        result.end_time = Some("2024-03-01 10:00:03".into());
        assert!(format_result(&result, true).contains("⏱️ Duration: 3000ms"));
    }

    #[test]
    fn unparseable_timestamps_omit_duration() {
        let mut result = success();
        result.duration_ms = None;
        result.start_time = Some("1709287200000000000".into());
        result.end_time = Some("1709287203000000000".into());
        assert!(!format_result(&result, true).contains("Duration"));
    }

    #[test]
    fn errors_only_shown_when_verbose() {
        let mut result = success();
        result.errors = vec!["Failed to move a.jpg".into(), "Failed to move b.jpg".into()];

        let quiet = format_result(&result, false);
        assert!(!quiet.contains("Failed to move"));

        let verbose = format_result(&result, true);
        assert!(verbose.contains("⚠️ Errors encountered:"));
        assert!(verbose.ends_with("  • Failed to move a.jpg\n  • Failed to move b.jpg"));
    }

    #[test]
    fn formatting_is_idempotent() {
        let result = success();
        assert_eq!(format_result(&result, true), format_result(&result, true));
        assert_eq!(format_result(&result, false), format_result(&result, false));
    }

    #[test]
    fn dry_run_sentences_per_action() {
        assert_eq!(
            format_dry_run(&command(Action::Delete)),
            "Would delete files matching '.png' from '~/Downloads'"
        );
        assert_eq!(
            format_dry_run(&command(Action::Move)),
            "Would move files matching '.png' from '~/Downloads' to '~/Pictures'"
        );
        assert_eq!(
            format_dry_run(&command(Action::Copy)),
            "Would copy files matching '.png' from '~/Downloads' to '~/Pictures'"
        );
        assert_eq!(
            format_dry_run(&command(Action::CreateFolder)),
            "Would create folder '~/Pictures'"
        );
    }
}
