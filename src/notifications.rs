/// Desktop notifications
/// Currently only implements macOS notifications

#[cfg(target_os = "macos")]
use std::process::Command;

/// Escape a title for embedding in an AppleScript string literal
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Send a notification when a task is marked complete
pub fn notify_task_completed(task_title: &str) {
    let script = format!(
        r#"display notification "{}" with title "Planner - Task Completed""#,
        escape(task_title)
    );

    #[cfg(target_os = "macos")]
    {
        if let Err(e) = Command::new("osascript").arg("-e").arg(&script).output() {
            tracing::debug!(error = %e, "osascript failed");
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = script;
    }
}
