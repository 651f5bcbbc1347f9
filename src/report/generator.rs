use crate::domain::{format_minutes, FilterConfig, Priority, Task};
use crate::files::atomic_write;
use crate::report::stats::{calculate_stats, TaskStats};
use anyhow::Result;
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;

/// Build the markdown stats report for a task list
pub fn render_report(tasks: &[Task], filter: &FilterConfig, date: NaiveDate) -> String {
    let visible = filter.apply(tasks);
    let stats = calculate_stats(visible.iter().copied());
    render_stats(&stats, filter, date)
}

fn render_stats(stats: &TaskStats, filter: &FilterConfig, date: NaiveDate) -> String {
    let mut report = String::new();

    let _ = writeln!(report, "# Task Report - {}\n", date);
    if filter.is_active() {
        let _ = writeln!(report, "_Filtered: {}_\n", filter.describe());
    }

    report.push_str("## Summary\n\n");
    let _ = writeln!(report, "- **Total Tasks:** {}", stats.total);
    let _ = writeln!(report, "- **Completed:** {}", stats.completed);
    let _ = writeln!(report, "- **Pending:** {}", stats.pending);
    let _ = writeln!(report, "- **Completion Rate:** {}%\n", stats.completion_rate);

    report.push_str("## Priorities\n\n");
    report.push_str("| Priority | Tasks |\n|---|---|\n");
    for priority in Priority::all().iter().rev() {
        let _ = writeln!(report, "| {} | {} |", priority, stats.by_priority.get(*priority));
    }
    report.push('\n');

    report.push_str("## Categories\n\n");
    let used: Vec<_> = stats.by_category.iter().filter(|(_, n)| *n > 0).collect();
    if used.is_empty() {
        report.push_str("_No tasks._\n\n");
    } else {
        report.push_str("| Category | Tasks |\n|---|---|\n");
        for (category, count) in used {
            let _ = writeln!(report, "| {} | {} |", category, count);
        }
        report.push('\n');
    }

    report.push_str("## Recurrence\n\n");
    let _ = writeln!(report, "- **Recurring:** {}", stats.recurring);
    let _ = writeln!(report, "- **One-time:** {}\n", stats.one_time);

    report.push_str("## Time\n\n");
    let _ = writeln!(
        report,
        "- **Estimated:** {} ({}h)",
        format_minutes(clamp_minutes(stats.estimated_minutes)),
        stats.estimated_hours()
    );
    let _ = writeln!(
        report,
        "- **Actual:** {} ({}h)",
        format_minutes(clamp_minutes(stats.actual_minutes)),
        stats.actual_hours()
    );
    let _ = writeln!(report, "- **Time Accuracy:** {}%", stats.time_accuracy);

    report
}

fn clamp_minutes(minutes: u64) -> u32 {
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Write a rendered report to disk
pub fn write_report(path: &Path, report: &str) -> Result<()> {
    atomic_write(path, report.as_bytes())
}
