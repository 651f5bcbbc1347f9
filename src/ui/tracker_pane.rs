use crate::app::AppState;
use crate::domain::{format_minutes, DraftField, TimeTracker};
use crate::ui::{layout::create_modal_area, styles::Palette};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the time tracker for one task
pub fn render_tracker(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    if let Some(tracker) = &app.tracker {
        let height = (tracker.entries.len() as u16).saturating_add(16).min(30);
        let modal_area = create_modal_area(area, height);
        f.render_widget(Clear, modal_area);

        let busy = app.is_busy(&tracker.task_id);
        let title = format!(" Time: {} ", tracker.task_title);
        let paragraph = Paragraph::new(tracker_lines(tracker, busy, palette))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title, palette.modal_title_style()))
                    .style(palette.modal_bg_style()),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, modal_area);
    }
}

fn tracker_lines<'a>(tracker: &TimeTracker, busy: bool, palette: &Palette) -> Vec<Line<'a>> {
    let mut lines = vec![Line::raw("")];

    // Timer
    let timer = if tracker.is_running() {
        Span::styled(
            format!("  ● Running  {}", format_minutes(tracker.elapsed_minutes)),
            palette.running_style(),
        )
    } else {
        Span::styled("  ○ Stopped", palette.hint_style())
    };
    lines.push(Line::from(timer));
    lines.push(Line::raw(""));

    // Draft entry
    let cursor = |field: DraftField| {
        if tracker.draft_field == field {
            Span::styled("█", palette.modal_title_style())
        } else {
            Span::raw("")
        }
    };
    let duration = if tracker.draft.duration == 0 {
        String::new()
    } else {
        tracker.draft.duration.to_string()
    };
    lines.push(Line::from(vec![
        Span::styled("  Minutes:     ", palette.modal_title_style()),
        Span::raw(duration),
        cursor(DraftField::Duration),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  Description: ", palette.modal_title_style()),
        Span::raw(tracker.draft.description.clone()),
        cursor(DraftField::Description),
    ]));
    lines.push(Line::raw(""));

    // Logged entries
    if tracker.entries.is_empty() {
        lines.push(Line::styled("  No time logged yet", palette.hint_style()));
    } else {
        for (i, entry) in tracker.entries.iter().enumerate() {
            let marker = if i == tracker.selected_entry { "> " } else { "  " };
            let description = entry.description.as_deref().unwrap_or("");
            let text = format!(
                "{}{}  {:>7}  {}",
                marker,
                entry.created_at.format("%b %d %H:%M"),
                format_minutes(entry.duration),
                description
            );
            let style = if i == tracker.selected_entry {
                palette.selected_style()
            } else {
                palette.modal_bg_style()
            };
            lines.push(Line::styled(text, style));
        }
    }
    lines.push(Line::raw(""));

    // Totals
    lines.push(Line::raw(format!(
        "  Logged {} of {} estimated · {}",
        format_minutes(tracker.total_actual()),
        format_minutes(tracker.estimated_minutes),
        tracker.estimate_delta()
    )));
    if busy {
        lines.push(Line::styled("  Saving...", palette.hint_style()));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "  Space/Ctrl+S start/stop · Tab field · Enter log · ↑/↓ select · Del delete · Esc close",
        palette.hint_style(),
    ));
    lines
}
