use crate::app::AppState;
use crate::domain::{format_date, format_minutes, Task};
use crate::ui::styles::Palette;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .title(Span::styled(" Details ", palette.title_style()));

    let Some(task) = app.selected_task() else {
        let empty = Paragraph::new("No task selected")
            .style(palette.hint_style())
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let paragraph = Paragraph::new(detail_lines(task, palette, app.is_busy(&task.id)))
        .style(palette.default_style())
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn field<'a>(label: &'static str, value: impl Into<String>, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, palette.title_style()),
        Span::raw(value.into()),
    ])
}

fn detail_lines<'a>(task: &Task, palette: &Palette, busy: bool) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    lines.push(field("Title:    ", task.title.clone(), palette));
    let status = match (task.completed, busy) {
        (_, true) => "Saving...",
        (true, false) => "Completed",
        (false, false) => "Pending",
    };
    lines.push(field("Status:   ", status, palette));
    lines.push(Line::from(vec![
        Span::styled("Priority: ", palette.title_style()),
        Span::styled(task.priority.name(), palette.priority_style(task.priority)),
    ]));
    lines.push(field("Category: ", task.category.name(), palette));

    if let Some(date) = task.due_date {
        lines.push(field("Due:      ", format_date(date), palette));
    }

    if let Some(label) = task.recurrence_label() {
        lines.push(field("Repeats:  ", label, palette));
        if let Some(next) = task.next_due {
            lines.push(field("Next due: ", format_date(next), palette));
        }
        if let Some(last) = task.last_completed {
            lines.push(field("Last done:", format!(" {}", format_date(last.date())), palette));
        }
    }

    let estimate = task.estimated_duration.unwrap_or(0);
    let logged = task.logged_minutes();
    if estimate > 0 || logged > 0 {
        lines.push(field(
            "Time:     ",
            format!("{} of {} estimated", format_minutes(logged), format_minutes(estimate)),
            palette,
        ));
    }

    if !task.tags.is_empty() {
        let mut spans = vec![Span::styled("Tags:     ", palette.title_style())];
        for tag in &task.tags {
            spans.push(Span::styled(format!("[{}] ", tag), palette.tag_style()));
        }
        lines.push(Line::from(spans));
    }

    if let Some(description) = task.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("Notes:", palette.title_style())));
        for note_line in description.lines() {
            lines.push(Line::raw(format!("  {}", note_line)));
        }
    }

    lines
}
