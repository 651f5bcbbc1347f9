use crate::app::AppState;
use crate::domain::{format_date, format_minutes, Task, ViewState};
use crate::ui::styles::Palette;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the task list pane
pub fn render_list_pane(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let view = app.view_state();
    let title = match &view {
        ViewState::Showing { shown, total } if shown != total => format!(" Tasks ({} of {}) ", shown, total),
        ViewState::Showing { total, .. } => format!(" Tasks ({}) ", total),
        _ => " Tasks ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .title(Span::styled(title, palette.title_style()));

    if let Some(text) = empty_message(app, &view) {
        let paragraph = Paragraph::new(text)
            .style(palette.hint_style())
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .visible_tasks()
        .into_iter()
        .map(|task| ListItem::new(create_task_line(task, palette, app.is_busy(&task.id))))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(palette.selected_style());
    let mut state = ListState::default().with_selected(Some(app.selected_index));
    f.render_stateful_widget(list, area, &mut state);
}

/// Placeholder text when there is nothing to list
fn empty_message(app: &AppState, view: &ViewState) -> Option<&'static str> {
    match view {
        ViewState::NoTasks if app.loading => Some("Loading tasks..."),
        ViewState::NoTasks => Some("No tasks yet. Press 'a' to add your first task."),
        ViewState::NoMatches => Some("No tasks match the current filters. Press 'C' to clear them."),
        ViewState::Showing { .. } => None,
    }
}

/// Create a single line for a task
/// Format: [x] Title  High  Work  ↻ Every 2 weeks  due Mar 08, 2025  ~45m  [tag]
fn create_task_line(task: &Task, palette: &Palette, busy: bool) -> Line<'static> {
    let mut spans = Vec::new();

    let checkbox = if task.completed { "[x] " } else { "[ ] " };
    spans.push(Span::raw(checkbox));

    let title_style = if task.completed {
        palette.done_style()
    } else {
        palette.default_style()
    };
    spans.push(Span::styled(task.title.clone(), title_style));
    spans.push(Span::raw("  "));

    spans.push(Span::styled(task.priority.name(), palette.priority_style(task.priority)));
    spans.push(Span::styled(format!("  {}", task.category), palette.hint_style()));

    if let Some(label) = task.recurrence_label() {
        spans.push(Span::raw(format!("  ↻ {}", label)));
    }

    // Recurring tasks show their next occurrence
    let due = if task.is_recurring {
        task.next_due.or(task.due_date)
    } else {
        task.due_date
    };
    if let Some(date) = due {
        spans.push(Span::raw(format!("  due {}", format_date(date))));
    }

    if let Some(estimate) = task.estimated_duration.filter(|m| *m > 0) {
        spans.push(Span::raw(format!("  ~{}", format_minutes(estimate))));
    }

    for tag in &task.tags {
        spans.push(Span::styled(format!(" [{}]", tag), palette.tag_style()));
    }

    if busy {
        spans.push(Span::styled("  …", palette.hint_style()));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::fixtures::task;
    use crate::domain::enums::RecurrenceType;
    use crate::domain::Theme;
    use chrono::NaiveDate;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_create_task_line() {
        let mut t = task("t1", "Write essay");
        t.estimated_duration = Some(90);
        t.tags = vec!["school".into()];
        let palette = Palette::for_theme(Theme::Dark);

        let text = line_text(&create_task_line(&t, &palette, false));
        assert!(text.starts_with("[ ] Write essay"));
        assert!(text.contains("Medium"));
        assert!(text.contains("~1h 30m"));
        assert!(text.contains("[school]"));
        assert!(!text.contains('…'));
    }

    #[test]
    fn test_recurring_line_shows_label_and_next_due() {
        let mut t = task("t1", "Gym");
        t.is_recurring = true;
        t.recurrence_type = RecurrenceType::Weekly;
        t.recurrence_interval = 2;
        t.due_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        t.next_due = NaiveDate::from_ymd_opt(2025, 3, 15);
        let palette = Palette::for_theme(Theme::Light);

        let text = line_text(&create_task_line(&t, &palette, true));
        assert!(text.contains("↻ Every 2 weeks"));
        assert!(text.contains("due Mar 15, 2025"));
        assert!(text.ends_with('…'));
    }

    #[test]
    fn test_completed_task_checkbox() {
        let mut t = task("t1", "Done thing");
        t.completed = true;
        let palette = Palette::for_theme(Theme::Dark);
        assert!(line_text(&create_task_line(&t, &palette, false)).starts_with("[x] "));
    }
}
