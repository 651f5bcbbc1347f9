use crate::app::AppState;
use crate::domain::{FormField, TaskForm};
use crate::ui::{layout::create_modal_area, styles::Palette};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the add/edit task form
pub fn render_input_form(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    if let Some(form) = &app.form {
        let modal_area = create_modal_area(area, 20);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let lines = form_lines(form, app.form_error.as_deref(), palette);
        let title = format!(" {} ", form.heading());
        let paragraph = Paragraph::new(lines)
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

fn form_lines<'a>(form: &TaskForm, error: Option<&str>, palette: &Palette) -> Vec<Line<'a>> {
    let mut lines = vec![Line::raw("")];

    let row = |field: FormField, label: &'static str, value: String| {
        let focused = form.focused == field;
        let marker = if focused { "> " } else { "  " };
        let mut spans = vec![Span::styled(format!("{}{:<12}", marker, label), label_style(focused, palette))];
        match (focused, field.is_text()) {
            (true, true) => {
                spans.push(Span::raw(value));
                spans.push(Span::styled("█", palette.modal_title_style())); // Cursor
            }
            (true, false) => spans.push(Span::raw(format!("‹ {} ›", value))),
            (false, _) => spans.push(Span::raw(value)),
        }
        Line::from(spans)
    };

    lines.push(row(FormField::Title, "Title", form.title.clone()));
    lines.push(row(FormField::Description, "Description", form.description.clone()));
    lines.push(row(FormField::Category, "Category", form.category.name().to_string()));
    lines.push(row(FormField::Priority, "Priority", form.priority.name().to_string()));
    lines.push(row(FormField::DueDate, "Due date", form.due_date.clone()));
    lines.push(row(FormField::Estimate, "Estimate", form.estimate.clone()));
    lines.push(row(FormField::Tags, "Tags", form.tags.clone()));
    let recurring = if form.is_recurring { "[x]" } else { "[ ]" };
    lines.push(row(FormField::Recurring, "Recurring", recurring.to_string()));
    if form.is_recurring {
        lines.push(row(
            FormField::Interval,
            "Every",
            form.recurrence_interval.to_string(),
        ));
        lines.push(row(
            FormField::Cadence,
            "Cadence",
            form.recurrence_type.unit_label().to_string(),
        ));
    }
    lines.push(Line::raw(""));

    if let Some(error) = error {
        lines.push(Line::styled(format!("  {}", error), palette.error_style()));
        lines.push(Line::raw(""));
    }

    lines.push(Line::styled(
        "  Due date YYYY-MM-DD · estimate in minutes · tags comma-separated",
        palette.hint_style(),
    ));
    lines.push(Line::styled(
        "  Tab switch field · ←/→ change option · Enter save · Esc cancel",
        palette.hint_style(),
    ));
    lines
}

fn label_style(focused: bool, palette: &Palette) -> ratatui::style::Style {
    if focused {
        palette.modal_title_style()
    } else {
        palette.modal_bg_style()
    }
}
