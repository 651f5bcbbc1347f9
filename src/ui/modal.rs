use crate::app::{AppState, TemplatePicker};
use crate::domain::format_minutes;
use crate::ui::{layout::create_modal_area, styles::Palette};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the yes/no confirmation modal
pub fn render_confirm_modal(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    if let Some(confirm) = &app.confirm {
        let modal_area = create_modal_area(area, 7);

        // Clear the area behind the modal
        f.render_widget(Clear, modal_area);

        let lines = vec![
            Line::raw(""),
            Line::raw(format!("  {}", confirm.message)),
            Line::raw(""),
            Line::from(vec![
                Span::styled("  [y]", palette.modal_title_style()),
                Span::raw(" Yes   "),
                Span::styled("[n]", palette.modal_title_style()),
                Span::raw(" No"),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" Confirm ", palette.modal_title_style()))
                    .style(palette.modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

/// Render the template picker
pub fn render_templates_modal(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    if let Some(picker) = &app.templates {
        let height = (picker.templates.len() as u16).saturating_add(6).clamp(8, 24);
        let modal_area = create_modal_area(area, height);
        f.render_widget(Clear, modal_area);

        let paragraph = Paragraph::new(template_lines(picker, palette))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" Templates ", palette.modal_title_style()))
                    .style(palette.modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

fn template_lines<'a>(picker: &TemplatePicker, palette: &Palette) -> Vec<Line<'a>> {
    let mut lines = vec![Line::raw("")];

    if picker.loading {
        lines.push(Line::styled("  Loading templates...", palette.hint_style()));
    } else if picker.templates.is_empty() {
        lines.push(Line::styled("  No templates available", palette.hint_style()));
    } else {
        for (i, template) in picker.templates.iter().enumerate() {
            let selected = i == picker.selected;
            let marker = if selected { "> " } else { "  " };
            let mut text = format!(
                "{}{}  ({}, {})",
                marker,
                template.name,
                template.category.name(),
                template.priority.name()
            );
            if let Some(estimate) = template.estimated_duration.filter(|m| *m > 0) {
                text.push_str(&format!("  ~{}", format_minutes(estimate)));
            }
            if template.is_recurring {
                text.push_str("  ↻");
            }
            let style = if selected {
                palette.selected_style()
            } else {
                palette.modal_bg_style()
            };
            lines.push(Line::styled(text, style));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "  ↑/↓ select · Enter create task · Esc close",
        palette.hint_style(),
    ));
    lines
}
