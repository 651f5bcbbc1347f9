use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::styles::Palette;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the active filters and the search line
pub fn render_filter_bar(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let searching = app.ui_mode == UiMode::Searching;

    let mut search = vec![
        Span::styled("Search: ", palette.title_style()),
        Span::raw(app.filter.search.clone()),
    ];
    if searching {
        search.push(Span::styled("█", palette.title_style()));
    }
    if let Some(summary) = app.search_summary() {
        search.push(Span::styled(format!("   {}", summary), palette.hint_style()));
    }

    let lines = vec![
        Line::styled(app.filter.describe(), palette.default_style()),
        Line::from(search),
    ];

    let border = if searching {
        palette.title_style()
    } else {
        palette.border_style()
    };
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(" Filters ", palette.title_style())),
    );
    f.render_widget(paragraph, area);
}
