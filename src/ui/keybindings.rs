use crate::app::{AppState, MessageKind};
use crate::domain::UiMode;
use crate::ui::styles::Palette;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Key hints for the current mode
fn hints(mode: UiMode) -> &'static str {
    match mode {
        UiMode::Normal => {
            " ↑/↓ select   Enter done   a add   e edit   d delete   t time   T templates   \
             / search   s/p/c/R filter   C clear   r refresh   x export   L theme   q quit"
        }
        UiMode::Searching => " type to search   Enter keep   Esc clear",
        UiMode::TaskForm => " Tab/↑/↓ field   ←/→ option   Enter save   Esc cancel",
        UiMode::TimeTracker => " Space start/stop   Tab field   Enter log   Del delete entry   Esc close",
        UiMode::Templates => " ↑/↓ select   Enter create   Esc close",
        UiMode::Confirm => " y confirm   n cancel",
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, palette: &Palette, area: Rect) {
    let paragraph = Paragraph::new(hints(mode)).style(palette.hint_style());
    f.render_widget(paragraph, area);
}

/// Render the status line: current message, or request activity
pub fn render_status_line(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    f.render_widget(Paragraph::new(status_line(app, palette)), area);
}

fn status_line<'a>(app: &AppState, palette: &Palette) -> Line<'a> {
    if let Some(message) = &app.message {
        let style = match message.kind {
            MessageKind::Info => palette.info_style(),
            MessageKind::Error => palette.error_style(),
        };
        return Line::from(Span::styled(format!(" {}", message.text), style));
    }

    let pending = app.pending_count();
    let text = if app.loading {
        " Loading tasks...".to_string()
    } else if pending > 0 {
        format!(" {} request(s) in progress", pending)
    } else {
        format!(" {} | {}", app.config.api_url, app.theme().name())
    };
    Line::from(Span::styled(text, palette.hint_style()))
}
