use crate::domain::{Priority, Theme};
use ratatui::style::{Color, Modifier, Style};

/// Colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    fg: Color,
    muted: Color,
    accent: Color,
    highlight_fg: Color,
    highlight_bg: Color,
    modal_bg: Color,
    warn: Color,
    error: Color,
    success: Color,
    tag: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                fg: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                highlight_fg: Color::Black,
                highlight_bg: Color::LightCyan,
                modal_bg: Color::DarkGray,
                warn: Color::Yellow,
                error: Color::Red,
                success: Color::Green,
                tag: Color::Blue,
            },
            Theme::Light => Self {
                fg: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                highlight_fg: Color::White,
                highlight_bg: Color::Blue,
                modal_bg: Color::White,
                warn: Color::Rgb(180, 110, 0),
                error: Color::Red,
                success: Color::Rgb(0, 130, 60),
                tag: Color::Magenta,
            },
        }
    }

    /// Default text style
    pub fn default_style(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Selected row highlight style
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Title style for panes
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Modal background style
    pub fn modal_bg_style(&self) -> Style {
        Style::default().bg(self.modal_bg).fg(self.fg)
    }

    pub fn modal_title_style(&self) -> Style {
        Style::default().fg(self.warn).add_modifier(Modifier::BOLD)
    }

    /// Keybinding hint style
    pub fn hint_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Completed task style
    pub fn done_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::CROSSED_OUT)
    }

    /// Running timer
    pub fn running_style(&self) -> Style {
        Style::default().fg(self.success).add_modifier(Modifier::BOLD)
    }

    pub fn tag_style(&self) -> Style {
        Style::default().fg(self.tag)
    }

    pub fn gauge_style(&self) -> Style {
        Style::default().fg(self.success).bg(self.muted)
    }

    pub fn priority_style(&self, priority: Priority) -> Style {
        match priority {
            Priority::High => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
            Priority::Medium => Style::default().fg(self.warn),
            Priority::Low => Style::default().fg(self.success),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_themes_differ() {
        let dark = Palette::for_theme(Theme::Dark);
        let light = Palette::for_theme(Theme::Light);
        assert_ne!(dark, light);
        assert_ne!(dark.default_style(), light.default_style());
    }

    #[test]
    fn test_high_priority_stands_out() {
        let p = Palette::for_theme(Theme::Dark);
        assert!(p.priority_style(Priority::High).add_modifier.contains(Modifier::BOLD));
        assert!(!p.priority_style(Priority::Low).add_modifier.contains(Modifier::BOLD));
    }
}
