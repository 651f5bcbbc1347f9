use crate::app::AppState;
use crate::domain::{format_minutes, Priority};
use crate::report::TaskStats;
use crate::ui::styles::Palette;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render the statistics pane over all loaded tasks
pub fn render_stats_pane(f: &mut Frame, app: &AppState, palette: &Palette, area: Rect) {
    let stats = app.stats();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .title(Span::styled(" Stats ", palette.title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(palette.gauge_style())
        .percent(stats.completion_rate.min(100) as u16)
        .label(format!("{}% complete", stats.completion_rate));
    f.render_widget(gauge, chunks[0]);

    let paragraph = Paragraph::new(stats_lines(&stats, palette)).style(palette.default_style());
    f.render_widget(paragraph, chunks[1]);
}

fn stats_lines<'a>(stats: &TaskStats, palette: &Palette) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::raw(format!(
            "{} total  {} done  {} pending",
            stats.total, stats.completed, stats.pending
        )),
        Line::from(
            Priority::all()
                .iter()
                .flat_map(|p| {
                    [
                        Span::styled(format!("{} ", p.name()), palette.priority_style(*p)),
                        Span::raw(format!("{}  ", stats.by_priority.get(*p))),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
        Line::raw(format!("{} recurring  {} one-time", stats.recurring, stats.one_time)),
    ];

    // Only categories that are in use
    let used: Vec<String> = stats
        .by_category
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(category, count)| format!("{} {}", category.name(), count))
        .collect();
    if !used.is_empty() {
        lines.push(Line::styled(used.join("  "), palette.hint_style()));
    }

    if stats.estimated_minutes > 0 || stats.actual_minutes > 0 {
        lines.push(Line::raw(format!(
            "Time: {} est / {} actual",
            format_minutes(stats.estimated_minutes.min(u32::MAX as u64) as u32),
            format_minutes(stats.actual_minutes.min(u32::MAX as u64) as u32),
        )));
        lines.push(Line::raw(format!("Accuracy: {}%", stats.time_accuracy)));
    }

    lines
}
