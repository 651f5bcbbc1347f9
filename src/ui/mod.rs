pub mod details_pane;
pub mod filter_bar;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod stats_pane;
pub mod styles;
pub mod tracker_pane;

use crate::app::AppState;
use crate::domain::UiMode;
use details_pane::render_details_pane;
use filter_bar::render_filter_bar;
use input_form::render_input_form;
use keybindings::{render_keybindings, render_status_line};
use layout::create_layout;
use list_pane::render_list_pane;
use modal::{render_confirm_modal, render_templates_modal};
use ratatui::{widgets::Block, Frame};
use stats_pane::render_stats_pane;
use styles::Palette;
use tracker_pane::render_tracker;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &mut AppState) {
    let size = f.size();
    let palette = Palette::for_theme(app.theme());
    let layout = create_layout(size);

    // Themed background
    f.render_widget(Block::default().style(palette.default_style()), size);

    render_keybindings(f, app.ui_mode, &palette, layout.keybindings_area);
    render_filter_bar(f, app, &palette, layout.filter_area);
    render_list_pane(f, app, &palette, layout.list_area);
    render_details_pane(f, app, &palette, layout.details_area);
    render_stats_pane(f, app, &palette, layout.stats_area);
    render_status_line(f, app, &palette, layout.status_area);

    match app.ui_mode {
        UiMode::TaskForm => render_input_form(f, app, &palette, size),
        UiMode::TimeTracker => render_tracker(f, app, &palette, size),
        UiMode::Templates => render_templates_modal(f, app, &palette, size),
        UiMode::Confirm => {
            // Deleting an entry keeps the tracker visible underneath
            if app.tracker.is_some() {
                render_tracker(f, app, &palette, size);
            }
            render_confirm_modal(f, app, &palette, size);
        }
        UiMode::Normal | UiMode::Searching => {}
    }
}
