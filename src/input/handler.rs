use crate::app::AppState;
use crate::domain::{DraftField, UiMode};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Searching => handle_search_mode(app, key),
        UiMode::TaskForm => handle_form_mode(app, key),
        UiMode::TimeTracker => handle_tracker_mode(app, key),
        UiMode::Templates => handle_templates_mode(app, key),
        UiMode::Confirm => handle_confirm_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => return Ok(true),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        // Task actions
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('a') | KeyCode::Char('n') => app.open_create_form(),
        KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('t') => app.open_tracker(),
        KeyCode::Char('T') => app.open_templates(),

        // Filters
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('s') => app.cycle_status_filter(),
        KeyCode::Char('p') => app.cycle_priority_filter(),
        KeyCode::Char('c') => app.cycle_category_filter(),
        KeyCode::Char('R') => app.cycle_recurring_filter(),
        KeyCode::Char('C') => app.clear_filters(),
        KeyCode::Esc => {
            if app.filter.is_active() {
                app.clear_filters();
            }
        }

        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('x') => app.export(),
        KeyCode::Char('L') => app.toggle_theme(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while typing a search query
fn handle_search_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.finish_search(),
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) => app.search_input(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the add/edit form
fn handle_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.cancel_form();
            return Ok(false);
        }
        KeyCode::Enter => {
            app.submit_form();
            return Ok(false);
        }
        _ => {}
    }

    if let Some(form) = &mut app.form {
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => form.cycle_option(false),
            KeyCode::Right => form.cycle_option(true),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.input_char(c),
            _ => {}
        }
    }
    Ok(false)
}

/// Handle keys in the time tracker
fn handle_tracker_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let on_duration = app
        .tracker
        .as_ref()
        .is_some_and(|t| t.draft_field == DraftField::Duration);

    match key.code {
        KeyCode::Esc => app.close_tracker(),
        KeyCode::Char('s') if ctrl => app.tracker_toggle(Local::now()),
        // Space starts/stops while the numeric field has focus
        KeyCode::Char(' ') if on_duration => app.tracker_toggle(Local::now()),
        KeyCode::Enter => app.commit_entry(),
        KeyCode::Delete => app.request_delete_entry(),
        KeyCode::Up => {
            if let Some(tracker) = &mut app.tracker {
                tracker.select_prev_entry();
            }
        }
        KeyCode::Down => {
            if let Some(tracker) = &mut app.tracker {
                tracker.select_next_entry();
            }
        }
        KeyCode::Tab | KeyCode::BackTab => {
            if let Some(tracker) = &mut app.tracker {
                tracker.switch_draft_field();
            }
        }
        KeyCode::Backspace => {
            if let Some(tracker) = &mut app.tracker {
                tracker.draft_backspace();
            }
        }
        KeyCode::Char(c) if !ctrl => {
            if let Some(tracker) = &mut app.tracker {
                tracker.draft_input(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the templates modal
fn handle_templates_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_templates(),
        KeyCode::Up | KeyCode::Char('k') => app.template_up(),
        KeyCode::Down | KeyCode::Char('j') => app.template_down(),
        KeyCode::Enter => app.create_from_template(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in a yes/no confirmation
fn handle_confirm_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_confirm(),
        _ => {}
    }
    Ok(false)
}
