use crate::api::{ApiError, ApiReply, ApiRequest, ApiResponse, Dispatch, Export, RequestId};
use crate::config::Config;
use crate::domain::{format_date, FilterConfig, FormMode, Id, Task, TaskForm, Template, Theme, TimeTracker, UiMode, ViewState};
use crate::files::{atomic_write, ensure_dir, unique_path};
use crate::notifications;
use crate::report::{calculate_stats, TaskStats};
use crate::store::TaskStore;
use crate::ticker;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const STILL_IN_PROGRESS: &str = "Still in progress. Please wait.";
pub const DEFAULT_EXPORT_NAME: &str = "tasks_export.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Footer message that disappears after a while
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    pub expires_at: DateTime<Local>,
}

/// A destructive action waiting for a yes/no
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask(Id),
    DeleteTimeEntry { task_id: Id, entry_id: Id },
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub action: ConfirmAction,
    pub message: String,
    /// Mode to go back to once answered
    pub return_to: UiMode,
}

/// Templates modal state
#[derive(Debug, Clone, Default)]
pub struct TemplatePicker {
    pub templates: Vec<Template>,
    pub selected: usize,
    pub loading: bool,
}

impl TemplatePicker {
    pub fn selected_template(&self) -> Option<&Template> {
        self.templates.get(self.selected)
    }
}

/// Main application state
pub struct AppState {
    pub store: TaskStore,
    pub filter: FilterConfig,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub form: Option<TaskForm>,
    /// Validation error shown inside the form
    pub form_error: Option<String>,
    pub tracker: Option<TimeTracker>,
    pub templates: Option<TemplatePicker>,
    pub confirm: Option<ConfirmState>,
    pub message: Option<StatusMessage>,
    /// A task fetch is outstanding
    pub loading: bool,
    pub config: Config,
    config_path: Option<PathBuf>,
    download_dir: PathBuf,
    pending: HashMap<RequestId, ApiRequest>,
    dispatch: Box<dyn Dispatch>,
}

impl AppState {
    pub fn new(config: Config, config_path: Option<PathBuf>, download_dir: PathBuf, dispatch: Box<dyn Dispatch>) -> Self {
        Self {
            store: TaskStore::default(),
            filter: FilterConfig::default(),
            selected_index: 0,
            ui_mode: UiMode::Normal,
            form: None,
            form_error: None,
            tracker: None,
            templates: None,
            confirm: None,
            message: None,
            loading: false,
            config,
            config_path,
            download_dir,
            pending: HashMap::new(),
            dispatch,
        }
    }

    pub fn theme(&self) -> Theme {
        self.config.theme
    }

    /// Number of requests still waiting for a reply
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether a request that mutates `task_id` is outstanding
    pub fn is_busy(&self, task_id: &Id) -> bool {
        self.pending.values().any(|r| r.target() == Some(task_id))
    }

    fn has_pending(&self, pred: impl Fn(&ApiRequest) -> bool) -> bool {
        self.pending.values().any(pred)
    }

    /// Tasks that pass the current filter, in store order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.filter.apply(self.store.tasks())
    }

    pub fn view_state(&self) -> ViewState {
        self.filter.view_state(self.visible_tasks().len(), self.store.len())
    }

    pub fn search_summary(&self) -> Option<String> {
        self.filter.search_summary(self.visible_tasks().len())
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.filter
            .apply(self.store.tasks())
            .into_iter()
            .nth(self.selected_index)
    }

    pub fn stats(&self) -> TaskStats {
        calculate_stats(self.store.tasks())
    }

    fn show(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            kind,
            expires_at: Local::now() + ticker::message_ttl(),
        });
    }

    pub fn show_info(&mut self, text: impl Into<String>) {
        self.show(MessageKind::Info, text);
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.show(MessageKind::Error, text);
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.visible_tasks().len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    pub fn start_search(&mut self) {
        self.ui_mode = UiMode::Searching;
    }

    pub fn search_input(&mut self, c: char) {
        self.filter.search.push(c);
        self.selected_index = 0;
    }

    pub fn search_backspace(&mut self) {
        self.filter.search.pop();
        self.clamp_selection();
    }

    /// Leave search mode keeping the query
    pub fn finish_search(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    /// Leave search mode and drop the query
    pub fn cancel_search(&mut self) {
        self.filter.search.clear();
        self.ui_mode = UiMode::Normal;
        self.clamp_selection();
    }

    pub fn cycle_status_filter(&mut self) {
        self.filter.status = self.filter.status.next();
        self.clamp_selection();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.filter.cycle_priority();
        self.clamp_selection();
    }

    pub fn cycle_category_filter(&mut self) {
        self.filter.cycle_category();
        self.clamp_selection();
    }

    pub fn cycle_recurring_filter(&mut self) {
        self.filter.recurring = self.filter.recurring.next();
        self.clamp_selection();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.clamp_selection();
    }

    /// Send a request unless its task already has one outstanding
    fn issue(&mut self, request: ApiRequest) -> Option<RequestId> {
        if let Some(task_id) = request.target() {
            if self.is_busy(task_id) {
                debug!(task = %task_id, action = request.action(), "rejected, task busy");
                self.show_error(STILL_IN_PROGRESS);
                return None;
            }
        }

        match self.dispatch.send(request.clone()) {
            Ok(id) => {
                self.pending.insert(id, request);
                Some(id)
            }
            Err(e) => {
                warn!(action = request.action(), error = %e, "could not issue request");
                self.show_error(request.failure_message());
                None
            }
        }
    }

    /// Fetch the task list. A fetch already in flight is not repeated.
    pub fn refresh(&mut self) {
        if self.has_pending(|r| matches!(r, ApiRequest::ListTasks)) {
            return;
        }
        if self.issue(ApiRequest::ListTasks).is_some() {
            self.loading = true;
        }
    }

    /// Drain finished requests and merge them in
    pub fn poll_replies(&mut self) {
        for reply in self.dispatch.poll() {
            self.handle_reply(reply);
        }
    }

    pub fn handle_reply(&mut self, reply: ApiReply) {
        let Some(request) = self.pending.remove(&reply.id) else {
            debug!(request = %reply.id, "ignoring reply for unknown request");
            return;
        };
        match reply.result {
            Ok(response) => self.apply_response(request, response),
            Err(e) => self.request_failed(&request, &e),
        }
    }

    fn request_failed(&mut self, request: &ApiRequest, error: &ApiError) {
        warn!(action = request.action(), error = %error, "backend request failed");
        match request {
            ApiRequest::ListTasks => self.loading = false,
            ApiRequest::ListTemplates => {
                if let Some(picker) = &mut self.templates {
                    picker.loading = false;
                }
            }
            _ => {}
        }
        self.show_error(request.failure_message());
    }

    fn apply_response(&mut self, request: ApiRequest, response: ApiResponse) {
        match (request, response) {
            (ApiRequest::ListTasks, ApiResponse::Tasks(tasks)) => {
                info!(count = tasks.len(), "tasks loaded");
                self.store.replace_all(tasks);
                self.loading = false;
                self.clamp_selection();
            }
            (ApiRequest::CreateTask(_), ApiResponse::Task(task)) => {
                let title = task.title.clone();
                self.store.insert(task);
                if matches!(self.form.as_ref().map(|f| &f.mode), Some(FormMode::Create)) {
                    self.close_form();
                }
                self.show_info(format!("Created \"{}\"", title));
            }
            (ApiRequest::UpdateTask(id, _), ApiResponse::Task(task)) => {
                let title = task.title.clone();
                self.store.replace(task);
                if matches!(self.form.as_ref().map(|f| &f.mode), Some(FormMode::Edit(edited)) if *edited == id) {
                    self.close_form();
                }
                self.show_info(format!("Updated \"{}\"", title));
            }
            (ApiRequest::ToggleTask(id), ApiResponse::Task(task)) => {
                let (was_completed, previous_last) = self
                    .store
                    .get(&id)
                    .map(|t| (t.completed, t.last_completed))
                    .unwrap_or((false, None));
                // Recurring tasks come back pending with a new last_completed
                let just_completed = (task.completed && !was_completed)
                    || (task.last_completed.is_some() && task.last_completed != previous_last);
                if just_completed {
                    notifications::notify_task_completed(&task.title);
                    match (task.is_recurring, task.next_due) {
                        (true, Some(next)) => self.show_info(format!(
                            "Completed \"{}\", next due {}",
                            task.title,
                            format_date(next)
                        )),
                        _ => self.show_info(format!("Completed \"{}\"", task.title)),
                    }
                }
                self.store.replace(task);
                self.clamp_selection();
            }
            (ApiRequest::DeleteTask(id), ApiResponse::Deleted) => {
                self.store.remove(&id);
                self.clamp_selection();
                self.show_info("Task deleted");
            }
            (ApiRequest::ExportTasks, ApiResponse::Export(export)) => match self.save_export(&export) {
                Ok(path) => {
                    info!(path = %path.display(), bytes = export.bytes.len(), "export saved");
                    self.show_info(format!("Exported to {}", path.display()));
                }
                Err(e) => {
                    warn!(error = %e, "could not save export");
                    self.show_error(format!("Failed to save export: {}", e));
                }
            },
            (ApiRequest::ListTemplates, ApiResponse::Templates(templates)) => {
                if let Some(picker) = &mut self.templates {
                    picker.templates = templates;
                    picker.selected = 0;
                    picker.loading = false;
                }
            }
            (ApiRequest::CreateFromTemplate(_), ApiResponse::Task(task)) => {
                let title = task.title.clone();
                self.store.insert(task);
                if self.ui_mode == UiMode::Templates {
                    self.close_templates();
                }
                self.show_info(format!("Created \"{}\" from template", title));
            }
            (ApiRequest::AddTimeEntry(task_id, _), ApiResponse::TimeEntry(entry)) => {
                self.store.append_time_entry(&task_id, entry.clone());
                if let Some(tracker) = self.tracker.as_mut().filter(|t| t.task_id == task_id) {
                    tracker.commit_succeeded(entry);
                }
                self.show_info("Time entry added");
                // actual_duration is owned by the backend
                self.refresh();
            }
            (ApiRequest::DeleteTimeEntry { task_id, entry_id }, ApiResponse::Deleted) => {
                self.store.remove_time_entry(&task_id, &entry_id);
                if let Some(tracker) = self.tracker.as_mut().filter(|t| t.task_id == task_id) {
                    tracker.remove_entry(&entry_id);
                }
                self.show_info("Time entry deleted");
                self.refresh();
            }
            (request, response) => {
                warn!(action = request.action(), ?response, "reply does not match request");
            }
        }
    }

    fn save_export(&self, export: &Export) -> Result<PathBuf> {
        let name = export.filename.as_deref().unwrap_or(DEFAULT_EXPORT_NAME);
        ensure_dir(&self.download_dir)?;
        let path = unique_path(&self.download_dir, name);
        atomic_write(&path, &export.bytes)?;
        Ok(path)
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
            self.issue(ApiRequest::ToggleTask(id));
        }
    }

    /// Ask before deleting the selected task
    pub fn request_delete(&mut self) {
        let Some((id, title)) = self.selected_task().map(|t| (t.id.clone(), t.title.clone())) else {
            return;
        };
        if self.is_busy(&id) {
            self.show_error(STILL_IN_PROGRESS);
            return;
        }
        self.confirm = Some(ConfirmState {
            action: ConfirmAction::DeleteTask(id),
            message: format!("Delete \"{}\"? This cannot be undone.", title),
            return_to: UiMode::Normal,
        });
        self.ui_mode = UiMode::Confirm;
    }

    pub fn confirm(&mut self) {
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        self.ui_mode = confirm.return_to;
        let request = match confirm.action {
            ConfirmAction::DeleteTask(id) => ApiRequest::DeleteTask(id),
            ConfirmAction::DeleteTimeEntry { task_id, entry_id } => ApiRequest::DeleteTimeEntry { task_id, entry_id },
        };
        self.issue(request);
    }

    pub fn cancel_confirm(&mut self) {
        if let Some(confirm) = self.confirm.take() {
            self.ui_mode = confirm.return_to;
        }
    }

    pub fn export(&mut self) {
        if self.has_pending(|r| matches!(r, ApiRequest::ExportTasks)) {
            self.show_error(STILL_IN_PROGRESS);
            return;
        }
        if self.issue(ApiRequest::ExportTasks).is_some() {
            self.show_info("Exporting...");
        }
    }

    pub fn toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggled();
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save(path) {
                warn!(error = %e, "could not persist theme");
                self.show_error("Failed to save theme");
            }
        }
    }

    pub fn open_create_form(&mut self) {
        self.form = Some(TaskForm::new());
        self.form_error = None;
        self.ui_mode = UiMode::TaskForm;
    }

    pub fn open_edit_form(&mut self) {
        let Some(form) = self.selected_task().map(TaskForm::edit) else {
            return;
        };
        if let FormMode::Edit(id) = &form.mode {
            if self.is_busy(id) {
                self.show_error(STILL_IN_PROGRESS);
                return;
            }
        }
        self.form = Some(form);
        self.form_error = None;
        self.ui_mode = UiMode::TaskForm;
    }

    /// Validate and send the draft. The form stays open until the backend
    /// confirms.
    pub fn submit_form(&mut self) {
        let Some(form) = &self.form else {
            return;
        };
        let mode = form.mode.clone();
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.form_error = Some(e.to_string());
                return;
            }
        };
        if self.has_pending(|r| matches!(r, ApiRequest::CreateTask(_) | ApiRequest::UpdateTask(..))) {
            self.form_error = Some(STILL_IN_PROGRESS.to_string());
            return;
        }
        self.form_error = None;
        let request = match mode {
            FormMode::Create => ApiRequest::CreateTask(draft),
            FormMode::Edit(id) => ApiRequest::UpdateTask(id, draft),
        };
        self.issue(request);
    }

    fn close_form(&mut self) {
        self.form = None;
        self.form_error = None;
        if self.ui_mode == UiMode::TaskForm {
            self.ui_mode = UiMode::Normal;
        }
    }

    /// Throw the draft away
    pub fn cancel_form(&mut self) {
        if self.form.is_some() {
            debug!("form draft discarded");
        }
        self.close_form();
    }

    pub fn open_tracker(&mut self) {
        let interval = self.config.timer_poll_interval();
        let Some(tracker) = self.selected_task().map(|task| TimeTracker::new(task, interval)) else {
            return;
        };
        self.tracker = Some(tracker);
        self.ui_mode = UiMode::TimeTracker;
    }

    pub fn tracker_toggle(&mut self, now: DateTime<Local>) {
        if let Some(tracker) = &mut self.tracker {
            tracker.toggle(now);
        }
    }

    /// Send the draft entry, or report why it can't be sent
    pub fn commit_entry(&mut self) {
        let Some(tracker) = &self.tracker else {
            return;
        };
        let task_id = tracker.task_id.clone();
        match tracker.prepare_commit() {
            Ok(entry) => {
                self.issue(ApiRequest::AddTimeEntry(task_id, entry));
            }
            Err(e) => self.show_error(e.to_string()),
        }
    }

    pub fn request_delete_entry(&mut self) {
        let Some(tracker) = &self.tracker else {
            return;
        };
        let Some(entry) = tracker.selected_entry() else {
            return;
        };
        let action = ConfirmAction::DeleteTimeEntry {
            task_id: tracker.task_id.clone(),
            entry_id: entry.id.clone(),
        };
        self.confirm = Some(ConfirmState {
            action,
            message: "Delete this time entry?".to_string(),
            return_to: UiMode::TimeTracker,
        });
        self.ui_mode = UiMode::Confirm;
    }

    pub fn close_tracker(&mut self) {
        if let Some(tracker) = self.tracker.take() {
            let task_id = tracker.task_id.clone();
            let discarded = tracker.close();
            if discarded.was_running {
                info!(
                    task = %task_id,
                    minutes = discarded.elapsed_minutes,
                    "running timer discarded"
                );
            }
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn open_templates(&mut self) {
        self.templates = Some(TemplatePicker {
            loading: true,
            ..TemplatePicker::default()
        });
        self.ui_mode = UiMode::Templates;
        if self.issue(ApiRequest::ListTemplates).is_none() {
            if let Some(picker) = &mut self.templates {
                picker.loading = false;
            }
        }
    }

    pub fn template_up(&mut self) {
        if let Some(picker) = &mut self.templates {
            picker.selected = picker.selected.saturating_sub(1);
        }
    }

    pub fn template_down(&mut self) {
        if let Some(picker) = &mut self.templates {
            if picker.selected + 1 < picker.templates.len() {
                picker.selected += 1;
            }
        }
    }

    pub fn create_from_template(&mut self) {
        let Some(id) = self
            .templates
            .as_ref()
            .and_then(|p| p.selected_template())
            .map(|t| t.id.clone())
        else {
            return;
        };
        if self.has_pending(|r| matches!(r, ApiRequest::CreateFromTemplate(_))) {
            self.show_error(STILL_IN_PROGRESS);
            return;
        }
        self.issue(ApiRequest::CreateFromTemplate(id));
    }

    pub fn close_templates(&mut self) {
        self.templates = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Per-tick housekeeping: timer poll and message expiry
    pub fn tick(&mut self, now: DateTime<Local>) {
        if let Some(tracker) = &mut self.tracker {
            tracker.poll(now);
        }
        if self.message.as_ref().is_some_and(|m| now >= m.expires_at) {
            self.message = None;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::fake::{InlineDispatch, MemoryApi};
    use crate::domain::enums::RecurrenceType;
    use crate::domain::{Category, StatusFilter};
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::tempdir;

    pub(crate) fn create_test_app_with(api: MemoryApi) -> (AppState, Arc<MemoryApi>) {
        let api = Arc::new(api);
        let dispatch = InlineDispatch::new(Arc::clone(&api));
        let mut app = AppState::new(Config::default(), None, std::env::temp_dir(), Box::new(dispatch));
        app.refresh();
        app.poll_replies();
        (app, api)
    }

    pub(crate) fn create_test_app() -> (AppState, Arc<MemoryApi>) {
        create_test_app_with(MemoryApi::with_titles(&["Task 1", "Task 2"]))
    }

    fn message_text(app: &AppState) -> Option<&str> {
        app.message.as_ref().map(|m| m.text.as_str())
    }

    #[test]
    fn test_refresh_loads_tasks() {
        let api = Arc::new(MemoryApi::with_titles(&["a", "b", "c"]));
        let dispatch = InlineDispatch::new(Arc::clone(&api));
        let mut app = AppState::new(Config::default(), None, std::env::temp_dir(), Box::new(dispatch));

        app.refresh();
        assert!(app.loading);
        assert!(app.store.is_empty());

        app.poll_replies();
        assert!(!app.loading);
        assert_eq!(app.store.len(), 3);
        assert_eq!(app.view_state(), ViewState::Showing { shown: 3, total: 3 });
    }

    #[test]
    fn test_move_selection() {
        let (mut app, _) = create_test_app();

        app.move_selection_down();
        assert_eq!(app.selected_index, 1);
        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_empty_title_blocks_locally() {
        let (mut app, api) = create_test_app();
        let calls = api.calls();

        app.open_create_form();
        app.submit_form();

        assert_eq!(app.form_error.as_deref(), Some("Title is required"));
        assert_eq!(app.pending_count(), 0);
        assert_eq!(api.calls(), calls);
        assert_eq!(app.ui_mode, UiMode::TaskForm);
    }

    #[test]
    fn test_create_task_merges_only_after_reply() {
        let (mut app, _) = create_test_app();

        app.open_create_form();
        app.form.as_mut().unwrap().title = "Buy milk".into();
        app.submit_form();

        assert_eq!(app.pending_count(), 1);
        assert_eq!(app.store.len(), 2);
        assert!(app.form.is_some());

        app.poll_replies();
        assert_eq!(app.store.len(), 3);
        assert_eq!(app.store.tasks()[2].title, "Buy milk");
        assert!(app.form.is_none());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_second_submit_rejected_while_pending() {
        let (mut app, _) = create_test_app();

        app.open_create_form();
        app.form.as_mut().unwrap().title = "Once".into();
        app.submit_form();
        app.submit_form();

        assert_eq!(app.pending_count(), 1);
        assert_eq!(app.form_error.as_deref(), Some(STILL_IN_PROGRESS));

        app.poll_replies();
        assert_eq!(app.store.len(), 3);
    }

    #[test]
    fn test_edit_task() {
        let (mut app, _) = create_test_app();
        app.move_selection_down();

        app.open_edit_form();
        assert_eq!(app.form.as_ref().unwrap().title, "Task 2");
        app.form.as_mut().unwrap().title = "Task 2 (renamed)".into();
        app.submit_form();
        app.poll_replies();

        assert_eq!(app.store.tasks()[1].title, "Task 2 (renamed)");
        assert!(app.form.is_none());
    }

    #[test]
    fn test_toggle_guard_rejects_second_mutation() {
        let (mut app, api) = create_test_app();
        let calls = api.calls();

        app.toggle_selected();
        app.toggle_selected();
        app.request_delete();

        assert_eq!(app.pending_count(), 1);
        assert_eq!(message_text(&app), Some(STILL_IN_PROGRESS));
        assert!(app.confirm.is_none());

        app.poll_replies();
        assert_eq!(api.calls(), calls + 1);
        assert!(app.store.tasks()[0].completed);
        assert_eq!(message_text(&app), Some("Completed \"Task 1\""));
    }

    #[test]
    fn test_completion_detected_without_last_completed() {
        let (mut app, _) = create_test_app();
        let mut done = app.store.tasks()[0].clone();
        let id = app.issue(ApiRequest::ToggleTask(done.id.clone())).unwrap();

        done.completed = true;
        done.last_completed = None;
        app.handle_reply(ApiReply {
            id,
            result: Ok(ApiResponse::Task(done)),
        });

        assert!(app.store.tasks()[0].completed);
        assert_eq!(message_text(&app), Some("Completed \"Task 1\""));
    }

    #[test]
    fn test_uncompleting_gives_no_completion_message() {
        let (mut app, _) = create_test_app();
        app.toggle_selected();
        app.poll_replies();
        app.message = None;

        app.toggle_selected();
        app.poll_replies();

        assert!(!app.store.tasks()[0].completed);
        assert_eq!(message_text(&app), None);
    }

    #[test]
    fn test_failure_leaves_state_untouched() {
        let (mut app, api) = create_test_app();
        api.set_failing(true);

        app.toggle_selected();
        app.poll_replies();

        assert!(!app.store.tasks()[0].completed);
        let message = app.message.as_ref().unwrap();
        assert_eq!(message.text, "Failed to toggle task. Please try again.");
        assert_eq!(message.kind, MessageKind::Error);
        assert_eq!(app.pending_count(), 0);
    }

    #[test]
    fn test_refresh_failure_clears_loading() {
        let (mut app, api) = create_test_app();
        api.set_failing(true);

        app.refresh();
        app.poll_replies();

        assert!(!app.loading);
        assert_eq!(app.store.len(), 2);
        assert_eq!(message_text(&app), Some("Failed to fetch tasks. Please try again."));
    }

    #[test]
    fn test_recurring_toggle_shows_next_due() {
        let mut task = crate::domain::task::fixtures::task("r1", "Water plants");
        task.is_recurring = true;
        task.recurrence_type = RecurrenceType::Weekly;
        let (mut app, _) = create_test_app_with(MemoryApi::with_tasks(vec![task]));

        app.toggle_selected();
        app.poll_replies();

        let task = &app.store.tasks()[0];
        assert!(!task.completed);
        assert!(task.next_due.is_some());
        assert!(message_text(&app).unwrap().contains("next due"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (mut app, api) = create_test_app();
        let calls = api.calls();

        app.request_delete();
        assert_eq!(app.ui_mode, UiMode::Confirm);
        assert_eq!(app.pending_count(), 0);

        app.cancel_confirm();
        assert_eq!(app.ui_mode, UiMode::Normal);
        app.poll_replies();
        assert_eq!(app.store.len(), 2);
        assert_eq!(api.calls(), calls);

        app.request_delete();
        app.confirm();
        app.poll_replies();
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.tasks()[0].title, "Task 2");
    }

    #[test]
    fn test_delete_last_visible_clamps_selection() {
        let (mut app, _) = create_test_app();
        app.move_selection_down();

        app.request_delete();
        app.confirm();
        app.poll_replies();

        assert_eq!(app.selected_index, 0);
        assert_eq!(app.selected_task().unwrap().title, "Task 1");
    }

    #[test]
    fn test_zero_duration_commit_sends_nothing() {
        let (mut app, api) = create_test_app();
        let calls = api.calls();

        app.open_tracker();
        assert_eq!(app.ui_mode, UiMode::TimeTracker);
        app.commit_entry();

        assert_eq!(message_text(&app), Some("Please enter a valid duration"));
        assert_eq!(app.pending_count(), 0);
        assert_eq!(api.calls(), calls);
    }

    #[test]
    fn test_commit_entry_updates_tracker_and_store() {
        let (mut app, _) = create_test_app();
        app.open_tracker();

        app.tracker.as_mut().unwrap().draft.duration = 15;
        app.commit_entry();
        app.poll_replies();
        app.tracker.as_mut().unwrap().draft.duration = 20;
        app.commit_entry();
        app.poll_replies();

        let tracker = app.tracker.as_ref().unwrap();
        assert_eq!(tracker.entries.len(), 2);
        assert_eq!(tracker.total_actual(), 35);
        assert_eq!(tracker.draft.duration, 0);
        assert_eq!(app.store.tasks()[0].time_entries.len(), 2);
    }

    #[test]
    fn test_entry_changes_refetch_actual_duration() {
        let (mut app, _) = create_test_app();
        app.open_tracker();
        app.tracker.as_mut().unwrap().draft.duration = 15;
        app.commit_entry();

        app.poll_replies();
        assert!(app.loading);
        app.poll_replies();
        assert!(!app.loading);
        assert_eq!(app.store.tasks()[0].actual_duration, Some(15));
        assert_eq!(app.stats().actual_minutes, 15);

        app.request_delete_entry();
        app.confirm();
        app.poll_replies();
        app.poll_replies();
        assert_eq!(app.stats().actual_minutes, 0);
    }

    #[test]
    fn test_delete_entry_goes_back_to_tracker() {
        let (mut app, _) = create_test_app();
        app.open_tracker();
        app.tracker.as_mut().unwrap().draft.duration = 10;
        app.commit_entry();
        app.poll_replies();

        app.request_delete_entry();
        assert_eq!(app.ui_mode, UiMode::Confirm);
        app.confirm();
        assert_eq!(app.ui_mode, UiMode::TimeTracker);
        app.poll_replies();

        assert!(app.tracker.as_ref().unwrap().entries.is_empty());
        assert!(app.store.tasks()[0].time_entries.is_empty());
    }

    #[test]
    fn test_entry_reply_after_close_still_reaches_store() {
        let (mut app, _) = create_test_app();
        app.open_tracker();
        app.tracker.as_mut().unwrap().draft.duration = 5;
        app.commit_entry();
        app.close_tracker();

        app.poll_replies();
        assert!(app.tracker.is_none());
        assert_eq!(app.store.tasks()[0].time_entries.len(), 1);
    }

    #[test]
    fn test_close_running_tracker_discards_timer() {
        let (mut app, _) = create_test_app();
        let now = Local::now();
        app.open_tracker();
        app.tracker_toggle(now);
        app.tick(now + Duration::minutes(3));
        assert_eq!(app.tracker.as_ref().unwrap().elapsed_minutes, 3);

        app.close_tracker();
        assert!(app.tracker.is_none());
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.pending_count(), 0);
    }

    #[test]
    fn test_filter_clamps_selection() {
        let (mut app, _) = create_test_app();
        app.move_selection_down();

        app.cycle_status_filter();
        assert_eq!(app.filter.status, StatusFilter::Pending);
        assert_eq!(app.selected_index, 1);

        app.cycle_status_filter();
        assert_eq!(app.filter.status, StatusFilter::Completed);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.view_state(), ViewState::NoMatches);
        assert!(app.selected_task().is_none());

        app.clear_filters();
        assert_eq!(app.view_state(), ViewState::Showing { shown: 2, total: 2 });
    }

    #[test]
    fn test_search_summary() {
        let (mut app, _) = create_test_app();
        app.start_search();
        for c in "task 2".chars() {
            app.search_input(c);
        }
        app.finish_search();

        assert_eq!(app.visible_tasks().len(), 1);
        assert_eq!(app.search_summary().as_deref(), Some("1 task matches \"task 2\""));

        app.start_search();
        app.cancel_search();
        assert_eq!(app.visible_tasks().len(), 2);
        assert_eq!(app.search_summary(), None);
    }

    #[test]
    fn test_message_expires() {
        let (mut app, _) = create_test_app();
        app.show_info("hello");
        app.tick(Local::now());
        assert!(app.message.is_some());

        app.tick(Local::now() + ticker::message_ttl() + Duration::seconds(1));
        assert!(app.message.is_none());
    }

    #[test]
    fn test_templates_flow() {
        let api = MemoryApi::with_titles(&["Task 1"]);
        api.add_template("Weekly review", Category::Work);
        let (mut app, _) = create_test_app_with(api);

        app.open_templates();
        assert!(app.templates.as_ref().unwrap().loading);
        app.poll_replies();
        let picker = app.templates.as_ref().unwrap();
        assert!(!picker.loading);
        assert_eq!(picker.templates.len(), 1);

        app.create_from_template();
        app.poll_replies();
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.store.tasks()[1].category, Category::Work);
        assert!(app.templates.is_none());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_export_writes_into_download_dir() {
        let dir = tempdir().unwrap();
        let api = Arc::new(MemoryApi::with_titles(&["Task 1"]));
        let dispatch = InlineDispatch::new(Arc::clone(&api));
        let mut app = AppState::new(Config::default(), None, dir.path().to_path_buf(), Box::new(dispatch));

        app.export();
        app.poll_replies();
        app.export();
        app.poll_replies();

        assert!(dir.path().join("tasks_export.json").exists());
        assert!(dir.path().join("tasks_export (1).json").exists());
    }

    #[test]
    fn test_toggle_theme_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let api = Arc::new(MemoryApi::default());
        let dispatch = InlineDispatch::new(api);
        let mut app = AppState::new(Config::default(), Some(path.clone()), dir.path().to_path_buf(), Box::new(dispatch));

        app.toggle_theme();
        assert_eq!(app.theme(), Theme::Light);
        assert_eq!(Config::load(&path).unwrap().theme, Theme::Light);
    }

    #[test]
    fn test_stale_reply_is_ignored() {
        let (mut app, _) = create_test_app();
        app.handle_reply(ApiReply {
            id: RequestId::new(),
            result: Ok(ApiResponse::Tasks(Vec::new())),
        });
        assert_eq!(app.store.len(), 2);
    }
}
