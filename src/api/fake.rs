//! In-memory backend and synchronous dispatcher for tests

use super::{ApiError, ApiReply, ApiRequest, Dispatch, Export, RequestId, TaskApi};
use crate::domain::task::fixtures;
use crate::domain::enums::RecurrenceType;
use crate::domain::{Category, Id, NewTimeEntry, Priority, Task, TaskDraft, Template, TimeEntry};
use chrono::{Duration, Local};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct State {
    tasks: Vec<Task>,
    templates: Vec<Template>,
    next_id: u32,
    failing: bool,
    calls: usize,
}

/// Behaves like the reference backend: assigns ids, flips completion and
/// rolls recurring tasks forward on toggle.
#[derive(Default)]
pub struct MemoryApi {
    state: Mutex<State>,
}

impl MemoryApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let api = Self::default();
        api.lock().tasks = tasks;
        api
    }

    pub fn with_titles(titles: &[&str]) -> Self {
        let tasks = titles
            .iter()
            .enumerate()
            .map(|(i, title)| fixtures::task(&format!("t{}", i + 1), title))
            .collect();
        Self::with_tasks(tasks)
    }

    pub fn add_template(&self, name: &str, category: Category) {
        let mut state = self.lock();
        let id = Id::new((state.templates.len() + 1).to_string());
        state.templates.push(Template {
            id,
            name: name.to_string(),
            description: None,
            category,
            priority: Priority::Medium,
            estimated_duration: Some(30),
            is_recurring: false,
            tags: vec!["template".into()],
        });
    }

    /// Make every subsequent call fail with a 500
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Number of calls that reached the backend
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        let mut state = self.lock();
        state.calls += 1;
        if state.failing {
            return Err(ApiError::Status {
                status: 500,
                message: "Internal Server Error".into(),
            });
        }
        Ok(state)
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        message: "Task not found".into(),
    }
}

fn apply_draft(task: &mut Task, draft: &TaskDraft) {
    task.title = draft.title.clone();
    task.description = Some(draft.description.clone()).filter(|d| !d.is_empty());
    task.category = draft.category;
    task.priority = draft.priority;
    task.due_date = draft.due_date;
    task.is_recurring = draft.is_recurring;
    task.recurrence_type = draft.recurrence_type;
    task.recurrence_interval = draft.recurrence_interval;
    task.estimated_duration = draft.estimated_duration;
    task.tags = draft.tags.clone();
}

impl TaskApi for MemoryApi {
    fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        Ok(self.begin()?.tasks.clone())
    }

    fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let mut state = self.begin()?;
        state.next_id += 1;
        let mut task = fixtures::task(&format!("new{}", state.next_id), "");
        apply_draft(&mut task, draft);
        task.next_due = draft.due_date;
        state.tasks.push(task.clone());
        Ok(task)
    }

    fn update_task(&self, id: &Id, draft: &TaskDraft) -> Result<Task, ApiError> {
        let mut state = self.begin()?;
        let task = state.tasks.iter_mut().find(|t| &t.id == id).ok_or_else(not_found)?;
        apply_draft(task, draft);
        Ok(task.clone())
    }

    fn delete_task(&self, id: &Id) -> Result<(), ApiError> {
        let mut state = self.begin()?;
        let before = state.tasks.len();
        state.tasks.retain(|t| &t.id != id);
        if state.tasks.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    fn toggle_task(&self, id: &Id) -> Result<Task, ApiError> {
        let mut state = self.begin()?;
        let task = state.tasks.iter_mut().find(|t| &t.id == id).ok_or_else(not_found)?;
        if task.completed {
            task.completed = false;
            task.last_completed = None;
        } else {
            let now = Local::now().naive_local();
            task.completed = true;
            task.last_completed = Some(now);
            if task.is_recurring && task.recurrence_type != RecurrenceType::None {
                let n = i64::from(task.recurrence_interval);
                let step = match task.recurrence_type {
                    RecurrenceType::Daily => Duration::days(n),
                    RecurrenceType::Weekly => Duration::weeks(n),
                    _ => Duration::days(30 * n),
                };
                task.next_due = Some((now + step).date());
                task.completed = false;
            }
        }
        Ok(task.clone())
    }

    fn export_tasks(&self) -> Result<Export, ApiError> {
        let state = self.begin()?;
        let bytes = serde_json::to_vec_pretty(&state.tasks).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(Export {
            bytes,
            filename: Some("tasks_export.json".into()),
        })
    }

    fn list_templates(&self) -> Result<Vec<Template>, ApiError> {
        Ok(self.begin()?.templates.clone())
    }

    fn create_from_template(&self, template_id: &Id) -> Result<Task, ApiError> {
        let mut state = self.begin()?;
        let template = state
            .templates
            .iter()
            .find(|t| &t.id == template_id)
            .cloned()
            .ok_or_else(not_found)?;
        state.next_id += 1;
        let mut task = fixtures::task(&format!("new{}", state.next_id), &template.name);
        task.description = template.description;
        task.category = template.category;
        task.priority = template.priority;
        task.estimated_duration = template.estimated_duration;
        task.is_recurring = template.is_recurring;
        task.tags = template.tags;
        state.tasks.push(task.clone());
        Ok(task)
    }

    fn add_time_entry(&self, task_id: &Id, entry: &NewTimeEntry) -> Result<TimeEntry, ApiError> {
        let mut state = self.begin()?;
        state.next_id += 1;
        let created = TimeEntry {
            id: Id::new(format!("e{}", state.next_id)),
            duration: entry.duration,
            description: Some(entry.description.clone()).filter(|d| !d.is_empty()),
            created_at: Local::now().naive_local(),
        };
        let task = state.tasks.iter_mut().find(|t| &t.id == task_id).ok_or_else(not_found)?;
        task.time_entries.push(created.clone());
        task.actual_duration = Some(task.logged_minutes());
        Ok(created)
    }

    fn delete_time_entry(&self, task_id: &Id, entry_id: &Id) -> Result<(), ApiError> {
        let mut state = self.begin()?;
        let task = state.tasks.iter_mut().find(|t| &t.id == task_id).ok_or_else(not_found)?;
        task.time_entries.retain(|e| &e.id != entry_id);
        task.actual_duration = Some(task.logged_minutes());
        Ok(())
    }
}

/// Queues requests on `send` and runs them on `poll`, so a test can look at
/// the app while requests are still in flight.
pub struct InlineDispatch {
    api: Arc<MemoryApi>,
    queued: Vec<(RequestId, ApiRequest)>,
}

impl InlineDispatch {
    pub fn new(api: Arc<MemoryApi>) -> Self {
        Self {
            api,
            queued: Vec::new(),
        }
    }
}

impl Dispatch for InlineDispatch {
    fn send(&mut self, request: ApiRequest) -> Result<RequestId, ApiError> {
        let id = RequestId::new();
        self.queued.push((id, request));
        Ok(id)
    }

    fn poll(&mut self) -> Vec<ApiReply> {
        self.queued
            .drain(..)
            .map(|(id, request)| ApiReply {
                id,
                result: request.execute(self.api.as_ref()),
            })
            .collect()
    }
}
