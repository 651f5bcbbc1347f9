pub mod client;
pub mod worker;

#[cfg(test)]
pub mod fake;

use crate::domain::{Id, NewTimeEntry, Task, TaskDraft, Template, TimeEntry};
use std::fmt;
use uuid::Uuid;

pub use client::HttpApi;
pub use worker::ApiWorker;

/// Everything that can go wrong talking to the backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("could not reach the backend: {0}")]
    Transport(String),
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response from the backend: {0}")]
    Decode(String),
    #[error("the request worker has stopped")]
    Disconnected,
}

/// Body of GET /tasks/export plus the filename the backend suggested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
}

/// The backend's REST surface
pub trait TaskApi {
    fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;
    fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError>;
    fn update_task(&self, id: &Id, draft: &TaskDraft) -> Result<Task, ApiError>;
    fn delete_task(&self, id: &Id) -> Result<(), ApiError>;
    fn toggle_task(&self, id: &Id) -> Result<Task, ApiError>;
    fn export_tasks(&self) -> Result<Export, ApiError>;
    fn list_templates(&self) -> Result<Vec<Template>, ApiError>;
    fn create_from_template(&self, template_id: &Id) -> Result<Task, ApiError>;
    fn add_time_entry(&self, task_id: &Id, entry: &NewTimeEntry) -> Result<TimeEntry, ApiError>;
    fn delete_time_entry(&self, task_id: &Id, entry_id: &Id) -> Result<(), ApiError>;
}

/// Correlates a request with its reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One backend call, as data
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    ListTasks,
    CreateTask(TaskDraft),
    UpdateTask(Id, TaskDraft),
    DeleteTask(Id),
    ToggleTask(Id),
    ExportTasks,
    ListTemplates,
    CreateFromTemplate(Id),
    AddTimeEntry(Id, NewTimeEntry),
    DeleteTimeEntry { task_id: Id, entry_id: Id },
}

/// Successful result of an `ApiRequest`
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Tasks(Vec<Task>),
    Task(Task),
    Deleted,
    Export(Export),
    Templates(Vec<Template>),
    TimeEntry(TimeEntry),
}

impl ApiRequest {
    /// Short verb phrase for logs and messages ("create task")
    pub fn action(&self) -> &'static str {
        match self {
            ApiRequest::ListTasks => "fetch tasks",
            ApiRequest::CreateTask(_) => "create task",
            ApiRequest::UpdateTask(..) => "update task",
            ApiRequest::DeleteTask(_) => "delete task",
            ApiRequest::ToggleTask(_) => "toggle task",
            ApiRequest::ExportTasks => "export tasks",
            ApiRequest::ListTemplates => "load templates",
            ApiRequest::CreateFromTemplate(_) => "create task from template",
            ApiRequest::AddTimeEntry(..) => "add time entry",
            ApiRequest::DeleteTimeEntry { .. } => "delete time entry",
        }
    }

    /// User-facing message when the call fails
    pub fn failure_message(&self) -> String {
        format!("Failed to {}. Please try again.", self.action())
    }

    /// Task the request mutates, if any
    pub fn target(&self) -> Option<&Id> {
        match self {
            ApiRequest::UpdateTask(id, _)
            | ApiRequest::DeleteTask(id)
            | ApiRequest::ToggleTask(id)
            | ApiRequest::AddTimeEntry(id, _) => Some(id),
            ApiRequest::DeleteTimeEntry { task_id, .. } => Some(task_id),
            _ => None,
        }
    }

    /// Run the call against a backend
    pub fn execute(&self, api: &dyn TaskApi) -> Result<ApiResponse, ApiError> {
        match self {
            ApiRequest::ListTasks => api.list_tasks().map(ApiResponse::Tasks),
            ApiRequest::CreateTask(draft) => api.create_task(draft).map(ApiResponse::Task),
            ApiRequest::UpdateTask(id, draft) => api.update_task(id, draft).map(ApiResponse::Task),
            ApiRequest::DeleteTask(id) => api.delete_task(id).map(|_| ApiResponse::Deleted),
            ApiRequest::ToggleTask(id) => api.toggle_task(id).map(ApiResponse::Task),
            ApiRequest::ExportTasks => api.export_tasks().map(ApiResponse::Export),
            ApiRequest::ListTemplates => api.list_templates().map(ApiResponse::Templates),
            ApiRequest::CreateFromTemplate(id) => api.create_from_template(id).map(ApiResponse::Task),
            ApiRequest::AddTimeEntry(id, entry) => api.add_time_entry(id, entry).map(ApiResponse::TimeEntry),
            ApiRequest::DeleteTimeEntry { task_id, entry_id } => {
                api.delete_time_entry(task_id, entry_id).map(|_| ApiResponse::Deleted)
            }
        }
    }
}

/// A finished request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub id: RequestId,
    pub result: Result<ApiResponse, ApiError>,
}

/// Sends requests somewhere and hands back finished replies without blocking
pub trait Dispatch {
    fn send(&mut self, request: ApiRequest) -> Result<RequestId, ApiError>;
    fn poll(&mut self) -> Vec<ApiReply>;
}
