use super::{ApiError, Export, TaskApi};
use crate::domain::{Id, NewTimeEntry, Task, TaskDraft, Template, TimeEntry};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Blocking HTTP implementation of `TaskApi`
pub struct HttpApi {
    base_url: Url,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed building HTTP client: {e}")))?;
        Ok(Self { base_url, client })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        build_url(&self.base_url, segments)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "backend responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = error_message(&body)
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| "request failed".to_string());
        warn!(status = status.as_u16(), %message, "backend rejected request");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn with_json<T: Serialize>(request: RequestBuilder, body: &T) -> Result<RequestBuilder, ApiError> {
        let bytes = serde_json::to_vec(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(request.header(CONTENT_TYPE, "application/json").body(bytes))
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().map_err(|e| ApiError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl TaskApi for HttpApi {
    fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.send(self.client.get(self.url(&["tasks"])?))?;
        Self::decode(response)
    }

    fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let request = Self::with_json(self.client.post(self.url(&["tasks"])?), draft)?;
        Self::decode(self.send(request)?)
    }

    fn update_task(&self, id: &Id, draft: &TaskDraft) -> Result<Task, ApiError> {
        let request = Self::with_json(self.client.put(self.url(&["tasks", id.as_str()])?), draft)?;
        Self::decode(self.send(request)?)
    }

    fn delete_task(&self, id: &Id) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(&["tasks", id.as_str()])?))?;
        Ok(())
    }

    fn toggle_task(&self, id: &Id) -> Result<Task, ApiError> {
        let response = self.send(self.client.put(self.url(&["tasks", id.as_str(), "toggle"])?))?;
        Self::decode(response)
    }

    fn export_tasks(&self) -> Result<Export, ApiError> {
        let response = self.send(self.client.get(self.url(&["tasks", "export"])?))?;
        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename);
        let bytes = response.bytes().map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Export {
            bytes: bytes.to_vec(),
            filename,
        })
    }

    fn list_templates(&self) -> Result<Vec<Template>, ApiError> {
        let response = self.send(self.client.get(self.url(&["templates"])?))?;
        Self::decode(response)
    }

    fn create_from_template(&self, template_id: &Id) -> Result<Task, ApiError> {
        let response = self.send(self.client.post(self.url(&["templates", template_id.as_str(), "create"])?))?;
        Self::decode(response)
    }

    fn add_time_entry(&self, task_id: &Id, entry: &NewTimeEntry) -> Result<TimeEntry, ApiError> {
        let request = Self::with_json(self.client.post(self.url(&["tasks", task_id.as_str(), "time"])?), entry)?;
        Self::decode(self.send(request)?)
    }

    fn delete_time_entry(&self, task_id: &Id, entry_id: &Id) -> Result<(), ApiError> {
        let url = self.url(&["tasks", task_id.as_str(), "time", entry_id.as_str()])?;
        self.send(self.client.delete(url))?;
        Ok(())
    }
}

/// Parse the configured base URL. It must be able to take path segments.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim()).map_err(|e| ApiError::Transport(format!("invalid api url '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::Transport(format!("invalid api url '{raw}': not a base url")));
    }
    Ok(url)
}

/// Append percent-encoded path segments to the base URL
fn build_url(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::Transport(format!("invalid api url '{base}': not a base url")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Pull `{"error": "..."}` out of a failure body
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(String::from)
}

/// Filename from a `Content-Disposition: attachment; filename="x.json"` header
fn disposition_filename(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"'))
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or(name).to_string())
        .filter(|name| !name.is_empty() && name != "." && name != "..")
}
