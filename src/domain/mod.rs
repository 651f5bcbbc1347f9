pub mod enums;
pub mod filter;
pub mod form;
pub mod task;
pub mod timer;

pub use enums::{Category, Priority, RecurringFilter, StatusFilter, Theme, UiMode};
pub use filter::{FilterConfig, ViewState};
pub use form::{FormField, FormMode, TaskForm};
pub use task::{format_date, format_minutes, Id, NewTimeEntry, Task, TaskDraft, Template, TimeEntry};
pub use timer::{DraftField, TimeTracker};
