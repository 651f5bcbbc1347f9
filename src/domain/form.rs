use super::enums::{Category, Priority, RecurrenceType};
use super::task::{Id, Task, TaskDraft};
use chrono::NaiveDate;

/// Bounds of the "repeat every N" input
pub const MIN_INTERVAL: u32 = 1;
pub const MAX_INTERVAL: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Due date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("Estimated duration '{0}' must be a whole number of minutes")]
    InvalidNumber(String),
}

/// Whether the form creates a new task or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Id),
}

/// Focusable form fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Category,
    Priority,
    DueDate,
    Estimate,
    Tags,
    Recurring,
    Interval,
    Cadence,
}

impl FormField {
    const ORDER: [FormField; 10] = [
        FormField::Title,
        FormField::Description,
        FormField::Category,
        FormField::Priority,
        FormField::DueDate,
        FormField::Estimate,
        FormField::Tags,
        FormField::Recurring,
        FormField::Interval,
        FormField::Cadence,
    ];

    /// Fields that take typed text
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::Title | FormField::Description | FormField::DueDate | FormField::Estimate | FormField::Tags
        )
    }
}

/// Editable draft of a single task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub mode: FormMode,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    /// Raw due-date text, parsed on submit
    pub due_date: String,
    /// Raw estimate text in minutes, parsed on submit
    pub estimate: String,
    /// Comma-separated tags
    pub tags: String,
    pub is_recurring: bool,
    pub recurrence_type: RecurrenceType,
    pub recurrence_interval: u32,
    pub focused: FormField,
}

impl TaskForm {
    /// Blank form with the default field values
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            category: Category::General,
            priority: Priority::Medium,
            due_date: String::new(),
            estimate: String::new(),
            tags: String::new(),
            is_recurring: false,
            recurrence_type: RecurrenceType::None,
            recurrence_interval: 1,
            focused: FormField::Title,
        }
    }

    /// Form seeded from an existing task
    pub fn edit(task: &Task) -> Self {
        Self {
            mode: FormMode::Edit(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            category: task.category,
            priority: task.priority,
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            estimate: task.estimated_duration.map(|m| m.to_string()).unwrap_or_default(),
            tags: task.tags.join(", "),
            is_recurring: task.is_recurring,
            recurrence_type: task.recurrence_type,
            recurrence_interval: task.recurrence_interval.max(MIN_INTERVAL),
            focused: FormField::Title,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            FormMode::Create => " Add New Task ",
            FormMode::Edit(_) => " Edit Task ",
        }
    }

    /// Flip the recurring flag and couple the cadence to it
    pub fn toggle_recurring(&mut self) {
        self.is_recurring = !self.is_recurring;
        self.recurrence_type = if self.is_recurring {
            RecurrenceType::Daily
        } else {
            RecurrenceType::None
        };
    }

    /// Fields reachable with Tab; the cadence inputs hide while not recurring
    fn visible_fields(&self) -> Vec<FormField> {
        FormField::ORDER
            .iter()
            .copied()
            .filter(|f| self.is_recurring || !matches!(f, FormField::Interval | FormField::Cadence))
            .collect()
    }

    pub fn next_field(&mut self) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(idx + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(idx + fields.len() - 1) % fields.len()];
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Estimate => Some(&mut self.estimate),
            FormField::Tags => Some(&mut self.tags),
            _ => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if self.focused == FormField::Estimate && !c.is_ascii_digit() {
            return;
        }
        if self.focused == FormField::Recurring && c == ' ' {
            self.toggle_recurring();
            return;
        }
        if let Some(text) = self.focused_text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    /// Step the focused option field forward (`forward`) or back
    pub fn cycle_option(&mut self, forward: bool) {
        match self.focused {
            FormField::Category => {
                self.category = if forward { self.category.next() } else { self.category.prev() };
            }
            FormField::Priority => {
                self.priority = if forward { self.priority.next() } else { self.priority.prev() };
            }
            FormField::Recurring => self.toggle_recurring(),
            FormField::Interval => {
                self.recurrence_interval = if forward {
                    (self.recurrence_interval + 1).min(MAX_INTERVAL)
                } else {
                    self.recurrence_interval.saturating_sub(1).max(MIN_INTERVAL)
                };
            }
            FormField::Cadence if self.is_recurring => {
                self.recurrence_type = if forward {
                    self.recurrence_type.next_cadence()
                } else {
                    self.recurrence_type.prev_cadence()
                };
            }
            _ => {}
        }
    }

    /// Validate and build the request body
    pub fn to_draft(&self) -> Result<TaskDraft, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyTitle);
        }

        let due_text = self.due_date.trim();
        let due_date = if due_text.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(due_text, "%Y-%m-%d")
                    .map_err(|_| FormError::InvalidDate(due_text.to_string()))?,
            )
        };

        let estimate_text = self.estimate.trim();
        let estimated_duration = if estimate_text.is_empty() {
            None
        } else {
            Some(
                estimate_text
                    .parse::<u32>()
                    .map_err(|_| FormError::InvalidNumber(estimate_text.to_string()))?,
            )
        };

        let tags = self
            .tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        Ok(TaskDraft {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            category: self.category,
            priority: self.priority,
            due_date,
            is_recurring: self.is_recurring,
            recurrence_type: if self.is_recurring {
                self.recurrence_type
            } else {
                RecurrenceType::None
            },
            recurrence_interval: self.recurrence_interval.max(MIN_INTERVAL),
            estimated_duration,
            tags,
        })
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::fixtures::task;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_form_defaults() {
        let form = TaskForm::new();
        assert_eq!(form.mode, FormMode::Create);
        assert_eq!(form.category, Category::General);
        assert_eq!(form.priority, Priority::Medium);
        assert_eq!(form.recurrence_type, RecurrenceType::None);
        assert_eq!(form.recurrence_interval, 1);
        assert!(!form.is_recurring);
    }

    #[test]
    fn test_text_fields() {
        assert!(FormField::Title.is_text());
        assert!(FormField::Tags.is_text());
        assert!(!FormField::Category.is_text());
        assert!(!FormField::Recurring.is_text());
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let mut form = TaskForm::new();
        form.title = "   ".into();
        assert_eq!(form.to_draft(), Err(FormError::EmptyTitle));
    }

    #[test]
    fn test_toggle_recurring_couples_cadence() {
        let mut form = TaskForm::new();
        form.toggle_recurring();
        assert!(form.is_recurring);
        assert_eq!(form.recurrence_type, RecurrenceType::Daily);

        form.focused = FormField::Cadence;
        form.cycle_option(true);
        assert_eq!(form.recurrence_type, RecurrenceType::Weekly);

        form.toggle_recurring();
        assert!(!form.is_recurring);
        assert_eq!(form.recurrence_type, RecurrenceType::None);
    }

    #[test]
    fn test_edit_seeds_from_task() {
        let mut t = task("9", "Dentist");
        t.category = Category::Health;
        t.priority = Priority::High;
        t.due_date = NaiveDate::from_ymd_opt(2025, 6, 3);
        t.estimated_duration = Some(45);
        t.tags = vec!["teeth".into(), "appointment".into()];

        let form = TaskForm::edit(&t);
        assert_eq!(form.mode, FormMode::Edit(Id::new("9")));
        assert_eq!(form.due_date, "2025-06-03");
        assert_eq!(form.estimate, "45");
        assert_eq!(form.tags, "teeth, appointment");

        let draft = form.to_draft().unwrap();
        assert_eq!(draft.title, "Dentist");
        assert_eq!(draft.tags, vec!["teeth".to_string(), "appointment".to_string()]);
        assert_eq!(draft.estimated_duration, Some(45));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let mut form = TaskForm::new();
        form.title = "Call bank".into();
        form.due_date = "tomorrow".into();
        assert_eq!(form.to_draft(), Err(FormError::InvalidDate("tomorrow".into())));
    }

    #[test]
    fn test_estimate_field_only_accepts_digits() {
        let mut form = TaskForm::new();
        form.focused = FormField::Estimate;
        for c in "3x0".chars() {
            form.input_char(c);
        }
        assert_eq!(form.estimate, "30");
    }

    #[test]
    fn test_interval_is_clamped() {
        let mut form = TaskForm::new();
        form.toggle_recurring();
        form.focused = FormField::Interval;
        form.cycle_option(false);
        assert_eq!(form.recurrence_interval, MIN_INTERVAL);
        for _ in 0..40 {
            form.cycle_option(true);
        }
        assert_eq!(form.recurrence_interval, MAX_INTERVAL);
    }

    #[test]
    fn test_tab_skips_cadence_fields_when_one_time() {
        let mut form = TaskForm::new();
        form.focused = FormField::Recurring;
        form.next_field();
        assert_eq!(form.focused, FormField::Title);

        form.toggle_recurring();
        form.focused = FormField::Recurring;
        form.next_field();
        assert_eq!(form.focused, FormField::Interval);
    }
}
