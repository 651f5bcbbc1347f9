use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a label does not name a known value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl ParseError {
    fn new(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

/// Task category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    General,
    Work,
    Personal,
    Shopping,
    Health,
    Education,
    Finance,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Education => "Education",
            Category::Finance => "Finance",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [Category] {
        &[
            Category::General,
            Category::Work,
            Category::Personal,
            Category::Shopping,
            Category::Health,
            Category::Education,
            Category::Finance,
        ]
    }

    /// Next category, wrapping around
    pub fn next(&self) -> Self {
        cycle(Self::all(), *self, 1)
    }

    /// Previous category, wrapping around
    pub fn prev(&self) -> Self {
        cycle(Self::all(), *self, Self::all().len() - 1)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::all().iter().map(|c| c.name()).collect();
                ParseError::new("category", s, &names)
            })
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn name(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn all() -> &'static [Priority] {
        &[Priority::Low, Priority::Medium, Priority::High]
    }

    pub fn next(&self) -> Self {
        cycle(Self::all(), *self, 1)
    }

    pub fn prev(&self) -> Self {
        cycle(Self::all(), *self, Self::all().len() - 1)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::new("priority", s, &["Low", "Medium", "High"]))
    }
}

/// Recurrence cadence of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceType {
    /// Unit label used in the form ("Day(s)", ...)
    pub fn unit_label(&self) -> &'static str {
        match self {
            RecurrenceType::None => "-",
            RecurrenceType::Daily => "Day(s)",
            RecurrenceType::Weekly => "Week(s)",
            RecurrenceType::Monthly => "Month(s)",
        }
    }

    /// Cycle through the repeating cadences only; `None` is reached via the
    /// recurring toggle, never by cycling.
    pub fn next_cadence(&self) -> Self {
        match self {
            RecurrenceType::None | RecurrenceType::Monthly => RecurrenceType::Daily,
            RecurrenceType::Daily => RecurrenceType::Weekly,
            RecurrenceType::Weekly => RecurrenceType::Monthly,
        }
    }

    pub fn prev_cadence(&self) -> Self {
        match self {
            RecurrenceType::None | RecurrenceType::Daily => RecurrenceType::Monthly,
            RecurrenceType::Weekly => RecurrenceType::Daily,
            RecurrenceType::Monthly => RecurrenceType::Weekly,
        }
    }
}

/// Completion-status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Completed => "Completed",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            _ => Err(ParseError::new("status", s, &["all", "pending", "completed"])),
        }
    }
}

/// Recurring / one-time filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecurringFilter {
    #[default]
    All,
    Recurring,
    OneTime,
}

impl RecurringFilter {
    pub fn label(&self) -> &'static str {
        match self {
            RecurringFilter::All => "All Tasks",
            RecurringFilter::Recurring => "Recurring Only",
            RecurringFilter::OneTime => "One-time Only",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            RecurringFilter::All => RecurringFilter::Recurring,
            RecurringFilter::Recurring => RecurringFilter::OneTime,
            RecurringFilter::OneTime => RecurringFilter::All,
        }
    }
}

impl FromStr for RecurringFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(RecurringFilter::All),
            "recurring" => Ok(RecurringFilter::Recurring),
            "one-time" | "onetime" => Ok(RecurringFilter::OneTime),
            _ => Err(ParseError::new("recurring filter", s, &["all", "recurring", "one-time"])),
        }
    }
}

/// Colour theme for the terminal UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    Searching,
    TaskForm,
    TimeTracker,
    Templates,
    Confirm,
}

/// Step `current` by `offset` positions through `values`, wrapping around
fn cycle<T: Copy + PartialEq>(values: &[T], current: T, offset: usize) -> T {
    let idx = values.iter().position(|v| *v == current).unwrap_or(0);
    values[(idx + offset) % values.len()]
}
