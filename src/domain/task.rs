use super::enums::{Category, Priority, RecurrenceType};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque backend-assigned identifier.
///
/// The backend hands out UUID strings for tasks, but template and entry ids
/// may arrive as integers, so both are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(Id(s)),
            Raw::Number(n) => Ok(Id(n.to_string())),
        }
    }
}

/// A single logged block of work on a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Id,
    /// Minutes spent
    pub duration: u32,
    #[serde(default, deserialize_with = "wire::empty_as_none")]
    pub description: Option<String>,
    #[serde(with = "wire::timestamp")]
    pub created_at: NaiveDateTime,
}

/// Body for POST /tasks/{id}/time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTimeEntry {
    pub duration: u32,
    pub description: String,
}

/// A task as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "wire::empty_as_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, with = "wire::date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_type: RecurrenceType,
    #[serde(default = "default_interval")]
    pub recurrence_interval: u32,
    #[serde(default, with = "wire::date")]
    pub next_due: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    #[serde(default)]
    pub actual_duration: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
    #[serde(default, with = "wire::opt_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "wire::opt_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default, with = "wire::opt_timestamp")]
    pub last_completed: Option<NaiveDateTime>,
}

fn default_interval() -> u32 {
    1
}

impl Task {
    /// Human-readable recurrence label, e.g. "Weekly" or "Every 2 weeks".
    /// Returns `None` for one-time tasks.
    pub fn recurrence_label(&self) -> Option<String> {
        recurrence_label(self.is_recurring, self.recurrence_type, self.recurrence_interval)
    }

    /// Text the free-text search runs against
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3 + self.tags.len());
        parts.push(&self.title);
        parts.push(self.description.as_deref().unwrap_or(""));
        parts.push(self.category.name());
        parts.extend(self.tags.iter().map(String::as_str));
        parts.join(" ")
    }

    /// Sum of logged time entries, in minutes
    pub fn logged_minutes(&self) -> u32 {
        self.time_entries.iter().map(|e| e.duration).sum()
    }
}

/// Format a recurrence cadence for display
pub fn recurrence_label(is_recurring: bool, kind: RecurrenceType, interval: u32) -> Option<String> {
    if !is_recurring {
        return None;
    }
    let (single, unit) = match kind {
        RecurrenceType::Daily => ("Daily", "days"),
        RecurrenceType::Weekly => ("Weekly", "weeks"),
        RecurrenceType::Monthly => ("Monthly", "months"),
        RecurrenceType::None => return None,
    };
    if interval == 1 {
        Some(single.to_string())
    } else {
        Some(format!("Every {} {}", interval, unit))
    }
}

/// Body for POST /tasks and PUT /tasks/{id}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    #[serde(with = "wire::date")]
    pub due_date: Option<NaiveDate>,
    pub is_recurring: bool,
    pub recurrence_type: RecurrenceType,
    pub recurrence_interval: u32,
    pub estimated_duration: Option<u32>,
    pub tags: Vec<String>,
}

/// A reusable task blueprint served by the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Template {
    pub id: Id,
    pub name: String,
    #[serde(default, deserialize_with = "wire::empty_as_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Format a minute count as "Xh Ym" (or "Ym" under an hour)
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Format a date as "Jan 05, 2025"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Lenient (de)serializers for the backend's date formats
mod wire {
    use super::*;

    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }

    /// Accepts "YYYY-MM-DD", or any string whose first ten characters are one
    pub fn parse_date(raw: &str) -> Option<NaiveDate> {
        let head = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }

    pub fn empty_as_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.filter(|s| !s.trim().is_empty()))
    }

    pub mod date {
        use super::*;

        pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(date) => s.serialize_str(&date.format("%Y-%m-%d").to_string()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(text) => parse_date(text)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", text))),
            }
        }
    }

    pub mod timestamp {
        use super::*;

        pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
            let raw = String::deserialize(d)?;
            parse_timestamp(&raw)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
        }
    }

    pub mod opt_timestamp {
        use super::*;

        pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(ts) => s.serialize_str(&ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            Ok(raw.as_deref().and_then(parse_timestamp))
        }
    }
}
