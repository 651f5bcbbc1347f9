use super::enums::{Category, Priority, RecurringFilter, StatusFilter};
use super::task::Task;

/// User-selected filter and search settings. Default is "show everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub status: StatusFilter,
    /// `None` means all priorities
    pub priority: Option<Priority>,
    /// `None` means all categories
    pub category: Option<Category>,
    pub recurring: RecurringFilter,
    pub search: String,
}

/// What the task list should show for a given filter result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// The store itself is empty
    NoTasks,
    /// Tasks exist but none pass the filters
    NoMatches,
    Showing { shown: usize, total: usize },
}

impl FilterConfig {
    /// Trimmed search query, if any
    pub fn query(&self) -> Option<&str> {
        let q = self.search.trim();
        (!q.is_empty()).then_some(q)
    }

    /// True when at least one condition would exclude something
    pub fn is_active(&self) -> bool {
        self.status != StatusFilter::All
            || self.priority.is_some()
            || self.category.is_some()
            || self.recurring != RecurringFilter::All
            || self.query().is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn cycle_priority(&mut self) {
        self.priority = cycle_option(self.priority, Priority::all());
    }

    pub fn cycle_category(&mut self) {
        self.category = cycle_option(self.category, Category::all());
    }

    /// Whether a single task passes every active condition
    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Pending => !task.completed,
            StatusFilter::Completed => task.completed,
        };
        if !status_ok {
            return false;
        }

        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        if self.category.is_some_and(|c| c != task.category) {
            return false;
        }

        let recurring_ok = match self.recurring {
            RecurringFilter::All => true,
            RecurringFilter::Recurring => task.is_recurring,
            RecurringFilter::OneTime => !task.is_recurring,
        };
        if !recurring_ok {
            return false;
        }

        match self.query() {
            Some(q) => task.search_text().to_lowercase().contains(&q.to_lowercase()),
            None => true,
        }
    }

    /// Visible subset of `tasks`, in original order
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        if !self.is_active() {
            return tasks.iter().collect();
        }
        tasks.iter().filter(|t| self.matches(t)).collect()
    }

    /// Classify a filter result against the full list
    pub fn view_state(&self, shown: usize, total: usize) -> ViewState {
        if total == 0 {
            ViewState::NoTasks
        } else if shown == 0 {
            ViewState::NoMatches
        } else {
            ViewState::Showing { shown, total }
        }
    }

    /// Literal match-count line for an active search, e.g. `2 tasks match "gym"`
    pub fn search_summary(&self, shown: usize) -> Option<String> {
        self.query().map(|q| {
            let noun = if shown == 1 { "task matches" } else { "tasks match" };
            format!("{} {} \"{}\"", shown, noun, q)
        })
    }

    /// One-line description of the active filters
    pub fn describe(&self) -> String {
        format!(
            "Status: {} | Priority: {} | Category: {} | Type: {}",
            self.status.label(),
            self.priority.map(|p| p.name()).unwrap_or("All"),
            self.category.map(|c| c.name()).unwrap_or("All"),
            self.recurring.label(),
        )
    }
}

/// Step through `None -> values[0] -> ... -> values[n-1] -> None`
fn cycle_option<T: Copy + PartialEq>(current: Option<T>, values: &[T]) -> Option<T> {
    match current {
        None => values.first().copied(),
        Some(v) => {
            let idx = values.iter().position(|x| *x == v)?;
            values.get(idx + 1).copied()
        }
    }
}
