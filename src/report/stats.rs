use crate::domain::{Category, Priority, Task};

/// Task counts per priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
        }
    }
}

/// Aggregate statistics over a task list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded percentage, 0 when there are no tasks
    pub completion_rate: u32,
    pub by_priority: PriorityCounts,
    /// (category, count) in category display order, zero counts included
    pub by_category: Vec<(Category, usize)>,
    pub recurring: usize,
    pub one_time: usize,
    /// Minutes, missing values counted as 0
    pub estimated_minutes: u64,
    pub actual_minutes: u64,
    /// Rounded actual/estimated percentage, 0 when nothing was estimated
    pub time_accuracy: u32,
}

impl TaskStats {
    /// Whole hours of estimated work
    pub fn estimated_hours(&self) -> u64 {
        self.estimated_minutes / 60
    }

    pub fn actual_hours(&self) -> u64 {
        self.actual_minutes / 60
    }
}

/// Round-half-up integer percentage of `part / whole`; 0 when `whole` is 0
pub fn rounded_percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let pct = (part * 200 + whole) / (whole * 2);
    u32::try_from(pct).unwrap_or(u32::MAX)
}

/// Calculate statistics for a task list
pub fn calculate_stats<'a, I>(tasks: I) -> TaskStats
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut stats = TaskStats {
        by_category: Category::all().iter().map(|c| (*c, 0)).collect(),
        ..Default::default()
    };

    for task in tasks {
        stats.total += 1;
        if task.completed {
            stats.completed += 1;
        }
        match task.priority {
            Priority::Low => stats.by_priority.low += 1,
            Priority::Medium => stats.by_priority.medium += 1,
            Priority::High => stats.by_priority.high += 1,
        }
        if let Some(slot) = stats.by_category.iter_mut().find(|(c, _)| *c == task.category) {
            slot.1 += 1;
        }
        if task.is_recurring {
            stats.recurring += 1;
        }
        stats.estimated_minutes += u64::from(task.estimated_duration.unwrap_or(0));
        stats.actual_minutes += u64::from(task.actual_duration.unwrap_or(0));
    }

    stats.pending = stats.total - stats.completed;
    stats.one_time = stats.total - stats.recurring;
    stats.completion_rate = rounded_percent(stats.completed as u64, stats.total as u64);
    stats.time_accuracy = rounded_percent(stats.actual_minutes, stats.estimated_minutes);
    stats
}
