use super::task::{format_minutes, Id, NewTimeEntry, Task, TimeEntry};
use chrono::{DateTime, Duration, Local};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("Please enter a valid duration")]
    NonPositiveDuration,
}

/// Timer state. The polling schedule only exists inside `Running`, so
/// leaving that state always cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running {
        started_at: DateTime<Local>,
        next_poll: DateTime<Local>,
    },
}

/// Manual time-entry draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    /// Minutes
    pub duration: u32,
    pub description: String,
}

/// Which draft input has focus in the tracker view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftField {
    #[default]
    Duration,
    Description,
}

/// What was thrown away when the tracker closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discarded {
    pub was_running: bool,
    pub elapsed_minutes: u32,
}

/// Time tracking for a single task
#[derive(Debug, Clone)]
pub struct TimeTracker {
    pub task_id: Id,
    pub task_title: String,
    pub estimated_minutes: u32,
    pub state: TimerState,
    /// Whole minutes since start, as of the last poll
    pub elapsed_minutes: u32,
    pub draft: EntryDraft,
    pub draft_field: DraftField,
    pub entries: Vec<TimeEntry>,
    /// Entry highlighted for deletion
    pub selected_entry: usize,
    poll_interval: Duration,
}

impl TimeTracker {
    pub fn new(task: &Task, poll_interval: Duration) -> Self {
        Self {
            task_id: task.id.clone(),
            task_title: task.title.clone(),
            estimated_minutes: task.estimated_duration.unwrap_or(0),
            state: TimerState::Idle,
            elapsed_minutes: 0,
            draft: EntryDraft::default(),
            draft_field: DraftField::Duration,
            entries: task.time_entries.clone(),
            selected_entry: 0,
            poll_interval,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Idle -> Running. Restarting while running is a no-op.
    pub fn start(&mut self, now: DateTime<Local>) {
        if self.is_running() {
            return;
        }
        self.elapsed_minutes = 0;
        self.state = TimerState::Running {
            started_at: now,
            next_poll: now + self.poll_interval,
        };
        debug!(task = %self.task_id, "timer started");
    }

    /// Recompute elapsed if the poll is due. Returns true when it ran.
    pub fn poll(&mut self, now: DateTime<Local>) -> bool {
        let TimerState::Running { started_at, next_poll } = &mut self.state else {
            return false;
        };
        if now < *next_poll {
            return false;
        }
        let minutes = (now - *started_at).num_minutes().max(0);
        self.elapsed_minutes = u32::try_from(minutes).unwrap_or(u32::MAX);
        *next_poll = now + self.poll_interval;
        true
    }

    /// Running -> Idle. Elapsed is frozen at its last polled value and
    /// copied into the draft; nothing is sent anywhere.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state = TimerState::Idle;
        self.draft.duration = self.elapsed_minutes;
        debug!(task = %self.task_id, minutes = self.elapsed_minutes, "timer stopped");
    }

    pub fn toggle(&mut self, now: DateTime<Local>) {
        if self.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Validate the draft and build the request body
    pub fn prepare_commit(&self) -> Result<NewTimeEntry, EntryError> {
        if self.draft.duration == 0 {
            return Err(EntryError::NonPositiveDuration);
        }
        Ok(NewTimeEntry {
            duration: self.draft.duration,
            description: self.draft.description.trim().to_string(),
        })
    }

    /// Append the backend's entry and reset the draft
    pub fn commit_succeeded(&mut self, entry: TimeEntry) {
        self.entries.push(entry);
        self.draft = EntryDraft::default();
        self.draft_field = DraftField::Duration;
    }

    /// Remove an entry by id. Returns whether one was removed.
    pub fn remove_entry(&mut self, entry_id: &Id) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != entry_id);
        let removed = self.entries.len() != before;
        if self.selected_entry >= self.entries.len() {
            self.selected_entry = self.entries.len().saturating_sub(1);
        }
        removed
    }

    pub fn selected_entry(&self) -> Option<&TimeEntry> {
        self.entries.get(self.selected_entry)
    }

    pub fn select_prev_entry(&mut self) {
        self.selected_entry = self.selected_entry.saturating_sub(1);
    }

    pub fn select_next_entry(&mut self) {
        if self.selected_entry + 1 < self.entries.len() {
            self.selected_entry += 1;
        }
    }

    /// Total minutes across the tracked entries
    pub fn total_actual(&self) -> u32 {
        self.entries.iter().map(|e| e.duration).sum()
    }

    /// "Over by 1h 5m" / "Under by 20m" against the task's estimate
    pub fn estimate_delta(&self) -> String {
        let actual = self.total_actual();
        let estimate = self.estimated_minutes;
        if actual > estimate {
            format!("Over by {}", format_minutes(actual - estimate))
        } else {
            format!("Under by {}", format_minutes(estimate - actual))
        }
    }

    pub fn switch_draft_field(&mut self) {
        self.draft_field = match self.draft_field {
            DraftField::Duration => DraftField::Description,
            DraftField::Description => DraftField::Duration,
        };
    }

    pub fn draft_input(&mut self, c: char) {
        match self.draft_field {
            DraftField::Duration => {
                if let Some(d) = c.to_digit(10) {
                    self.draft.duration = self.draft.duration.saturating_mul(10).saturating_add(d);
                }
            }
            DraftField::Description => self.draft.description.push(c),
        }
    }

    pub fn draft_backspace(&mut self) {
        match self.draft_field {
            DraftField::Duration => self.draft.duration /= 10,
            DraftField::Description => {
                self.draft.description.pop();
            }
        }
    }

    /// Tear down the tracker. A running timer is dropped without an entry.
    pub fn close(self) -> Discarded {
        Discarded {
            was_running: self.is_running(),
            elapsed_minutes: self.elapsed_minutes,
        }
    }
}
