use crate::domain::{Id, Task, TimeEntry};

/// Session copy of the backend's task list. Only ever updated with
/// confirmed backend responses.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    #[cfg(test)]
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &Id) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Replace the whole list (after a fetch)
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Append a newly created task
    pub fn insert(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Swap in the server's copy of a task. Unknown ids are appended.
    pub fn replace(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => self.tasks.push(task),
        }
    }

    /// Drop a task by id. Returns whether it was present.
    pub fn remove(&mut self, id: &Id) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        self.tasks.len() != before
    }

    pub fn append_time_entry(&mut self, task_id: &Id, entry: TimeEntry) {
        if let Some(task) = self.tasks.iter_mut().find(|t| &t.id == task_id) {
            task.time_entries.push(entry);
        }
    }

    pub fn remove_time_entry(&mut self, task_id: &Id, entry_id: &Id) {
        if let Some(task) = self.tasks.iter_mut().find(|t| &t.id == task_id) {
            task.time_entries.retain(|e| &e.id != entry_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::fixtures::{entry, task};

    #[test]
    fn test_replace_keeps_position() {
        let mut store = TaskStore::new(vec![task("1", "a"), task("2", "b"), task("3", "c")]);
        let mut updated = task("2", "b (edited)");
        updated.completed = true;
        store.replace(updated);

        assert_eq!(store.len(), 3);
        assert_eq!(store.tasks()[1].title, "b (edited)");
        assert!(store.tasks()[1].completed);
    }

    #[test]
    fn test_replace_unknown_appends() {
        let mut store = TaskStore::new(vec![task("1", "a")]);
        store.replace(task("9", "z"));
        assert_eq!(store.len(), 2);
        assert!(store.get(&Id::new("9")).is_some());
    }

    #[test]
    fn test_remove() {
        let mut store = TaskStore::new(vec![task("1", "a"), task("2", "b")]);
        assert!(store.remove(&Id::new("1")));
        assert!(!store.remove(&Id::new("1")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_time_entries_follow_task() {
        let mut store = TaskStore::new(vec![task("1", "a")]);
        let id = Id::new("1");
        store.append_time_entry(&id, entry("e1", 10));
        store.append_time_entry(&id, entry("e2", 20));
        store.remove_time_entry(&id, &Id::new("e1"));

        let t = store.get(&id).unwrap();
        assert_eq!(t.time_entries.len(), 1);
        assert_eq!(t.time_entries[0].id.as_str(), "e2");
    }
}
