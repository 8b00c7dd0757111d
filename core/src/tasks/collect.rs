use std::collections::HashSet;

use crate::model::Task;

/// Running result of an aggregation: first-seen order, unique ids, optional cap.
#[derive(Debug, Default)]
pub struct TaskCollector {
    tasks: Vec<Task>,
    seen: HashSet<u64>,
    limit: Option<usize>,
}

impl TaskCollector {
    /// A zero limit means no cap.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            tasks: Vec::new(),
            seen: HashSet::new(),
            limit: limit.filter(|n| *n > 0),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.tasks.len() >= limit)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.seen.contains(&id)
    }

    /// Records an id as known without adding a task for it.
    pub fn mark_seen(&mut self, id: u64) {
        self.seen.insert(id);
    }

    /// Appends `task` unless its id was already seen or the cap is reached.
    pub fn push(&mut self, task: Task) -> bool {
        if self.is_full() || !self.seen.insert(task.id) {
            return false;
        }
        self.tasks.push(task);
        true
    }

    pub fn ids(&self) -> Vec<u64> {
        self.tasks.iter().map(|t| t.id).collect()
    }

    pub fn into_tasks(mut self) -> Vec<Task> {
        if let Some(limit) = self.limit {
            self.tasks.truncate(limit);
        }
        self.tasks
    }
}
