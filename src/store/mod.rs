use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod persist;

/// Upper bound on title length, in Unicode scalars.
pub const MAX_TITLE_LEN: usize = 255;

// ─── Records ──────────────────────────────────────────────────────────────────

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub done: bool,
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.done { "done" } else { "open" };
        write!(f, "[{}] {} ({status})", self.id, self.title)
    }
}

/// Partial update for [`TaskStore::update`]. `None` fields are left unchanged.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
}

/// Aggregate counters derived from the full collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoreStats {
    pub total: usize,
    pub done: usize,
    pub pending: usize,
    /// `done / total * 100`, rounded to two decimals. 0 when the store is empty.
    pub completion_percentage: f64,
}

/// Errors returned by the task store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task {id} not found")]
    NotFound { id: u64 },
    #[error("invalid title: {0}")]
    InvalidTitle(String),
}

// ─── TaskStore ────────────────────────────────────────────────────────────────

/// In-memory task collection with store-assigned sequential IDs.
///
/// The store owns the one mutable collection; every operation that can miss
/// or reject returns `Result` so callers handle both paths. IDs start at 1,
/// strictly increase with creation order, and are never reused within the
/// store's lifetime — deletes leave a gap.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a store from previously persisted records.
    ///
    /// The next-ID counter is recomputed as `max(id) + 1`, or 1 when the
    /// records are empty.
    pub fn from_records(records: Vec<Task>) -> Self {
        let next_id = records.iter().map(|t| t.id).max().map_or(1, |max| max + 1);
        Self {
            tasks: records,
            next_id,
        }
    }

    fn validate_title(title: &str) -> Result<String, StoreError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(StoreError::InvalidTitle(
                "title must not be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(StoreError::InvalidTitle(format!(
                "title exceeds {MAX_TITLE_LEN} characters"
            )));
        }
        Ok(trimmed.to_string())
    }

    /// Create a task with the next sequential ID and `done = false`.
    ///
    /// The title is trimmed; empty/whitespace-only or over-long titles are
    /// rejected with [`StoreError::InvalidTitle`].
    pub fn create(
        &mut self,
        title: &str,
        description: Option<String>,
    ) -> Result<Task, StoreError> {
        let title = Self::validate_title(title)?;
        let task = Task {
            id: self.next_id,
            title,
            description,
            done: false,
        };
        self.tasks.push(task.clone());
        self.next_id += 1;
        debug!(id = task.id, "task created");
        Ok(task)
    }

    /// Snapshot copy of the collection in insertion order, optionally
    /// filtered by `done` state. Mutating the returned Vec does not touch
    /// the store.
    pub fn list(&self, done: Option<bool>) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| done.map_or(true, |d| t.done == d))
            .cloned()
            .collect()
    }

    /// Linear lookup by ID.
    pub fn get(&self, id: u64) -> Result<Task, StoreError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Task, StoreError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound { id })
    }

    /// Overwrite the fields set in `patch`; unset fields are left unchanged.
    /// A set title goes through the same validation as `create`.
    pub fn update(&mut self, id: u64, patch: TaskPatch) -> Result<Task, StoreError> {
        // Validate before taking the mutable borrow so a bad patch leaves
        // the record untouched.
        let title = patch
            .title
            .as_deref()
            .map(Self::validate_title)
            .transpose()?;

        let task = self.get_mut(id)?;
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(done) = patch.done {
            task.done = done;
        }
        debug!(id, "task updated");
        Ok(task.clone())
    }

    /// Flip the completion flag. Two calls restore the original value.
    pub fn toggle(&mut self, id: u64) -> Result<Task, StoreError> {
        let task = self.get_mut(id)?;
        task.done = !task.done;
        debug!(id, done = task.done, "task toggled");
        Ok(task.clone())
    }

    /// Remove a task permanently. The ID is never reassigned.
    pub fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound { id })?;
        self.tasks.remove(pos);
        debug!(id, "task deleted");
        Ok(())
    }

    pub fn stats(&self) -> StoreStats {
        let total = self.tasks.len();
        let done = self.tasks.iter().filter(|t| t.done).count();
        let completion_percentage = if total > 0 {
            (done as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
        } else {
            0.0
        };
        StoreStats {
            total,
            done,
            pending: total - done,
            completion_percentage,
        }
    }

    /// Read-only view of the collection, insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_trimmed_and_validated() {
        let mut store = TaskStore::new();
        let task = store.create("  Buy milk  ", None).unwrap();
        assert_eq!(task.title, "Buy milk");

        assert!(matches!(
            store.create("   ", None),
            Err(StoreError::InvalidTitle(_))
        ));
        assert!(matches!(
            store.create(&"x".repeat(MAX_TITLE_LEN + 1), None),
            Err(StoreError::InvalidTitle(_))
        ));
        // Exactly at the bound is fine.
        assert!(store.create(&"x".repeat(MAX_TITLE_LEN), None).is_ok());
    }

    #[test]
    fn completion_percentage_rounds_to_two_decimals() {
        let mut store = TaskStore::new();
        for i in 0..3 {
            store.create(&format!("t{i}"), None).unwrap();
        }
        store.toggle(1).unwrap();
        // 1/3 = 33.333…%
        assert_eq!(store.stats().completion_percentage, 33.33);
    }

    #[test]
    fn update_validates_before_mutating() {
        let mut store = TaskStore::new();
        store.create("original", None).unwrap();
        let err = store.update(
            1,
            TaskPatch {
                title: Some("  ".to_string()),
                description: Some("kept out".to_string()),
                done: Some(true),
            },
        );
        assert!(matches!(err, Err(StoreError::InvalidTitle(_))));

        // Nothing from the rejected patch was applied.
        let task = store.get(1).unwrap();
        assert_eq!(task.title, "original");
        assert_eq!(task.description, None);
        assert!(!task.done);
    }
}
