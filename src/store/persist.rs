/// JSON persistence for the task collection.
/// Written atomically: tmp file → rename to prevent partial reads.
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use super::Task;

pub const TASKS_FILE: &str = "tasks.json";

/// Load/save pair mirroring the store's collection to a flat JSON file.
///
/// Reads fail soft: an absent, unreadable, or malformed file yields an empty
/// collection with a logged warning. Writes fail hard: I/O and serialization
/// errors propagate to the caller. There is no locking against concurrent
/// writers — last rewrite wins.
pub struct TaskFile {
    path: PathBuf,
}

impl TaskFile {
    /// Adapter for the default `{data_dir}/tasks.json` location.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(TASKS_FILE),
        }
    }

    /// Adapter for an explicit file path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Size of the backing file in bytes, 0 when absent.
    pub async fn size_bytes(&self) -> u64 {
        fs::metadata(&self.path).await.map(|m| m.len()).unwrap_or(0)
    }

    /// Read the full collection.
    ///
    /// Absent file → empty. Malformed JSON or a top-level shape that is not
    /// an array → warning + empty, never an error.
    pub async fn load(&self) -> Vec<Task> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), err = %e, "could not read task file — starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(path = %self.path.display(), err = %e, "task file is not a JSON task list — starting empty");
                Vec::new()
            }
        }
    }

    /// Rewrite the backing file with the full collection, pretty-printed.
    pub async fn save(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;

        // Ensure directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        // Atomic write: write to tmp, then rename
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("renaming into {}", self.path.display()))?;

        Ok(())
    }

    /// Remove the backing file. An absent file is not an error.
    pub async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(anyhow::Error::from(e).context(format!("removing {}", self.path.display())))
            }
        }
    }
}
