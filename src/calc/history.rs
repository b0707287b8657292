/// Append-only JSON log of successful calculator operations.
/// Same load/save discipline as the task file: soft reads, hard atomic writes.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use super::Op;

pub const HISTORY_FILE: &str = "calc_history.json";

/// One successful operation with its operands and result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Op,
    pub operand_a: f64,
    pub operand_b: f64,
    pub result: f64,
}

impl HistoryEntry {
    /// Entry stamped with the current time.
    pub fn now(operation: Op, operand_a: f64, operand_b: f64, result: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            operand_a,
            operand_b,
            result,
        }
    }
}

/// Per-operation counters over the whole log.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total: usize,
    pub add: usize,
    pub sub: usize,
    pub mul: usize,
    pub div: usize,
}

pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    /// Log at the default `{data_dir}/calc_history.json` location.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(HISTORY_FILE),
        }
    }

    /// Log at an explicit file path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full log. Absent or malformed files yield an empty log with
    /// a logged warning.
    pub async fn load(&self) -> Vec<HistoryEntry> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), err = %e, "could not read history file — starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), err = %e, "history file is not a JSON entry list — starting empty");
                Vec::new()
            }
        }
    }

    /// Append one entry and rewrite the log. Entries are never updated or
    /// deleted individually.
    pub async fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.load().await;
        entries.push(entry);

        let json = serde_json::to_string_pretty(&entries)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("renaming into {}", self.path.display()))?;

        Ok(())
    }

    /// Delete the whole log. An absent file is not an error.
    pub async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(anyhow::Error::from(e).context(format!("removing {}", self.path.display())))
            }
        }
    }

    pub async fn stats(&self) -> HistoryStats {
        let entries = self.load().await;
        let mut stats = HistoryStats {
            total: entries.len(),
            ..Default::default()
        };
        for entry in &entries {
            match entry.operation {
                Op::Add => stats.add += 1,
                Op::Sub => stats.sub += 1,
                Op::Mul => stats.mul += 1,
                Op::Div => stats.div += 1,
            }
        }
        stats
    }
}
