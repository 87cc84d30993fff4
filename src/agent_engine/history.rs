use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::JarvisResult;

/// One line of the run log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub ts: i64,
    pub run_id: String,
    pub instruction: String,
    /// Step index, absent for plan-level records.
    pub step: Option<usize>,
    pub action: Option<String>,
    pub target: Option<String>,
    /// `done`, `generation_failure`, `resolution_failure`, `actuation_failure`
    /// or `plan`.
    pub outcome: String,
    pub detail: Option<String>,
}

/// Append-only JSONL log of one engine session's step outcomes.
pub struct RunHistory {
    pub run_id: String,
    file_path: PathBuf,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::at(&runs_dir_or_cwd())
    }

    /// Log into `dir` instead of the per-user data directory.
    pub fn at(dir: &Path) -> Self {
        let run_id = uuid::Uuid::new_v4().to_string();
        let file_path = dir.join(format!("run_{run_id}.jsonl"));
        Self { run_id, file_path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Builds an entry stamped with the current time and this run's id.
    pub fn entry(&self, instruction: &str, outcome: &str) -> HistoryEntry {
        HistoryEntry {
            ts: chrono::Utc::now().timestamp_millis(),
            run_id: self.run_id.clone(),
            instruction: instruction.to_string(),
            step: None,
            action: None,
            target: None,
            outcome: outcome.to_string(),
            detail: None,
        }
    }

    pub fn append(&self, entry: &HistoryEntry) -> JarvisResult<()> {
        let line = serde_json::to_string(entry)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;
        writeln!(file, "{}", line)?;
        tracing::debug!(path = %self.file_path.display(), outcome = %entry.outcome, "history entry written");
        Ok(())
    }

    /// Like [`append`](Self::append), but a write failure is only logged.
    pub fn record(&self, entry: &HistoryEntry) {
        if let Err(e) = self.append(entry) {
            tracing::warn!(error = %e, "failed to write run history");
        }
    }

    pub fn read_all(&self) -> JarvisResult<Vec<HistoryEntry>> {
        let content = std::fs::read_to_string(&self.file_path)?;
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(Into::into))
            .collect()
    }
}

impl Default for RunHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// `<data_local_dir>/Jarvis/runs`, falling back to the current directory.
fn runs_dir_or_cwd() -> PathBuf {
    if let Some(base) = dirs::data_local_dir() {
        let d = base.join("Jarvis").join("runs");
        if std::fs::create_dir_all(&d).is_ok() {
            return d;
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
