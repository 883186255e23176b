// SPDX-License-Identifier: MIT
//! Append-only routing history.
//!
//! One structured JSON line per invocation, written to
//! `{data_dir}/logs/agent_history.jsonl`. The write is best-effort: a
//! failure is logged at WARN and swallowed, because the routing decision is
//! the primary deliverable and must never be blocked by logging. Appends
//! use `O_APPEND` with a single write per line, so concurrent invocations
//! interleave whole lines and never corrupt prior entries.

use crate::config::{Platform, Task};
use crate::signals::{MoodSignal, SyntaxSignal};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// One routing decision as recorded in the history log.
///
/// Fields are `camelCase` for easy `jq` querying:
/// ```sh
/// jq 'select(.overrideUsed)' ~/.local/share/str8zero/logs/agent_history.jsonl
/// jq -r '[.timestamp, .task, .selectedAgent] | @tsv' agent_history.jsonl
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// RFC-3339 timestamp of the invocation.
    pub timestamp: String,
    pub prompt: String,
    pub task: Task,
    pub platform: Platform,
    pub mood_signal: MoodSignal,
    pub syntax_signal: SyntaxSignal,
    pub selected_agent: String,
    pub override_used: bool,
    /// One-line reason from the explanation trace.
    pub reason: String,
}

impl HistoryEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        prompt: impl Into<String>,
        task: Task,
        platform: Platform,
        mood_signal: MoodSignal,
        syntax_signal: SyntaxSignal,
        selected_agent: impl Into<String>,
        override_used: bool,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            prompt: prompt.into(),
            task,
            platform,
            mood_signal,
            syntax_signal,
            selected_agent: selected_agent.into(),
            override_used,
            reason: reason.into(),
        }
    }
}

// ─── Log ──────────────────────────────────────────────────────────────────────

/// Append-only history log. Never read by the router; collaborators consume
/// it with `jq` or their own tooling.
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("logs").join("agent_history.jsonl"),
        }
    }

    /// Log path, for display.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry. Errors are logged at WARN and never propagated.
    pub fn append(&self, entry: &HistoryEntry) {
        if let Err(e) = self.try_append(entry) {
            tracing::warn!(path = %self.path.display(), err = %e, "history log write failed");
        }
    }

    fn try_append(&self, entry: &HistoryEntry) -> anyhow::Result<()> {
        let line = serde_json::to_string(entry)? + "\n";
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
