//! Run reports.

use chrono::{DateTime, Utc};
use std::{collections::HashMap, time::Duration};

use super::config::SchedulingMode;
use super::state::AgentFailure;

/// Summary of one engine run.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    /// Scheduling mode used
    pub mode: SchedulingMode,
    /// Agents in the order they were executed during this run
    pub execution_order: Vec<String>,
    /// Agents that failed during this run (concurrent mode only)
    pub failures: HashMap<String, AgentFailure>,
    /// Number of scheduling passes that ran at least one agent
    pub passes: usize,
    /// Wall-clock duration
    pub duration: Duration,
    /// Start timestamp
    pub started_at: DateTime<Utc>,
    /// End timestamp
    pub finished_at: DateTime<Utc>,
}

impl WorkflowReport {
    pub(crate) fn start(mode: SchedulingMode) -> Self {
        let now = Utc::now();
        Self {
            mode,
            execution_order: Vec::new(),
            failures: HashMap::new(),
            passes: 0,
            duration: Duration::ZERO,
            started_at: now,
            finished_at: now,
        }
    }

    pub(crate) fn finish(mut self, elapsed: Duration) -> Self {
        self.duration = elapsed;
        self.finished_at = Utc::now();
        self
    }

    /// Whether every agent executed during this run succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Ids of failed agents, sorted.
    #[must_use]
    pub fn failed_agents(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.failures.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
