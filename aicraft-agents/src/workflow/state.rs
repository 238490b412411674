//! Shared scheduling state.

use std::collections::{HashMap, HashSet};
use tokio::sync::{Mutex, Notify};

/// One recorded agent failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentFailure {
    /// Error category, see `CraftError::category`
    pub category: &'static str,
    /// Rendered error message
    pub message: String,
}

#[derive(Debug, Default)]
struct Inner {
    executed: HashSet<String>,
    running: HashSet<String>,
    failures: HashMap<String, AgentFailure>,
}

/// The single serialization point for scheduling decisions.
///
/// Every read-modify-write on the executed set happens under one lock, so
/// two concurrent passes can never both claim the same agent.
#[derive(Debug, Default)]
pub struct SchedulerState {
    inner: Mutex<Inner>,
    settled: Notify,
}

impl SchedulerState {
    /// Create an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim one agent if it is eligible.
    ///
    /// An agent is eligible when it has neither executed nor is running and
    /// every dependency has executed. A successful claim marks it running.
    pub async fn claim(&self, agent_id: &str, depends_on: &[String]) -> bool {
        let mut inner = self.inner.lock().await;
        if !inner.is_eligible(agent_id, depends_on) {
            return false;
        }
        inner.running.insert(agent_id.to_string());
        true
    }

    /// Atomically claim every eligible agent among the candidates.
    ///
    /// Candidates are `(agent_id, depends_on)` pairs; the claimed ids are
    /// returned in candidate order.
    pub async fn claim_ready<'a, I>(&self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let mut inner = self.inner.lock().await;
        let ready: Vec<String> = candidates
            .into_iter()
            .filter(|(agent_id, depends_on)| inner.is_eligible(agent_id, depends_on))
            .map(|(agent_id, _)| agent_id.to_string())
            .collect();
        inner.running.extend(ready.iter().cloned());
        ready
    }

    /// Mark an agent executed. Idempotent; an executed agent never reverts.
    pub async fn mark_executed(&self, agent_id: &str) {
        {
            let mut inner = self.inner.lock().await;
            inner.running.remove(agent_id);
            inner.executed.insert(agent_id.to_string());
        }
        self.settled.notify_waiters();
    }

    /// Give up a claim without marking the agent executed.
    pub async fn release(&self, agent_id: &str) {
        self.inner.lock().await.running.remove(agent_id);
        self.settled.notify_waiters();
    }

    /// Wait until some claimed agent is executed or released.
    ///
    /// Returns `false` immediately when nothing is running, so a caller that
    /// found no eligible agent can tell a stall from a claim held by another
    /// run.
    pub async fn wait_for_running(&self) -> bool {
        let settled = self.settled.notified();
        if self.inner.lock().await.running.is_empty() {
            return false;
        }
        settled.await;
        true
    }

    /// Remember why an agent failed.
    pub async fn record_failure(&self, agent_id: &str, failure: AgentFailure) {
        self.inner
            .lock()
            .await
            .failures
            .insert(agent_id.to_string(), failure);
    }

    /// Snapshot of the executed set
    pub async fn executed(&self) -> HashSet<String> {
        self.inner.lock().await.executed.clone()
    }

    /// Whether one agent has executed
    pub async fn is_executed(&self, agent_id: &str) -> bool {
        self.inner.lock().await.executed.contains(agent_id)
    }

    /// Snapshot of recorded failures
    pub async fn failures(&self) -> HashMap<String, AgentFailure> {
        self.inner.lock().await.failures.clone()
    }
}

impl Inner {
    fn is_eligible(&self, agent_id: &str, depends_on: &[String]) -> bool {
        !self.executed.contains(agent_id)
            && !self.running.contains(agent_id)
            && depends_on
                .iter()
                .all(|dependency| self.executed.contains(dependency))
    }
}
