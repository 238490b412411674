//! Value, input map and stream types shared by tools, tasks and agents.

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::CraftError;

/// Dynamically typed value passed into and produced by tools.
pub type Value = serde_json::Value;

/// Input parameters of a task, keyed by parameter name.
pub type InputMap = HashMap<String, Value>;

/// Live, ordered, single-consumer sequence of incremental values.
///
/// The producer closes the stream by dropping its sending half; consumers
/// drain it with `StreamExt::next` until it yields `None`.
pub type ValueStream = BoxStream<'static, Value>;

/// How an agent runs the tasks it owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Tasks run one after another in insertion order; the first failure
    /// stops the agent.
    #[default]
    Sequential,
    /// Tasks run concurrently; every task is attempted and one failure is
    /// reported.
    Concurrent,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Concurrent => write!(f, "concurrent"),
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = CraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "concurrent" => Ok(Self::Concurrent),
            other => Err(CraftError::configuration(format!(
                "Unknown execution mode '{other}'"
            ))),
        }
    }
}
