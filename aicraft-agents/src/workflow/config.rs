//! Engine configuration.

use aicraft_core::{CraftError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

/// Environment variable selecting the scheduling mode
pub const ENV_SCHEDULING: &str = "AICRAFT_SCHEDULING";
/// Environment variable holding the default tool timeout in milliseconds
pub const ENV_TOOL_TIMEOUT_MS: &str = "AICRAFT_TOOL_TIMEOUT_MS";
/// Environment variable enabling verbose input logging
pub const ENV_VERBOSE: &str = "AICRAFT_VERBOSE";

/// How the engine schedules agents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingMode {
    /// Agents run one at a time; the first failure aborts the run
    #[default]
    Sequential,
    /// Eligible agents run in parallel; failures are logged and recorded
    Concurrent,
}

impl fmt::Display for SchedulingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Concurrent => write!(f, "concurrent"),
        }
    }
}

impl FromStr for SchedulingMode {
    type Err = CraftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "concurrent" => Ok(Self::Concurrent),
            other => Err(CraftError::configuration(format!(
                "unknown scheduling mode '{other}', expected 'sequential' or 'concurrent'"
            ))),
        }
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Mode used by [`WorkflowEngine::run_default`](crate::workflow::WorkflowEngine::run_default)
    #[serde(default)]
    pub scheduling: SchedulingMode,
    /// Default bound on each tool call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_timeout_ms: Option<u64>,
    /// Log task inputs at debug level
    #[serde(default)]
    pub verbose: bool,
}

impl EngineConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scheduling mode
    #[must_use]
    pub fn with_scheduling(mut self, scheduling: SchedulingMode) -> Self {
        self.scheduling = scheduling;
        self
    }

    /// Set the default tool timeout
    #[must_use]
    pub fn with_tool_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.tool_timeout_ms = Some(timeout_ms);
        self
    }

    /// Enable or disable verbose logging
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Default tool timeout as a duration
    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_ms.map(Duration::from_millis)
    }

    /// Build a configuration from `AICRAFT_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// `Configuration` when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_SCHEDULING) {
            config.scheduling = value.parse()?;
        }
        if let Some(value) = lookup(ENV_TOOL_TIMEOUT_MS) {
            let timeout_ms = value.trim().parse::<u64>().map_err(|e| {
                CraftError::configuration(format!("invalid {ENV_TOOL_TIMEOUT_MS} '{value}': {e}"))
            })?;
            config.tool_timeout_ms = Some(timeout_ms);
        }
        if let Some(value) = lookup(ENV_VERBOSE) {
            config.verbose = parse_flag(&value).ok_or_else(|| {
                CraftError::configuration(format!("invalid {ENV_VERBOSE} '{value}'"))
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use test_case::test_case;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.tool_timeout().is_none());
    }

    #[test]
    fn test_from_lookup_all_set() {
        let config = EngineConfig::from_lookup(lookup(&[
            (ENV_SCHEDULING, "Concurrent"),
            (ENV_TOOL_TIMEOUT_MS, "1500"),
            (ENV_VERBOSE, "yes"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            EngineConfig::new()
                .with_scheduling(SchedulingMode::Concurrent)
                .with_tool_timeout_ms(1500)
                .with_verbose(true)
        );
        assert_eq!(config.tool_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test_case(ENV_SCHEDULING, "parallel" ; "unknown mode")]
    #[test_case(ENV_TOOL_TIMEOUT_MS, "soon" ; "non numeric timeout")]
    #[test_case(ENV_VERBOSE, "maybe" ; "bad flag")]
    fn test_from_lookup_rejects(key: &str, value: &str) {
        let err = EngineConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
        assert!(matches!(err, CraftError::Configuration { .. }));
    }

    #[test]
    fn test_scheduling_mode_serde() {
        let json = serde_json::to_string(&SchedulingMode::Concurrent).unwrap();
        assert_eq!(json, "\"concurrent\"");
        assert_eq!(SchedulingMode::Sequential.to_string(), "sequential");
    }
}
