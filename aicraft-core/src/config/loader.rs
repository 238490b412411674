//! Loading workflow definitions from JSON and TOML.
//!
//! Both formats support `${VAR}` and `${VAR:default}` placeholders, which
//! are replaced with environment variable values before parsing.

use regex::{Captures, Regex};
use std::path::Path;
use tracing::{debug, info};

use super::WorkflowConfig;
use crate::{CraftError, Result};

const ENV_VAR_PATTERN: &str = r"\$\{([^}:]+)(?::([^}]*))?\}";

impl WorkflowConfig {
    /// Parse a workflow definition from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let content = substitute_env_variables(content)?;
        serde_json::from_str(&content).map_err(|e| CraftError::Configuration {
            message: format!("Invalid JSON workflow definition: {e}"),
        })
    }

    /// Parse a workflow definition from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let content = substitute_env_variables(content)?;
        toml::from_str(&content).map_err(|e| CraftError::Configuration {
            message: format!("Invalid TOML workflow definition: {e}"),
        })
    }

    /// Load a workflow definition from a file.
    ///
    /// The format is chosen by extension: `.toml` is parsed as TOML,
    /// `.json` as JSON. Any other extension is a configuration error.
    pub async fn load<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file_path = file_path.as_ref();
        debug!("Loading workflow definition: {}", file_path.display());

        let content = tokio::fs::read_to_string(file_path).await.map_err(|e| {
            CraftError::Configuration {
                message: format!(
                    "Failed to read workflow definition {}: {}",
                    file_path.display(),
                    e
                ),
            }
        })?;

        let config = match file_path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            other => {
                return Err(CraftError::configuration(format!(
                    "Unsupported workflow definition format: {}",
                    other.unwrap_or("<none>")
                )));
            }
        };

        info!(
            "Loaded workflow definition {} ({} tasks, {} agents)",
            file_path.display(),
            config.tasks.len(),
            config.agents.len()
        );
        Ok(config)
    }

    /// Serialize the workflow definition to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Replace `${VAR}` and `${VAR:default}` placeholders with environment values.
///
/// Unset variables without a default are replaced by an empty string.
pub fn substitute_env_variables(content: &str) -> Result<String> {
    let env_var_regex = Regex::new(ENV_VAR_PATTERN)
        .map_err(|e| CraftError::configuration(format!("Invalid placeholder pattern: {e}")))?;

    let result = env_var_regex.replace_all(content, |captures: &Captures<'_>| {
        let var_name = captures.get(1).map_or("", |m| m.as_str());
        let default_value = captures.get(2).map_or("", |m| m.as_str());
        std::env::var(var_name).unwrap_or_else(|_| default_value.to_string())
    });

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExecutionMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_substitute_defaults() {
        let content = r#"{"model": "${AICRAFT_TEST_UNSET_MODEL:gpt-4o}", "key": "${AICRAFT_TEST_UNSET_KEY}"}"#;
        let result = substitute_env_variables(content).unwrap();
        assert_eq!(result, r#"{"model": "gpt-4o", "key": ""}"#);
    }

    #[test]
    fn test_substitute_from_env() {
        // PATH is set in every test environment
        let path = std::env::var("PATH").unwrap();
        let result = substitute_env_variables("${PATH:fallback}").unwrap();
        assert_eq!(result, path);
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "tasks": [
                {"id": "t1", "name": "Echo", "tool_id": "echo", "inputs": {"text": "${AICRAFT_TEST_UNSET_TEXT:hello}"}}
            ],
            "agents": [
                {"id": "a1", "name": "Echoer", "tasks": ["t1"], "execution": "concurrent"}
            ]
        }"#;

        let config = WorkflowConfig::from_json_str(json).unwrap();
        assert_eq!(config.tasks.len(), 1);
        assert_eq!(config.tasks[0].inputs["text"], serde_json::json!("hello"));
        assert_eq!(config.agents[0].execution, ExecutionMode::Concurrent);
    }

    #[test]
    fn test_from_toml_str() {
        let toml = r#"
            [[tasks]]
            id = "t1"
            tool_id = "text_chunker"
            timeout_ms = 250

            [tasks.inputs]
            chunkSize = 3
            chunkOverlap = 1

            [tasks.bindings.text]
            source_agent = "a1"
            source_task = "t0"

            [[agents]]
            id = "a2"
            depends_on = ["a1"]
            tasks = ["t1"]
        "#;

        let config = WorkflowConfig::from_toml_str(toml).unwrap();
        let task = &config.tasks[0];
        assert_eq!(task.timeout_ms, Some(250));
        assert_eq!(task.inputs["chunkSize"], serde_json::json!(3));
        assert_eq!(task.bindings["text"].source_agent, "a1");
        assert_eq!(config.agents[0].depends_on, vec!["a1"]);
    }

    #[test]
    fn test_invalid_json() {
        let err = WorkflowConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CraftError::Configuration { .. }));
    }
}
