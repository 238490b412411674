//! Integration tests for loading workflow definitions from disk.

use aicraft_core::{CraftError, ExecutionMode, WorkflowConfig};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio::fs;

#[tokio::test]
async fn test_load_json_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("workflow.json");

    let definition = serde_json::json!({
        "tasks": [
            {"id": "task_extract_text", "name": "Extract", "tool_id": "echo",
             "inputs": {"text": "alpha beta gamma"}},
            {"id": "task_chunk", "name": "Chunk", "tool_id": "text_chunker",
             "inputs": {"chunkSize": 2, "chunkOverlap": 0},
             "bindings": {"text": {"source_agent": "agent1", "source_task": "task_extract_text"}}}
        ],
        "agents": [
            {"id": "agent1", "name": "Extractor", "tasks": ["task_extract_text"]},
            {"id": "agent2", "name": "Chunker", "depends_on": ["agent1"],
             "tasks": ["task_chunk"], "execution": "concurrent"}
        ]
    });
    fs::write(&path, serde_json::to_string_pretty(&definition).unwrap())
        .await
        .unwrap();

    let config = WorkflowConfig::load(&path).await.unwrap();
    assert_eq!(config.tasks.len(), 2);
    assert_eq!(config.agents.len(), 2);

    let chunk = config.get_task("task_chunk").unwrap();
    assert_eq!(chunk.bindings["text"].source_agent, "agent1");
    assert_eq!(chunk.bindings["text"].output_key, None);

    let agent2 = config.get_agent("agent2").unwrap();
    assert_eq!(agent2.depends_on, vec!["agent1"]);
    assert_eq!(agent2.execution, ExecutionMode::Concurrent);
}

#[tokio::test]
async fn test_load_toml_workflow_with_env_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("workflow.toml");

    let definition = r#"
[[tasks]]
id = "t1"
name = "Echo"
tool_id = "echo"

[tasks.inputs]
text = "${AICRAFT_INTEGRATION_UNSET_TEXT:from default}"

[[agents]]
id = "a1"
name = "Echoer"
tasks = ["t1"]
"#;
    fs::write(&path, definition).await.unwrap();

    let config = WorkflowConfig::load(&path).await.unwrap();
    assert_eq!(
        config.tasks[0].inputs["text"],
        serde_json::json!("from default")
    );
}

#[tokio::test]
async fn test_load_round_trip_through_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("saved.json");

    let original = WorkflowConfig::from_json_str(
        r#"{"tasks": [{"id": "t1", "tool_id": "echo", "timeout_ms": 50}],
            "agents": [{"id": "a1", "tasks": ["t1"]}]}"#,
    )
    .unwrap();
    fs::write(&path, original.to_json_string().unwrap())
        .await
        .unwrap();

    let loaded = WorkflowConfig::load(&path).await.unwrap();
    assert_eq!(loaded, original);
}

#[tokio::test]
async fn test_load_errors() {
    let temp_dir = TempDir::new().unwrap();

    let missing = WorkflowConfig::load(temp_dir.path().join("missing.json")).await;
    assert!(matches!(missing, Err(CraftError::Configuration { .. })));

    let yaml = temp_dir.path().join("workflow.yaml");
    fs::write(&yaml, "tasks: []").await.unwrap();
    let unsupported = WorkflowConfig::load(&yaml).await;
    assert!(matches!(unsupported, Err(CraftError::Configuration { .. })));
}
