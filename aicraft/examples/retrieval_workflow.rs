//! Retrieval workflow example
//!
//! Loads a workflow definition from TOML, registers two toy embedding tools
//! next to the built-in ones and runs the pipeline. The final answer is read
//! word by word from the narrator's stream.
//!
//! ```bash
//! RUST_LOG=aicraft_agents=debug AICRAFT_SCHEDULING=concurrent \
//!     cargo run -p aicraft --example retrieval_workflow
//! ```

use aicraft::core::inputs::{require, require_str};
use aicraft::prelude::*;
use futures::StreamExt;
use std::{io::Write, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

const WORKFLOW: &str = include_str!("retrieval_workflow.toml");

/// Letter-frequency vector; enough to make cosine similarity meaningful.
fn embed(text: &str) -> Vec<f64> {
    let mut vector = vec![0.0; 26];
    for byte in text.bytes().filter(u8::is_ascii_alphabetic) {
        vector[usize::from(byte.to_ascii_lowercase() - b'a')] += 1.0;
    }
    vector
}

fn embedding_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(
            FnTool::from_fn("embed_texts", |inputs| {
                let texts: Vec<String> = require(inputs, "texts", "embed_texts")?;
                let vectors: Vec<Vec<f64>> = texts.iter().map(|text| embed(text)).collect();
                Ok(ToolOutput::value(vectors))
            })
            .with_description("Embed every string of `texts`."),
        ),
        Arc::new(
            FnTool::from_fn("embed_text", |inputs| {
                let text = require_str(inputs, "text", "embed_text")?;
                Ok(ToolOutput::value(embed(text)))
            })
            .with_description("Embed `text`."),
        ),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::from_env()?;
    let mode = config.scheduling;
    let mut engine =
        WorkflowEngine::with_config(config).with_registry(ToolRegistry::with_builtin_tools());
    for tool in embedding_tools() {
        engine.register_tool(tool);
    }

    engine.initialize_workflow(WorkflowConfig::from_toml_str(WORKFLOW)?)?;
    info!("Execution order: {:?}", engine.execution_order()?);

    let report = engine.run(mode).await?;
    info!(
        "Workflow finished in {} passes ({:?}), failed agents: {:?}",
        report.passes,
        report.duration,
        report.failed_agents()
    );

    if let Some(retriever) = engine.agent("retriever") {
        let index: Option<usize> = retriever.lock().await.output_as("search")?;
        println!("Nearest chunk: {index:?}");
    }
    if let Some(Value::Array(chunks)) = engine.output("indexer", "chunk").await {
        println!("Document split into {} chunks", chunks.len());
    }

    print!("Answer:");
    if let Some(mut words) = engine.take_stream("narrator", "narrate").await {
        while let Some(word) = words.next().await {
            print!(" {}", word.as_str().unwrap_or_default());
            std::io::stdout().flush()?;
        }
    }
    println!();

    Ok(())
}
