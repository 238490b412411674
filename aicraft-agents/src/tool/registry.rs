//! Tool registry for managing and resolving tools.

use aicraft_core::Tool;
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, info, warn};

use super::builtin;

/// Tool registry mapping tool ids to executable capabilities.
///
/// Registration is last-write-wins: registering a tool under an id that is
/// already taken replaces the previous tool and logs a warning.
///
/// # Examples
///
/// ```rust
/// use aicraft_agents::tool::ToolRegistry;
/// use aicraft_core::{InputMap, ToolContext, Value};
///
/// # tokio_test::block_on(async {
/// let registry = ToolRegistry::with_builtin_tools();
/// let echo = registry.resolve("echo").expect("echo is built in");
///
/// let mut inputs = InputMap::new();
/// inputs.insert("text".to_string(), Value::from("ping"));
/// let output = echo.execute(&inputs, &ToolContext::new("t1")).await.unwrap();
/// assert_eq!(output.value, Some(Value::from("ping")));
/// # });
/// ```
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    /// Registered tools by id
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in tool.
    #[must_use]
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::new();
        for tool in builtin::all() {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool under its id.
    ///
    /// Returns the tool previously registered under the same id, if any.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        let id = tool.id().to_string();
        let previous = self.tools.insert(id.clone(), tool);

        if previous.is_some() {
            warn!("Tool '{}' was already registered, replacing it", id);
        } else {
            info!("Registering tool: {}", id);
        }
        previous
    }

    /// Resolve a tool by id.
    pub fn resolve(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(id).map(Arc::clone)
    }

    /// Check if a tool is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.tools.contains_key(id)
    }

    /// Get all registered tool ids, sorted.
    #[must_use]
    pub fn tool_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tools.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Remove a tool from the registry.
    pub fn unregister(&mut self, id: &str) -> Option<Arc<dyn Tool>> {
        let removed = self.tools.remove(id);
        if removed.is_some() {
            debug!("Tool '{}' unregistered", id);
        }
        removed
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{FnTool, builtin::EchoTool};
    use aicraft_core::ToolOutput;

    #[test]
    fn test_registry_basic_operations() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        let previous = registry.register(Arc::new(EchoTool::new()));
        assert!(previous.is_none());
        assert!(registry.contains("echo"));
        assert_eq!(registry.len(), 1);

        let resolved = registry.resolve("echo").unwrap();
        assert_eq!(resolved.id(), "echo");
        assert!(registry.resolve("missing").is_none());
    }

    #[test]
    fn test_registry_last_write_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool::new()));

        let replacement = FnTool::from_fn("echo", |_| Ok(ToolOutput::value("replaced")))
            .with_description("replacement echo");
        let previous = registry.register(Arc::new(replacement));

        assert!(previous.is_some());
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.resolve("echo").unwrap().description(),
            "replacement echo"
        );
    }

    #[test]
    fn test_registry_builtins() {
        let registry = ToolRegistry::with_builtin_tools();
        assert_eq!(
            registry.tool_ids(),
            vec![
                "description_extractor",
                "echo",
                "nearest_chunk",
                "relevant_text",
                "text_chunker",
                "word_stream",
            ]
        );
    }

    #[test]
    fn test_registry_unregister() {
        let mut registry = ToolRegistry::with_builtin_tools();
        assert!(registry.unregister("echo").is_some());
        assert!(registry.unregister("echo").is_none());
        assert!(!registry.contains("echo"));
    }
}
