//! Agent dependency graph and structural validation.

use aicraft_core::{CraftError, InputBinding, Result};
use std::collections::{HashMap, HashSet, VecDeque};

/// Structural view of a workflow: agents, their dependencies, which agent
/// owns which task and the bindings each task declares.
///
/// Agents are kept in creation order so that ordering and error messages
/// are reproducible.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
    agents: Vec<String>,
    depends_on: HashMap<String, Vec<String>>,
    task_owner: HashMap<String, String>,
    bindings: Vec<BindingEdge>,
}

/// A binding declared by one task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingEdge {
    /// Task declaring the binding
    pub task_id: String,
    /// Input key the resolved value is written to
    pub input_key: String,
    /// Where the value comes from
    pub binding: InputBinding,
}

impl WorkflowGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an agent and its dependency list.
    pub fn add_agent(&mut self, agent_id: impl Into<String>, depends_on: Vec<String>) {
        let agent_id = agent_id.into();
        if !self.depends_on.contains_key(&agent_id) {
            self.agents.push(agent_id.clone());
        }
        self.depends_on.insert(agent_id, depends_on);
    }

    /// Record that `agent_id` owns `task_id`, along with the task's bindings.
    pub fn add_task(
        &mut self,
        agent_id: &str,
        task_id: &str,
        bindings: &HashMap<String, InputBinding>,
    ) {
        self.task_owner
            .insert(task_id.to_string(), agent_id.to_string());
        let mut edges: Vec<BindingEdge> = bindings
            .iter()
            .map(|(input_key, binding)| BindingEdge {
                task_id: task_id.to_string(),
                input_key: input_key.clone(),
                binding: binding.clone(),
            })
            .collect();
        edges.sort_by(|a, b| a.input_key.cmp(&b.input_key));
        self.bindings.extend(edges);
    }

    /// Agent ids in creation order
    pub fn agents(&self) -> &[String] {
        &self.agents
    }

    /// Dependencies of one agent
    pub fn dependencies(&self, agent_id: &str) -> &[String] {
        self.depends_on.get(agent_id).map_or(&[], Vec::as_slice)
    }

    /// Agent owning the given task
    pub fn owner(&self, task_id: &str) -> Option<&str> {
        self.task_owner.get(task_id).map(String::as_str)
    }

    /// Bindings declared by the tasks of one agent
    pub fn bindings_of<'a>(&'a self, agent_id: &'a str) -> impl Iterator<Item = &'a BindingEdge> {
        self.bindings
            .iter()
            .filter(move |edge| self.owner(&edge.task_id) == Some(agent_id))
    }

    /// Check references, acyclicity and bindings.
    ///
    /// # Errors
    ///
    /// - `UnresolvedReference` for a dependency naming no agent.
    /// - `CyclicDependency` when the agents cannot be ordered.
    /// - `InvalidBinding` when a binding reads from an agent that is not a
    ///   transitive dependency of the reader, or from a task that agent
    ///   does not own.
    pub fn validate(&self) -> Result<()> {
        for agent_id in &self.agents {
            for dependency in self.dependencies(agent_id) {
                if !self.depends_on.contains_key(dependency) {
                    return Err(CraftError::unresolved("agent", dependency.clone()));
                }
            }
        }

        self.execution_order()?;
        self.validate_bindings()
    }

    /// Topological order of agents; ties keep creation order.
    ///
    /// Dependencies naming unknown agents are ignored here, see
    /// [`WorkflowGraph::validate`].
    ///
    /// # Errors
    ///
    /// `CyclicDependency` listing, in creation order, every agent that could
    /// not be ordered. A self-dependency is reported the same way.
    pub fn execution_order(&self) -> Result<Vec<String>> {
        let mut in_degree: HashMap<&str, usize> = HashMap::new();
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

        for agent_id in &self.agents {
            let known: Vec<&String> = self
                .dependencies(agent_id)
                .iter()
                .filter(|dependency| self.depends_on.contains_key(*dependency))
                .collect();
            in_degree.insert(agent_id, known.len());
            for dependency in known {
                dependents
                    .entry(dependency.as_str())
                    .or_default()
                    .push(agent_id);
            }
        }

        let mut queue: VecDeque<&str> = self
            .agents
            .iter()
            .map(String::as_str)
            .filter(|agent_id| in_degree.get(agent_id) == Some(&0))
            .collect();
        let mut order = Vec::with_capacity(self.agents.len());

        while let Some(current) = queue.pop_front() {
            order.push(current.to_string());
            for dependent in dependents.get(current).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*dependent);
                    }
                }
            }
        }

        if order.len() != self.agents.len() {
            let sorted: HashSet<&str> = order.iter().map(String::as_str).collect();
            let agents = self
                .agents
                .iter()
                .filter(|agent_id| !sorted.contains(agent_id.as_str()))
                .cloned()
                .collect();
            return Err(CraftError::CyclicDependency { agents });
        }

        Ok(order)
    }

    /// All agents `agent_id` transitively depends on.
    pub fn ancestors(&self, agent_id: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&str> = self
            .dependencies(agent_id)
            .iter()
            .map(String::as_str)
            .collect();

        while let Some(current) = stack.pop() {
            if seen.insert(current.to_string()) {
                stack.extend(self.dependencies(current).iter().map(String::as_str));
            }
        }
        seen
    }

    fn validate_bindings(&self) -> Result<()> {
        for BindingEdge {
            task_id, binding, ..
        } in &self.bindings
        {
            let Some(owner) = self.owner(task_id) else {
                continue;
            };

            if !self.depends_on.contains_key(&binding.source_agent) {
                return Err(CraftError::invalid_binding(
                    task_id.clone(),
                    format!("unknown source agent '{}'", binding.source_agent),
                ));
            }
            if !self.ancestors(owner).contains(&binding.source_agent) {
                return Err(CraftError::invalid_binding(
                    task_id.clone(),
                    format!(
                        "agent '{}' does not depend on source agent '{}'",
                        owner, binding.source_agent
                    ),
                ));
            }
            if self.owner(&binding.source_task) != Some(binding.source_agent.as_str()) {
                return Err(CraftError::invalid_binding(
                    task_id.clone(),
                    format!(
                        "task '{}' is not owned by agent '{}'",
                        binding.source_task, binding.source_agent
                    ),
                ));
            }
        }
        Ok(())
    }
}
