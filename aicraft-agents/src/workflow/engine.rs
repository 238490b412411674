//! The dependency-aware workflow engine.
//!
//! The engine owns every tool, task and agent by id. Agents declare the
//! agents they depend on; each run repeatedly scans all agents in creation
//! order and runs those whose dependencies have executed, until every agent
//! has executed once.
//!
//! Two scheduling policies are available and intentionally differ:
//!
//! - [`WorkflowEngine::execute_workflow`] runs agents one at a time and
//!   aborts on the first failure. The failed agent is not marked executed.
//! - [`WorkflowEngine::execute_all_workflows`] spawns every eligible agent of
//!   a pass onto the runtime and waits for all of them. A failing agent is
//!   logged, recorded in the report and still marked executed, so dependents
//!   run with whatever output exists. The run itself returns `Ok`.

use aicraft_core::{
    AgentConfig, CraftError, Result, TaskConfig, Tool, Value, ValueStream, WorkflowConfig,
};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Instant,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{
    config::{EngineConfig, SchedulingMode},
    graph::{BindingEdge, WorkflowGraph},
    report::WorkflowReport,
    state::{AgentFailure, SchedulerState},
};
use crate::{
    agent::{Agent, SharedAgent},
    task::{Task, TaskContext, TaskStatus},
    tool::ToolRegistry,
};

/// A created task waiting to be assigned to an agent.
#[derive(Debug, Clone)]
struct PendingTask {
    config: TaskConfig,
    tool: Arc<dyn Tool>,
}

/// A binding paired with the agent it reads from.
struct SourcedBinding {
    edge: BindingEdge,
    source: SharedAgent,
}

/// Workflow engine
#[derive(Debug)]
pub struct WorkflowEngine {
    config: EngineConfig,
    registry: ToolRegistry,
    pending_tasks: HashMap<String, PendingTask>,
    agents: HashMap<String, SharedAgent>,
    graph: WorkflowGraph,
    state: Arc<SchedulerState>,
    cancellation: CancellationToken,
}

impl WorkflowEngine {
    /// Create an engine with an empty tool registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with the given configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            registry: ToolRegistry::new(),
            pending_tasks: HashMap::new(),
            agents: HashMap::new(),
            graph: WorkflowGraph::new(),
            state: Arc::new(SchedulerState::new()),
            cancellation: CancellationToken::new(),
        }
    }

    /// Use the given tool registry.
    #[must_use]
    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registered tools
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Register a tool; an existing tool with the same id is replaced.
    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        self.registry.register(tool)
    }

    /// Create a task bound to a registered tool.
    ///
    /// The task stays unassigned until [`WorkflowEngine::assign_task_to_agent`].
    ///
    /// # Errors
    ///
    /// `UnresolvedReference` for an unknown tool, `DuplicateId` when the id
    /// is already taken.
    pub fn create_task(&mut self, config: TaskConfig) -> Result<()> {
        if self.pending_tasks.contains_key(&config.id) || self.graph.owner(&config.id).is_some() {
            return Err(CraftError::duplicate("task", config.id));
        }
        let tool = self
            .registry
            .resolve(&config.tool_id)
            .ok_or_else(|| CraftError::unresolved("tool", config.tool_id.clone()))?;

        debug!(
            "Created task '{}' using tool '{}'",
            config.id, config.tool_id
        );
        self.pending_tasks
            .insert(config.id.clone(), PendingTask { config, tool });
        Ok(())
    }

    /// Create an agent and assign the tasks it lists, in order.
    ///
    /// Every listed task is checked before anything is registered, so a
    /// failed call leaves the engine unchanged.
    ///
    /// # Errors
    ///
    /// `DuplicateId` when the id is already taken, `Configuration` when a
    /// task is listed twice, plus any error of
    /// [`WorkflowEngine::assign_task_to_agent`].
    pub fn create_agent(&mut self, config: AgentConfig) -> Result<()> {
        if self.agents.contains_key(&config.id) {
            return Err(CraftError::duplicate("agent", config.id));
        }

        let AgentConfig {
            id,
            name,
            depends_on,
            tasks,
            execution,
        } = config;

        let mut listed = HashSet::with_capacity(tasks.len());
        for task_id in &tasks {
            self.check_assignable(task_id)?;
            if !listed.insert(task_id.as_str()) {
                return Err(CraftError::configuration(format!(
                    "task '{task_id}' is listed twice by agent '{id}'"
                )));
            }
        }

        self.graph.add_agent(id.clone(), depends_on.clone());
        let agent = Agent::new(id.clone(), name)
            .with_dependencies(depends_on)
            .with_execution(execution);
        self.agents.insert(id.clone(), agent.into_shared());
        debug!("Created agent '{}'", id);

        for task_id in tasks {
            self.assign_task_to_agent(&id, &task_id)?;
        }
        Ok(())
    }

    /// Move a created task into an agent's task list.
    ///
    /// # Errors
    ///
    /// - `UnresolvedReference` for an unknown agent or task.
    /// - `Configuration` when the task already belongs to an agent, or the
    ///   agent is currently running.
    pub fn assign_task_to_agent(&mut self, agent_id: &str, task_id: &str) -> Result<()> {
        let shared = self
            .agents
            .get(agent_id)
            .ok_or_else(|| CraftError::unresolved("agent", agent_id))?;

        self.check_assignable(task_id)?;

        let mut agent = shared.try_lock().map_err(|_| {
            CraftError::configuration(format!("agent '{agent_id}' is running"))
        })?;
        let Some(PendingTask { config, tool }) = self.pending_tasks.remove(task_id) else {
            return Err(CraftError::unresolved("task", task_id));
        };

        self.graph.add_task(agent_id, task_id, &config.bindings);
        agent.add_task(Task::from_config(config, tool));
        debug!("Assigned task '{}' to agent '{}'", task_id, agent_id);
        Ok(())
    }

    /// Build the whole workflow from its definition.
    ///
    /// Tasks are created first, then agents with their task lists. The
    /// result is validated before returning.
    pub fn initialize_workflow(&mut self, workflow: WorkflowConfig) -> Result<()> {
        let WorkflowConfig { tasks, agents } = workflow;
        info!(
            "Initializing workflow with {} tasks and {} agents",
            tasks.len(),
            agents.len()
        );

        for task in tasks {
            self.create_task(task)?;
        }
        for agent in agents {
            self.create_agent(agent)?;
        }
        self.validate()
    }

    /// Check dependency references, acyclicity and input bindings.
    pub fn validate(&self) -> Result<()> {
        self.graph.validate()
    }

    /// Topological order of agents.
    pub fn execution_order(&self) -> Result<Vec<String>> {
        self.graph.execution_order()
    }

    /// Token that cancels in-flight tool calls and stops further passes.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Run with the configured scheduling mode.
    pub async fn run_default(&self) -> Result<WorkflowReport> {
        self.run(self.config.scheduling).await
    }

    /// Run with an explicit scheduling mode.
    pub async fn run(&self, mode: SchedulingMode) -> Result<WorkflowReport> {
        match mode {
            SchedulingMode::Sequential => self.execute_workflow().await,
            SchedulingMode::Concurrent => self.execute_all_workflows().await,
        }
    }

    /// Sequential scheduling: run eligible agents one at a time.
    ///
    /// Agents are visited in creation order and eligibility is re-checked
    /// agent by agent, so a dependent may run in the same pass as its
    /// dependency.
    ///
    /// # Errors
    ///
    /// Validation errors before anything runs; otherwise the first agent
    /// error, after which no further agent starts. Agents claimed by an
    /// overlapping run are waited for rather than reported as stalled. Agents executed before
    /// the failure keep their output.
    pub async fn execute_workflow(&self) -> Result<WorkflowReport> {
        self.validate()?;
        let started = Instant::now();
        let mut report = WorkflowReport::start(SchedulingMode::Sequential);
        let context = self.task_context();

        info!(
            "Starting sequential workflow with {} agents",
            self.graph.agents().len()
        );

        loop {
            if self.cancellation.is_cancelled() {
                return Err(CraftError::Cancelled);
            }
            let pending = self.pending_agents().await;
            if pending.is_empty() {
                break;
            }

            let mut progressed = false;
            for agent_id in self.graph.agents() {
                if !self
                    .state
                    .claim(agent_id, self.graph.dependencies(agent_id))
                    .await
                {
                    continue;
                }
                progressed = true;

                let outcome = match self.shared_agent(agent_id) {
                    Ok(agent) => {
                        run_agent(agent, self.sourced_bindings(agent_id), context.clone()).await
                    }
                    Err(e) => Err(e),
                };
                if let Err(e) = outcome {
                    self.state.release(agent_id).await;
                    error!("Agent '{}' failed, aborting workflow: {}", agent_id, e);
                    return Err(e);
                }

                self.state.mark_executed(agent_id).await;
                report.execution_order.push(agent_id.clone());
                info!("Agent '{}' executed", agent_id);
            }

            if !progressed {
                if self.state.wait_for_running().await {
                    debug!("Waiting for agents claimed by another run");
                    continue;
                }
                return Err(CraftError::SchedulingStalled { pending });
            }
            report.passes += 1;
        }

        info!("Sequential workflow finished in {} passes", report.passes);
        Ok(report.finish(started.elapsed()))
    }

    /// Concurrent scheduling: spawn every eligible agent of a pass.
    ///
    /// The engine waits for all agents of a pass before starting the next
    /// one. Agent failures are logged and recorded in the report; the failed
    /// agent still counts as executed.
    ///
    /// # Errors
    ///
    /// Validation errors before anything runs, `Cancelled` once the engine's
    /// token has fired, and `SchedulingStalled` if a pass finds nothing to
    /// run while agents are pending.
    pub async fn execute_all_workflows(&self) -> Result<WorkflowReport> {
        self.validate()?;
        let started = Instant::now();
        let mut report = WorkflowReport::start(SchedulingMode::Concurrent);
        let context = self.task_context();

        info!(
            "Starting concurrent workflow with {} agents",
            self.graph.agents().len()
        );

        loop {
            if self.cancellation.is_cancelled() {
                return Err(CraftError::Cancelled);
            }
            let pending = self.pending_agents().await;
            if pending.is_empty() {
                break;
            }

            let ready = self
                .state
                .claim_ready(self.graph.agents().iter().map(|agent_id| {
                    (agent_id.as_str(), self.graph.dependencies(agent_id))
                }))
                .await;
            if ready.is_empty() {
                if self.state.wait_for_running().await {
                    debug!("Waiting for agents claimed by another run");
                    continue;
                }
                return Err(CraftError::SchedulingStalled { pending });
            }
            report.passes += 1;
            debug!("Pass {} launching agents: {:?}", report.passes, ready);

            let mut handles = Vec::with_capacity(ready.len());
            for agent_id in ready {
                let handle = match self.shared_agent(&agent_id) {
                    Ok(agent) => Some(tokio::spawn(run_agent(
                        agent,
                        self.sourced_bindings(&agent_id),
                        context.clone(),
                    ))),
                    Err(e) => {
                        self.record_failure(&mut report, &agent_id, &e).await;
                        None
                    }
                };
                handles.push((agent_id, handle));
            }

            for (agent_id, handle) in handles {
                if let Some(handle) = handle {
                    let outcome = match handle.await {
                        Ok(outcome) => outcome,
                        Err(join_error) => Err(CraftError::external(join_error)),
                    };
                    match outcome {
                        Ok(()) => info!("Agent '{}' executed", agent_id),
                        Err(e) => self.record_failure(&mut report, &agent_id, &e).await,
                    }
                }
                self.state.mark_executed(&agent_id).await;
                report.execution_order.push(agent_id);
            }
        }

        if report.is_success() {
            info!("Concurrent workflow finished in {} passes", report.passes);
        } else {
            warn!(
                "Concurrent workflow finished in {} passes with failed agents: {:?}",
                report.passes,
                report.failed_agents()
            );
        }
        Ok(report.finish(started.elapsed()))
    }

    /// Agent by id
    pub fn agent(&self, agent_id: &str) -> Option<SharedAgent> {
        self.agents.get(agent_id).cloned()
    }

    /// Agent ids in creation order
    pub fn agent_ids(&self) -> &[String] {
        self.graph.agents()
    }

    /// Result recorded by `agent_id` for `task_id`.
    pub async fn output(&self, agent_id: &str, task_id: &str) -> Option<Value> {
        let agent = self.agents.get(agent_id)?;
        agent.lock().await.output_value(task_id).cloned()
    }

    /// Take the stream produced by `task_id` of `agent_id`.
    pub async fn take_stream(&self, agent_id: &str, task_id: &str) -> Option<ValueStream> {
        let agent = self.agents.get(agent_id)?;
        agent.lock().await.take_stream(task_id)
    }

    /// Ids of executed agents
    pub async fn executed(&self) -> HashSet<String> {
        self.state.executed().await
    }

    /// Failures recorded by concurrent runs
    pub async fn failures(&self) -> HashMap<String, AgentFailure> {
        self.state.failures().await
    }

    /// Status of a task; created but unassigned tasks are `Pending`.
    pub async fn task_status(&self, task_id: &str) -> Option<TaskStatus> {
        if self.pending_tasks.contains_key(task_id) {
            return Some(TaskStatus::Pending);
        }
        let agent = self.agents.get(self.graph.owner(task_id)?)?;
        agent.lock().await.task(task_id).map(Task::status)
    }

    fn check_assignable(&self, task_id: &str) -> Result<()> {
        if let Some(owner) = self.graph.owner(task_id) {
            return Err(CraftError::configuration(format!(
                "task '{task_id}' is already assigned to agent '{owner}'"
            )));
        }
        if !self.pending_tasks.contains_key(task_id) {
            return Err(CraftError::unresolved("task", task_id));
        }
        Ok(())
    }

    fn task_context(&self) -> TaskContext {
        let context = TaskContext::new()
            .with_cancellation(self.cancellation.clone())
            .with_verbose(self.config.verbose);
        match self.config.tool_timeout() {
            Some(timeout) => context.with_tool_timeout(timeout),
            None => context,
        }
    }

    fn shared_agent(&self, agent_id: &str) -> Result<SharedAgent> {
        self.agent(agent_id)
            .ok_or_else(|| CraftError::unresolved("agent", agent_id))
    }

    async fn pending_agents(&self) -> Vec<String> {
        let executed = self.state.executed().await;
        self.graph
            .agents()
            .iter()
            .filter(|agent_id| !executed.contains(*agent_id))
            .cloned()
            .collect()
    }

    fn sourced_bindings(&self, agent_id: &str) -> Vec<SourcedBinding> {
        self.graph
            .bindings_of(agent_id)
            .filter_map(|edge| {
                let source = self.agents.get(&edge.binding.source_agent)?;
                Some(SourcedBinding {
                    edge: edge.clone(),
                    source: Arc::clone(source),
                })
            })
            .collect()
    }

    async fn record_failure(&self, report: &mut WorkflowReport, agent_id: &str, e: &CraftError) {
        error!("Agent '{}' failed: {}", agent_id, e);
        let failure = AgentFailure {
            category: e.category(),
            message: e.to_string(),
        };
        self.state.record_failure(agent_id, failure.clone()).await;
        report.failures.insert(agent_id.to_string(), failure);
    }
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve an agent's input bindings, then run its tasks.
///
/// Each source agent is locked only long enough to copy the bound value.
/// Sources are executed dependencies, so they are never locked by a running
/// agent at this point.
async fn run_agent(
    agent: SharedAgent,
    bindings: Vec<SourcedBinding>,
    context: TaskContext,
) -> Result<()> {
    let mut resolved = Vec::with_capacity(bindings.len());
    for SourcedBinding { edge, source } in bindings {
        let value = {
            let source = source.lock().await;
            source
                .output_value(&edge.binding.source_task)
                .and_then(|result| edge.binding.select(result))
                .cloned()
        };
        match value {
            Some(value) => resolved.push((edge.task_id, edge.input_key, value)),
            None => warn!(
                "No value for input '{}' of task '{}' from {}/{}; keeping the existing input",
                edge.input_key, edge.task_id, edge.binding.source_agent, edge.binding.source_task
            ),
        }
    }

    let mut agent = agent.lock().await;
    for (task_id, input_key, value) in resolved {
        if let Some(task) = agent.task_mut(&task_id) {
            task.set_input(input_key, value);
        }
    }
    debug!("Running agent '{}'", agent.id());
    agent.execute(&context).await
}
