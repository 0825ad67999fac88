//! The agent reasoning loop implementation.

use rustedreact_config::AppConfig;
use rustedreact_core::message::{Message, Transcript};
use rustedreact_core::provider::{Provider, ProviderRequest};
use rustedreact_core::tool::ToolRegistry;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::parser::{extract_final_answer, parse_action};
use crate::prompt::build_system_prompt;

/// Answer returned when the iteration budget runs out.
pub const BUDGET_EXHAUSTED_MESSAGE: &str =
    "I couldn't complete the task within the iteration limit.";

/// Answer returned when a run is cancelled.
pub const CANCELLED_MESSAGE: &str = "The run was cancelled before a final answer was reached.";

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The model emitted `Final Answer:`.
    FinalAnswer,
    /// The model replied without an action; its raw text is the answer.
    DirectAnswer,
    /// `max_iterations` tool steps were spent without an answer.
    BudgetExhausted,
    /// The caller cancelled the run.
    Cancelled,
}

/// The result of one [`AgentLoop::run`].
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    /// The text handed back to the user.
    pub answer: String,
    /// Every message exchanged, starting with the system prompt.
    pub transcript: Transcript,
    /// How many times the provider was called.
    pub completion_calls: u32,
    /// How many tool steps (Action → Observation) were taken.
    pub iterations: u32,
    pub termination: Termination,
}

/// The core agent loop: Thought → Action → Observation until a final
/// answer or the iteration budget.
///
/// `run` takes `&self` and keeps all per-run state local, so one loop can
/// serve concurrent runs; the tool registry is the only shared state.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: Option<f32>,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// Maximum tool steps per run
    max_iterations: u32,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            max_tokens: None,
            tools,
            max_iterations: 10,
        }
    }

    /// Create an agent loop using the model and limits from `config`.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        config: &AppConfig,
    ) -> Self {
        let mut agent = Self::new(provider, &config.default_model, tools)
            .with_max_iterations(config.agent.max_iterations);
        agent.temperature = config.default_temperature;
        agent.max_tokens = config.default_max_tokens;
        agent
    }

    /// Set the maximum number of tool steps per run.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Answer `query`, calling tools as the model requests them.
    ///
    /// Always produces an answer: provider failures become response text
    /// and tool failures become observations.
    pub async fn run(&self, query: &str) -> RunOutcome {
        self.run_with_cancel(query, &CancellationToken::new()).await
    }

    /// Like [`run`](Self::run), but stops early once `cancel` fires. The
    /// token is checked before each step and raced against the pending
    /// provider or tool call.
    pub async fn run_with_cancel(&self, query: &str, cancel: &CancellationToken) -> RunOutcome {
        let mut state = RunState::new(build_system_prompt(&self.tools), query);

        info!(
            run_id = %state.run_id,
            model = %self.model,
            max_iterations = self.max_iterations,
            "Agent run starting"
        );

        while state.iterations < self.max_iterations {
            debug!(run_id = %state.run_id, iteration = state.iterations + 1, "Requesting next step");

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: state.transcript.messages().to_vec(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            };

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return state.finish(CANCELLED_MESSAGE, Termination::Cancelled),
                response = self.provider.complete(request) => response,
            };
            state.completion_calls += 1;

            let text = match response {
                Ok(response) => response.content,
                Err(e) => {
                    warn!(run_id = %state.run_id, error = %e, "Completion request failed");
                    format!("Error calling LLM: {e}")
                }
            };
            state.transcript.push(Message::assistant(&text));

            if let Some(answer) = extract_final_answer(&text) {
                let answer = answer.to_string();
                return state.finish(answer, Termination::FinalAnswer);
            }

            let action = parse_action(&text);
            let Some(tool_name) = action.name else {
                return state.finish(text, Termination::DirectAnswer);
            };
            let params = action.input.unwrap_or_default();

            debug!(run_id = %state.run_id, tool = %tool_name, "Dispatching action");
            let observation = tokio::select! {
                biased;
                _ = cancel.cancelled() => return state.finish(CANCELLED_MESSAGE, Termination::Cancelled),
                observation = self.tools.invoke(&tool_name, params) => observation,
            };

            state.transcript.push(Message::observation(&observation));
            state.iterations += 1;
        }

        warn!(
            run_id = %state.run_id,
            max_iterations = self.max_iterations,
            "Iteration budget exhausted"
        );
        state.finish(BUDGET_EXHAUSTED_MESSAGE, Termination::BudgetExhausted)
    }
}

/// Per-run bookkeeping; never shared between runs.
struct RunState {
    run_id: Uuid,
    transcript: Transcript,
    completion_calls: u32,
    iterations: u32,
}

impl RunState {
    fn new(system_prompt: String, query: &str) -> Self {
        let mut transcript = Transcript::new();
        transcript.push(Message::system(system_prompt));
        transcript.push(Message::user(query));
        Self {
            run_id: Uuid::new_v4(),
            transcript,
            completion_calls: 0,
            iterations: 0,
        }
    }

    fn finish(self, answer: impl Into<String>, termination: Termination) -> RunOutcome {
        info!(
            run_id = %self.run_id,
            ?termination,
            completion_calls = self.completion_calls,
            iterations = self.iterations,
            "Agent run finished"
        );
        RunOutcome {
            run_id: self.run_id,
            answer: answer.into(),
            transcript: self.transcript,
            completion_calls: self.completion_calls,
            iterations: self.iterations,
            termination,
        }
    }
}
