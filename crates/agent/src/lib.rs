//! The core agent loop — the heart of RustedReact.
//!
//! The agent follows a **Thought → Action → Observation** cycle:
//!
//! 1. **Prompt** the model with the tool catalog and the user's question
//! 2. **Parse** its reply: a `Final Answer:` ends the run, an `Action:`
//!    names a tool to call, anything else is taken as a direct answer
//! 3. **Invoke** the tool and feed the result back as an `Observation:`
//! 4. **Repeat** until an answer or the iteration budget runs out

pub mod loop_runner;
pub mod parser;
pub mod prompt;

#[cfg(test)]
mod test_helpers;

pub use loop_runner::{
    AgentLoop, BUDGET_EXHAUSTED_MESSAGE, CANCELLED_MESSAGE, RunOutcome, Termination,
};
pub use parser::{ParsedAction, extract_final_answer, parse_action};
pub use prompt::build_system_prompt;
