//! # RustedReact Core
//!
//! Domain types, traits, and error definitions for the RustedReact agent loop.
//! Every other crate in the workspace depends inward on this one.
//!
//! ## Design Philosophy
//!
//! The two collaborators of the loop are defined as traits here:
//! - [`Provider`] — the language-model completion endpoint
//! - [`Tool`] — a named capability the model can invoke
//!
//! Implementations live in `rustedreact-providers` and `rustedreact-tools`,
//! which keeps the loop testable with scripted stand-ins.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, RegistryError, Result, ToolError};
pub use message::{Message, Role, Transcript};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use tool::{FnTool, Tool, ToolParams, ToolRegistry};
