//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act in the world:
//! evaluate arithmetic, read the clock, query weather or paper-search APIs.
//! Every tool takes a mapping of named parameters and produces a string.

use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, warn};
use crate::error::{RegistryError, ToolError};

/// Named parameters for a tool call, decoded from the model's `Action Input`.
pub type ToolParams = serde_json::Map<String, serde_json::Value>;

/// The core Tool trait.
///
/// Each tool (calculator, get_current_time, get_weather, search_arxiv, ...)
/// implements this trait and is registered in the [`ToolRegistry`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "calculator").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// Execute the tool with the given named parameters.
    async fn call(&self, params: ToolParams) -> std::result::Result<String, ToolError>;
}

type Capability = dyn Fn(ToolParams) -> std::result::Result<String, ToolError> + Send + Sync;

/// A tool backed by a plain synchronous function.
pub struct FnTool {
    name: String,
    description: String,
    capability: Box<Capability>,
}

impl FnTool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, capability: F) -> Self
    where
        F: Fn(ToolParams) -> std::result::Result<String, ToolError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            capability: Box::new(capability),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn call(&self, params: ToolParams) -> std::result::Result<String, ToolError> {
        (self.capability)(params)
    }
}

/// Reject parameters a tool does not accept.
///
/// Tools take named parameters only, so an unexpected key (including the
/// `input` wrapper produced for non-JSON action input) is an argument error.
pub fn check_params(params: &ToolParams, accepted: &[&str]) -> std::result::Result<(), ToolError> {
    if let Some(unknown) = params.keys().find(|k| !accepted.contains(&k.as_str())) {
        return Err(ToolError::InvalidArguments(format!(
            "unexpected parameter '{unknown}' (accepted: {})",
            accepted.join(", ")
        )));
    }
    Ok(())
}

/// A registry of available tools.
///
/// The agent loop uses this to:
/// 1. Build the tool catalog for the system prompt
/// 2. Look up and invoke tools when the model requests them
///
/// Tools keep their registration order and names are unique.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
    call_timeout: Option<Duration>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every invocation by `timeout`.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Register a tool. Fails if a tool with the same name already exists.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> std::result::Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Register a plain function as a tool.
    pub fn register_fn<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        capability: F,
    ) -> std::result::Result<(), RegistryError>
    where
        F: Fn(ToolParams) -> std::result::Result<String, ToolError> + Send + Sync + 'static,
    {
        self.register(Box::new(FnTool::new(name, description, capability)))
    }

    /// Get a tool by name (exact, case-sensitive match).
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&i| self.tools[i].as_ref())
    }

    /// List all registered tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// `"<name>: <description>"` for every tool, in registration order.
    pub fn describe_all(&self) -> Vec<String> {
        self.tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name and return its observation.
    ///
    /// Never fails: a missing tool yields `Tool '<name>' not found.` and any
    /// error, panic or timeout inside the tool yields
    /// `Error executing <name>: <message>`.
    pub async fn invoke(&self, name: &str, params: ToolParams) -> String {
        let Some(tool) = self.get(name) else {
            warn!(tool = name, "Model requested an unknown tool");
            return format!("Tool '{name}' not found.");
        };

        debug!(tool = name, params = %serde_json::Value::Object(params.clone()), "Invoking tool");

        match self.call_isolated(tool, params).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = name, error = %e, "Tool execution failed");
                format!("Error executing {name}: {}", e.reason())
            }
        }
    }

    async fn call_isolated(
        &self,
        tool: &dyn Tool,
        params: ToolParams,
    ) -> std::result::Result<String, ToolError> {
        let call = AssertUnwindSafe(tool.call(params)).catch_unwind();

        let outcome = match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| ToolError::Timeout {
                tool_name: tool.name().to_string(),
                timeout_secs: limit.as_secs(),
            })?,
            None => call.await,
        };

        outcome.map_err(|payload| ToolError::Panicked(panic_message(payload.as_ref())))?
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str { "echo" }
        fn description(&self) -> &str { "Echoes back the input" }
        async fn call(&self, params: ToolParams) -> std::result::Result<String, ToolError> {
            check_params(&params, &["text"])?;
            Ok(params.get("text").and_then(|v| v.as_str()).unwrap_or("").to_string())
        }
    }

    struct SleepyTool;

    #[async_trait]
    impl Tool for SleepyTool {
        fn name(&self) -> &str { "sleepy" }
        fn description(&self) -> &str { "Never finishes in time" }
        async fn call(&self, _params: ToolParams) -> std::result::Result<String, ToolError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("woke up".into())
        }
    }

    fn params(value: serde_json::Value) -> ToolParams {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool)).unwrap();
        assert!(registry.get("echo").is_some());
        assert!(registry.get("Echo").is_none());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool)).unwrap();
        let err = registry.register(Box::new(EchoTool)).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("echo".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn describe_all_keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register_fn("zeta", "last letter", |_| Ok("z".into())).unwrap();
        registry.register(Box::new(EchoTool)).unwrap();
        registry.register_fn("alpha", "first letter", |_| Ok("a".into())).unwrap();

        assert_eq!(
            registry.describe_all(),
            vec![
                "zeta: last letter".to_string(),
                "echo: Echoes back the input".to_string(),
                "alpha: first letter".to_string(),
            ]
        );
        assert_eq!(registry.names(), vec!["zeta", "echo", "alpha"]);
    }

    #[tokio::test]
    async fn invoke_returns_tool_output() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool)).unwrap();
        let out = registry
            .invoke("echo", params(serde_json::json!({"text": "hello world"})))
            .await;
        assert_eq!(out, "hello world");
    }

    #[tokio::test]
    async fn invoke_missing_tool_reports_not_found() {
        let registry = ToolRegistry::new();
        let out = registry.invoke("X", ToolParams::new()).await;
        assert_eq!(out, "Tool 'X' not found.");
    }

    #[tokio::test]
    async fn invoke_converts_tool_error() {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn("flaky", "Always fails", |_| {
                Err(ToolError::ExecutionFailed {
                    tool_name: "flaky".into(),
                    reason: "boom".into(),
                })
            })
            .unwrap();
        let out = registry.invoke("flaky", ToolParams::new()).await;
        assert_eq!(out, "Error executing flaky: boom");
    }

    #[tokio::test]
    async fn invoke_rejects_unknown_parameters() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool)).unwrap();
        let out = registry
            .invoke("echo", params(serde_json::json!({"input": "raw text"})))
            .await;
        assert!(out.starts_with("Error executing echo: invalid arguments"));
        assert!(out.contains("'input'"));
    }

    #[tokio::test]
    async fn invoke_survives_panicking_tool() {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn("explodes", "Panics", |_| panic!("kaboom"))
            .unwrap();
        let out = registry.invoke("explodes", ToolParams::new()).await;
        assert_eq!(out, "Error executing explodes: Tool panicked: kaboom");
    }

    #[tokio::test(start_paused = true)]
    async fn invoke_times_out_slow_tool() {
        let mut registry = ToolRegistry::new().with_call_timeout(Duration::from_secs(5));
        registry.register(Box::new(SleepyTool)).unwrap();
        let out = registry.invoke("sleepy", ToolParams::new()).await;
        assert_eq!(out, "Error executing sleepy: Tool timed out: sleepy after 5s");
    }

    #[test]
    fn check_params_accepts_known_keys() {
        let p = params(serde_json::json!({"a": 1, "b": 2}));
        assert!(check_params(&p, &["a", "b", "c"]).is_ok());
        assert!(check_params(&p, &["a"]).is_err());
    }
}
