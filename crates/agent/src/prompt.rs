//! System prompt for the ReAct protocol.

use rustedreact_core::tool::ToolRegistry;

/// Build the system message that opens every run.
///
/// Tools are listed as `- <name>: <description>` in registration order.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let catalog = tools
        .describe_all()
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a helpful ReAct agent.

Available tools:
{catalog}

If you mention a tool or say you can use a tool, you MUST immediately use it by emitting an Action and Action Input.
Never describe tool usage without performing it.

To use a tool, respond with:
Thought: [your reasoning about what to do next]
Action: [tool_name]
Action Input: {{"param_name": "param_value"}}

When you have enough information to answer the question, respond with:
Thought: [your reasoning]
Final Answer: [your complete answer to the user's question]

Always think step by step and use tools when you need information."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustedreact_core::tool::ToolParams;

    #[test]
    fn lists_tools_in_registration_order() {
        let mut tools = ToolRegistry::new();
        tools
            .register_fn("zeta", "Last letter", |_: ToolParams| Ok(String::new()))
            .unwrap();
        tools
            .register_fn("alpha", "First letter", |_: ToolParams| Ok(String::new()))
            .unwrap();

        let prompt = build_system_prompt(&tools);
        assert!(prompt.starts_with("You are a helpful ReAct agent.\n\nAvailable tools:\n- zeta: Last letter\n- alpha: First letter\n\n"));
    }

    #[test]
    fn carries_protocol_instructions() {
        let prompt = build_system_prompt(&ToolRegistry::new());
        assert!(prompt.contains("Action Input: {\"param_name\": \"param_value\"}"));
        assert!(prompt.contains("Final Answer: [your complete answer to the user's question]"));
        assert!(prompt.contains("you MUST immediately use it by emitting an Action and Action Input."));
        assert!(prompt.ends_with("Always think step by step and use tools when you need information."));
    }
}
