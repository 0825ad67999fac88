//! Action protocol parser.
//!
//! The model speaks a line-oriented text protocol:
//!
//! ```text
//! Thought: I need to compute this
//! Action: calculator
//! Action Input: {"expression": "2 + 2"}
//! ```
//!
//! or, when done:
//!
//! ```text
//! Thought: I know the answer
//! Final Answer: 4
//! ```
//!
//! Parsing never fails. Anything that does not fit the protocol degrades
//! to "no action" (the text is the answer) or to a `{"input": raw}` mapping.

use rustedreact_core::tool::ToolParams;

const FINAL_ANSWER_MARKER: &str = "Final Answer:";
const ACTION_MARKER: &str = "Action:";
const ACTION_INPUT_MARKER: &str = "Action Input:";

/// The structured action recovered from one assistant message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedAction {
    /// Tool to call; `None` means the model answered directly.
    pub name: Option<String>,
    /// Named parameters; `None` means no `Action Input:` line was present.
    pub input: Option<ToolParams>,
}

/// Return the text after the first `Final Answer:` marker, trimmed.
///
/// The marker is matched anywhere in the text, not only at a line start.
pub fn extract_final_answer(text: &str) -> Option<&str> {
    text.split_once(FINAL_ANSWER_MARKER)
        .map(|(_, answer)| answer.trim())
}

/// Scan every line for `Action:` and `Action Input:` markers.
///
/// Markers only count at the start of a (trimmed) line, and the last
/// occurrence of each wins.
pub fn parse_action(text: &str) -> ParsedAction {
    let mut parsed = ParsedAction::default();

    for line in text.lines() {
        let line = line.trim();
        if let Some(raw) = line.strip_prefix(ACTION_INPUT_MARKER) {
            parsed.input = Some(decode_input(raw.trim()));
        } else if let Some(name) = line.strip_prefix(ACTION_MARKER) {
            let name = name.trim();
            parsed.name = (!name.is_empty()).then(|| name.to_string());
        }
    }

    parsed
}

// A JSON object is used as-is; anything else is wrapped as {"input": raw}.
fn decode_input(raw: &str) -> ToolParams {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => {
            let mut wrapped = ToolParams::new();
            wrapped.insert("input".into(), serde_json::Value::String(raw.to_string()));
            wrapped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: serde_json::Value) -> ToolParams {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn action_with_json_input() {
        let parsed = parse_action("Action: foo\nAction Input: {\"x\": 1}");
        assert_eq!(parsed.name.as_deref(), Some("foo"));
        assert_eq!(parsed.input, Some(object(json!({"x": 1}))));
    }

    #[test]
    fn non_json_input_is_wrapped() {
        let parsed = parse_action("Action: foo\nAction Input: not-json");
        assert_eq!(parsed.name.as_deref(), Some("foo"));
        assert_eq!(parsed.input, Some(object(json!({"input": "not-json"}))));
    }

    #[test]
    fn non_object_json_is_wrapped() {
        let parsed = parse_action("Action: foo\nAction Input: [1, 2]");
        assert_eq!(parsed.input, Some(object(json!({"input": "[1, 2]"}))));

        let parsed = parse_action("Action: foo\nAction Input: \"2+2\"");
        assert_eq!(parsed.input, Some(object(json!({"input": "\"2+2\""}))));
    }

    #[test]
    fn no_markers_means_no_action() {
        let parsed = parse_action("The capital of France is Paris.");
        assert_eq!(parsed, ParsedAction::default());
    }

    #[test]
    fn missing_input_line() {
        let parsed = parse_action("Thought: check the time\nAction: get_current_time");
        assert_eq!(parsed.name.as_deref(), Some("get_current_time"));
        assert_eq!(parsed.input, None);
    }

    #[test]
    fn full_react_step() {
        let text = "Thought: I need to compute this\nAction: calculator\nAction Input: {\"expression\": \"2+2\"}";
        let parsed = parse_action(text);
        assert_eq!(parsed.name.as_deref(), Some("calculator"));
        assert_eq!(parsed.input, Some(object(json!({"expression": "2+2"}))));
    }

    #[test]
    fn last_marker_wins() {
        let text = "Action: first\nAction Input: {\"a\": 1}\nAction: second\nAction Input: {\"b\": 2}";
        let parsed = parse_action(text);
        assert_eq!(parsed.name.as_deref(), Some("second"));
        assert_eq!(parsed.input, Some(object(json!({"b": 2}))));
    }

    #[test]
    fn action_input_is_not_mistaken_for_action() {
        let parsed = parse_action("Action Input: {\"x\": 1}");
        assert_eq!(parsed.name, None);
        assert_eq!(parsed.input, Some(object(json!({"x": 1}))));
    }

    #[test]
    fn markers_only_match_at_line_start() {
        let parsed = parse_action("I could take an Action: calculator here, but I won't.");
        assert_eq!(parsed.name, None);
    }

    #[test]
    fn indented_and_crlf_lines_are_trimmed() {
        let parsed = parse_action("  Thought: x\r\n   Action:   calculator  \r\n\tAction Input: {\"expression\": \"1\"}\r\n");
        assert_eq!(parsed.name.as_deref(), Some("calculator"));
        assert_eq!(parsed.input, Some(object(json!({"expression": "1"}))));
    }

    #[test]
    fn empty_action_name_is_no_action() {
        let parsed = parse_action("Action:   \nAction Input: {}");
        assert_eq!(parsed.name, None);
        assert_eq!(parsed.input, Some(ToolParams::new()));
    }

    #[test]
    fn empty_input_is_wrapped_empty_string() {
        let parsed = parse_action("Action: foo\nAction Input:");
        assert_eq!(parsed.input, Some(object(json!({"input": ""}))));
    }

    #[test]
    fn final_answer_extracted_and_trimmed() {
        assert_eq!(extract_final_answer("Final Answer: 42"), Some("42"));
        assert_eq!(
            extract_final_answer("Thought: done\nFinal Answer:   Paris is the capital.  \n"),
            Some("Paris is the capital.")
        );
    }

    #[test]
    fn final_answer_splits_on_first_occurrence() {
        assert_eq!(
            extract_final_answer("Final Answer: see below. Final Answer: 2"),
            Some("see below. Final Answer: 2")
        );
    }

    #[test]
    fn final_answer_matches_mid_line() {
        assert_eq!(extract_final_answer("So the Final Answer: 7"), Some("7"));
    }

    #[test]
    fn no_final_answer() {
        assert_eq!(extract_final_answer("Action: calculator"), None);
        assert_eq!(extract_final_answer("final answer: lowercase"), None);
    }

    #[test]
    fn final_answer_alongside_action() {
        let text = "Action: calculator\nAction Input: {\"expression\": \"6*7\"}\nFinal Answer: 42";
        assert_eq!(extract_final_answer(text), Some("42"));
    }
}
