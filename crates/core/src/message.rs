//! Message and Transcript domain types.
//!
//! A run of the agent loop builds one [`Transcript`]: the system prompt,
//! the user's question, then alternating assistant turns and
//! `Observation:` messages until the loop terminates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message sender in a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (tool catalog, response format)
    System,
    /// The end user, and tool observations fed back to the model
    User,
    /// The language model
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// When the message was appended
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create an observation message carrying a tool result back to the model.
    pub fn observation(result: impl AsRef<str>) -> Self {
        Self::user(format!("Observation: {}", result.as_ref()))
    }
}

/// The ordered, append-only message sequence sent to the model.
///
/// Messages are never edited or removed once pushed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello, agent!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello, agent!");
    }

    #[test]
    fn observation_is_a_prefixed_user_message() {
        let msg = Message::observation("The result of 2+2 is 4");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Observation: The result of 2+2 is 4");
    }

    #[test]
    fn transcript_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::system("rules"));
        transcript.push(Message::user("question"));
        transcript.push(Message::assistant("answer"));

        let roles: Vec<Role> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(transcript.last().unwrap().content, "answer");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert!(json.contains("\"role\":\"assistant\""));
    }

    #[test]
    fn transcript_serializes_as_array() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("q"));
        let value = serde_json::to_value(&transcript).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["content"], "q");
    }
}
