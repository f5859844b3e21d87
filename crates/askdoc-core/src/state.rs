//! UI-agnostic conversation state types
//!
//! These are shared by every front end and never depend on a UI framework.
//! A `Conversation` only ever grows: each submission outcome produces a new
//! value with two more entries, and nothing already appended is edited.

use serde::{Deserialize, Serialize};

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// Ordered, append-only transcript. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation(Vec<ChatMessage>);

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new conversation with `entries` after the existing messages.
    pub fn append(&self, entries: impl IntoIterator<Item = ChatMessage>) -> Conversation {
        let mut messages = self.0.clone();
        messages.extend(entries);
        Conversation(messages)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Whether a question is currently outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
}

impl SubmissionState {
    pub fn is_pending(self) -> bool {
        self == SubmissionState::Pending
    }
}

/// The input text captured when a question was submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion(String);

impl PendingQuestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order_and_original() {
        let first = Conversation::new().append([ChatMessage::user("a"), ChatMessage::assistant("b")]);
        let second = first.append([ChatMessage::user("c"), ChatMessage::assistant("d")]);

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 4);
        let texts: Vec<&str> = second.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
        assert_eq!(&second.messages()[..2], first.messages());
    }

    #[test]
    fn test_append_nothing_is_equal() {
        let conv = Conversation::new().append([ChatMessage::user("only")]);
        assert_eq!(conv.append([]), conv);
    }

    #[test]
    fn test_message_wire_format() {
        let conv = Conversation::new().append([
            ChatMessage::user("What is the capital of France?"),
            ChatMessage::assistant("Paris"),
        ]);
        let json = serde_json::to_value(&conv).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"role": "user", "text": "What is the capital of France?"},
                {"role": "assistant", "text": "Paris"}
            ])
        );
    }

    #[test]
    fn test_submission_state_defaults_idle() {
        assert_eq!(SubmissionState::default(), SubmissionState::Idle);
        assert!(!SubmissionState::Idle.is_pending());
        assert!(SubmissionState::Pending.is_pending());
    }
}
