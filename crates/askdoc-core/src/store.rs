use crate::state::{ChatMessage, Conversation, SubmissionState};

/// Read-only view handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub transcript: Conversation,
    pub submission_state: SubmissionState,
}

/// Holds the session transcript and the busy flag.
///
/// Only `QuestionSubmissionController` changes the submission state; the
/// transcript is replaced wholesale on every append, never edited.
#[derive(Debug, Default)]
pub struct ConversationStore {
    transcript: Conversation,
    submission_state: SubmissionState,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entries: impl IntoIterator<Item = ChatMessage>) -> &Conversation {
        self.transcript = self.transcript.append(entries);
        &self.transcript
    }

    pub fn current_state(&self) -> StoreSnapshot {
        StoreSnapshot {
            transcript: self.transcript.clone(),
            submission_state: self.submission_state,
        }
    }

    pub fn transcript(&self) -> &Conversation {
        &self.transcript
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission_state
    }

    pub(crate) fn set_submission_state(&mut self, state: SubmissionState) {
        self.submission_state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty_and_idle() {
        let store = ConversationStore::new();
        let snapshot = store.current_state();
        assert!(snapshot.transcript.is_empty());
        assert_eq!(snapshot.submission_state, SubmissionState::Idle);
    }

    #[test]
    fn test_current_state_is_stable_between_appends() {
        let mut store = ConversationStore::new();
        store.append([ChatMessage::user("q"), ChatMessage::assistant("a")]);

        let first = store.current_state();
        let second = store.current_state();
        assert_eq!(first, second);
    }

    #[test]
    fn test_append_keeps_earlier_snapshots_intact() {
        let mut store = ConversationStore::new();
        store.append([ChatMessage::user("one"), ChatMessage::assistant("1")]);
        let before = store.current_state();

        store.append([ChatMessage::user("two"), ChatMessage::assistant("2")]);

        assert_eq!(before.transcript.len(), 2);
        assert_eq!(store.transcript().len(), 4);
        assert_eq!(&store.transcript().messages()[..2], before.transcript.messages());
    }
}
