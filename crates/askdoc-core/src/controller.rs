//! Submission control for the Q&A conversation
//!
//! At most one question is in flight. `submit` starts it on a spawned task and
//! flips the store to `Pending`; `poll` or `settle` collects the reply,
//! classifies it, appends the user message plus one assistant message, and
//! always returns the store to `Idle`.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::error::AskError;
use crate::input::InputBuffer;
use crate::service::{AskRequest, AskService};
use crate::state::{ChatMessage, Conversation, PendingQuestion, SubmissionState};
use crate::store::{ConversationStore, StoreSnapshot};

pub const MALFORMED_NOTICE: &str = "Received an unexpected response format from the server.";
pub const FAILURE_NOTICE: &str =
    "Sorry, there was an error processing your question. Please try again.";

/// A request to send `text` as the next question, with the history it was
/// asked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitIntent {
    pub text: String,
    pub history: Conversation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    Accepted,
    /// A question was already in flight; nothing changed.
    Rejected,
}

/// How a finished request was classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answered(String),
    /// The service replied but without a usable `answer`.
    Malformed,
    /// Transport error, non-2xx status, unparseable body, or aborted task.
    Failed,
}

impl Outcome {
    /// Text of the assistant message appended for this outcome
    pub fn reply_text(&self) -> &str {
        match self {
            Outcome::Answered(answer) => answer.as_str(),
            Outcome::Malformed => MALFORMED_NOTICE,
            Outcome::Failed => FAILURE_NOTICE,
        }
    }
}

/// Three-way classification of a finished `/ask` call.
pub fn classify(result: &Result<Value, AskError>) -> Outcome {
    match result {
        Ok(value) => match value.get("answer").and_then(Value::as_str) {
            Some(answer) if !answer.is_empty() => Outcome::Answered(answer.to_string()),
            _ => Outcome::Malformed,
        },
        Err(_) => Outcome::Failed,
    }
}

struct InFlight {
    question: PendingQuestion,
    task: JoinHandle<Result<Value, AskError>>,
}

pub struct QuestionSubmissionController {
    service: Arc<dyn AskService>,
    store: ConversationStore,
    input: InputBuffer,
    in_flight: Option<InFlight>,
}

impl QuestionSubmissionController {
    pub fn new(service: Arc<dyn AskService>) -> Self {
        Self {
            service,
            store: ConversationStore::new(),
            input: InputBuffer::new(),
            in_flight: None,
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn current_state(&self) -> StoreSnapshot {
        self.store.current_state()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.store.submission_state()
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputBuffer {
        &mut self.input
    }

    /// The question currently waiting on the service, if any
    pub fn pending_question(&self) -> Option<&PendingQuestion> {
        self.in_flight.as_ref().map(|f| &f.question)
    }

    /// Intent for the current input buffer against the current transcript
    pub fn submit_intent(&self) -> SubmitIntent {
        SubmitIntent {
            text: self.input.text().to_string(),
            history: self.store.transcript().clone(),
        }
    }

    pub fn submit_input(&mut self) -> SubmitDecision {
        let intent = self.submit_intent();
        self.submit(intent)
    }

    /// Start a request for `intent`, unless one is already outstanding.
    pub fn submit(&mut self, intent: SubmitIntent) -> SubmitDecision {
        if self.in_flight.is_some() {
            tracing::warn!("question submitted while another is pending; ignoring");
            return SubmitDecision::Rejected;
        }

        tracing::info!(
            question_len = intent.text.len(),
            history_len = intent.history.len(),
            "question submitted"
        );

        self.store.set_submission_state(SubmissionState::Pending);

        let request = AskRequest {
            text: intent.text.clone(),
            conversation_history: intent.history,
        };
        let service = Arc::clone(&self.service);
        let task = tokio::spawn(async move { service.ask(&request).await });

        self.in_flight = Some(InFlight {
            question: PendingQuestion::new(intent.text),
            task,
        });

        SubmitDecision::Accepted
    }

    /// Collect the outstanding request if it has already finished.
    pub async fn poll(&mut self) -> Option<Outcome> {
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|flight| flight.task.is_finished());
        if !finished {
            return None;
        }
        self.settle().await
    }

    /// Wait for the outstanding request and apply its outcome.
    ///
    /// Returns `None` when nothing was in flight. Dropping this future early
    /// leaves the request in flight, so a later call picks it back up.
    pub async fn settle(&mut self) -> Option<Outcome> {
        let flight = self.in_flight.as_mut()?;
        let joined = (&mut flight.task).await;
        let flight = self.in_flight.take()?;

        let result = joined.unwrap_or_else(|e| Err(AskError::Aborted(e.to_string())));
        let outcome = classify(&result);

        match (&outcome, &result) {
            (Outcome::Answered(_), _) => tracing::info!("answer received"),
            (Outcome::Malformed, Ok(body)) => {
                tracing::warn!(%body, "unexpected response format from Q&A service")
            }
            (_, Err(e)) => tracing::error!(error = %e, timeout = e.is_timeout(), "error asking question"),
            _ => {}
        }

        self.finish(flight.question, &outcome);
        Some(outcome)
    }

    fn finish(&mut self, question: PendingQuestion, outcome: &Outcome) {
        self.store.append([
            ChatMessage::user(question.into_inner()),
            ChatMessage::assistant(outcome.reply_text()),
        ]);
        if matches!(outcome, Outcome::Answered(_)) {
            self.input.clear();
        }
        self.store.set_submission_state(SubmissionState::Idle);
    }
}
