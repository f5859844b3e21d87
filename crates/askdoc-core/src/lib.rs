pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod service;
pub mod state;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use controller::{
    classify, Outcome, QuestionSubmissionController, SubmitDecision, SubmitIntent, FAILURE_NOTICE,
    MALFORMED_NOTICE,
};
pub use error::AskError;
pub use input::InputBuffer;
pub use service::{AskClient, AskRequest, AskService};
pub use state::{ChatMessage, ChatRole, Conversation, PendingQuestion, SubmissionState};
pub use store::{ConversationStore, StoreSnapshot};
