//! The remote question-answering service seam
//!
//! `AskService` is what the controller talks to. `AskClient` is the real
//! HTTP implementation; tests swap in an in-memory one.

pub mod client;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::AskError;
use crate::state::Conversation;

pub use client::AskClient;

/// Body of `POST /ask`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    pub text: String,
    pub conversation_history: Conversation,
}

#[async_trait]
pub trait AskService: Send + Sync {
    /// Sends one question and returns the parsed JSON body of a 2xx reply.
    ///
    /// The shape of the value is not checked here; classification belongs to
    /// the controller.
    async fn ask(&self, request: &AskRequest) -> Result<Value, AskError>;
}
