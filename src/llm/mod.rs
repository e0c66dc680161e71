//! LLM layer: the remote answer service.
//!
//! This module handles all interaction with the chat completion API:
//! - Provider abstraction (so tests can stub the backend)
//! - The OpenAI HTTP client
//! - Wire-neutral message and error types

pub mod openai;
pub mod provider;
pub mod types;

// Re-export key types
pub use openai::OpenAiClient;
pub use provider::AnswerProvider;
pub use types::{Answer, Message, QueryError, Role};
