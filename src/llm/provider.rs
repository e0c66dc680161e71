//! The provider abstraction.
//!
//! This trait defines the standard interface for the remote answer
//! service, so the controller and the tests never depend on a concrete
//! HTTP backend.

use super::types::{Answer, QueryError};
use crate::prompt::PromptContext;
use async_trait::async_trait;

/// The core trait for answer-producing backends.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Identifier of the model answering the questions.
    fn model_id(&self) -> &str;

    /// Send one prompt and await the full answer.
    ///
    /// Exactly one request per call: no retry, no streaming, no timeout
    /// beyond the transport default. Mutates nothing on failure.
    async fn ask(&self, prompt: &PromptContext) -> Result<Answer, QueryError>;
}
