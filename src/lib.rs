//! pdfchat: ask questions about a PDF from the terminal.
//!
//! The crate is a thin pipeline: a PDF goes in through the engine seam
//! ([`pdf`]), its text lives in a [`session::DocumentSession`], questions
//! are fitted into a character budget by [`prompt::PromptBuilder`], sent
//! to the completion API by [`llm::OpenAiClient`], and everything said
//! lands in a [`transcript::Transcript`]. [`controller::ChatController`]
//! ties those together behind explicit command handlers.

pub mod config;
pub mod controller;
pub mod credential;
pub mod llm;
pub mod pdf;
pub mod prompt;
pub mod repl;
pub mod session;
pub mod transcript;

// Re-export key types
pub use config::{ChatModel, Config};
pub use controller::{AskError, ChatController, NavError};
pub use credential::{Credential, CredentialError, CredentialStore};
pub use llm::{Answer, AnswerProvider, OpenAiClient, QueryError};
pub use pdf::{LoadError, LopdfEngine, PageRaster, PdfDocument, PdfEngine};
pub use prompt::{PromptBuilder, PromptContext, PromptError, MAX_CONTEXT_CHARS, SUMMARY_QUESTION};
pub use repl::Repl;
pub use session::{DocumentSession, OutOfRange};
pub use transcript::{EntryId, Exchange, Speaker, Transcript};
