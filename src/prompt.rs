//! Context-bounded prompt assembly.
//!
//! Fits the document text and the user's question into a fixed character
//! budget before anything goes over the wire. Truncation is a plain
//! prefix cut, not sentence-aware: the point is a deterministic bound on
//! request size, not a smart excerpt.

use thiserror::Error;

/// Default budget for the embedded document text, in characters.
pub const MAX_CONTEXT_CHARS: usize = 8_000;

/// Canned question used by the summarize command.
pub const SUMMARY_QUESTION: &str =
    "Provide a detailed summary with bullet points of the key points in this document.";

/// Rejections raised before a prompt is built.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("question is empty")]
    EmptyQuestion,
    #[error("no document loaded")]
    NoDocumentLoaded,
}

/// The finally-assembled text sent to the completion service.
///
/// Ephemeral: built per query, never stored.
#[derive(Debug, Clone)]
pub struct PromptContext {
    body: String,
    excerpt_chars: usize,
}

impl PromptContext {
    /// The full prompt body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Characters of document text embedded in the prompt.
    pub fn excerpt_chars(&self) -> usize {
        self.excerpt_chars
    }
}

/// Builds prompts under a character budget.
pub struct PromptBuilder {
    max_chars: usize,
}

impl PromptBuilder {
    /// Builder with the default budget.
    pub fn new() -> Self {
        Self {
            max_chars: MAX_CONTEXT_CHARS,
        }
    }

    /// Builder with a custom budget.
    pub fn with_max_chars(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Compose a prompt from a question and the document's full text.
    ///
    /// Rejects blank questions and empty documents before any remote call
    /// can happen. The document portion is cut to the first `max_chars`
    /// characters; the question is embedded verbatim (trimmed).
    pub fn build(&self, question: &str, full_text: &str) -> Result<PromptContext, PromptError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PromptError::EmptyQuestion);
        }
        if full_text.is_empty() {
            return Err(PromptError::NoDocumentLoaded);
        }

        // Counted in characters, not bytes, so a cut never lands inside a
        // UTF-8 sequence.
        let excerpt: String = full_text.chars().take(self.max_chars).collect();
        let excerpt_chars = excerpt.chars().count();
        let body = format!("Document:\n{excerpt}\n\nQuestion: {question}\n\nAnswer:");

        Ok(PromptContext {
            body,
            excerpt_chars,
        })
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_shape() {
        let builder = PromptBuilder::new();
        let prompt = builder.build("What is it?", "Some text").unwrap();
        assert_eq!(
            prompt.body(),
            "Document:\nSome text\n\nQuestion: What is it?\n\nAnswer:"
        );
    }

    #[test]
    fn test_question_is_trimmed() {
        let builder = PromptBuilder::new();
        let prompt = builder.build("  why?  ", "text").unwrap();
        assert!(prompt.body().contains("Question: why?\n"));
    }

    #[test]
    fn test_rejects_empty_question() {
        let builder = PromptBuilder::new();
        assert_eq!(
            builder.build("", "text").unwrap_err(),
            PromptError::EmptyQuestion
        );
        assert_eq!(
            builder.build("   ", "text").unwrap_err(),
            PromptError::EmptyQuestion
        );
    }

    #[test]
    fn test_rejects_missing_document() {
        let builder = PromptBuilder::new();
        assert_eq!(
            builder.build("why?", "").unwrap_err(),
            PromptError::NoDocumentLoaded
        );
    }

    #[test]
    fn test_truncation_boundaries() {
        let builder = PromptBuilder::with_max_chars(10);

        for (len, expected) in [(9, 9), (10, 10), (11, 10)] {
            let text = "x".repeat(len);
            let prompt = builder.build("q", &text).unwrap();
            assert_eq!(prompt.excerpt_chars(), expected, "input length {len}");
            assert!(prompt.excerpt_chars() <= builder.max_chars());
        }
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        // Each 'é' is two bytes; a byte-based cut at 4 would split one.
        let builder = PromptBuilder::with_max_chars(3);
        let prompt = builder.build("q", "ééééé").unwrap();
        assert_eq!(prompt.excerpt_chars(), 3);
        assert!(prompt.body().contains("ééé\n"));
    }

    #[test]
    fn test_long_document_is_cut_to_budget() {
        let builder = PromptBuilder::new();
        let text = "a".repeat(MAX_CONTEXT_CHARS * 3);
        let prompt = builder.build("q", &text).unwrap();
        assert_eq!(prompt.excerpt_chars(), MAX_CONTEXT_CHARS);
    }
}
