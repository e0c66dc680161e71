//! Command handlers over one chat session.
//!
//! `ChatController` owns everything a session touches - the engine, the
//! answer provider, the loaded document, the transcript - so there is no
//! ambient state. Each externally-triggered operation is one handler;
//! handlers take `&mut self` and run to completion, so two
//! answer-producing requests can never interleave their effects on the
//! transcript.

use crate::llm::{AnswerProvider, QueryError};
use crate::pdf::{LoadError, PdfEngine};
use crate::prompt::{PromptBuilder, PromptError, SUMMARY_QUESTION};
use crate::session::{DocumentSession, OutOfRange};
use crate::transcript::{EntryId, Speaker, Transcript};
use thiserror::Error;

/// Failures of the ask path, unified for callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AskError {
    /// No API key has been configured yet.
    #[error("no API key configured")]
    MissingCredential,
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Failures of the navigation handlers.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("no document loaded")]
    NoDocumentLoaded,
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

/// One chat session: document, provider, transcript.
pub struct ChatController {
    engine: Box<dyn PdfEngine>,
    provider: Option<Box<dyn AnswerProvider>>,
    session: Option<DocumentSession>,
    transcript: Transcript,
    prompts: PromptBuilder,
}

impl ChatController {
    pub fn new(engine: Box<dyn PdfEngine>) -> Self {
        Self {
            engine,
            provider: None,
            session: None,
            transcript: Transcript::new(),
            prompts: PromptBuilder::new(),
        }
    }

    pub fn with_prompt_builder(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Install the answer provider. Called once a credential exists, and
    /// again whenever the key changes.
    pub fn set_provider(&mut self, provider: Box<dyn AnswerProvider>) {
        self.provider = Some(provider);
    }

    pub fn clear_provider(&mut self) {
        self.provider = None;
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn session(&self) -> Option<&DocumentSession> {
        self.session.as_ref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Load a document, replacing any current session wholesale.
    ///
    /// On failure the prior session (if any) stays active, and the
    /// failure is recorded as a notice.
    pub fn on_load_document(&mut self, bytes: &[u8], name: &str) -> Result<(), LoadError> {
        self.on_load_document_with_progress(bytes, name, |_, _| {})
    }

    /// Like [`on_load_document`](Self::on_load_document), reporting
    /// per-page extraction progress.
    pub fn on_load_document_with_progress(
        &mut self,
        bytes: &[u8],
        name: &str,
        on_page: impl FnMut(usize, usize),
    ) -> Result<(), LoadError> {
        match DocumentSession::load_with_progress(self.engine.as_ref(), bytes, name, on_page) {
            Ok(session) => {
                let pages = session.page_count();
                self.session = Some(session);
                self.transcript.append(
                    Speaker::Notice,
                    format!("Loaded {name} ({pages} pages). Ask me anything about it."),
                );
                Ok(())
            }
            Err(err) => {
                self.transcript
                    .append(Speaker::Notice, format!("Could not load {name}: {err}"));
                Err(err)
            }
        }
    }

    /// Ask one question about the loaded document.
    ///
    /// The question is validated before anything is appended or sent; a
    /// rejected question leaves both the transcript and the wire
    /// untouched. On success the returned id points at the assistant's
    /// answer.
    pub async fn on_ask(&mut self, question: &str) -> Result<EntryId, AskError> {
        let provider = self.provider.as_deref().ok_or(AskError::MissingCredential)?;
        let full_text = self.session.as_ref().map_or("", |s| s.full_text());
        let prompt = self.prompts.build(question, full_text)?;

        self.transcript.append(Speaker::User, question.trim());

        match provider.ask(&prompt).await {
            Ok(answer) => Ok(self.transcript.append(Speaker::Assistant, answer.text)),
            Err(err) => {
                self.transcript
                    .append(Speaker::Notice, ask_failure_notice(&err));
                Err(err.into())
            }
        }
    }

    /// Summarize the loaded document with the canned summary question.
    ///
    /// No user entry is appended; the answer arrives as one assistant
    /// entry prefixed with "Summary:".
    pub async fn on_summarize(&mut self) -> Result<EntryId, AskError> {
        let provider = self.provider.as_deref().ok_or(AskError::MissingCredential)?;
        let full_text = self.session.as_ref().map_or("", |s| s.full_text());
        let prompt = self.prompts.build(SUMMARY_QUESTION, full_text)?;

        match provider.ask(&prompt).await {
            Ok(answer) => Ok(self
                .transcript
                .append(Speaker::Assistant, format!("Summary:\n{}", answer.text))),
            Err(err) => {
                self.transcript
                    .append(Speaker::Notice, ask_failure_notice(&err));
                Err(err.into())
            }
        }
    }

    /// Move by `delta` pages, clamping at the document's edges.
    pub fn on_navigate(&mut self, delta: isize) -> Result<usize, NavError> {
        let session = self.session.as_mut().ok_or(NavError::NoDocumentLoaded)?;
        Ok(session.navigate(delta))
    }

    /// Jump to an absolute page; out-of-range requests are rejected.
    pub fn on_go_to(&mut self, page: usize) -> Result<usize, NavError> {
        let session = self.session.as_mut().ok_or(NavError::NoDocumentLoaded)?;
        Ok(session.go_to(page)?)
    }
}

/// One user-readable line per failure class. The taxonomy stays in the
/// error; this is only phrasing.
fn ask_failure_notice(err: &QueryError) -> String {
    match err {
        QueryError::Unauthorized => {
            "The API rejected your key. Enter a new one with /key.".to_string()
        }
        QueryError::RateLimited => {
            "The API is rate limiting requests. Wait a moment and try again.".to_string()
        }
        QueryError::ServiceError(code) => {
            format!("The API returned an error (status {code}). Please try again.")
        }
        QueryError::MalformedResponse => {
            "The API response was missing an answer. Please try again.".to_string()
        }
        QueryError::NetworkFailure(_) => {
            "Could not reach the API. Check your connection and try again.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Answer;
    use crate::pdf::testutil::{StubEngine, FAKE_PDF};
    use crate::prompt::PromptContext;
    use async_trait::async_trait;

    /// Provider returning a scripted reply, recording nothing.
    struct CannedProvider {
        reply: Result<&'static str, QueryError>,
    }

    #[async_trait]
    impl AnswerProvider for CannedProvider {
        fn model_id(&self) -> &str {
            "canned"
        }

        async fn ask(&self, _prompt: &PromptContext) -> Result<Answer, QueryError> {
            self.reply.clone().map(|text| Answer {
                text: text.to_string(),
            })
        }
    }

    fn make_controller(pages: &[&'static str]) -> ChatController {
        ChatController::new(Box::new(StubEngine::with_pages(pages)))
    }

    fn with_provider(
        mut controller: ChatController,
        reply: Result<&'static str, QueryError>,
    ) -> ChatController {
        controller.set_provider(Box::new(CannedProvider { reply }));
        controller
    }

    #[test]
    fn test_load_appends_notice_and_replaces_session() {
        let mut controller = make_controller(&["A", "B", "C"]);
        controller.on_load_document(FAKE_PDF, "a.pdf").unwrap();

        assert_eq!(controller.session().unwrap().page_count(), 3);
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(
            controller.transcript().last().unwrap().speaker,
            Speaker::Notice
        );
    }

    #[test]
    fn test_failed_load_keeps_prior_session() {
        let mut controller = make_controller(&["A", "B", "C"]);
        controller.on_load_document(FAKE_PDF, "a.pdf").unwrap();
        controller.on_go_to(2).unwrap();

        let err = controller.on_load_document(b"not a pdf", "b.txt").unwrap_err();
        assert_eq!(err, LoadError::NotAPdf);

        let session = controller.session().unwrap();
        assert_eq!(session.name(), "a.pdf");
        assert_eq!(session.current_page(), 2);
    }

    #[test]
    fn test_reload_resets_to_page_one() {
        let mut controller = make_controller(&["A", "B", "C"]);
        controller.on_load_document(FAKE_PDF, "a.pdf").unwrap();
        controller.on_go_to(3).unwrap();

        controller.on_load_document(FAKE_PDF, "again.pdf").unwrap();
        assert_eq!(controller.session().unwrap().current_page(), 1);
    }

    #[test]
    fn test_navigation_without_document() {
        let mut controller = make_controller(&["A"]);
        assert_eq!(
            controller.on_navigate(1).unwrap_err(),
            NavError::NoDocumentLoaded
        );
        assert_eq!(
            controller.on_go_to(1).unwrap_err(),
            NavError::NoDocumentLoaded
        );
    }

    #[tokio::test]
    async fn test_ask_appends_user_then_assistant() {
        let mut controller = with_provider(make_controller(&["A"]), Ok("the answer"));
        controller.on_load_document(FAKE_PDF, "a.pdf").unwrap();

        let id = controller.on_ask("what is A?").await.unwrap();

        let entries: Vec<_> = controller.transcript().all().collect();
        assert_eq!(entries.len(), 3); // load notice, user, assistant
        assert_eq!(entries[1].speaker, Speaker::User);
        assert_eq!(entries[1].text, "what is A?");
        assert_eq!(entries[2].speaker, Speaker::Assistant);
        assert_eq!(entries[2].text, "the answer");
        assert_eq!(controller.transcript().get(id).unwrap().text, "the answer");
    }

    #[tokio::test]
    async fn test_empty_question_is_rejected_before_anything_happens() {
        let mut controller = with_provider(make_controller(&["A"]), Ok("unused"));
        controller.on_load_document(FAKE_PDF, "a.pdf").unwrap();
        let before = controller.transcript().len();

        let err = controller.on_ask("   ").await.unwrap_err();
        assert_eq!(err, AskError::Prompt(PromptError::EmptyQuestion));
        assert_eq!(controller.transcript().len(), before);
    }

    #[tokio::test]
    async fn test_ask_without_document() {
        let mut controller = with_provider(make_controller(&["A"]), Ok("unused"));

        let err = controller.on_ask("anything").await.unwrap_err();
        assert_eq!(err, AskError::Prompt(PromptError::NoDocumentLoaded));
    }

    #[tokio::test]
    async fn test_ask_without_credential() {
        let mut controller = make_controller(&["A"]);
        controller.on_load_document(FAKE_PDF, "a.pdf").unwrap();

        let err = controller.on_ask("anything").await.unwrap_err();
        assert_eq!(err, AskError::MissingCredential);
    }

    #[tokio::test]
    async fn test_failed_ask_appends_notice_not_answer() {
        let mut controller =
            with_provider(make_controller(&["A"]), Err(QueryError::Unauthorized));
        controller.on_load_document(FAKE_PDF, "a.pdf").unwrap();

        let err = controller.on_ask("what is A?").await.unwrap_err();
        assert_eq!(err, AskError::Query(QueryError::Unauthorized));

        let entries: Vec<_> = controller.transcript().all().collect();
        assert_eq!(entries[1].speaker, Speaker::User);
        assert_eq!(entries[2].speaker, Speaker::Notice);
        assert!(entries[2].text.contains("rejected your key"));
    }

    #[tokio::test]
    async fn test_summarize_appends_single_assistant_entry() {
        let mut controller = with_provider(make_controller(&["A"]), Ok("- point one"));
        controller.on_load_document(FAKE_PDF, "a.pdf").unwrap();
        let before = controller.transcript().len();

        controller.on_summarize().await.unwrap();

        let entries: Vec<_> = controller.transcript().all().collect();
        assert_eq!(entries.len(), before + 1);
        assert_eq!(entries.last().unwrap().speaker, Speaker::Assistant);
        assert_eq!(entries.last().unwrap().text, "Summary:\n- point one");
    }
}
