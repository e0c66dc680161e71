//! Document session: one loaded PDF and a page pointer.
//!
//! Owns the extracted text of every page and the current-page position.
//! Text is extracted eagerly for the whole document at load time; the
//! documents this tool targets are small enough for interactive use.

use crate::pdf::{looks_like_pdf, LoadError, PageRaster, PdfDocument, PdfEngine};
use thiserror::Error;

/// Break inserted after each page's text when assembling the full text.
const PAGE_BREAK: &str = "\n\n";

/// A page request outside `[1, page_count]`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("page {requested} is out of range (1-{page_count})")]
pub struct OutOfRange {
    pub requested: usize,
    pub page_count: usize,
}

/// The in-memory state of one loaded document.
pub struct DocumentSession {
    name: String,
    doc: Box<dyn PdfDocument>,
    pages: Vec<String>,
    full_text: String,
    current_page: usize,
}

impl std::fmt::Debug for DocumentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSession")
            .field("name", &self.name)
            .field("pages", &self.pages.len())
            .field("full_text_len", &self.full_text.len())
            .field("current_page", &self.current_page)
            .finish()
    }
}

impl DocumentSession {
    /// Load a document and extract text from every page.
    pub fn load(
        engine: &dyn PdfEngine,
        bytes: &[u8],
        name: impl Into<String>,
    ) -> Result<Self, LoadError> {
        Self::load_with_progress(engine, bytes, name, |_, _| {})
    }

    /// Like [`load`](Self::load), reporting `(page, page_count)` after each
    /// extracted page so callers can drive a progress bar.
    pub fn load_with_progress(
        engine: &dyn PdfEngine,
        bytes: &[u8],
        name: impl Into<String>,
        mut on_page: impl FnMut(usize, usize),
    ) -> Result<Self, LoadError> {
        if !looks_like_pdf(bytes) {
            return Err(LoadError::NotAPdf);
        }

        let doc = engine.open(bytes)?;
        let page_count = doc.page_count();
        if page_count == 0 {
            return Err(LoadError::EmptyDocument);
        }

        let mut pages = Vec::with_capacity(page_count);
        for page in 1..=page_count {
            // A page that fails extraction contributes empty text; the
            // rest of the document still loads.
            let text = doc.page_text(page).unwrap_or_default();
            pages.push(text);
            on_page(page, page_count);
        }

        let mut full_text = String::new();
        for text in &pages {
            full_text.push_str(text);
            full_text.push_str(PAGE_BREAK);
        }

        Ok(Self {
            name: name.into(),
            doc,
            pages,
            full_text,
            current_page: 1,
        })
    }

    /// Display name of the loaded file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concatenated text of all pages, in page order.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Current page (1-indexed).
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn current_page_text(&self) -> &str {
        &self.pages[self.current_page - 1]
    }

    /// Extracted text of one page (1-indexed).
    pub fn page_text(&self, page: usize) -> Result<&str, OutOfRange> {
        self.check_bounds(page)?;
        Ok(&self.pages[page - 1])
    }

    /// Jump to an absolute page. Out-of-range requests are rejected and
    /// leave the current page unchanged.
    pub fn go_to(&mut self, page: usize) -> Result<usize, OutOfRange> {
        self.check_bounds(page)?;
        self.current_page = page;
        Ok(page)
    }

    /// Move by `delta` pages, clamping at the first and last page.
    /// Returns the page landed on.
    pub fn navigate(&mut self, delta: isize) -> usize {
        let target = self.current_page as isize + delta;
        self.current_page = target.clamp(1, self.pages.len() as isize) as usize;
        self.current_page
    }

    /// Render geometry for the current page. Pass-through to the engine,
    /// never cached.
    pub fn render(&self, scale: f32) -> PageRaster {
        self.doc.render_page(self.current_page, scale)
    }

    /// Render geometry for an arbitrary page (1-indexed).
    pub fn render_page(&self, page: usize, scale: f32) -> Result<PageRaster, OutOfRange> {
        self.check_bounds(page)?;
        Ok(self.doc.render_page(page, scale))
    }

    fn check_bounds(&self, page: usize) -> Result<(), OutOfRange> {
        if page < 1 || page > self.pages.len() {
            return Err(OutOfRange {
                requested: page,
                page_count: self.pages.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testutil::{StubEngine, FAKE_PDF};

    fn load_abc() -> DocumentSession {
        let engine = StubEngine::with_pages(&["A", "B", "C"]);
        DocumentSession::load(&engine, FAKE_PDF, "abc.pdf").unwrap()
    }

    #[test]
    fn test_load_starts_on_page_one() {
        let session = load_abc();
        assert_eq!(session.page_count(), 3);
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.name(), "abc.pdf");
    }

    #[test]
    fn test_full_text_join_rule() {
        let session = load_abc();
        assert_eq!(session.full_text(), "A\n\nB\n\nC\n\n");
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let engine = StubEngine::with_pages(&["A"]);
        let err = DocumentSession::load(&engine, b"hello", "x.pdf").unwrap_err();
        assert_eq!(err, LoadError::NotAPdf);
    }

    #[test]
    fn test_rejects_zero_pages() {
        let engine = StubEngine::empty();
        let err = DocumentSession::load(&engine, FAKE_PDF, "empty.pdf").unwrap_err();
        assert_eq!(err, LoadError::EmptyDocument);
    }

    #[test]
    fn test_failed_page_degrades_to_empty_text() {
        let engine = StubEngine::with_scripted(vec![Some("A"), None, Some("C")]);
        let session = DocumentSession::load(&engine, FAKE_PDF, "partial.pdf").unwrap();
        assert_eq!(session.page_count(), 3);
        assert_eq!(session.page_text(2).unwrap(), "");
        assert_eq!(session.full_text(), "A\n\n\n\nC\n\n");
    }

    #[test]
    fn test_go_to_valid_page() {
        let mut session = load_abc();
        assert_eq!(session.go_to(3).unwrap(), 3);
        assert_eq!(session.current_page(), 3);
        assert_eq!(session.current_page_text(), "C");
    }

    #[test]
    fn test_go_to_out_of_range_leaves_pointer_unchanged() {
        let mut session = load_abc();
        session.go_to(2).unwrap();

        for bad in [0, 4, 99] {
            let err = session.go_to(bad).unwrap_err();
            assert_eq!(err.requested, bad);
            assert_eq!(err.page_count, 3);
            assert_eq!(session.current_page(), 2);
        }
    }

    #[test]
    fn test_navigate_round_trip() {
        let mut session = load_abc();
        session.navigate(2);
        session.navigate(-2);
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_navigate_clamps_at_boundaries() {
        let mut session = load_abc();
        assert_eq!(session.navigate(-1), 1);
        assert_eq!(session.navigate(10), 3);
        assert_eq!(session.navigate(1), 3);
    }

    #[test]
    fn test_render_reports_current_page_geometry() {
        let mut session = load_abc();
        session.go_to(2).unwrap();
        let raster = session.render(1.5);
        assert_eq!(raster.page_number, 2);
        assert!((raster.width - 918.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_render_page_out_of_range() {
        let session = load_abc();
        assert!(session.render_page(4, 1.0).is_err());
    }
}
