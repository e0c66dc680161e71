//! The engine abstraction.
//!
//! This trait defines the seam between the session layer and whatever
//! library actually parses PDFs. The session only needs three things from
//! a parsed document: how many pages it has, the text of one page, and the
//! geometry of one page for rendering.

use thiserror::Error;

/// Leading bytes every PDF starts with.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Cheap signature check, applied before any bytes reach an engine.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Errors raised while opening a document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The bytes do not carry a PDF signature.
    #[error("not a PDF file")]
    NotAPdf,
    /// The engine rejected the document as malformed.
    #[error("failed to parse PDF: {0}")]
    ParseFailure(String),
    /// The document parsed but contains no pages.
    #[error("document has no pages")]
    EmptyDocument,
}

/// Geometry handle for one page at a given scale, in points.
///
/// This is what a presentation layer rasterizes from; nothing here is
/// cached by the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRaster {
    /// Page number (1-indexed).
    pub page_number: usize,
    pub width: f32,
    pub height: f32,
}

/// A parsed document exposed by an engine.
pub trait PdfDocument: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Extract the text of one page (1-indexed).
    ///
    /// Callers decide what an extraction failure means; the session
    /// degrades the failing page to empty text.
    fn page_text(&self, page: usize) -> Result<String, LoadError>;

    /// Page geometry at the given scale (1-indexed, must be in bounds).
    ///
    /// Implementations fall back to a default page size when the document
    /// does not declare one, so this never fails for an in-bounds page.
    fn render_page(&self, page: usize, scale: f32) -> PageRaster;
}

/// The engine seam: anything that can open PDF bytes.
pub trait PdfEngine: Send + Sync {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>, LoadError>;
}
