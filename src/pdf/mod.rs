//! PDF layer: the external document engine behind a trait.
//!
//! Everything the rest of the crate knows about PDFs goes through the
//! `PdfEngine`/`PdfDocument` traits; `lopdf` is an implementation detail
//! of one backend.

pub mod engine;
pub mod lopdf;

// Re-export key types
pub use self::engine::{looks_like_pdf, LoadError, PageRaster, PdfDocument, PdfEngine};
pub use self::lopdf::LopdfEngine;

#[cfg(test)]
pub(crate) mod testutil {
    //! Scripted engine for session and controller tests.

    use super::engine::{LoadError, PageRaster, PdfDocument, PdfEngine};

    /// Bytes that pass the signature check without being a real document.
    pub const FAKE_PDF: &[u8] = b"%PDF-1.4 stub";

    /// Engine that serves scripted per-page text. A `None` page simulates
    /// an extraction failure on that page.
    pub struct StubEngine {
        pages: Vec<Option<&'static str>>,
    }

    impl StubEngine {
        pub fn with_pages(pages: &[&'static str]) -> Self {
            Self {
                pages: pages.iter().map(|p| Some(*p)).collect(),
            }
        }

        pub fn with_scripted(pages: Vec<Option<&'static str>>) -> Self {
            Self { pages }
        }

        pub fn empty() -> Self {
            Self { pages: Vec::new() }
        }
    }

    impl PdfEngine for StubEngine {
        fn open(&self, _bytes: &[u8]) -> Result<Box<dyn PdfDocument>, LoadError> {
            Ok(Box::new(StubDocument {
                pages: self.pages.clone(),
            }))
        }
    }

    struct StubDocument {
        pages: Vec<Option<&'static str>>,
    }

    impl PdfDocument for StubDocument {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_text(&self, page: usize) -> Result<String, LoadError> {
            match self.pages.get(page - 1) {
                Some(Some(text)) => Ok((*text).to_string()),
                Some(None) => Err(LoadError::ParseFailure(
                    "scripted extraction failure".to_string(),
                )),
                None => Err(LoadError::ParseFailure(format!("no page {page}"))),
            }
        }

        fn render_page(&self, page: usize, scale: f32) -> PageRaster {
            PageRaster {
                page_number: page,
                width: 612.0 * scale,
                height: 792.0 * scale,
            }
        }
    }
}
