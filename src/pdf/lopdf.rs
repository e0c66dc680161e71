//! lopdf-backed engine.
//!
//! Implements the `PdfEngine` trait on top of the `lopdf` parser: page
//! count from the page tree, per-page text extraction, and page geometry
//! read from the MediaBox.

use super::engine::{LoadError, PageRaster, PdfDocument, PdfEngine};
use ::lopdf::{Document, Object};

/// US Letter in points, used when a page declares no MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Engine backed by the `lopdf` parser.
pub struct LopdfEngine;

impl LopdfEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LopdfEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfEngine for LopdfEngine {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>, LoadError> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| LoadError::ParseFailure(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(LoadError::ParseFailure("document is encrypted".to_string()));
        }

        let page_count = doc.get_pages().len();
        Ok(Box::new(LopdfDocument { doc, page_count }))
    }
}

/// One opened document. Page numbers are 1-indexed throughout, matching
/// lopdf's own page numbering.
struct LopdfDocument {
    doc: Document,
    page_count: usize,
}

impl LopdfDocument {
    /// MediaBox of a page in points, falling back to US Letter.
    ///
    /// The MediaBox may be inherited from a parent Pages node, which lopdf
    /// does not resolve for us; the fallback covers that case too.
    fn page_size(&self, page: u32) -> (f32, f32) {
        let Some(&page_id) = self.doc.get_pages().get(&page) else {
            return DEFAULT_PAGE_SIZE;
        };
        let Ok(dict) = self.doc.get_dictionary(page_id) else {
            return DEFAULT_PAGE_SIZE;
        };
        let Ok(media_box) = dict.get(b"MediaBox").and_then(Object::as_array) else {
            return DEFAULT_PAGE_SIZE;
        };

        let nums: Vec<f32> = media_box.iter().filter_map(as_number).collect();
        if nums.len() != 4 {
            return DEFAULT_PAGE_SIZE;
        }
        ((nums[2] - nums[0]).abs(), (nums[3] - nums[1]).abs())
    }
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, page: usize) -> Result<String, LoadError> {
        self.doc
            .extract_text(&[page as u32])
            .map_err(|e| LoadError::ParseFailure(e.to_string()))
    }

    fn render_page(&self, page: usize, scale: f32) -> PageRaster {
        let (width, height) = self.page_size(page as u32);
        PageRaster {
            page_number: page,
            width: width * scale,
            height: height * scale,
        }
    }
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
