use super::{DecodeError, ExtractionError, PageSource, Renderer};

/// PDF renderer backed by `pdf-extract`.
///
/// pdf-extract returns the whole document as one string with pages
/// separated by form feed characters (`\x0C`), so `open` materializes
/// the per-page text up front. A document with no form feeds is
/// treated as a single page.
#[derive(Debug, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for PdfRenderer {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PageSource>, DecodeError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| DecodeError(e.to_string()))?;

        let pages: Vec<String> = if text.contains('\x0C') {
            // Keep empty pages: the pipeline must visit every page so
            // its skip counters stay honest.
            text.split('\x0C').map(|p| p.trim().to_string()).collect()
        } else {
            vec![text.trim().to_string()]
        };

        tracing::debug!("opened PDF: {} pages", pages.len());
        Ok(Box::new(ExtractedPdf { pages }))
    }
}

struct ExtractedPdf {
    pages: Vec<String>,
}

impl PageSource for ExtractedPdf {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: usize) -> Result<String, ExtractionError> {
        self.pages
            .get(page.wrapping_sub(1))
            .cloned()
            .ok_or(ExtractionError::PageOutOfRange {
                page,
                total: self.pages.len(),
            })
    }
}
