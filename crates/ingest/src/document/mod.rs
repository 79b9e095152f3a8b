mod pdf;

pub use pdf::PdfRenderer;

use thiserror::Error;

/// The whole document is unreadable — fatal for ingestion.
#[derive(Debug, Error)]
#[error("cannot decode document: {0}")]
pub struct DecodeError(pub String);

/// A single page could not be extracted. The pipeline recovers from
/// this by treating the page as skipped.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("page {page} out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },
    #[error("page {page} could not be decoded: {reason}")]
    PageUnreadable { page: usize, reason: String },
}

/// An opened document yielding visible text page by page.
///
/// Page text is the whitespace-joined text fragments in the order the
/// underlying renderer reports them.
pub trait PageSource: Send + Sync {
    fn page_count(&self) -> usize;

    /// Text of the given 1-based page.
    fn page_text(&self, page: usize) -> Result<String, ExtractionError>;
}

/// Opens a document supplied as a byte buffer.
pub trait Renderer: Send + Sync {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PageSource>, DecodeError>;
}
