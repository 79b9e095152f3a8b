//! Document ingestion: page extraction, filtering, chunking and
//! relevance-ranked retrieval over the resulting index.

pub mod chunker;
pub mod document;
pub mod filter;
pub mod pipeline;
pub mod search;

pub use chunker::Chunker;
pub use document::{DecodeError, ExtractionError, PageSource, PdfRenderer, Renderer};
pub use filter::{classify_page, RejectReason};
pub use pipeline::{IngestError, IngestObserver, IngestionPipeline, TracingObserver};
pub use search::RelevanceRanker;
