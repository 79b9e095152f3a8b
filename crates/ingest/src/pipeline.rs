//! Ingestion pipeline orchestration.
//!
//! Coordinates the end-to-end workflow: visit pages in ascending
//! order, extract text, classify each page, chunk accepted pages, and
//! assemble the final `DocumentIndex`. Per-page extraction failures
//! are absorbed (the page counts as skipped); only a document that
//! cannot be opened at all is fatal.

use docchat_core::config::IngestConfig;
use docchat_core::{Chunk, DocumentIndex};
use thiserror::Error;

use crate::chunker::Chunker;
use crate::document::{DecodeError, ExtractionError, PageSource, Renderer};
use crate::filter::{classify_page, RejectReason};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open document: {0}")]
    Decode(#[from] DecodeError),
}

/// Receives per-page diagnostics during ingestion. Injectable so the
/// pipeline itself has no output side effects in tests.
pub trait IngestObserver {
    fn page_accepted(&self, _page: usize, _text_len: usize, _chunks: usize) {}
    fn page_skipped(&self, _page: usize, _reason: &RejectReason) {}
    fn page_failed(&self, _page: usize, _error: &ExtractionError) {}
}

/// Default observer: forwards everything to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestObserver for TracingObserver {
    fn page_accepted(&self, page: usize, text_len: usize, chunks: usize) {
        tracing::debug!("page {page}: {text_len} chars, {chunks} chunks - accepted");
    }

    fn page_skipped(&self, page: usize, reason: &RejectReason) {
        tracing::debug!("skipping page {page} ({reason})");
    }

    fn page_failed(&self, page: usize, error: &ExtractionError) {
        tracing::warn!("failed to extract page {page}: {error}");
    }
}

/// Orchestrates extraction, filtering and chunking into one index.
pub struct IngestionPipeline {
    config: IngestConfig,
    chunker: Chunker,
}

impl IngestionPipeline {
    pub fn new(config: IngestConfig) -> Self {
        let chunker = Chunker::new(config.chunk_size, config.overlap);
        Self { config, chunker }
    }

    /// Open `bytes` with `renderer` and ingest the document.
    pub fn ingest_bytes(
        &self,
        renderer: &dyn Renderer,
        bytes: &[u8],
    ) -> Result<DocumentIndex, IngestError> {
        let source = renderer.open(bytes)?;
        Ok(self.ingest(source.as_ref()))
    }

    /// Ingest an already-opened document with the default observer.
    pub fn ingest(&self, source: &dyn PageSource) -> DocumentIndex {
        self.ingest_with_observer(source, &TracingObserver)
    }

    /// Ingest an already-opened document.
    ///
    /// Pages are visited strictly in ascending order (the filter's
    /// accepted-so-far counter depends on earlier decisions). Visiting
    /// stops early once the content-page cap is reached; pages beyond
    /// the cap are never visited and never counted. The index is
    /// assembled locally and returned by value, so an abandoned call
    /// can never leak a half-built index.
    pub fn ingest_with_observer(
        &self,
        source: &dyn PageSource,
        observer: &dyn IngestObserver,
    ) -> DocumentIndex {
        let total_pages = source.page_count();
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut content_pages = 0usize;
        let mut skipped_pages = 0usize;
        let mut total_text_length = 0usize;

        tracing::info!("ingesting document with {total_pages} pages");

        for page in 1..=total_pages {
            let text = match source.page_text(page) {
                Ok(text) => text,
                Err(e) => {
                    observer.page_failed(page, &e);
                    skipped_pages += 1;
                    continue;
                }
            };

            if let Some(reason) = classify_page(&text, page, content_pages, &self.config) {
                observer.page_skipped(page, &reason);
                skipped_pages += 1;
                continue;
            }

            let trimmed = text.trim();
            total_text_length += trimmed.len();
            content_pages += 1;

            let page_chunks = self.chunker.chunk_page(trimmed, page);
            observer.page_accepted(page, trimmed.len(), page_chunks.len());
            chunks.extend(page_chunks);

            // Bound downstream prompt-building cost; pages past the
            // cap are simply never visited.
            if content_pages >= self.config.max_content_pages {
                tracing::info!(
                    "reached cap of {} content pages, stopping extraction",
                    self.config.max_content_pages
                );
                break;
            }
        }

        tracing::info!(
            "ingestion complete: {content_pages} content pages, \
             {skipped_pages} skipped, {} chunks, {total_text_length} chars",
            chunks.len()
        );

        DocumentIndex {
            total_pages,
            content_pages,
            skipped_pages,
            chunks,
            total_text_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// In-memory page source; `Err` entries simulate undecodable pages.
    struct FakeSource {
        pages: Vec<Result<String, String>>,
    }

    impl FakeSource {
        fn new<S: AsRef<str>>(pages: Vec<S>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|p| Ok(p.as_ref().to_string()))
                    .collect(),
            }
        }
    }

    impl PageSource for FakeSource {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_text(&self, page: usize) -> Result<String, ExtractionError> {
            match self.pages.get(page - 1) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(reason)) => Err(ExtractionError::PageUnreadable {
                    page,
                    reason: reason.clone(),
                }),
                None => Err(ExtractionError::PageOutOfRange {
                    page,
                    total: self.pages.len(),
                }),
            }
        }
    }

    /// Records observer events for assertions.
    #[derive(Default)]
    struct RecordingObserver {
        accepted: RefCell<Vec<usize>>,
        skipped: RefCell<Vec<(usize, RejectReason)>>,
        failed: RefCell<Vec<usize>>,
    }

    impl IngestObserver for RecordingObserver {
        fn page_accepted(&self, page: usize, _text_len: usize, _chunks: usize) {
            self.accepted.borrow_mut().push(page);
        }

        fn page_skipped(&self, page: usize, reason: &RejectReason) {
            self.skipped.borrow_mut().push((page, reason.clone()));
        }

        fn page_failed(&self, page: usize, _error: &ExtractionError) {
            self.failed.borrow_mut().push(page);
        }
    }

    fn prose(n: usize) -> String {
        let mut out = String::new();
        let mut word = 0usize;
        while out.len() < n {
            out.push_str(&format!("substantive{word} "));
            word += 1;
        }
        out.truncate(n);
        out
    }

    fn test_config() -> IngestConfig {
        IngestConfig::default()
    }

    fn pipeline() -> IngestionPipeline {
        IngestionPipeline::new(test_config())
    }

    #[test]
    fn counters_partition_all_pages() {
        let body = prose(800);
        let pages: Vec<&str> = (0..9).map(|_| body.as_str()).collect();
        let index = pipeline().ingest(&FakeSource::new(pages));

        assert_eq!(index.total_pages, 9);
        assert_eq!(index.content_pages + index.skipped_pages, index.total_pages);
        // Pages 1-5 are front matter.
        assert_eq!(index.content_pages, 4);
        assert_eq!(index.skipped_pages, 5);
    }

    #[test]
    fn three_page_document_has_no_content() {
        // All pages fall inside the front-matter cutoff regardless of
        // how substantial the text is.
        let body = prose(2000);
        let index = pipeline().ingest(&FakeSource::new(vec![&body, &body, &body]));

        assert_eq!(index.total_pages, 3);
        assert_eq!(index.content_pages, 0);
        assert_eq!(index.skipped_pages, 3);
        assert!(index.is_empty());
        assert_eq!(index.total_text_length, 0);
    }

    #[test]
    fn content_page_cap_stops_early() {
        let mut config = test_config();
        config.max_content_pages = 2;
        let pipeline = IngestionPipeline::new(config);

        let body = prose(800);
        let pages: Vec<&str> = (0..20).map(|_| body.as_str()).collect();
        let index = pipeline.ingest(&FakeSource::new(pages));

        assert_eq!(index.content_pages, 2);
        // Pages 1-5 skipped, 6-7 accepted, 8-20 never visited.
        assert_eq!(index.skipped_pages, 5);
        assert!(index.pages_visited() < index.total_pages);
        assert_eq!(index.total_pages, 20);
    }

    #[test]
    fn extraction_failure_counts_as_skipped() {
        let body = prose(800);
        let mut source = FakeSource::new(vec![&body; 8]);
        source.pages[6] = Err("corrupt stream".to_string());

        let observer = RecordingObserver::default();
        let index = pipeline().ingest_with_observer(&source, &observer);

        assert_eq!(index.content_pages + index.skipped_pages, 8);
        assert_eq!(index.content_pages, 2); // pages 6 and 8
        assert_eq!(observer.failed.borrow().as_slice(), &[7]);
    }

    #[test]
    fn chunks_follow_page_order() {
        let long = (0..2500).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let body = prose(800);
        let source = FakeSource::new(vec![
            &body, &body, &body, &body, &body, // front matter
            &long, &body,
        ]);
        let index = pipeline().ingest(&source);

        assert!(index.chunks.len() > 2, "long page must produce several chunks");
        let pages: Vec<usize> = index.chunks.iter().map(|c| c.page).collect();
        let mut sorted = pages.clone();
        sorted.sort_unstable();
        assert_eq!(pages, sorted, "chunk order must follow ascending pages");
        assert_eq!(*pages.last().unwrap(), 7);
    }

    #[test]
    fn accepted_text_length_is_accumulated() {
        let body = prose(800);
        let source = FakeSource::new(vec![&body; 7]);
        let index = pipeline().ingest(&source);

        assert_eq!(index.content_pages, 2);
        assert_eq!(index.total_text_length, body.trim().len() * 2);
    }

    #[test]
    fn observer_sees_every_visited_page() {
        let body = prose(800);
        let toc = format!("Table of Contents {}", prose(600));
        let source = FakeSource::new(vec![&body, &body, &body, &body, &body, &toc, &body]);

        let observer = RecordingObserver::default();
        let index = pipeline().ingest_with_observer(&source, &observer);

        assert_eq!(observer.accepted.borrow().as_slice(), &[7]);
        let skipped = observer.skipped.borrow();
        assert_eq!(skipped.len(), 6);
        assert!(matches!(skipped[5], (6, RejectReason::Boilerplate(_))));
        assert_eq!(index.content_pages, 1);
    }

    #[test]
    fn empty_document_yields_empty_index() {
        let index = pipeline().ingest(&FakeSource::new(Vec::<&str>::new()));
        assert_eq!(index.total_pages, 0);
        assert_eq!(index.content_pages, 0);
        assert_eq!(index.skipped_pages, 0);
        assert!(index.is_empty());
    }

    #[test]
    fn early_short_pages_skip_until_content_starts() {
        let short = prose(300);
        let long = prose(800);
        // Page 6 is 300 chars: rejected while fewer than 2 pages are
        // accepted. Pages 7 and 8 are long enough to start content,
        // after which page 9 at 300 chars is accepted.
        let source = FakeSource::new(vec![
            &long, &long, &long, &long, &long, // front matter
            &short, &long, &long, &short,
        ]);
        let index = pipeline().ingest(&source);
        assert_eq!(index.content_pages, 3);
        assert_eq!(index.skipped_pages, 6);
    }
}
