//! Relevance-ranked retrieval over an index's chunks.
//!
//! No embeddings — candidacy is a case-insensitive substring match on
//! the whole query, and scoring is keyword occurrence counts plus a
//! capped length bonus.

use docchat_core::{Chunk, ScoredChunk};

/// Points per keyword occurrence.
const OCCURRENCE_WEIGHT: f64 = 10.0;
/// Characters of chunk text per bonus point.
const LENGTH_BONUS_DIVISOR: f64 = 100.0;
/// Cap on the length bonus so long chunks cannot win on size alone.
const LENGTH_BONUS_CAP: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct RelevanceRanker {
    top_k: usize,
}

impl Default for RelevanceRanker {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

impl RelevanceRanker {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Return the top-K chunks for `query`, descending by relevance.
    /// Ties keep the original chunk order (stable sort). An empty
    /// query or empty chunk set yields an empty result.
    pub fn rank<'a>(&self, chunks: &'a [Chunk], query: &str) -> Vec<ScoredChunk<'a>> {
        let query_lower = query.trim().to_lowercase();
        if query_lower.is_empty() || chunks.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<ScoredChunk<'a>> = chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| chunk.text.to_lowercase().contains(&query_lower))
            .map(|(index, chunk)| ScoredChunk {
                chunk,
                index,
                relevance: relevance(&chunk.text, &query_lower),
            })
            .collect();

        // sort_by is stable: equal scores preserve index order.
        results.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(self.top_k);
        results
    }
}

/// Keyword-density score: 10 points per case-insensitive occurrence of
/// each query token, plus min(len / 100, 50) for chunk size.
fn relevance(text: &str, query_lower: &str) -> f64 {
    let text_lower = text.to_lowercase();

    let mut score = 0.0;
    for token in query_lower.split_whitespace() {
        score += text_lower.matches(token).count() as f64 * OCCURRENCE_WEIGHT;
    }

    score + (text.len() as f64 / LENGTH_BONUS_DIVISOR).min(LENGTH_BONUS_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, page: usize) -> Chunk {
        Chunk {
            text: text.to_string(),
            page,
        }
    }

    #[test]
    fn denser_and_longer_chunk_ranks_first() {
        let chunks = vec![
            chunk("the cat sat", 6),
            chunk("the cat sat on the mat", 6),
            chunk("dog", 7),
        ];
        let ranker = RelevanceRanker::default();

        let results = ranker.rank(&chunks, "cat");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.text, "the cat sat on the mat");
        assert_eq!(results[1].chunk.text, "the cat sat");

        let results = ranker.rank(&chunks, "dog");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.text, "dog");
    }

    #[test]
    fn non_matching_query_yields_no_candidates() {
        let chunks = vec![chunk("the cat sat", 6)];
        let results = RelevanceRanker::default().rank(&chunks, "zebra");
        assert!(results.is_empty());
    }

    #[test]
    fn candidacy_requires_whole_query_substring() {
        let chunks = vec![
            chunk("cats are mysterious and dogs are loyal", 6),
            chunk("dogs only here", 7),
        ];
        // "cats dogs" never appears contiguously in either chunk.
        let results = RelevanceRanker::default().rank(&chunks, "cats dogs");
        assert!(results.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let chunks = vec![chunk("The CAT Sat", 6)];
        let results = RelevanceRanker::default().rank(&chunks, "cAt");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn result_size_is_bounded_by_top_k() {
        let chunks: Vec<Chunk> = (0..20).map(|i| chunk("find me here", 6 + i)).collect();
        let results = RelevanceRanker::new(5).rank(&chunks, "find");
        assert_eq!(results.len(), 5);

        let results = RelevanceRanker::new(3).rank(&chunks, "find");
        assert_eq!(results.len(), 3);

        // min(K, candidateCount): fewer candidates than K.
        let results = RelevanceRanker::new(5).rank(&chunks[..2], "find");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn ties_preserve_original_chunk_order() {
        let chunks = vec![
            chunk("same words here", 6),
            chunk("same words here", 7),
            chunk("same words here", 8),
        ];
        let results = RelevanceRanker::default().rank(&chunks, "words");
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn empty_query_yields_empty_result() {
        let chunks = vec![chunk("anything", 6)];
        let ranker = RelevanceRanker::default();
        assert!(ranker.rank(&chunks, "").is_empty());
        assert!(ranker.rank(&chunks, "   ").is_empty());
        assert!(ranker.rank(&[], "cat").is_empty());
    }

    #[test]
    fn length_bonus_is_capped() {
        let long = format!("cat {}", "x".repeat(20_000));
        let score = relevance(&long, "cat");
        // One occurrence (10.0) plus the capped bonus (50.0).
        assert!((score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn each_query_token_scores_occurrences() {
        // "cat" occurs twice, "mat" once: 3 occurrences * 10 + len bonus.
        let text = "cat on the mat with another cat";
        let score = relevance(text, "cat mat");
        let expected = 30.0 + (text.len() as f64 / 100.0);
        assert!((score - expected).abs() < 1e-9);
    }
}
