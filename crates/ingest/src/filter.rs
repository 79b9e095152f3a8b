//! Page filtering: decides whether a page is content worth indexing.
//!
//! Pure function of (text, page index, accepted-so-far) plus the
//! configured thresholds — no hidden state, so every rule is
//! independently testable.

use docchat_core::config::IngestConfig;

/// Why a page was rejected. Diagnostics only — correctness never
/// depends on the specific reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Page index within the assumed front matter (covers, title pages).
    FrontMatter,
    /// Text contains a boilerplate marker (copyright, TOC, ...).
    Boilerplate(String),
    /// Trimmed text shorter than the minimum for any page.
    TooShort,
    /// Short page seen before the real content started.
    ShortBeforeContent,
    /// Mostly page numbers, roman numerals or heading fragments.
    MostlyShortTokens,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::FrontMatter => write!(f, "front matter"),
            RejectReason::Boilerplate(marker) => write!(f, "boilerplate ({marker})"),
            RejectReason::TooShort => write!(f, "too short"),
            RejectReason::ShortBeforeContent => write!(f, "too short for early content"),
            RejectReason::MostlyShortTokens => write!(f, "mostly short tokens"),
        }
    }
}

/// Classify one page. Returns `None` to accept, or the first matching
/// rejection reason. Rules apply in order; first match wins.
///
/// `page_index` is 1-based; `accepted_so_far` is how many content
/// pages the caller has already accepted.
pub fn classify_page(
    text: &str,
    page_index: usize,
    accepted_so_far: usize,
    config: &IngestConfig,
) -> Option<RejectReason> {
    if page_index <= config.front_matter_pages {
        return Some(RejectReason::FrontMatter);
    }

    let lower = text.to_lowercase();
    for marker in &config.boilerplate_markers {
        if lower.contains(marker.as_str()) {
            return Some(RejectReason::Boilerplate(marker.clone()));
        }
    }

    let trimmed = text.trim();
    if trimmed.len() < config.min_page_chars {
        return Some(RejectReason::TooShort);
    }

    if accepted_so_far < config.early_content_pages && trimmed.len() < config.early_min_chars {
        return Some(RejectReason::ShortBeforeContent);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let short = tokens
        .iter()
        .filter(|t| t.len() <= config.short_token_len)
        .count();
    if short as f64 > tokens.len() as f64 * config.short_token_ratio {
        return Some(RejectReason::MostlyShortTokens);
    }

    None
}
