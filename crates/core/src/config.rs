use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f32(key: &str, default: f32) -> f32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ingest: IngestConfig,
    pub search: SearchConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            ingest: IngestConfig::from_env(),
            search: SearchConfig::from_env(),
            llm: LlmConfig::from_env(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ingest.validate()?;
        self.search.validate()?;
        Ok(())
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  ingest:  chunk_size={} overlap={} max_content_pages={}",
            self.ingest.chunk_size,
            self.ingest.overlap,
            self.ingest.max_content_pages
        );
        tracing::info!(
            "  filter:  front_matter_pages={} min_page_chars={} early_min_chars={} markers={}",
            self.ingest.front_matter_pages,
            self.ingest.min_page_chars,
            self.ingest.early_min_chars,
            self.ingest.boilerplate_markers.len()
        );
        tracing::info!("  search:  top_k={}", self.search.top_k);
        tracing::info!(
            "  llm:     model={} configured={}",
            self.llm.model,
            self.llm.is_configured()
        );
    }
}

// ── Ingestion ─────────────────────────────────────────────────

/// Thresholds for page filtering and chunking. All of these are
/// tunable so tests can run with small fixtures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum words per chunk.
    pub chunk_size: usize,
    /// Words shared between consecutive chunks.
    pub overlap: usize,
    /// Stop ingesting once this many content pages are accepted.
    pub max_content_pages: usize,
    /// Pages at or below this index are always rejected as front matter.
    pub front_matter_pages: usize,
    /// Reject pages with fewer trimmed characters than this.
    pub min_page_chars: usize,
    /// Stricter length cutoff applied before the first real content pages.
    pub early_min_chars: usize,
    /// How many accepted pages it takes before the stricter cutoff lifts.
    pub early_content_pages: usize,
    /// Reject pages where more than this fraction of tokens are short.
    pub short_token_ratio: f64,
    /// A token counts as short at or below this length.
    pub short_token_len: usize,
    /// Lowercase substrings marking boilerplate pages (copyright, TOC, ...).
    pub boilerplate_markers: Vec<String>,
}

fn default_boilerplate_markers() -> Vec<String> {
    [
        "project gutenberg",
        "copyright",
        "table of contents",
        "contents",
        "introduction",
        "preface",
        "chapter i",
        "book i",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl IngestConfig {
    fn from_env() -> Self {
        let boilerplate_markers = env_opt("BOILERPLATE_MARKERS")
            .map(|v| {
                v.split(',')
                    .map(|m| m.trim().to_lowercase())
                    .filter(|m| !m.is_empty())
                    .collect()
            })
            .unwrap_or_else(default_boilerplate_markers);
        Self {
            chunk_size: env_usize("CHUNK_SIZE", 1000),
            overlap: env_usize("CHUNK_OVERLAP", 100),
            max_content_pages: env_usize("MAX_CONTENT_PAGES", 30),
            front_matter_pages: env_usize("FRONT_MATTER_PAGES", 5),
            min_page_chars: env_usize("MIN_PAGE_CHARS", 200),
            early_min_chars: env_usize("EARLY_MIN_CHARS", 500),
            early_content_pages: env_usize("EARLY_CONTENT_PAGES", 2),
            short_token_ratio: env_f64("SHORT_TOKEN_RATIO", 0.7),
            short_token_len: env_usize("SHORT_TOKEN_LEN", 3),
            boilerplate_markers,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk size must be non-zero".into()));
        }
        if self.overlap >= self.chunk_size {
            return Err(ConfigError::Invalid(
                "chunk overlap must be less than chunk size".into(),
            ));
        }
        if self.max_content_pages == 0 {
            return Err(ConfigError::Invalid(
                "max content pages must be non-zero".into(),
            ));
        }
        if self.short_token_ratio <= 0.0 || self.short_token_ratio > 1.0 {
            return Err(ConfigError::Invalid(
                "short token ratio must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 100,
            max_content_pages: 30,
            front_matter_pages: 5,
            min_page_chars: 200,
            early_min_chars: 500,
            early_content_pages: 2,
            short_token_ratio: 0.7,
            short_token_len: 3,
            boilerplate_markers: default_boilerplate_markers(),
        }
    }
}

// ── Search ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// How many ranked chunks a query returns (and how many feed the prompt).
    pub top_k: usize,
}

impl SearchConfig {
    fn from_env() -> Self {
        Self {
            top_k: env_usize("SEARCH_TOP_K", 5),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be non-zero".into()));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

// ── LLM (Gemini) ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub timeout_sec: u64,
}

impl LlmConfig {
    fn from_env() -> Self {
        Self {
            api_key: env_opt("GEMINI_API_KEY"),
            model: env_or("GEMINI_MODEL", "gemini-1.5-flash"),
            temperature: env_f32("LLM_TEMPERATURE", 0.7),
            top_k: env_u32("LLM_TOP_K", 40),
            top_p: env_f32("LLM_TOP_P", 0.95),
            max_output_tokens: env_u32("LLM_MAX_OUTPUT_TOKENS", 1024),
            timeout_sec: env_usize("LLM_TIMEOUT_SEC", 30) as u64,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
            timeout_sec: 30,
        }
    }
}
