//! Consumer-facing query path: rank chunks against a question, build
//! a context-labeled prompt, and ask the completion service.

use docchat_core::{Config, DocumentIndex, ScoredChunk};
use docchat_ingest::RelevanceRanker;
use tracing::{debug, info};

use crate::provider::{GenerationParams, LlmError, LlmProvider, Message, Role};

const SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant helping users understand PDF documents.";

/// Context sent when no chunk matches the question, so general
/// questions about the document still get an answer.
const EMPTY_CONTEXT: &str =
    "PDF content is being processed. Please ask general questions about the document.";

/// Answers questions about an ingested document.
pub struct AnswerGenerator {
    provider: Box<dyn LlmProvider>,
    params: GenerationParams,
    ranker: RelevanceRanker,
}

impl AnswerGenerator {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        params: GenerationParams,
        context_chunks: usize,
    ) -> Self {
        Self {
            provider,
            params,
            ranker: RelevanceRanker::new(context_chunks),
        }
    }

    /// Build from config, creating the configured provider.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let provider = crate::providers::create_provider(&config.llm)?;
        Ok(Self::new(
            provider,
            GenerationParams::from(&config.llm),
            config.search.top_k,
        ))
    }

    /// Answer `question` using the index's most relevant chunks as
    /// context. Completion-service failures propagate classified and
    /// verbatim; the caller decides whether to retry.
    pub async fn ask(&self, index: &DocumentIndex, question: &str) -> Result<String, LlmError> {
        let ranked = self.ranker.rank(&index.chunks, question);
        info!(
            "answering with {} context chunks from pages: {:?}",
            ranked.len(),
            ranked.iter().map(|r| r.chunk.page).collect::<Vec<_>>()
        );

        let context = build_context(&ranked);
        let prompt = build_prompt(&context, question);
        debug!("prompt length: {} chars", prompt.len());

        let messages = vec![
            Message {
                role: Role::System,
                content: SYSTEM_PROMPT.to_string(),
            },
            Message {
                role: Role::User,
                content: prompt,
            },
        ];

        let answer = self.provider.complete(messages, &self.params).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(LlmError::EmptyGeneration);
        }
        Ok(answer.to_string())
    }
}

/// Label each ranked chunk by page and rank position.
fn build_context(ranked: &[ScoredChunk<'_>]) -> String {
    if ranked.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }
    ranked
        .iter()
        .enumerate()
        .map(|(i, scored)| {
            format!("[Page {}, Chunk {}]: {}", scored.chunk.page, i + 1, scored.chunk.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Context from the uploaded PDF:\n{context}\n\n\
         User Question: {question}\n\n\
         Please provide a helpful, informative response based on the PDF \
         context above. If the question is about specific content in the \
         PDF, use the context to answer it clearly. If it's a general \
         question about the document, provide relevant insights based on \
         what you can see."
    )
}
