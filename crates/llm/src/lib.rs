pub mod provider;
pub mod providers;
pub mod query;

pub use provider::{GenerationParams, LlmError, LlmProvider, Message, Role};
pub use query::AnswerGenerator;
