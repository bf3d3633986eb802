/// Knowledge capabilities and the fallback chain
///
/// Remote services that can answer a question, each wrapped so that it
/// reports `Lookup` instead of raising. The chain tries them in order.

pub mod chain;
pub mod openrouter;
pub mod web;
pub mod wikipedia;
pub mod wolfram;

pub use chain::{ChatResponder, KnowledgeChain, KnowledgeStage, ModelChoice, Query};
pub use openrouter::OpenRouter;
pub use web::DuckDuckGo;
pub use wikipedia::Wikipedia;
pub use wolfram::WolframAlpha;

use crate::core::history::Message;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Outcome of asking an external capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// A usable answer
    Found(String),
    /// The service answered but had nothing
    Empty,
    /// The call itself failed
    Failed(String),
}

impl Lookup {
    /// Wrap text, treating blank text as `Empty`
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Lookup::Empty
        } else {
            Lookup::Found(trimmed.to_string())
        }
    }

    /// The answer, if it is at least `min_chars` characters long
    pub fn accept(self, min_chars: usize) -> Option<String> {
        match self {
            Lookup::Found(text) if text.chars().count() >= min_chars.max(1) => Some(text),
            _ => None,
        }
    }
}

impl From<Option<String>> for Lookup {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => Lookup::from_text(text),
            None => Lookup::Empty,
        }
    }
}

/// Search the web and pull a relevant paragraph from the top hit
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn snippet(&self, query: &str) -> Lookup;
}

/// Computational knowledge engine (calculations, facts)
#[async_trait]
pub trait KnowledgeEngine: Send + Sync {
    async fn query(&self, input: &str) -> Lookup;
}

/// Encyclopedia summaries
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    async fn summary(&self, topic: &str, sentences: usize) -> Lookup;
}

/// Chat-completion language model
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, messages: &[Message], model: &str) -> Lookup;
}

/// HTTP client shared by the remote capabilities
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_trims_and_empties() {
        assert_eq!(Lookup::from_text("  Paris  "), Lookup::Found("Paris".to_string()));
        assert_eq!(Lookup::from_text("   "), Lookup::Empty);
    }

    #[test]
    fn test_accept_threshold() {
        assert_eq!(Lookup::Found("short".to_string()).accept(30), None);
        assert_eq!(Lookup::Found("4".to_string()).accept(1), Some("4".to_string()));
        assert_eq!(Lookup::Empty.accept(1), None);
        assert_eq!(Lookup::Failed("timeout".to_string()).accept(1), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Lookup::from(None), Lookup::Empty);
        assert_eq!(Lookup::from(Some("x".to_string())), Lookup::Found("x".to_string()));
    }
}
