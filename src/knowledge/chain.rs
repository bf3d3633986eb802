/// Knowledge fallback chain
///
/// Cheap sources first, the language model last:
/// web snippet → knowledge engine → encyclopedia → chat.
/// Each stage either produces an acceptable answer or hands over to the
/// next one. The final chat stage always produces a reply.

use crate::core::history::ConversationHistory;
use crate::core::intents::knowledge_residual;
use crate::knowledge::{ChatModel, Encyclopedia, KnowledgeEngine, Lookup, WebSearch};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

/// Web snippets shorter than this are not considered an answer
pub const MIN_WEB_ANSWER: usize = 30;

/// Sentences requested from the encyclopedia
pub const SUMMARY_SENTENCES: usize = 2;

/// A question as seen by the chain
#[derive(Debug, Clone)]
pub struct Query<'a> {
    /// Exactly what the user said
    pub original: &'a str,
    /// Lower-cased and trimmed
    pub normalized: &'a str,
    /// Normalized text with the question keywords removed
    pub residual: String,
}

impl<'a> Query<'a> {
    pub fn new(original: &'a str, normalized: &'a str) -> Self {
        Self {
            original,
            normalized,
            residual: knowledge_residual(normalized),
        }
    }
}

/// One provider in the chain
#[async_trait]
pub trait KnowledgeStage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Shortest answer this stage is trusted with
    fn min_chars(&self) -> usize {
        1
    }

    async fn lookup(&self, query: &Query<'_>) -> Lookup;
}

/// Stage 1: scrape the top web result
pub struct WebSnippetStage(pub Arc<dyn WebSearch>);

#[async_trait]
impl KnowledgeStage for WebSnippetStage {
    fn name(&self) -> &'static str {
        "web"
    }

    fn min_chars(&self) -> usize {
        MIN_WEB_ANSWER
    }

    async fn lookup(&self, query: &Query<'_>) -> Lookup {
        self.0.snippet(query.original).await
    }
}

/// Stage 2: computational knowledge engine
pub struct KnowledgeEngineStage(pub Arc<dyn KnowledgeEngine>);

#[async_trait]
impl KnowledgeStage for KnowledgeEngineStage {
    fn name(&self) -> &'static str {
        "knowledge-engine"
    }

    async fn lookup(&self, query: &Query<'_>) -> Lookup {
        if query.residual.is_empty() {
            return Lookup::Empty;
        }
        self.0.query(&query.residual).await
    }
}

/// Stage 3: encyclopedia summary
pub struct EncyclopediaStage(pub Arc<dyn Encyclopedia>);

#[async_trait]
impl KnowledgeStage for EncyclopediaStage {
    fn name(&self) -> &'static str {
        "encyclopedia"
    }

    async fn lookup(&self, query: &Query<'_>) -> Lookup {
        if query.residual.is_empty() {
            return Lookup::Empty;
        }
        self.0.summary(&query.residual, SUMMARY_SENTENCES).await
    }
}

/// Which model to ask
#[derive(Debug, Clone)]
pub struct ModelChoice {
    pub general: String,
    pub code: String,
}

impl ModelChoice {
    /// Code and calculation questions go to the code model
    pub fn select(&self, normalized: &str) -> &str {
        if normalized.contains("code") || normalized.contains("calculate") {
            &self.code
        } else {
            &self.general
        }
    }
}

impl Default for ModelChoice {
    fn default() -> Self {
        Self {
            general: "meta-llama/llama-4-maverick".to_string(),
            code: "deepseek/deepseek-chat-v3-0324".to_string(),
        }
    }
}

/// Final stage: chat with the language model over the whole history
pub struct ChatResponder {
    model: Arc<dyn ChatModel>,
    models: ModelChoice,
}

impl ChatResponder {
    pub fn new(model: Arc<dyn ChatModel>, models: ModelChoice) -> Self {
        Self { model, models }
    }

    /// Ask the model; never fails
    ///
    /// The original command is appended as a user message before the call.
    /// The reply is appended only when there is one.
    pub async fn respond(
        &self,
        original: &str,
        normalized: &str,
        history: &mut ConversationHistory,
    ) -> String {
        let model = self.models.select(normalized);
        debug!("Chat with {} ({} messages so far)", model, history.len());

        history.push_user(original);

        match self.model.chat(history.messages(), model).await {
            Lookup::Found(reply) => {
                history.push_assistant(reply.clone());
                reply
            }
            Lookup::Empty => "Sorry, I don't have an answer for that.".to_string(),
            Lookup::Failed(reason) => {
                warn!("Chat request failed: {}", reason);
                format!("Sorry, I couldn't reach the language model: {}", reason)
            }
        }
    }
}

/// Ordered stages plus the chat fallback
pub struct KnowledgeChain {
    stages: Vec<Box<dyn KnowledgeStage>>,
    responder: ChatResponder,
}

impl KnowledgeChain {
    /// The standard order: web, knowledge engine, encyclopedia, chat
    pub fn new(
        web: Arc<dyn WebSearch>,
        engine: Arc<dyn KnowledgeEngine>,
        encyclopedia: Arc<dyn Encyclopedia>,
        responder: ChatResponder,
    ) -> Self {
        Self::with_stages(
            vec![
                Box::new(WebSnippetStage(web)),
                Box::new(KnowledgeEngineStage(engine)),
                Box::new(EncyclopediaStage(encyclopedia)),
            ],
            responder,
        )
    }

    /// Any stage order; chat always comes last
    pub fn with_stages(stages: Vec<Box<dyn KnowledgeStage>>, responder: ChatResponder) -> Self {
        Self { stages, responder }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn responder(&self) -> &ChatResponder {
        &self.responder
    }

    /// First acceptable answer from the stages, else the chat reply
    pub async fn resolve(
        &self,
        original: &str,
        normalized: &str,
        history: &mut ConversationHistory,
    ) -> String {
        let query = Query::new(original, normalized);

        for stage in &self.stages {
            match stage.lookup(&query).await.accept(stage.min_chars()) {
                Some(answer) => {
                    debug!("Answered by {} stage", stage.name());
                    return answer;
                }
                None => debug!("{} stage had no usable answer", stage.name()),
            }
        }

        self.responder
            .respond(query.original, query.normalized, history)
            .await
    }
}
