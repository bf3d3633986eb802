/// OpenRouter chat completions
///
/// OpenAI-compatible `/chat/completions` endpoint. Any transport or
/// decoding problem is reported as `Lookup::Failed`.

use crate::core::history::Message;
use crate::error::{JarvisError, Result};
use crate::knowledge::{ChatModel, Lookup};
use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};

const COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f64 = 0.7;

pub struct OpenRouter {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl OpenRouter {
    /// A client without a key still works; every call reports the missing key
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            endpoint: COMPLETIONS_URL.to_string(),
        }
    }

    async fn complete(&self, api_key: &str, messages: &[Message], model: &str) -> Result<Value> {
        let body = request_body(messages, model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChatModel for OpenRouter {
    async fn chat(&self, messages: &[Message], model: &str) -> Lookup {
        let Some(api_key) = self.api_key.as_deref() else {
            return Lookup::Failed("OpenRouter API key missing".to_string());
        };

        match self.complete(api_key, messages, model).await {
            Ok(body) => match reply_text(&body) {
                Ok(reply) => Lookup::from_text(reply),
                Err(e) => Lookup::Failed(e.to_string()),
            },
            Err(e) => {
                debug!("[openrouter] request failed: {}", e);
                Lookup::Failed(e.to_string())
            }
        }
    }
}

pub fn request_body(messages: &[Message], model: &str) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "max_tokens": MAX_TOKENS,
        "temperature": TEMPERATURE,
    })
}

/// `choices[0].message.content` of a completion response
pub fn reply_text(body: &Value) -> Result<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            let reason = body["error"]["message"]
                .as_str()
                .unwrap_or("response had no message content");
            JarvisError::Capability(reason.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let messages = vec![Message::user("hi"), Message::assistant("hello")];
        let body = request_body(&messages, "meta-llama/llama-4-maverick");

        assert_eq!(body["model"], "meta-llama/llama-4-maverick");
        assert_eq!(body["max_tokens"], 300);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_reply_text() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "Hi there"}}]});
        assert_eq!(reply_text(&body).unwrap(), "Hi there");
    }

    #[test]
    fn test_reply_text_error_body() {
        let body = json!({"error": {"message": "rate limited"}});
        let err = reply_text(&body).unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = reqwest::Client::new();
        let chat = OpenRouter::new(client, None);

        let result = chat.chat(&[Message::user("hello")], "any").await;
        assert_eq!(result, Lookup::Failed("OpenRouter API key missing".to_string()));
    }
}
