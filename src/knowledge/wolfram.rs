/// WolframAlpha knowledge engine
///
/// Uses the v2 query API with JSON output and plaintext pods. The answer
/// is the first pod that is marked primary or titled "Result".

use crate::error::Result;
use crate::knowledge::{KnowledgeEngine, Lookup};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;

const QUERY_URL: &str = "https://api.wolframalpha.com/v2/query";

pub struct WolframAlpha {
    client: reqwest::Client,
    app_id: String,
    endpoint: String,
}

impl WolframAlpha {
    pub fn new(client: reqwest::Client, app_id: impl Into<String>) -> Self {
        Self {
            client,
            app_id: app_id.into(),
            endpoint: QUERY_URL.to_string(),
        }
    }

    async fn fetch(&self, input: &str) -> Result<Value> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("appid", self.app_id.as_str()),
                ("input", input),
                ("output", "json"),
                ("format", "plaintext"),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl KnowledgeEngine for WolframAlpha {
    async fn query(&self, input: &str) -> Lookup {
        match self.fetch(input).await {
            Ok(body) => first_result(&body),
            Err(e) => {
                debug!("[wolfram] request failed: {}", e);
                Lookup::Failed(e.to_string())
            }
        }
    }
}

/// Pull the answer text out of a query response
pub fn first_result(body: &Value) -> Lookup {
    let result = &body["queryresult"];

    // "error" is `false` on success and an object on failure
    if let Some(error) = result["error"].as_object() {
        let msg = error
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Lookup::Failed(msg.to_string());
    }

    if !result["success"].as_bool().unwrap_or(false) {
        return Lookup::Empty;
    }

    let Some(pods) = result["pods"].as_array() else {
        return Lookup::Empty;
    };

    let answer = pods
        .iter()
        .find(|pod| pod["primary"].as_bool().unwrap_or(false) || pod["title"] == "Result")
        .and_then(|pod| pod["subpods"].as_array())
        .and_then(|subpods| {
            subpods
                .iter()
                .filter_map(|sub| sub["plaintext"].as_str())
                .find(|text| !text.trim().is_empty())
        });

    Lookup::from(answer.map(str::to_string))
}
