/// Wikipedia summaries
///
/// Resolves a topic to a page title with opensearch, then reads the page
/// summary from the REST API and keeps the first few sentences.

use crate::error::Result;
use crate::knowledge::{Encyclopedia, Lookup};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;

const BASE_URL: &str = "https://en.wikipedia.org";

pub struct Wikipedia {
    client: reqwest::Client,
    base_url: String,
}

impl Wikipedia {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    async fn resolve_title(&self, topic: &str) -> Result<Option<String>> {
        let body: Value = self
            .client
            .get(format!("{}/w/api.php", self.base_url))
            .query(&[
                ("action", "opensearch"),
                ("search", topic),
                ("limit", "1"),
                ("namespace", "0"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(first_title(&body))
    }

    async fn fetch_summary(&self, topic: &str, sentences: usize) -> Result<Option<String>> {
        let Some(title) = self.resolve_title(topic).await? else {
            return Ok(None);
        };

        debug!("[wikipedia] summary for '{}'", title);
        let url = format!(
            "{}/api/rest_v1/page/summary/{}",
            self.base_url,
            urlencoding::encode(&title.replace(' ', "_"))
        );
        let body: Value = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(summary_extract(&body).map(|text| first_sentences(&text, sentences)))
    }
}

#[async_trait]
impl Encyclopedia for Wikipedia {
    async fn summary(&self, topic: &str, sentences: usize) -> Lookup {
        match self.fetch_summary(topic, sentences).await {
            Ok(found) => Lookup::from(found),
            Err(e) => {
                debug!("[wikipedia] request failed: {}", e);
                Lookup::Failed(e.to_string())
            }
        }
    }
}

/// Best title from an opensearch response: `[query, [titles], [descs], [urls]]`
pub fn first_title(body: &Value) -> Option<String> {
    body.get(1)?
        .as_array()?
        .first()?
        .as_str()
        .map(str::to_string)
}

/// Extract from a page summary; disambiguation pages don't count
pub fn summary_extract(body: &Value) -> Option<String> {
    if body["type"] == "disambiguation" {
        return None;
    }
    body["extract"]
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// The first `count` sentences of `text`
pub fn first_sentences(text: &str, count: usize) -> String {
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars
                .peek()
                .map(|(_, next)| next.is_whitespace())
                .unwrap_or(true);
            if at_boundary {
                seen += 1;
                if seen == count {
                    return text[..i + c.len_utf8()].to_string();
                }
            }
        }
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_sentences() {
        let text = "Rust is a language. It is fast! Is it safe? Yes.";
        assert_eq!(first_sentences(text, 2), "Rust is a language. It is fast!");
        assert_eq!(first_sentences(text, 1), "Rust is a language.");
        assert_eq!(first_sentences("No terminator here", 2), "No terminator here");
    }

    #[test]
    fn test_first_sentences_ignores_inner_dots() {
        let text = "Version 1.70 shipped in 2023. It added things. More.";
        assert_eq!(first_sentences(text, 2), "Version 1.70 shipped in 2023. It added things.");
    }

    #[test]
    fn test_first_title() {
        let body = json!(["paris", ["Paris"], [""], ["https://en.wikipedia.org/wiki/Paris"]]);
        assert_eq!(first_title(&body), Some("Paris".to_string()));

        let empty = json!(["zzqx", [], [], []]);
        assert_eq!(first_title(&empty), None);
    }

    #[test]
    fn test_summary_extract() {
        let page = json!({"type": "standard", "extract": "Paris is the capital of France."});
        assert_eq!(summary_extract(&page), Some("Paris is the capital of France.".to_string()));

        let ambiguous = json!({"type": "disambiguation", "extract": "Mercury may refer to:"});
        assert_eq!(summary_extract(&ambiguous), None);
    }
}
