// Web snippet search
//
// DuckDuckGo's HTML endpoint gives us the top result without an API key.
// We fetch that page and pick the first paragraph-ish block that is long
// enough and mentions the first word of the question.

use crate::error::Result;
use crate::knowledge::{Lookup, WebSearch};
use async_trait::async_trait;
use log::debug;
use scraper::{Html, Selector};
use url::Url;

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

// A text block must be longer than this to count as an answer
const MIN_SNIPPET_CHARS: usize = 50;

// Scanned in this order; the first qualifying node wins
const TEXT_TAGS: &[&str] = &["p", "span", "div"];

pub struct DuckDuckGo {
    client: reqwest::Client,
    search_url: String,
}

impl DuckDuckGo {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            search_url: SEARCH_URL.to_string(),
        }
    }

    async fn fetch_snippet(&self, query: &str) -> Result<Option<String>> {
        let results = self
            .client
            .get(&self.search_url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let Some(url) = parse_top_result(&results) else {
            debug!("[web] no results for '{}'", query);
            return Ok(None);
        };

        debug!("[web] reading {}", url);
        let page = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(extract_snippet(&page, query))
    }
}

#[async_trait]
impl WebSearch for DuckDuckGo {
    async fn snippet(&self, query: &str) -> Lookup {
        match self.fetch_snippet(query).await {
            Ok(found) => Lookup::from(found),
            Err(e) => {
                debug!("[web] search failed: {}", e);
                Lookup::Failed(e.to_string())
            }
        }
    }
}

/// URL of the first organic result on a DuckDuckGo HTML page
pub fn parse_top_result(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a.result__a").ok()?;

    document
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .find_map(resolve_result_href)
}

/// Unwrap DuckDuckGo's redirect links and drop its ad links
pub fn resolve_result_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;
    let is_ddg = parsed
        .host_str()
        .map(|host| host.ends_with("duckduckgo.com"))
        .unwrap_or(false);

    if is_ddg {
        if parsed.path() != "/l/" {
            return None;
        }
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned());
    }

    match parsed.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}

/// First text block that is long enough and mentions the query's first word
pub fn extract_snippet(html: &str, query: &str) -> Option<String> {
    let first_word = query.split_whitespace().next()?.to_lowercase();
    let document = Html::parse_document(html);

    for tag in TEXT_TAGS {
        let Ok(selector) = Selector::parse(tag) else {
            continue;
        };

        for element in document.select(&selector) {
            let text = element.text().collect::<String>();
            let text = text.trim();
            if text.chars().count() > MIN_SNIPPET_CHARS && text.to_lowercase().contains(&first_word) {
                return Some(text.to_string());
            }
        }
    }

    None
}
