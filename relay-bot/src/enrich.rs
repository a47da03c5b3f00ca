//! Link enrichment: fetch up to [`MAX_LINKS`] URLs from the user's message,
//! strip markup, truncate, and append the extracted text as extra context.

use std::time::Duration;

use regex::Regex;
use tracing::{info, instrument, warn};

/// At most this many URLs are enriched, even when more are present.
pub const MAX_LINKS: usize = 3;

/// Per-URL character budget for the extracted text.
pub const PAGE_CHAR_BUDGET: usize = 4000;

/// Bounded wait for page fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(12);

/// Secondary plain-text endpoint tried when the direct fetch fails.
const READER_ENDPOINT: &str = "https://r.jina.ai/";

/// Fetches pages linked in user text and turns them into prompt context.
pub struct LinkEnricher {
    client: reqwest::Client,
    url_re: Regex,
    script_re: Regex,
    style_re: Regex,
    tag_re: Regex,
    ws_re: Regex,
    budget: usize,
}

impl LinkEnricher {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_budget(PAGE_CHAR_BUDGET)
    }

    pub fn with_budget(budget: usize) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?,
            url_re: Regex::new(r#"https?://[^\s<>"']+"#)?,
            script_re: Regex::new(r"(?is)<script[^>]*>.*?</script>")?,
            style_re: Regex::new(r"(?is)<style[^>]*>.*?</style>")?,
            tag_re: Regex::new(r"<[^>]+>")?,
            ws_re: Regex::new(r"\s+")?,
            budget,
        })
    }

    /// URLs found in the text, first [`MAX_LINKS`] only.
    pub fn extract_urls(&self, text: &str) -> Vec<String> {
        self.url_re
            .find_iter(text)
            .take(MAX_LINKS)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Removes script/style blocks and tags, collapses whitespace, truncates
    /// to the budget.
    pub fn clean(&self, html: &str) -> String {
        let without_scripts = self.script_re.replace_all(html, " ");
        let without_styles = self.style_re.replace_all(&without_scripts, " ");
        let without_tags = self.tag_re.replace_all(&without_styles, " ");
        let collapsed = self.ws_re.replace_all(&without_tags, " ");
        let trimmed = collapsed.trim();
        trimmed.chars().take(self.budget).collect()
    }

    async fn fetch(&self, url: &str) -> anyhow::Result<String> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    /// Fetches one URL, falling back to the reader endpoint; a total failure
    /// becomes an inline note rather than an error.
    async fn extract_one(&self, url: &str) -> String {
        match self.fetch(url).await {
            Ok(body) => self.clean(&body),
            Err(direct_err) => {
                warn!(url = %url, error = %direct_err, "Direct fetch failed, trying reader endpoint");
                match self.fetch(&format!("{READER_ENDPOINT}{url}")).await {
                    Ok(body) => self.clean(&body),
                    Err(reader_err) => {
                        warn!(url = %url, error = %reader_err, "Reader fetch failed too");
                        format!("[не удалось открыть {url}]")
                    }
                }
            }
        }
    }

    /// Returns the context block for all URLs in `text`, or `None` when the
    /// text contains no URLs.
    #[instrument(skip(self, text))]
    pub async fn enrich(&self, text: &str) -> Option<String> {
        let urls = self.extract_urls(text);
        if urls.is_empty() {
            return None;
        }

        info!(count = urls.len(), "Enriching message links");

        let mut block = String::new();
        for url in &urls {
            let extracted = self.extract_one(url).await;
            block.push_str(&format!("\n\nСодержимое {url}:\n{extracted}"));
        }
        Some(block)
    }
}
