//! Provider adapters. Each one parses its own response shape into the
//! common [`SearchResult`] record.

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::instrument;

use crate::{http_client, SearchProvider, SearchResult};

// ---------- Serper (google.serper.dev, key-gated) ----------

#[derive(Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperHit>,
}

#[derive(Deserialize)]
struct SerperHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

pub struct SerperProvider {
    api_key: String,
    client: reqwest::Client,
}

impl SerperProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self {
            api_key,
            client: http_client()?,
        })
    }
}

#[async_trait]
impl SearchProvider for SerperProvider {
    fn name(&self) -> &'static str {
        "serper"
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let response: SerperResponse = self
            .client
            .post("https://google.serper.dev/search")
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({ "q": query, "num": limit }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .organic
            .into_iter()
            .take(limit)
            .map(|hit| SearchResult {
                title: hit.title,
                url: hit.link,
                snippet: hit.snippet,
            })
            .collect())
    }
}

// ---------- Brave (api.search.brave.com, key-gated) ----------

#[derive(Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: BraveWeb,
}

#[derive(Deserialize, Default)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveHit>,
}

#[derive(Deserialize)]
struct BraveHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

pub struct BraveProvider {
    api_key: String,
    client: reqwest::Client,
}

impl BraveProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self {
            api_key,
            client: http_client()?,
        })
    }
}

#[async_trait]
impl SearchProvider for BraveProvider {
    fn name(&self) -> &'static str {
        "brave"
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let response: BraveResponse = self
            .client
            .get("https://api.search.brave.com/res/v1/web/search")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[("q", query), ("count", &limit.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .web
            .results
            .into_iter()
            .take(limit)
            .map(|hit| SearchResult {
                title: hit.title,
                url: hit.url,
                snippet: hit.description,
            })
            .collect())
    }
}

// ---------- DuckDuckGo (html.duckduckgo.com, keyless scrape) ----------

pub struct DuckDuckGoProvider {
    client: reqwest::Client,
    link_re: Regex,
    snippet_re: Regex,
    tag_re: Regex,
}

impl DuckDuckGoProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            link_re: Regex::new(
                r#"(?s)class="result__a"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#,
            )?,
            snippet_re: Regex::new(r#"(?s)class="result__snippet"[^>]*>(.*?)</a>"#)?,
            tag_re: Regex::new(r"<[^>]+>")?,
        })
    }

    fn strip_tags(&self, html: &str) -> String {
        self.tag_re.replace_all(html, "").trim().to_string()
    }

    /// Parses the result page HTML; exposed to the crate for tests.
    pub(crate) fn parse(&self, html: &str, limit: usize) -> Vec<SearchResult> {
        let snippets: Vec<String> = self
            .snippet_re
            .captures_iter(html)
            .map(|c| self.strip_tags(&c[1]))
            .collect();

        self.link_re
            .captures_iter(html)
            .take(limit)
            .enumerate()
            .map(|(i, c)| SearchResult {
                title: self.strip_tags(&c[2]),
                url: resolve_ddg_url(&c[1]),
                snippet: snippets.get(i).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let html = self
            .client
            .get("https://html.duckduckgo.com/html/")
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(self.parse(&html, limit))
    }
}

/// DuckDuckGo wraps targets in a redirect (`//duckduckgo.com/l/?uddg=...`);
/// unwrap it back to the real URL when present.
fn resolve_ddg_url(href: &str) -> String {
    if let Some(start) = href.find("uddg=") {
        let encoded = &href[start + 5..];
        let encoded = encoded.split('&').next().unwrap_or(encoded);
        return percent_decode(encoded);
    }
    href.to_string()
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some(value) = s
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
