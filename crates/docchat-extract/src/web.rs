//! Web page loader.
//!
//! Fetches a URL with reqwest and reduces the HTML to readable text with
//! scraper: the page title, then block-level content from the main content
//! region. No JavaScript rendering.

use docchat_core::{Document, ExtractError};
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

/// Selector cascade tried for the main content region.
const MAIN_SELECTORS: &[&str] = &["main", "article", "[role='main']", "#content", "#main", "body"];

/// Block-level elements harvested for text.
const BLOCK_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6, li, pre, blockquote, td";

/// Loader for web pages.
pub struct WebLoader {
    client: reqwest::Client,
}

impl WebLoader {
    /// Create a new web loader.
    ///
    /// The HTTP client uses a 30 second timeout and a browser-like
    /// User-Agent; some sites refuse requests without one.
    pub fn new() -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("docchat/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| ExtractError::Failed(format!("http client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch a URL and extract its readable content.
    ///
    /// Network and HTTP-status failures surface as [`ExtractError::Fetch`];
    /// a page with no readable content yields an empty document list.
    pub async fn fetch(&self, url: &str) -> Result<Vec<Document>, ExtractError> {
        let parsed = url::Url::parse(url)
            .map_err(|e| ExtractError::Fetch(format!("invalid url {url}: {e}")))?;
        debug!("fetching {}", parsed);

        let response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| ExtractError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Fetch(format!("HTTP {status} for {parsed}")));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ExtractError::Fetch(e.to_string()))?;

        let (title, text) = extract_page(&html);

        if text.trim().is_empty() {
            warn!("no readable content at {}", parsed);
            return Ok(vec![]);
        }

        let mut doc = Document::new(text).with_metadata("origin", url);
        if let Some(title) = title {
            doc = doc.with_metadata("title", title);
        }
        Ok(vec![doc])
    }
}

/// Reduce an HTML page to (title, readable text).
fn extract_page(html: &str) -> (Option<String>, String) {
    let document = Html::parse_document(html);

    let title = Selector::parse("title").ok().and_then(|sel| {
        document
            .select(&sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    });

    let block_sel = match Selector::parse(BLOCK_SELECTOR) {
        Ok(sel) => sel,
        Err(_) => return (title, String::new()),
    };

    for main in MAIN_SELECTORS {
        let Ok(main_sel) = Selector::parse(main) else {
            continue;
        };
        let Some(region) = document.select(&main_sel).next() else {
            continue;
        };

        let blocks: Vec<String> = region
            .select(&block_sel)
            .map(|el| {
                el.text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|block| !block.is_empty())
            .collect();

        if !blocks.is_empty() {
            return (title, blocks.join("\n\n"));
        }
    }

    (title, String::new())
}
