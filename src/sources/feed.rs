//! Live news feed fetching
//!
//! Downloads the configured RSS feed and extracts item titles by scanning
//! `<item>` blocks. The daemon keeps the latest snapshot and refreshes it
//! on a timer or on operator request.

use color_eyre::eyre::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use super::{extract_between, HTTP_CLIENT};

/// Latest state of the live feed, as consumed by the ticker.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedSnapshot {
    /// Ordered headline titles from the most recent successful fetch.
    pub titles: Vec<String>,
    /// Error message from the most recent failed fetch.
    pub error: Option<String>,
    /// Whether a fetch is currently in flight.
    pub is_fetching: bool,
}

impl FeedSnapshot {
    /// Record a successful fetch.
    pub fn apply_titles(&mut self, titles: Vec<String>) {
        self.titles = titles;
        self.error = None;
        self.is_fetching = false;
    }

    /// Record a failed fetch. Previously fetched titles are kept so the
    /// ticker only shows the error while it has nothing better.
    pub fn apply_error(&mut self, message: String) {
        if self.titles.is_empty() {
            self.error = Some(message);
        } else {
            warn!("Feed refresh failed, keeping previous titles: {}", message);
        }
        self.is_fetching = false;
    }

    /// Error string for the formatter: only surfaced when no titles exist.
    #[must_use]
    pub fn display_error(&self) -> Option<&str> {
        if self.titles.is_empty() {
            self.error.as_deref()
        } else {
            None
        }
    }
}

/// Strip a CDATA wrapper and decode the handful of entities RSS titles use.
fn clean_title(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .unwrap_or(trimmed);
    inner
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .trim()
        .to_string()
}

/// Parse item titles out of an RSS document, in document order.
#[must_use]
pub fn parse_titles(body: &str, limit: usize) -> Vec<String> {
    let mut titles = Vec::new();
    let mut pos = 0;
    while titles.len() < limit {
        let Some(start) = body[pos..].find("<item>") else {
            break;
        };
        let s = pos + start;
        let end = body[s..].find("</item>").map_or(body.len(), |e| s + e + 7);
        let chunk = &body[s..end];
        if let Some(title) = extract_between(chunk, "<title>", "</title>") {
            let cleaned = clean_title(&title);
            if !cleaned.is_empty() {
                titles.push(cleaned);
            }
        }
        pos = end;
    }
    titles
}

/// Fetch the feed and return up to `limit` item titles.
///
/// # Errors
/// Returns an error when the request fails, the server answers with a
/// non-success status, or the document contains no items.
pub async fn fetch_titles(url: &str, limit: usize) -> Result<Vec<String>> {
    let response = HTTP_CLIENT
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch feed: {url}"))?;
    if !response.status().is_success() {
        bail!("Feed server answered {} for {url}", response.status());
    }
    let body = response.text().await.context("Failed to read feed body")?;

    let titles = parse_titles(&body, limit);
    if titles.is_empty() {
        bail!("Feed at {url} contained no items");
    }
    info!(count = titles.len(), "Fetched feed titles");
    Ok(titles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
<title>Tin mới nhất</title>
<item>
<title><![CDATA[Tiêu đề A.]]></title>
<link>https://example.vn/a</link>
</item>
<item>
<title>Tiêu đề B &amp; C</title>
<link>https://example.vn/b</link>
</item>
<item>
<title>  </title>
</item>
<item>
<title>Tiêu đề D</title>
</item>
</channel>
</rss>"#;

    #[test]
    fn test_parse_titles_skips_channel_title() {
        let titles = parse_titles(SAMPLE, 10);
        assert_eq!(
            titles,
            vec![
                "Tiêu đề A.".to_string(),
                "Tiêu đề B & C".to_string(),
                "Tiêu đề D".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_titles_respects_limit() {
        let titles = parse_titles(SAMPLE, 1);
        assert_eq!(titles, vec!["Tiêu đề A.".to_string()]);
    }

    #[test]
    fn test_parse_titles_empty_document() {
        assert!(parse_titles("<rss></rss>", 10).is_empty());
    }

    #[test]
    fn test_snapshot_keeps_titles_on_refresh_error() {
        let mut snapshot = FeedSnapshot::default();
        snapshot.apply_titles(vec!["Tin A".to_string()]);
        snapshot.apply_error("mạng lỗi".to_string());
        assert_eq!(snapshot.titles, vec!["Tin A".to_string()]);
        assert_eq!(snapshot.display_error(), None);
    }

    #[test]
    fn test_snapshot_surfaces_error_without_titles() {
        let mut snapshot = FeedSnapshot::default();
        snapshot.apply_error("mạng lỗi".to_string());
        assert_eq!(snapshot.display_error(), Some("mạng lỗi"));
    }
}
