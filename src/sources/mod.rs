//! External content collaborators
//!
//! Thin fetch-only seams for the live news feed, the weather service, and
//! the AI text generator. None of these hold state machine logic; each
//! delivers one result (or one error string) back to the caller.

pub mod ai;
pub mod feed;
pub mod weather;

use std::sync::LazyLock;
use std::time::Duration;

/// Shared HTTP client with connection pooling for all collaborators.
pub(crate) static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("tickerd/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
});

/// Extract the text between `open` and `close`, if both markers occur in
/// order.
pub(crate) fn extract_between(haystack: &str, open: &str, close: &str) -> Option<String> {
    let start = haystack.find(open)? + open.len();
    let end = haystack[start..].find(close)? + start;
    Some(haystack[start..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_between_basic() {
        assert_eq!(
            extract_between("<title>Tin A</title>", "<title>", "</title>"),
            Some("Tin A".to_string())
        );
    }

    #[test]
    fn test_extract_between_missing_marker() {
        assert_eq!(extract_between("<title>Tin A", "<title>", "</title>"), None);
        assert_eq!(extract_between("no markers", "<title>", "</title>"), None);
    }
}
