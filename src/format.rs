//! Ticker string formatting
//!
//! Turns an ordered list of headline strings (plus an optional feed error)
//! into the single string the scroller renders.

/// Non-breaking space used for the visual gap around the separator bullet.
const NBSP: char = '\u{00A0}';

/// Number of non-breaking spaces on each side of the separator bullet.
const SEPARATOR_PAD: usize = 12;

/// Shown while the feed has not delivered anything yet.
pub const LOADING_PLACEHOLDER: &str = "Đang tải tin tức...";

/// Build the decorative separator: wide gap, bullet, wide gap.
#[must_use]
pub fn separator() -> String {
    let mut sep = String::with_capacity(SEPARATOR_PAD * 2 * NBSP.len_utf8() + '•'.len_utf8());
    for _ in 0..SEPARATOR_PAD {
        sep.push(NBSP);
    }
    sep.push('•');
    for _ in 0..SEPARATOR_PAD {
        sep.push(NBSP);
    }
    sep
}

/// Format headline items into the scroller string.
///
/// An error takes priority over content and is returned verbatim. An empty
/// item list yields the loading placeholder. Otherwise each item is trimmed,
/// one trailing period is stripped, and items are joined with the decorative
/// separator in input order.
#[must_use]
pub fn format_ticker(items: &[String], error: Option<&str>) -> String {
    if let Some(err) = error {
        if !err.is_empty() {
            return err.to_string();
        }
    }
    if items.is_empty() {
        return LOADING_PLACEHOLDER.to_string();
    }

    let sep = separator();
    items
        .iter()
        .map(|item| {
            let trimmed = item.trim();
            trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
        })
        .collect::<Vec<_>>()
        .join(&sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_takes_priority_over_items() {
        let items = vec!["Tin A".to_string()];
        assert_eq!(
            format_ticker(&items, Some("Không thể tải tin")),
            "Không thể tải tin"
        );
    }

    #[test]
    fn test_empty_error_is_ignored() {
        let items = vec!["Tin A".to_string()];
        assert_eq!(format_ticker(&items, Some("")), "Tin A");
    }

    #[test]
    fn test_empty_items_yield_placeholder() {
        assert_eq!(format_ticker(&[], None), LOADING_PLACEHOLDER);
    }

    #[test]
    fn test_single_item_trimmed_and_period_stripped() {
        let items = vec!["  Tiêu đề A.  ".to_string()];
        assert_eq!(format_ticker(&items, None), "Tiêu đề A");
    }

    #[test]
    fn test_only_one_trailing_period_stripped() {
        let items = vec!["Chấm lửng...".to_string()];
        assert_eq!(format_ticker(&items, None), "Chấm lửng..");
    }

    #[test]
    fn test_join_preserves_order_with_separator() {
        let items = vec!["Tiêu đề A.".to_string(), "Tiêu đề B".to_string()];
        let expected = format!("Tiêu đề A{}Tiêu đề B", separator());
        assert_eq!(format_ticker(&items, None), expected);
    }

    #[test]
    fn test_separator_shape() {
        let sep = separator();
        assert_eq!(sep.chars().count(), 25);
        assert_eq!(sep.chars().nth(12), Some('•'));
        assert!(sep.chars().take(12).all(|c| c == '\u{00A0}'));
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let items = vec!["A".to_string(), "B".to_string()];
        assert_eq!(format_ticker(&items, None), format_ticker(&items, None));
    }
}
