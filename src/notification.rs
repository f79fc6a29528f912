//! Desktop notifications
//!
//! Alerts the operator's desktop when the daemon starts or stops and when
//! a special broadcast goes live or is cleared.

use color_eyre::eyre::{Context, Result};
use notify_rust::Notification;

use crate::news::{DisplayLocation, SpecialMode};

/// Send a desktop notification
///
/// # Errors
/// Returns an error if the notification cannot be sent (e.g., no
/// notification daemon running).
pub fn send_notification(summary: &str, body: &str, icon: Option<&str>) -> Result<()> {
    let icon = icon.unwrap_or("video-display");

    Notification::new()
        .summary(summary)
        .body(body)
        .appname("tickerd")
        .icon(icon)
        .timeout(3000)
        .show()
        .context("Failed to show notification")?;

    Ok(())
}

/// Icon for a special-mode activation.
#[must_use]
pub const fn special_icon(special: SpecialMode) -> &'static str {
    match special {
        SpecialMode::Breaking => "dialog-information",
        SpecialMode::Disaster => "dialog-warning",
    }
}

/// Notification body for a disaster activation, naming its surface.
#[must_use]
pub fn disaster_body(tag: &str, location: DisplayLocation) -> String {
    let surface = match location {
        DisplayLocation::Ticker => "thanh chạy chữ",
        DisplayLocation::Weather => "thanh thời tiết",
    };
    format!("{tag} ({surface})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_icons() {
        assert_eq!(special_icon(SpecialMode::Breaking), "dialog-information");
        assert_eq!(special_icon(SpecialMode::Disaster), "dialog-warning");
    }

    #[test]
    fn test_disaster_body_names_surface() {
        assert_eq!(
            disaster_body("CẢNH BÁO", DisplayLocation::Ticker),
            "CẢNH BÁO (thanh chạy chữ)"
        );
        assert_eq!(
            disaster_body("CẢNH BÁO", DisplayLocation::Weather),
            "CẢNH BÁO (thanh thời tiết)"
        );
    }
}
