//! CLI commands
//!
//! Implements the local commands (validate) and the IPC-based operator
//! commands that talk to the daemon (status, frame, mode switching,
//! breaking news, disaster warnings, presentation settings).

use color_eyre::eyre::{bail, Context, Result};
use crossterm::style::Stylize;
use std::io::{BufRead, Write};

use crate::cli::{
    BreakingAction, ClockAction, ClockModeArg, CustomAction, LocationArg, PanelState, ThemeArg,
    Toggle,
};
use crate::config::Config;
use crate::frame::WeatherSlot;
use crate::ipc::{self, Request, Response};
use crate::news::DisplayLocation;
use crate::presentation::{ClockDisplayMode, Theme};
use crate::sources::ai;
use crate::style::TickerStyle;

// ============================================================================
// Local Commands (no daemon needed)
// ============================================================================

/// Validate the config file and print a summary
///
/// # Errors
/// Returns an error if the config is missing or invalid.
pub fn validate() -> Result<()> {
    let config = Config::load()?;
    config.print_summary();
    Ok(())
}

// ============================================================================
// IPC Commands
// ============================================================================

/// Send one request and print the generic outcome.
///
/// # Errors
/// Returns an error if the daemon is unreachable.
pub async fn simple(request: Request) -> Result<()> {
    match ipc::send_request(request).await? {
        Response::Ok { message } => println!("{} {}", "✓".success(), message),
        Response::Rejected { message } => println!("{} {}", "→".warning(), message),
        Response::Error { message } => println!("{} {}", "✗".error(), message),
        other => println!("Unexpected response: {other:?}"),
    }
    Ok(())
}

/// Query and print daemon status
///
/// # Errors
/// Returns an error if the daemon is unreachable.
pub async fn status(json_output: bool) -> Result<()> {
    let response = ipc::send_request(Request::Status).await?;
    let Response::Status(info) = response else {
        bail!("Unexpected response to status request");
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Daemon".header());
    println!("  version: {}", info.version.as_str().technical());
    println!("  uptime: {}s", info.uptime_secs);

    println!("\n{}", "Broadcast".header());
    let mode = match info.mode.name() {
        "rss" => "rss".success().to_string(),
        "custom" => "custom".technical().to_string(),
        other => other.error().bold().to_string(),
    };
    println!("  mode: {mode}");
    match info.last_special {
        Some(special) => {
            let name = match special {
                crate::news::SpecialMode::Breaking => "breaking",
                crate::news::SpecialMode::Disaster => "disaster",
            };
            println!("  resumable: {}", name.warning());
        }
        None => println!("  resumable: {}", "none".dim()),
    }
    println!(
        "  breaking items: {}, disaster: {}",
        info.breaking_item_count,
        if info.disaster_active {
            "set".warning().to_string()
        } else {
            "absent".dim().to_string()
        }
    );
    match &info.feed_error {
        Some(err) => println!("  feed: {} ({err})", "error".error()),
        None => println!("  feed: {} titles", info.feed_title_count),
    }

    println!("\n{}", "Presentation".header());
    let theme = match info.theme {
        Theme::Normal => "normal".to_string(),
        Theme::Mourning => "mourning".dim().to_string(),
        Theme::Tet => "tet".warning().to_string(),
    };
    println!("  theme: {theme}");
    println!(
        "  weather bar: {}",
        if info.weather_bar_visible {
            "visible".success().to_string()
        } else {
            "hidden".dim().to_string()
        }
    );
    println!("  clock mode: {}", info.clock_mode.name().technical());
    println!("  panel: {}", if info.panel_open { "open" } else { "closed" });

    Ok(())
}

/// Print the current overlay frame
///
/// # Errors
/// Returns an error if the daemon is unreachable.
pub async fn frame(json_output: bool) -> Result<()> {
    let response = ipc::send_request(Request::Frame).await?;
    let Response::Frame { frame } = response else {
        bail!("Unexpected response to frame request");
    };

    if json_output {
        println!("{}", serde_json::to_string(&frame)?);
        return Ok(());
    }

    println!("{}", "Ticker".header());
    if let Some(tag) = &frame.ticker.tag {
        println!("  [{}]", tag.as_str().error().bold());
    }
    println!("  {}", frame.ticker.text);

    println!("\n{}", "Weather strip".header());
    match &frame.weather {
        WeatherSlot::Hidden => println!("  {}", "(hidden)".dim()),
        WeatherSlot::Loading => println!("  {}", "Đang cập nhật dữ liệu...".dim()),
        WeatherSlot::Report(report) => println!(
            "  {} — {} {}°/{}°C, độ ẩm {}%, mưa {}%",
            report.city.as_str().bold(),
            report.summary,
            report.temp_min,
            report.temp_max,
            report.humidity,
            report.rain_chance
        ),
        WeatherSlot::Disaster { tag, content } => {
            println!("  [{}] {}", tag.as_str().error().bold(), content);
        }
    }

    println!("\n{}", "Clock".header());
    println!(
        "  {} ({:?} view, token {})",
        frame.clock.time,
        frame.clock.view,
        frame.clock.token
    );
    if !frame.clock.custom_text.is_empty() {
        println!("  text: {}", frame.clock.custom_text.as_str().bold());
    }

    Ok(())
}

/// Dispatch a session custom-list subcommand
///
/// # Errors
/// Returns an error if the daemon is unreachable.
pub async fn custom(action: CustomAction) -> Result<()> {
    match action {
        CustomAction::Add { text } => simple(Request::CustomAdd { text }).await,
        CustomAction::Remove { index } => {
            if index == 0 {
                bail!("Line numbers start at 1");
            }
            simple(Request::CustomRemove { index: index - 1 }).await
        }
        CustomAction::Clear => simple(Request::CustomClear).await,
        CustomAction::Use => simple(Request::SelectCustom).await,
        CustomAction::List => {
            match ipc::send_request(Request::CustomList).await? {
                Response::CustomList { items } => {
                    if items.is_empty() {
                        println!("{}", "(empty session list)".dim());
                    } else {
                        for (i, item) in items.iter().enumerate() {
                            println!("  {}. {}", (i + 1).to_string().dim(), item);
                        }
                    }
                }
                other => println!("Unexpected response: {other:?}"),
            }
            Ok(())
        }
    }
}

/// Dispatch a breaking-news subcommand
///
/// # Errors
/// Returns an error if the daemon or the AI collaborator is unreachable.
pub async fn breaking(config: &Config, action: BreakingAction) -> Result<()> {
    match action {
        BreakingAction::Set { tag, content } => {
            simple(Request::BreakingText { tag, content }).await
        }
        BreakingAction::Generate {
            topic,
            tag,
            count,
            hours,
            pick,
            all,
        } => generate(config, &topic, tag, count, hours, pick, all).await,
    }
}

/// AI-assisted flow: draft, show candidates and sources, confirm, activate.
async fn generate(
    config: &Config,
    topic: &str,
    tag: String,
    count: Option<u32>,
    hours: u32,
    pick: Option<String>,
    all: bool,
) -> Result<()> {
    if topic.trim().is_empty() || tag.trim().is_empty() {
        bail!("Topic and tag must not be blank");
    }

    println!("{} \"{}\"...", "Generating breaking news for".dim(), topic);
    let generated = match ai::generate_breaking_news(&config.ai, topic, count, hours).await {
        Ok(generated) => generated,
        Err(e) => {
            // Collaborator failure: surfaced, nothing activated
            println!("{} Không thể tạo tin: {e:#}. Vui lòng thử lại.", "✗".error());
            return Ok(());
        }
    };

    println!("\n{}", "Candidates".header());
    for (i, item) in generated.items.iter().enumerate() {
        println!("  {}. {}", (i + 1).to_string().dim(), item.headline.as_str().bold());
        println!("     {}", item.summary);
    }
    if !generated.sources.is_empty() {
        println!("\n{}", "Sources".header());
        for source in &generated.sources {
            println!("  {} ({})", source.title, source.uri.as_str().dim());
        }
    }

    let selected = if all {
        generated.items.clone()
    } else {
        let picks = match pick {
            Some(expr) => parse_picks(&expr, generated.items.len())?,
            None => prompt_picks(generated.items.len())?,
        };
        picks
            .into_iter()
            .map(|i| generated.items[i].clone())
            .collect()
    };

    if selected.is_empty() {
        println!("{}", "Nothing selected, overlay unchanged".dim());
        return Ok(());
    }

    let items = selected.into_iter().map(|item| item.summary).collect();
    simple(Request::BreakingItems { tag, items }).await
}

/// Parse a "1,3,5" selection against a candidate count, to 0-based indices.
fn parse_picks(expr: &str, len: usize) -> Result<Vec<usize>> {
    let mut picks = Vec::new();
    for part in expr.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let number: usize = part
            .parse()
            .with_context(|| format!("Invalid item number: '{part}'"))?;
        if number == 0 || number > len {
            bail!("Item number {number} out of range (1..={len})");
        }
        let index = number - 1;
        if !picks.contains(&index) {
            picks.push(index);
        }
    }
    Ok(picks)
}

/// Ask on stdin which candidates to activate. Empty input selects all.
fn prompt_picks(len: usize) -> Result<Vec<usize>> {
    print!("Chọn tin (vd: 1,3,5; Enter = tất cả): ");
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read selection")?;
    let line = line.trim();
    if line.is_empty() {
        Ok((0..len).collect())
    } else {
        parse_picks(line, len)
    }
}

/// Activate a disaster warning
///
/// # Errors
/// Returns an error if the daemon is unreachable.
pub async fn disaster(tag: String, content: String, location: LocationArg) -> Result<()> {
    let location = match location {
        LocationArg::Ticker => DisplayLocation::Ticker,
        LocationArg::Weather => DisplayLocation::Weather,
    };
    simple(Request::Disaster {
        tag,
        content,
        location,
    })
    .await
}

/// Apply a theme choice
///
/// # Errors
/// Returns an error if the daemon is unreachable.
pub async fn theme(theme: ThemeArg) -> Result<()> {
    match theme {
        ThemeArg::Mourning => simple(Request::SetMourning { active: true }).await,
        ThemeArg::Tet => simple(Request::SetTet { active: true }).await,
        ThemeArg::Normal => {
            // Clearing both flags; each unset is idempotent
            ipc::send_request(Request::SetMourning { active: false }).await?;
            simple(Request::SetTet { active: false }).await
        }
    }
}

/// Show or hide the weather strip
///
/// # Errors
/// Returns an error if the daemon is unreachable.
pub async fn weather_bar(state: Toggle) -> Result<()> {
    simple(Request::SetWeatherBar {
        visible: state.is_on(),
    })
    .await
}

/// Dispatch a clock subcommand
///
/// # Errors
/// Returns an error if the daemon is unreachable.
pub async fn clock(action: ClockAction) -> Result<()> {
    match action {
        ClockAction::Mode { mode } => {
            let mode = match mode {
                ClockModeArg::Clock => ClockDisplayMode::Clock,
                ClockModeArg::Custom => ClockDisplayMode::Custom,
                ClockModeArg::Alternate => ClockDisplayMode::Alternate,
            };
            simple(Request::SetClockMode { mode }).await
        }
        ClockAction::Text { text } => simple(Request::SetClockText { text }).await,
        ClockAction::Durations {
            clock_secs,
            custom_secs,
        } => {
            simple(Request::SetClockDurations {
                clock_secs,
                custom_secs,
            })
            .await
        }
    }
}

/// Open or close the settings panel
///
/// # Errors
/// Returns an error if the daemon is unreachable.
pub async fn panel(state: PanelState) -> Result<()> {
    match state {
        PanelState::Open => simple(Request::PanelOpen).await,
        PanelState::Close => simple(Request::PanelClose).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_picks_basic() {
        assert_eq!(parse_picks("1,3", 5).expect("parse"), vec![0, 2]);
    }

    #[test]
    fn test_parse_picks_dedups_and_trims() {
        assert_eq!(parse_picks(" 2 , 2 ,1", 3).expect("parse"), vec![1, 0]);
    }

    #[test]
    fn test_parse_picks_rejects_out_of_range() {
        assert!(parse_picks("0", 3).is_err());
        assert!(parse_picks("4", 3).is_err());
    }

    #[test]
    fn test_parse_picks_rejects_garbage() {
        assert!(parse_picks("one", 3).is_err());
    }

    #[test]
    fn test_parse_picks_ignores_empty_parts() {
        assert_eq!(parse_picks("1,,2,", 3).expect("parse"), vec![0, 1]);
    }
}
