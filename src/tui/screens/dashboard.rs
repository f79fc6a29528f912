//! Dashboard screen - Overview, frame preview, and quick actions

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::frame::{OverlayFrame, WeatherSlot};
use crate::ipc::{Request, StatusInfo};
use crate::style::colors;

/// Quick actions offered on the dashboard, in display order.
const ACTIONS: &[(&str, &str)] = &[
    ("Pause special", "keep it for resume"),
    ("Resume special", "back to the saved broadcast"),
    ("Back to feed", "reset theme, close panel"),
    ("Clear special", "wipe breaking/disaster data"),
    ("Refresh feed", "refetch headlines now"),
];

/// Dashboard screen state
pub(crate) struct DashboardScreen {
    pub selected_action: usize,
}

impl DashboardScreen {
    pub(crate) const fn new() -> Self {
        Self { selected_action: 0 }
    }

    pub(crate) fn select_next(&mut self) {
        if self.selected_action + 1 < ACTIONS.len() {
            self.selected_action += 1;
        }
    }

    pub(crate) fn select_previous(&mut self) {
        self.selected_action = self.selected_action.saturating_sub(1);
    }

    /// Operator action for the selected entry.
    pub(crate) fn selected_request(&self) -> Request {
        match self.selected_action {
            0 => Request::Pause,
            1 => Request::Resume,
            2 => Request::SelectRss,
            3 => Request::ClearSpecial,
            _ => Request::RefreshFeed,
        }
    }
}

/// Render the dashboard screen
pub(crate) fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    screen: &DashboardScreen,
    daemon_running: bool,
    status: Option<&StatusInfo>,
    overlay: Option<&OverlayFrame>,
    logs: &[String],
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),  // Status + quick actions
            Constraint::Length(8),  // Frame preview
            Constraint::Min(0),     // Daemon logs
        ])
        .split(area);

    render_status_section(frame, chunks[0], screen, daemon_running, status);
    render_preview(frame, chunks[1], overlay);
    render_log_viewer(frame, chunks[2], logs, daemon_running);
}

fn render_status_section(
    frame: &mut Frame,
    area: Rect,
    screen: &DashboardScreen,
    daemon_running: bool,
    status: Option<&StatusInfo>,
) {
    let block = Block::default().borders(Borders::ALL).title(" Broadcast ");
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    // Left: daemon + mode summary
    let mut lines = Vec::new();
    let (state_text, state_color) = if daemon_running {
        ("RUNNING", colors::UI_SUCCESS)
    } else {
        ("UNREACHABLE", colors::UI_ERROR)
    };
    lines.push(Line::from(vec![
        Span::styled("Daemon  ", Style::default().fg(colors::UI_SECONDARY)),
        Span::styled(
            state_text,
            Style::default().fg(state_color).add_modifier(Modifier::BOLD),
        ),
    ]));

    if let Some(status) = status {
        let mode_color = match status.mode.name() {
            "rss" => colors::UI_SUCCESS,
            "custom" => colors::UI_HIGHLIGHT,
            _ => colors::UI_BREAKING,
        };
        lines.push(Line::from(vec![
            Span::styled("Mode    ", Style::default().fg(colors::UI_SECONDARY)),
            Span::styled(
                status.mode.name().to_uppercase(),
                Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
            ),
        ]));
        let resumable = status
            .last_special
            .map_or("none".to_string(), |s| format!("{s:?}").to_lowercase());
        lines.push(Line::from(vec![
            Span::styled("Resume  ", Style::default().fg(colors::UI_SECONDARY)),
            Span::styled(resumable, Style::default().fg(colors::UI_WARNING)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Feed    ", Style::default().fg(colors::UI_SECONDARY)),
            match &status.feed_error {
                Some(err) => Span::styled(err.clone(), Style::default().fg(colors::UI_ERROR)),
                None => Span::styled(
                    format!("{} titles", status.feed_title_count),
                    Style::default().fg(colors::UI_STAT),
                ),
            },
        ]));
        lines.push(Line::from(vec![
            Span::styled("Uptime  ", Style::default().fg(colors::UI_SECONDARY)),
            Span::raw(format_uptime(status.uptime_secs)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    // Right: quick actions
    let items: Vec<ListItem> = ACTIONS
        .iter()
        .enumerate()
        .map(|(i, (name, hint))| {
            let style = if i == screen.selected_action {
                Style::default()
                    .fg(colors::UI_SELECTED)
                    .bg(colors::UI_SELECTED_BG)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors::UI_TEXT)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {name:<16}"), style),
                Span::styled(format!("{hint} "), Style::default().fg(colors::UI_SECONDARY)),
            ]))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::LEFT)
            .title(" Actions (↑↓ + Enter) "),
    );
    frame.render_widget(list, chunks[1]);
}

fn render_preview(frame: &mut Frame, area: Rect, overlay: Option<&OverlayFrame>) {
    let block = Block::default().borders(Borders::ALL).title(" On air ");
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let Some(overlay) = overlay else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No frame - daemon unreachable",
                Style::default().fg(colors::UI_SECONDARY),
            )),
            inner,
        );
        return;
    };

    let mut lines = Vec::new();

    let mut ticker_spans = vec![Span::styled(
        "Ticker  ",
        Style::default().fg(colors::UI_SECONDARY),
    )];
    if let Some(tag) = &overlay.ticker.tag {
        ticker_spans.push(Span::styled(
            format!("[{tag}] "),
            Style::default()
                .fg(colors::UI_BREAKING)
                .add_modifier(Modifier::BOLD),
        ));
    }
    ticker_spans.push(Span::raw(overlay.ticker.text.clone()));
    lines.push(Line::from(ticker_spans));

    let weather_line = match &overlay.weather {
        WeatherSlot::Hidden => Line::from(Span::styled(
            "Weather (hidden)",
            Style::default().fg(colors::UI_SECONDARY),
        )),
        WeatherSlot::Loading => Line::from(vec![
            Span::styled("Weather ", Style::default().fg(colors::UI_SECONDARY)),
            Span::styled(
                "Đang cập nhật dữ liệu...",
                Style::default().fg(colors::UI_SECONDARY),
            ),
        ]),
        WeatherSlot::Report(report) => Line::from(vec![
            Span::styled("Weather ", Style::default().fg(colors::UI_SECONDARY)),
            Span::styled(
                report.city.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  {}  {}°/{}°C  độ ẩm {}%  mưa {}%",
                report.summary,
                report.temp_min,
                report.temp_max,
                report.humidity,
                report.rain_chance
            )),
        ]),
        WeatherSlot::Disaster { tag, content } => Line::from(vec![
            Span::styled("Weather ", Style::default().fg(colors::UI_SECONDARY)),
            Span::styled(
                format!("[{tag}] "),
                Style::default()
                    .fg(colors::UI_ERROR)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(content.clone()),
        ]),
    };
    lines.push(weather_line);

    let mut clock_spans = vec![
        Span::styled("Clock   ", Style::default().fg(colors::UI_SECONDARY)),
        Span::raw(overlay.clock.time.clone()),
        Span::styled(
            format!("  ({:?} view)", overlay.clock.view),
            Style::default().fg(colors::UI_SECONDARY),
        ),
    ];
    if !overlay.clock.custom_text.is_empty() {
        clock_spans.push(Span::styled(
            format!("  \"{}\"", overlay.clock.custom_text),
            Style::default().fg(colors::UI_HIGHLIGHT),
        ));
    }
    lines.push(Line::from(clock_spans));

    lines.push(Line::from(Span::styled(
        format!("Theme   {:?}", overlay.theme),
        Style::default().fg(colors::UI_SECONDARY),
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_log_viewer(frame: &mut Frame, area: Rect, logs: &[String], daemon_running: bool) {
    let border_color = if daemon_running {
        colors::UI_BORDER_ACTIVE
    } else {
        colors::UI_BORDER_INACTIVE
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Daemon log ");
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let visible = inner.height as usize;
    let start = logs.len().saturating_sub(visible);
    let lines: Vec<Line> = logs[start..]
        .iter()
        .map(|line| Line::from(line.clone()))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn format_uptime(secs: u64) -> String {
    if secs >= 3600 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
