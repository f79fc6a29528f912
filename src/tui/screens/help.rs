//! Help overlay - keyboard shortcut reference

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::style::colors;

use super::super::widgets::centered_rect;

const BINDINGS: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "Next / previous screen"),
    ("d b i", "Jump to Dashboard / Breaking / Interface"),
    ("↑ ↓", "Move selection"),
    ("Enter", "Run action / confirm"),
    ("Space", "Toggle (selection, location, settings)"),
    ("Ctrl+Y", "Accept spelling suggestion"),
    ("Esc", "Close overlay / cancel edit"),
    ("?", "Toggle this help"),
    ("q / Ctrl+C", "Quit"),
];

/// Render the help overlay
pub(crate) fn render_help(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup);

    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(key, description)| {
            Line::from(vec![
                Span::styled(
                    format!("  {key:<18}"),
                    Style::default()
                        .fg(colors::UI_HIGHLIGHT)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*description),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Keyboard shortcuts "),
    );
    frame.render_widget(help, popup);
}
