//! Shared TUI widget helpers

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::Input;

use crate::style::colors;

/// One-row labeled text field. The focused field shows a cursor mark and a
/// highlighted label.
pub(crate) fn input_line(frame: &mut Frame, area: Rect, label: &str, input: &Input, focused: bool) {
    let label_style = if focused {
        Style::default()
            .fg(colors::UI_SELECTED)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::UI_SECONDARY)
    };
    let mut spans = vec![
        Span::styled(if focused { "› " } else { "  " }, Style::default().fg(colors::UI_SELECTED)),
        Span::styled(format!("{label:<12}"), label_style),
        Span::raw(input.value().to_string()),
    ];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(colors::UI_SELECTED)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// One-row action button.
pub(crate) fn button_line(frame: &mut Frame, area: Rect, label: &str, focused: bool) {
    let style = if focused {
        Style::default()
            .fg(colors::UI_SELECTED)
            .bg(colors::UI_SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::UI_HIGHLIGHT)
    };
    let line = Line::from(vec![
        Span::raw(if focused { "› " } else { "  " }),
        Span::styled(format!("[ {label} ]"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Centered overlay rectangle, sized as a percentage of `r`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
