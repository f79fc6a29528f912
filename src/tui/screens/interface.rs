//! Interface screen - theme flags, weather strip, clock settings

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::Input;

use crate::ipc::StatusInfo;
use crate::presentation::Theme;
use crate::style::colors;

/// Rows on the interface screen, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Row {
    Mourning,
    Tet,
    WeatherBar,
    ClockMode,
    ClockText,
    Durations,
}

pub(crate) const ROWS: &[Row] = &[
    Row::Mourning,
    Row::Tet,
    Row::WeatherBar,
    Row::ClockMode,
    Row::ClockText,
    Row::Durations,
];

/// Which value is being edited inline, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Editing {
    None,
    ClockText,
    ClockSecs,
    CustomSecs,
}

/// Interface settings screen state
pub(crate) struct InterfaceScreen {
    pub cursor: usize,
    pub editing: Editing,
    pub clock_text: Input,
    pub clock_secs: Input,
    pub custom_secs: Input,
}

impl InterfaceScreen {
    pub(crate) fn new() -> Self {
        Self {
            cursor: 0,
            editing: Editing::None,
            clock_text: Input::default(),
            clock_secs: Input::new("5".to_string()),
            custom_secs: Input::new("5".to_string()),
        }
    }

    pub(crate) const fn selected_row(&self) -> Row {
        ROWS[self.cursor]
    }

    pub(crate) fn select_next(&mut self) {
        if self.cursor + 1 < ROWS.len() {
            self.cursor += 1;
        }
    }

    pub(crate) fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Refresh the edit buffers from a daemon snapshot, unless the operator
    /// is mid-edit.
    pub(crate) fn sync_from_status(&mut self, status: &StatusInfo) {
        if self.editing != Editing::None {
            return;
        }
        if self.clock_text.value() != status.clock_text {
            self.clock_text = Input::new(status.clock_text.clone());
        }
        let secs = status.clock_secs.to_string();
        if self.clock_secs.value() != secs {
            self.clock_secs = Input::new(secs);
        }
        let custom = status.custom_text_secs.to_string();
        if self.custom_secs.value() != custom {
            self.custom_secs = Input::new(custom);
        }
    }

    pub(crate) fn editing_input_mut(&mut self) -> Option<&mut Input> {
        match self.editing {
            Editing::None => None,
            Editing::ClockText => Some(&mut self.clock_text),
            Editing::ClockSecs => Some(&mut self.clock_secs),
            Editing::CustomSecs => Some(&mut self.custom_secs),
        }
    }
}

/// Render the interface settings screen
pub(crate) fn render_interface(
    frame: &mut Frame,
    area: Rect,
    screen: &InterfaceScreen,
    status: Option<&StatusInfo>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Presentation (↑↓ chọn, Space/Enter đổi) ");
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let theme = status.map_or(Theme::Normal, |s| s.theme);
    let weather_visible = status.is_none_or(|s| s.weather_bar_visible);
    let clock_mode = status.map_or("clock", |s| s.clock_mode.name());

    for (i, row) in ROWS.iter().enumerate() {
        let selected = i == screen.cursor;
        let line = match row {
            Row::Mourning => value_row("Chế độ Quốc tang", on_off(theme == Theme::Mourning), selected),
            Row::Tet => value_row("Chế độ Tết", on_off(theme == Theme::Tet), selected),
            Row::WeatherBar => value_row("Thanh thời tiết", on_off(weather_visible), selected),
            Row::ClockMode => value_row("Đồng hồ", clock_mode.to_string(), selected),
            Row::ClockText => editable_row(
                "Chữ thay đồng hồ",
                &screen.clock_text,
                selected,
                screen.editing == Editing::ClockText,
            ),
            Row::Durations => durations_row(screen, selected),
        };
        frame.render_widget(Paragraph::new(line), rows[i]);
    }
}

fn on_off(on: bool) -> String {
    if on { "bật".to_string() } else { "tắt".to_string() }
}

fn marker(selected: bool) -> Span<'static> {
    Span::styled(
        if selected { "› " } else { "  " },
        Style::default().fg(colors::UI_SELECTED),
    )
}

fn value_row(label: &str, value: String, selected: bool) -> Line<'static> {
    let label_style = if selected {
        Style::default()
            .fg(colors::UI_SELECTED)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::UI_TEXT)
    };
    Line::from(vec![
        marker(selected),
        Span::styled(format!("{label:<20}"), label_style),
        Span::styled(value, Style::default().fg(colors::UI_STAT)),
    ])
}

fn editable_row(label: &str, input: &Input, selected: bool, editing: bool) -> Line<'static> {
    let mut line = value_row(label, input.value().to_string(), selected);
    if editing {
        line.spans.push(Span::styled(
            "▏ (Enter lưu, Esc hủy)",
            Style::default().fg(colors::UI_SECONDARY),
        ));
    }
    line
}

fn durations_row(screen: &InterfaceScreen, selected: bool) -> Line<'static> {
    let editing = matches!(screen.editing, Editing::ClockSecs | Editing::CustomSecs);
    let clock_style = if screen.editing == Editing::ClockSecs {
        Style::default()
            .fg(colors::UI_SELECTED)
            .add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(colors::UI_STAT)
    };
    let custom_style = if screen.editing == Editing::CustomSecs {
        Style::default()
            .fg(colors::UI_SELECTED)
            .add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(colors::UI_STAT)
    };

    let label_style = if selected {
        Style::default()
            .fg(colors::UI_SELECTED)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::UI_TEXT)
    };

    let mut spans = vec![
        marker(selected),
        Span::styled(format!("{:<20}", "Luân phiên (giây)"), label_style),
        Span::styled(format!("đồng hồ {}", screen.clock_secs.value()), clock_style),
        Span::raw("  /  "),
        Span::styled(format!("chữ {}", screen.custom_secs.value()), custom_style),
    ];
    if editing {
        spans.push(Span::styled(
            "  (Space đổi ô, Enter lưu)",
            Style::default().fg(colors::UI_SECONDARY),
        ));
    }
    Line::from(spans)
}
