//! Breaking news screen - AI drafting, manual entry, disaster warnings
//!
//! Mirrors the operator workflow: draft summaries with the AI collaborator
//! and confirm a selection, or type a breaking item / disaster warning by
//! hand. Pause/resume/clear live on the dashboard.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::time::Instant;
use tui_input::Input;

use crate::news::{DisplayLocation, DEFAULT_BREAKING_TAG};
use crate::sources::ai::{AiNewsItem, GeneratedNews, SourceRef};
use crate::style::colors;

use super::super::widgets::{button_line, input_line};

/// Debounce window for the spell-check advisory.
pub(crate) const SPELL_DEBOUNCE_MS: u64 = 700;

/// Whether the screen shows the entry forms or the candidate selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BreakingMode {
    Form,
    Select,
}

/// Focusable fields, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    AiTag,
    AiTopic,
    AiCount,
    AiHours,
    AiGenerate,
    ManualTag,
    ManualContent,
    ManualActivate,
    DisasterTag,
    DisasterContent,
    DisasterLocation,
    DisasterActivate,
}

const FIELDS: &[Field] = &[
    Field::AiTag,
    Field::AiTopic,
    Field::AiCount,
    Field::AiHours,
    Field::AiGenerate,
    Field::ManualTag,
    Field::ManualContent,
    Field::ManualActivate,
    Field::DisasterTag,
    Field::DisasterContent,
    Field::DisasterLocation,
    Field::DisasterActivate,
];

/// Breaking news screen state
pub(crate) struct BreakingScreen {
    pub mode: BreakingMode,
    pub focus: Field,

    // AI section
    pub ai_tag: Input,
    pub ai_topic: Input,
    pub ai_count: Input,
    pub ai_hours: Input,
    pub generating: bool,
    pub ai_error: Option<String>,
    pub spinner: throbber_widgets_tui::ThrobberState,

    // Spell-check advisory (debounced; superseded results are discarded)
    pub spell_suggestion: Option<String>,
    pub spell_deadline: Option<Instant>,
    pub spell_generation: u64,

    // Candidate selection
    pub candidates: Vec<AiNewsItem>,
    pub sources: Vec<SourceRef>,
    pub checked: Vec<bool>,
    pub select_cursor: usize,

    // Manual section
    pub manual_tag: Input,
    pub manual_content: Input,

    // Disaster section
    pub disaster_tag: Input,
    pub disaster_content: Input,
    pub disaster_location: DisplayLocation,
}

impl BreakingScreen {
    pub(crate) fn new() -> Self {
        Self {
            mode: BreakingMode::Form,
            focus: Field::AiTopic,
            ai_tag: Input::new(DEFAULT_BREAKING_TAG.to_string()),
            ai_topic: Input::default(),
            ai_count: Input::default(),
            ai_hours: Input::new("3".to_string()),
            generating: false,
            ai_error: None,
            spinner: throbber_widgets_tui::ThrobberState::default(),
            spell_suggestion: None,
            spell_deadline: None,
            spell_generation: 0,
            candidates: Vec::new(),
            sources: Vec::new(),
            checked: Vec::new(),
            select_cursor: 0,
            manual_tag: Input::new(DEFAULT_BREAKING_TAG.to_string()),
            manual_content: Input::default(),
            disaster_tag: Input::new("CẢNH BÁO THIÊN TAI".to_string()),
            disaster_content: Input::default(),
            disaster_location: DisplayLocation::Ticker,
        }
    }

    pub(crate) fn focus_next(&mut self) {
        let pos = FIELDS.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = FIELDS[(pos + 1) % FIELDS.len()];
    }

    pub(crate) fn focus_prev(&mut self) {
        let pos = FIELDS.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = FIELDS[(pos + FIELDS.len() - 1) % FIELDS.len()];
    }

    /// The text input under the cursor, if the focused field is editable.
    pub(crate) fn focused_input_mut(&mut self) -> Option<&mut Input> {
        match self.focus {
            Field::AiTag => Some(&mut self.ai_tag),
            Field::AiTopic => Some(&mut self.ai_topic),
            Field::AiCount => Some(&mut self.ai_count),
            Field::AiHours => Some(&mut self.ai_hours),
            Field::ManualTag => Some(&mut self.manual_tag),
            Field::ManualContent => Some(&mut self.manual_content),
            Field::DisasterTag => Some(&mut self.disaster_tag),
            Field::DisasterContent => Some(&mut self.disaster_content),
            _ => None,
        }
    }

    /// Re-arm the spell-check debounce after a topic edit.
    pub(crate) fn touch_spelling(&mut self, now: Instant) {
        self.spell_generation = self.spell_generation.wrapping_add(1);
        if self.ai_topic.value().trim().is_empty() {
            self.spell_suggestion = None;
            self.spell_deadline = None;
        } else {
            self.spell_deadline =
                Some(now + std::time::Duration::from_millis(SPELL_DEBOUNCE_MS));
        }
    }

    /// Replace the topic with the accepted suggestion.
    pub(crate) fn accept_suggestion(&mut self) {
        if let Some(suggestion) = self.spell_suggestion.take() {
            self.ai_topic = Input::new(suggestion);
            self.spell_generation = self.spell_generation.wrapping_add(1);
            self.spell_deadline = None;
        }
    }

    /// Record the outcome of an AI generation run.
    pub(crate) fn finish_generation(&mut self, result: Result<GeneratedNews, String>) {
        self.generating = false;
        match result {
            Ok(generated) => {
                self.checked = vec![true; generated.items.len()];
                self.candidates = generated.items;
                self.sources = generated.sources;
                self.select_cursor = 0;
                self.ai_error = None;
                self.mode = BreakingMode::Select;
            }
            Err(message) => {
                self.ai_error = Some(format!("Không thể tạo tin: {message}. Vui lòng thử lại."));
            }
        }
    }

    /// Leave the selection surface without activating anything.
    pub(crate) fn cancel_selection(&mut self) {
        self.mode = BreakingMode::Form;
        self.candidates.clear();
        self.sources.clear();
        self.checked.clear();
    }

    /// Summaries of the checked candidates, in list order.
    pub(crate) fn selected_summaries(&self) -> Vec<String> {
        self.candidates
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(item, _)| item.summary.clone())
            .collect()
    }
}

/// Render the breaking news screen
pub(crate) fn render_breaking(frame: &mut Frame, area: Rect, screen: &mut BreakingScreen) {
    match screen.mode {
        BreakingMode::Form => render_forms(frame, area, screen),
        BreakingMode::Select => render_selection(frame, area, screen),
    }
}

fn render_forms(frame: &mut Frame, area: Rect, screen: &mut BreakingScreen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // AI section
            Constraint::Length(5), // Manual section
            Constraint::Length(7), // Disaster section
            Constraint::Min(0),
        ])
        .split(area);

    render_ai_section(frame, chunks[0], screen);
    render_manual_section(frame, chunks[1], screen);
    render_disaster_section(frame, chunks[2], screen);
}

fn render_ai_section(frame: &mut Frame, area: Rect, screen: &mut BreakingScreen) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tạo tin bằng AI (Google Search) ");
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tag
            Constraint::Length(1), // topic
            Constraint::Length(1), // count + hours
            Constraint::Length(1), // suggestion
            Constraint::Length(1), // generate button
            Constraint::Length(1), // error
            Constraint::Min(0),
        ])
        .split(inner);

    input_line(frame, rows[0], "Nhãn tin", &screen.ai_tag, screen.focus == Field::AiTag);
    input_line(frame, rows[1], "Chủ đề", &screen.ai_topic, screen.focus == Field::AiTopic);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    input_line(
        frame,
        halves[0],
        "Số lượng",
        &screen.ai_count,
        screen.focus == Field::AiCount,
    );
    input_line(
        frame,
        halves[1],
        "Trong (giờ)",
        &screen.ai_hours,
        screen.focus == Field::AiHours,
    );

    if let Some(suggestion) = &screen.spell_suggestion {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Có phải ý bạn là: ", Style::default().fg(colors::UI_SECONDARY)),
                Span::styled(
                    suggestion.clone(),
                    Style::default()
                        .fg(colors::UI_HIGHLIGHT)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("  (Ctrl+Y để nhận)", Style::default().fg(colors::UI_SECONDARY)),
            ])),
            rows[3],
        );
    }

    if screen.generating {
        let throbber = throbber_widgets_tui::Throbber::default()
            .label("Đang tạo danh sách tin khẩn cấp...")
            .style(Style::default().fg(colors::UI_HIGHLIGHT));
        frame.render_stateful_widget(throbber, rows[4], &mut screen.spinner);
    } else {
        button_line(
            frame,
            rows[4],
            "Tạo danh sách tin khẩn cấp",
            screen.focus == Field::AiGenerate,
        );
    }

    if let Some(error) = &screen.ai_error {
        frame.render_widget(
            Paragraph::new(Span::styled(
                error.clone(),
                Style::default().fg(colors::UI_ERROR),
            )),
            rows[5],
        );
    }
}

fn render_manual_section(frame: &mut Frame, area: Rect, screen: &BreakingScreen) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tin khẩn cấp thủ công ");
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    input_line(frame, rows[0], "Nhãn tin", &screen.manual_tag, screen.focus == Field::ManualTag);
    input_line(
        frame,
        rows[1],
        "Nội dung",
        &screen.manual_content,
        screen.focus == Field::ManualContent,
    );
    button_line(
        frame,
        rows[2],
        "Kích hoạt tin khẩn cấp",
        screen.focus == Field::ManualActivate,
    );
}

fn render_disaster_section(frame: &mut Frame, area: Rect, screen: &BreakingScreen) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Cảnh báo thiên tai ");
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    input_line(frame, rows[0], "Nhãn tin", &screen.disaster_tag, screen.focus == Field::DisasterTag);
    input_line(
        frame,
        rows[1],
        "Nội dung",
        &screen.disaster_content,
        screen.focus == Field::DisasterContent,
    );

    let (ticker_style, weather_style) = match screen.disaster_location {
        DisplayLocation::Ticker => (
            Style::default()
                .fg(colors::UI_ERROR)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(colors::UI_SECONDARY),
        ),
        DisplayLocation::Weather => (
            Style::default().fg(colors::UI_SECONDARY),
            Style::default()
                .fg(colors::UI_ERROR)
                .add_modifier(Modifier::BOLD),
        ),
    };
    let location_focused = screen.focus == Field::DisasterLocation;
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{}Vị trí      ", if location_focused { "›" } else { " " }),
                Style::default().fg(if location_focused {
                    colors::UI_SELECTED
                } else {
                    colors::UI_SECONDARY
                }),
            ),
            Span::styled("Thanh chạy chữ", ticker_style),
            Span::raw("  /  "),
            Span::styled("Thanh thời tiết", weather_style),
            Span::styled("  (Space đổi)", Style::default().fg(colors::UI_SECONDARY)),
        ])),
        rows[2],
    );
    button_line(
        frame,
        rows[3],
        "Kích hoạt cảnh báo",
        screen.focus == Field::DisasterActivate,
    );
}

fn render_selection(frame: &mut Frame, area: Rect, screen: &BreakingScreen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(6)])
        .split(area);

    let items: Vec<ListItem> = screen
        .candidates
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if screen.checked.get(i).copied().unwrap_or(false) {
                "[x]"
            } else {
                "[ ]"
            };
            let style = if i == screen.select_cursor {
                Style::default()
                    .fg(colors::UI_SELECTED)
                    .bg(colors::UI_SELECTED_BG)
            } else {
                Style::default().fg(colors::UI_TEXT)
            };
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!("{marker} {}", item.headline),
                    style.add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(format!("    {}", item.summary), style)),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Chọn tin để phát (Space chọn, Enter phát, Esc hủy) "),
    );
    frame.render_widget(list, chunks[0]);

    let source_lines: Vec<Line> = screen
        .sources
        .iter()
        .map(|source| {
            Line::from(vec![
                Span::raw(format!("{}  ", source.title)),
                Span::styled(source.uri.clone(), Style::default().fg(colors::UI_SECONDARY)),
            ])
        })
        .collect();
    let sources = Paragraph::new(source_lines)
        .block(Block::default().borders(Borders::ALL).title(" Nguồn "));
    frame.render_widget(sources, chunks[1]);
}
