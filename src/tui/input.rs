//! Input handling for keyboard events

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tui_input::backend::crossterm::EventHandler;

use crate::ipc::Request;
use crate::news::DisplayLocation;
use crate::presentation::{ClockDisplayMode, Theme};

use super::app::{App, GenerateParams, Screen};
use super::screens::breaking::Field;
use super::screens::interface::{Editing, Row};
use super::screens::BreakingMode;

/// Handle one keyboard event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    app.dirty = true;

    // Ctrl+C always quits immediately
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    match app.current_screen {
        Screen::Dashboard => handle_dashboard_key(app, key),
        Screen::Breaking => handle_breaking_key(app, key),
        Screen::Interface => handle_interface_key(app, key),
    }
}

/// Navigation shared by screens without a focused text field.
/// Returns `true` when the key was consumed.
fn handle_nav_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Tab => app.next_screen(),
        KeyCode::BackTab => app.prev_screen(),
        KeyCode::Char('d') => app.goto_screen(Screen::Dashboard),
        KeyCode::Char('b') => app.goto_screen(Screen::Breaking),
        KeyCode::Char('i') => app.goto_screen(Screen::Interface),
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.clear_status(),
        _ => return false,
    }
    true
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    if handle_nav_key(app, key) {
        return;
    }
    match key.code {
        KeyCode::Up => app.dashboard.select_previous(),
        KeyCode::Down => app.dashboard.select_next(),
        KeyCode::Enter => {
            let request = app.dashboard.selected_request();
            app.push_request(request);
        }
        _ => {}
    }
}

fn handle_breaking_key(app: &mut App, key: KeyEvent) {
    if app.breaking.mode == BreakingMode::Select {
        handle_selection_key(app, key);
        return;
    }

    // Screen switching keeps working from the form; field cycling is ↑↓
    match key.code {
        KeyCode::Tab => {
            app.next_screen();
            return;
        }
        KeyCode::BackTab => {
            app.prev_screen();
            return;
        }
        KeyCode::Up => {
            app.breaking.focus_prev();
            return;
        }
        KeyCode::Down => {
            app.breaking.focus_next();
            return;
        }
        KeyCode::Esc => {
            app.clear_status();
            return;
        }
        KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.breaking.accept_suggestion();
            return;
        }
        _ => {}
    }

    // Location toggle sits between text fields; Space flips it
    if app.breaking.focus == Field::DisasterLocation
        && matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter)
    {
        app.breaking.disaster_location = match app.breaking.disaster_location {
            DisplayLocation::Ticker => DisplayLocation::Weather,
            DisplayLocation::Weather => DisplayLocation::Ticker,
        };
        return;
    }

    if key.code == KeyCode::Enter {
        handle_breaking_enter(app);
        return;
    }

    // Everything else edits the focused field
    let is_topic = app.breaking.focus == Field::AiTopic;
    if let Some(input) = app.breaking.focused_input_mut() {
        let changed = input
            .handle_event(&Event::Key(key))
            .is_some_and(|change| change.value);
        if changed && is_topic {
            app.breaking.touch_spelling(Instant::now());
        }
    }
}

fn handle_breaking_enter(app: &mut App) {
    match app.breaking.focus {
        Field::AiGenerate => {
            let topic = app.breaking.ai_topic.value().trim().to_string();
            let tag = app.breaking.ai_tag.value().trim().to_string();
            if topic.is_empty() || tag.is_empty() {
                app.set_status("Chủ đề và nhãn tin không được để trống".to_string());
                return;
            }
            if app.breaking.generating {
                return;
            }
            let count = app.breaking.ai_count.value().trim().parse().ok();
            let hours = app
                .breaking
                .ai_hours
                .value()
                .trim()
                .parse()
                .unwrap_or(3);
            app.breaking.generating = true;
            app.breaking.ai_error = None;
            app.breaking.spell_suggestion = None;
            app.pending_generate = Some(GenerateParams {
                topic,
                tag,
                count,
                hours,
            });
        }
        Field::ManualActivate => {
            app.push_request(Request::BreakingText {
                tag: app.breaking.manual_tag.value().to_string(),
                content: app.breaking.manual_content.value().to_string(),
            });
        }
        Field::DisasterActivate => {
            app.push_request(Request::Disaster {
                tag: app.breaking.disaster_tag.value().to_string(),
                content: app.breaking.disaster_content.value().to_string(),
                location: app.breaking.disaster_location,
            });
        }
        // Enter in a text field moves on, like the original form's flow
        _ => app.breaking.focus_next(),
    }
}

fn handle_selection_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.breaking.cancel_selection(),
        KeyCode::Up => {
            app.breaking.select_cursor = app.breaking.select_cursor.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.breaking.select_cursor + 1 < app.breaking.candidates.len() {
                app.breaking.select_cursor += 1;
            }
        }
        KeyCode::Char(' ') => {
            let cursor = app.breaking.select_cursor;
            if let Some(checked) = app.breaking.checked.get_mut(cursor) {
                *checked = !*checked;
            }
        }
        KeyCode::Enter => {
            let items = app.breaking.selected_summaries();
            if items.is_empty() {
                app.set_status("Chưa chọn tin nào".to_string());
                return;
            }
            let tag = app.breaking.ai_tag.value().trim().to_string();
            app.push_request(Request::BreakingItems { tag, items });
            app.breaking.cancel_selection();
        }
        _ => {}
    }
}

fn handle_interface_key(app: &mut App, key: KeyEvent) {
    if app.interface.editing != Editing::None {
        handle_interface_edit_key(app, key);
        return;
    }

    if handle_nav_key(app, key) {
        return;
    }

    match key.code {
        KeyCode::Up => app.interface.select_previous(),
        KeyCode::Down => app.interface.select_next(),
        KeyCode::Char(' ') | KeyCode::Enter => {
            let theme = app.status.as_ref().map_or(Theme::Normal, |s| s.theme);
            let weather_visible = app.status.as_ref().is_none_or(|s| s.weather_bar_visible);
            let clock_mode = app
                .status
                .as_ref()
                .map_or(ClockDisplayMode::Clock, |s| s.clock_mode);

            match app.interface.selected_row() {
                Row::Mourning => app.push_request(Request::SetMourning {
                    active: theme != Theme::Mourning,
                }),
                Row::Tet => app.push_request(Request::SetTet {
                    active: theme != Theme::Tet,
                }),
                Row::WeatherBar => app.push_request(Request::SetWeatherBar {
                    visible: !weather_visible,
                }),
                Row::ClockMode => {
                    let next = match clock_mode {
                        ClockDisplayMode::Clock => ClockDisplayMode::Custom,
                        ClockDisplayMode::Custom => ClockDisplayMode::Alternate,
                        ClockDisplayMode::Alternate => ClockDisplayMode::Clock,
                    };
                    app.push_request(Request::SetClockMode { mode: next });
                }
                Row::ClockText => app.interface.editing = Editing::ClockText,
                Row::Durations => app.interface.editing = Editing::ClockSecs,
            }
        }
        _ => {}
    }
}

fn handle_interface_edit_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.interface.editing = Editing::None;
            // Buffers re-sync from the next status poll
        }
        KeyCode::Enter => match app.interface.editing {
            Editing::ClockText => {
                app.push_request(Request::SetClockText {
                    text: app.interface.clock_text.value().to_string(),
                });
                app.interface.editing = Editing::None;
            }
            Editing::ClockSecs | Editing::CustomSecs => {
                let clock_secs = app.interface.clock_secs.value().trim().parse();
                let custom_secs = app.interface.custom_secs.value().trim().parse();
                match (clock_secs, custom_secs) {
                    (Ok(clock_secs), Ok(custom_secs)) => {
                        app.push_request(Request::SetClockDurations {
                            clock_secs,
                            custom_secs,
                        });
                        app.interface.editing = Editing::None;
                    }
                    _ => app.set_status("Thời lượng phải là số giây".to_string()),
                }
            }
            Editing::None => {}
        },
        // Space hops between the two duration boxes
        KeyCode::Char(' ')
            if matches!(app.interface.editing, Editing::ClockSecs | Editing::CustomSecs) =>
        {
            app.interface.editing = match app.interface.editing {
                Editing::ClockSecs => Editing::CustomSecs,
                _ => Editing::ClockSecs,
            };
        }
        _ => {
            if let Some(input) = app.interface.editing_input_mut() {
                input.handle_event(&Event::Key(key));
            }
        }
    }
}
