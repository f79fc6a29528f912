//! Terminal control panel
//!
//! Interactive operator surface for the overlay daemon: live status and
//! frame preview, breaking news entry with AI drafting and selection, and
//! presentation settings. Talks to the daemon over the same IPC the CLI
//! uses.

use color_eyre::eyre::{Context, Result};
use crossterm::cursor::Show;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::unbounded_channel;

mod app;
mod input;
mod log_tailer;
mod screens;
mod widgets;

use crate::config::Config;
use crate::ipc::{self, Request, Response};
use crate::sources::ai;
use crate::style::colors;
use app::{App, AppUpdate, Screen};
use input::handle_key_event;
use screens::{render_breaking, render_dashboard, render_help, render_interface};

/// Daemon poll interval for status/frame/log snapshots.
const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Spinner animation tick.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Run the TUI application
///
/// # Errors
/// Returns an error if terminal setup fails; daemon unavailability is shown
/// in the UI instead of failing.
pub async fn run() -> Result<()> {
    // Load config before entering the alternate screen so first-run output
    // ("Created default config...") lands on the normal terminal
    let config = Config::load()?;

    // Restore the terminal before the panic report prints
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        let _ = execute!(std::io::stdout(), Show);
        original_hook(info);
    }));

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
            let _ = execute!(std::io::stdout(), Show);
        }
    }
    let _term_guard = TerminalGuard;

    let mut app = App::new();
    let (update_tx, mut update_rx) = unbounded_channel::<AppUpdate>();

    // Background poller: status + frame + log tail every interval
    let poller_tx = update_tx.clone();
    let poller = tokio::spawn(async move {
        loop {
            let status = match ipc::send_request(Request::Status).await {
                Ok(Response::Status(info)) => Some(info),
                _ => None,
            };
            let frame = match ipc::send_request(Request::Frame).await {
                Ok(Response::Frame { frame }) => Some(frame),
                _ => None,
            };
            if poller_tx
                .send(AppUpdate::Snapshot { status, frame })
                .is_err()
            {
                break;
            }
            let logs = tokio::task::spawn_blocking(log_tailer::read_tail)
                .await
                .unwrap_or_default();
            let _ = poller_tx.send(AppUpdate::Logs(logs));
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    });

    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    loop {
        if app.dirty {
            terminal
                .draw(|frame| render(frame, &mut app))
                .context("Failed to draw frame")?;
            app.dirty = false;
        }

        let spell_deadline = app
            .breaking
            .spell_deadline
            .map(tokio::time::Instant::from_std);

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        handle_key_event(&mut app, key);
                    }
                    Some(Ok(Event::Resize(..))) => app.dirty = true,
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            Some(update) = update_rx.recv() => {
                app.apply_update(update);
            }

            _ = tick.tick() => {
                if app.breaking.generating {
                    app.breaking.spinner.calc_next();
                    app.dirty = true;
                }
            }

            // Debounced spell check: fires only for the last-scheduled edit
            () = async {
                match spell_deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            } => {
                app.breaking.spell_deadline = None;
                let generation = app.breaking.spell_generation;
                let topic = app.breaking.ai_topic.value().trim().to_string();
                let ai_config = config.ai.clone();
                let tx = update_tx.clone();
                tokio::spawn(async move {
                    // Advisory failure just clears the suggestion
                    let suggestion = ai::check_spelling(&ai_config, &topic)
                        .await
                        .unwrap_or(None);
                    let _ = tx.send(AppUpdate::SpellResult { generation, suggestion });
                });
            }
        }

        // Execute operator actions queued by the input handlers
        let pending: Vec<Request> = app.pending_requests.drain(..).collect();
        for request in pending {
            match ipc::send_request(request).await {
                Ok(Response::Ok { message }
                | Response::Rejected { message }
                | Response::Error { message }) => app.set_status(message),
                Ok(_) => {}
                Err(e) => app.set_status(format!("Daemon unreachable: {e:#}")),
            }
        }

        // Kick off a queued AI generation run
        if let Some(params) = app.pending_generate.take() {
            let ai_config = config.ai.clone();
            let tx = update_tx.clone();
            tokio::spawn(async move {
                let result =
                    ai::generate_breaking_news(&ai_config, &params.topic, params.count, params.hours)
                        .await
                        .map_err(|e| format!("{e:#}"));
                let _ = tx.send(AppUpdate::GenerationDone(Box::new(result)));
            });
        }

        if app.should_quit {
            break;
        }
    }

    poller.abort();
    Ok(())
}

/// Render the whole UI: tab bar, active screen, status line.
fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Screen body
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    let titles: Vec<Line> = Screen::all()
        .iter()
        .map(|screen| {
            Line::from(vec![
                Span::styled(
                    format!("[{}]", screen.key()),
                    Style::default().fg(colors::UI_HIGHLIGHT),
                ),
                Span::raw(format!(" {}", screen.name())),
            ])
        })
        .collect();
    let selected = Screen::all()
        .iter()
        .position(|s| *s == app.current_screen)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(colors::UI_SELECTED)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(" tickerd "));
    frame.render_widget(tabs, chunks[0]);

    match app.current_screen {
        Screen::Dashboard => render_dashboard(
            frame,
            chunks[1],
            &app.dashboard,
            app.daemon_running,
            app.status.as_ref(),
            app.frame.as_ref(),
            &app.logs,
        ),
        Screen::Breaking => render_breaking(frame, chunks[1], &mut app.breaking),
        Screen::Interface => render_interface(frame, chunks[1], &app.interface, app.status.as_ref()),
    }

    let status_line = app.status_message.as_ref().map_or_else(
        || {
            Line::from(Span::styled(
                " ? trợ giúp · q thoát",
                Style::default().fg(colors::UI_SECONDARY),
            ))
        },
        |message| {
            Line::from(Span::styled(
                format!(" {message}"),
                Style::default().fg(colors::UI_WARNING),
            ))
        },
    );
    frame.render_widget(Paragraph::new(status_line), chunks[2]);

    if app.show_help {
        render_help(frame, frame.area());
    }
}
