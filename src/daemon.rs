//! Daemon mode
//!
//! Runs the overlay event loop: IPC operator actions, feed and weather
//! refresh timers, weather strip rotation, the clock alternation deadline,
//! and config hot-reload. Every state transition runs synchronously to
//! completion inside one select arm.

use color_eyre::eyre::{Context, Result};
use std::time::{Duration, Instant};
use tokio::net::UnixStream;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::ipc::{self, IpcServer, Request, Response, StatusInfo};
use crate::logging::{log_dir, RotatingFileAppender, MAX_LOG_SIZE_BYTES};
use crate::news::SpecialMode;
use crate::notification::{disaster_body, send_notification, special_icon};
use crate::sources::weather::WeatherReport;
use crate::sources::{feed, weather};
use crate::state::Overlay;
use crate::store::Store;

/// Result of one background fetch, delivered back into the event loop.
enum FetchEvent {
    Feed(Result<Vec<String>, String>),
    Weather {
        index: usize,
        result: Result<WeatherReport, String>,
    },
}

/// Current wall-clock text for the frame's clock slot.
fn clock_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Initialize tracing: stderr in foreground, rotating file otherwise.
fn init_logging(
    config: &Config,
    foreground: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    // Filter format: "tickerd=LEVEL" keeps dependency noise out
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("tickerd={}", config.settings.log_level))
    });

    if foreground {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        Ok(None)
    } else {
        let appender = RotatingFileAppender::new(log_dir()?, "daemon.log", MAX_LOG_SIZE_BYTES);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Ok(Some(guard))
    }
}

/// Watch the config file for edits; each change sends one notice.
fn spawn_config_watcher(tx: mpsc::UnboundedSender<()>) -> Result<notify::RecommendedWatcher> {
    use notify::{Event, EventKind, RecursiveMode, Watcher};

    let config_path = Config::get_config_path()?;
    let watched = config_path.clone();
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        if let Ok(event) = result {
            let relevant = matches!(
                event.kind,
                EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
            ) && event.paths.iter().any(|p| p.ends_with("config.toml"));
            if relevant {
                let _ = tx.send(());
            }
        }
    })
    .context("Failed to create config watcher")?;

    let watch_dir = watched
        .parent()
        .map(std::path::Path::to_path_buf)
        .unwrap_or(watched);
    watcher
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch config dir: {watch_dir:?}"))?;

    Ok(watcher)
}

fn spawn_feed_fetch(config: &Config, tx: &mpsc::UnboundedSender<FetchEvent>) {
    let url = config.feed.url.clone();
    let limit = config.feed.max_titles;
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = feed::fetch_titles(&url, limit)
            .await
            .map_err(|e| format!("Không thể tải tin tức: {e:#}"));
        let _ = tx.send(FetchEvent::Feed(result));
    });
}

fn spawn_weather_fetches(config: &Config, tx: &mpsc::UnboundedSender<FetchEvent>) {
    for (index, city) in config.weather.cities.iter().enumerate() {
        let endpoint = config.weather.endpoint.clone();
        let city = city.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = weather::fetch_city(&endpoint, &city)
                .await
                .map_err(|e| format!("{e:#}"));
            let _ = tx.send(FetchEvent::Weather { index, result });
        });
    }
}

/// Run the daemon with the given configuration
///
/// # Errors
/// Returns an error if logging, the store, or the IPC socket cannot be set
/// up. Runtime fetch failures are absorbed into the overlay state.
pub async fn run(config: Config, foreground: bool) -> Result<()> {
    let _log_guard = init_logging(&config, foreground)?;

    info!("Starting tickerd daemon");
    info!(
        "Feed: {} ({} cities on the weather strip)",
        config.feed.url,
        config.weather.cities.len()
    );

    let started = Instant::now();
    let store = Store::open_default()?;
    let mut overlay = Overlay::new(store, &config, started);
    let mut config = config;

    let ipc_server = IpcServer::bind().await?;
    info!("IPC server listening on {:?}", ipc_server.socket_path());

    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<FetchEvent>();
    let (watch_tx, mut watch_rx) = mpsc::unbounded_channel::<()>();
    let _watcher = match spawn_config_watcher(watch_tx) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("Config hot-reload disabled: {e:#}");
            None
        }
    };

    // First ticks fire immediately and kick off the initial fetches
    let mut feed_interval = tokio::time::interval(Duration::from_secs(config.feed.refresh_secs));
    let mut weather_interval =
        tokio::time::interval(Duration::from_secs(config.weather.refresh_secs));
    let mut rotate_interval =
        tokio::time::interval(Duration::from_secs(config.weather.rotate_secs));
    feed_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    weather_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    rotate_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    if sd_notify::notify(true, &[sd_notify::NotifyState::Ready]).is_ok() {
        info!("systemd notified: ready");
    }

    if config.settings.notify_daemon {
        if let Err(e) = send_notification("tickerd started", "Overlay daemon running", None) {
            warn!("Could not send startup notification: {}", e);
        }
    }

    info!("Serving overlay state...");

    loop {
        // Pending clock toggle, if the alternate mode has one armed
        let clock_deadline = overlay
            .clock()
            .deadline()
            .map(tokio::time::Instant::from_std);

        tokio::select! {
            Some(mut stream) = ipc_server.accept() => {
                match handle_connection(&mut stream, &mut overlay, &config, started, &fetch_tx).await {
                    Ok(shutdown) => {
                        if shutdown {
                            info!("Shutdown requested via IPC");
                            break;
                        }
                    }
                    Err(e) => error!("IPC request handling error: {:#}", e),
                }
            }

            Some(event) = fetch_rx.recv() => {
                match event {
                    FetchEvent::Feed(Ok(titles)) => {
                        overlay.feed_mut().apply_titles(titles);
                    }
                    FetchEvent::Feed(Err(message)) => {
                        overlay.feed_mut().apply_error(message);
                    }
                    FetchEvent::Weather { index, result: Ok(report) } => {
                        overlay.set_weather_report(index, report);
                    }
                    FetchEvent::Weather { index, result: Err(message) } => {
                        warn!("Weather fetch failed for city {}: {}", index, message);
                    }
                }
            }

            Some(()) = watch_rx.recv() => {
                // Collapse bursts of editor write events
                while watch_rx.try_recv().is_ok() {}
                match Config::load() {
                    Ok(new_config) => {
                        info!("Config file changed, reloading");
                        feed_interval = tokio::time::interval(
                            Duration::from_secs(new_config.feed.refresh_secs));
                        weather_interval = tokio::time::interval(
                            Duration::from_secs(new_config.weather.refresh_secs));
                        rotate_interval = tokio::time::interval(
                            Duration::from_secs(new_config.weather.rotate_secs));
                        config = new_config;
                    }
                    Err(e) => warn!("Ignoring invalid config change: {e:#}"),
                }
            }

            _ = feed_interval.tick() => {
                overlay.feed_mut().is_fetching = true;
                spawn_feed_fetch(&config, &fetch_tx);
            }

            _ = weather_interval.tick() => {
                spawn_weather_fetches(&config, &fetch_tx);
            }

            _ = rotate_interval.tick() => {
                overlay.advance_city();
            }

            () = async {
                match clock_deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            } => {
                overlay.poll_clock(Instant::now());
            }

            _ = signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    let _ = sd_notify::notify(true, &[sd_notify::NotifyState::Stopping]);
    if config.settings.notify_daemon {
        let _ = send_notification("tickerd stopped", "Overlay daemon stopped", None);
    }

    Ok(())
}

/// Handle a single IPC connection. Returns `true` when the daemon should
/// shut down.
async fn handle_connection(
    stream: &mut UnixStream,
    overlay: &mut Overlay,
    config: &Config,
    started: Instant,
    fetch_tx: &mpsc::UnboundedSender<FetchEvent>,
) -> Result<bool> {
    let request = ipc::read_request(stream).await?;
    let mut shutdown = false;

    let response = match request {
        Request::Status => {
            let info = StatusInfo {
                version: env!("CARGO_PKG_VERSION").to_string(),
                uptime_secs: started.elapsed().as_secs(),
                mode: overlay.mode(),
                last_special: overlay.last_special(),
                theme: overlay.ui().theme(),
                weather_bar_visible: overlay.ui().weather_bar_visible(),
                clock_mode: overlay.ui().clock_mode(),
                clock_text: overlay.ui().clock_text().to_string(),
                clock_secs: overlay.ui().clock_secs(),
                custom_text_secs: overlay.ui().custom_text_secs(),
                panel_open: overlay.ui().panel_open(),
                feed_title_count: overlay.feed().titles.len(),
                feed_error: overlay.feed().error.clone(),
                breaking_item_count: overlay.news().breaking_items().len(),
                disaster_active: overlay.news().disaster().is_some(),
            };
            Response::Status(Box::new(info))
        }

        Request::Frame => Response::Frame {
            frame: Box::new(overlay.frame(clock_time())),
        },

        Request::SelectRss => {
            overlay.select_rss();
            Response::Ok {
                message: "Live feed active, theme reset".to_string(),
            }
        }

        Request::Pause => {
            overlay.pause_special();
            Response::Ok {
                message: "Special broadcast paused".to_string(),
            }
        }

        Request::Resume => {
            if overlay.reactivate_special() {
                Response::Ok {
                    message: format!("Resumed {} broadcast", overlay.mode().name()),
                }
            } else {
                Response::Rejected {
                    message: "No paused special broadcast to resume".to_string(),
                }
            }
        }

        Request::SelectCustom => {
            if overlay.select_custom() {
                Response::Ok {
                    message: "Session list active".to_string(),
                }
            } else {
                Response::Rejected {
                    message: "Session list is empty".to_string(),
                }
            }
        }

        Request::CustomAdd { text } => {
            overlay.add_custom(text);
            Response::Ok {
                message: format!("Session list: {} lines", overlay.news().custom_items().len()),
            }
        }

        Request::CustomRemove { index } => {
            overlay.remove_custom(index);
            Response::Ok {
                message: format!("Session list: {} lines", overlay.news().custom_items().len()),
            }
        }

        Request::CustomClear => {
            overlay.clear_custom();
            Response::Ok {
                message: "Session list cleared".to_string(),
            }
        }

        Request::CustomList => Response::CustomList {
            items: overlay.news().custom_items().to_vec(),
        },

        Request::BreakingText { tag, content } => {
            if overlay.activate_breaking_text(&tag, &content) {
                notify_special(config, SpecialMode::Breaking, overlay.news().breaking_tag());
                Response::Ok {
                    message: format!("Breaking news live under [{}]", overlay.news().breaking_tag()),
                }
            } else {
                Response::Rejected {
                    message: "Tag and content must not be blank".to_string(),
                }
            }
        }

        Request::BreakingItems { tag, items } => {
            let count = items.len();
            if overlay.activate_breaking_items(items, &tag) {
                notify_special(config, SpecialMode::Breaking, overlay.news().breaking_tag());
                Response::Ok {
                    message: format!(
                        "Breaking news live: {count} items under [{}]",
                        overlay.news().breaking_tag()
                    ),
                }
            } else {
                Response::Rejected {
                    message: "Need at least one item and a non-blank tag".to_string(),
                }
            }
        }

        Request::Disaster {
            tag,
            content,
            location,
        } => {
            if overlay.activate_disaster(&tag, &content, location) {
                if config.settings.notify_special {
                    let body = disaster_body(tag.trim(), location);
                    if let Err(e) = send_notification(
                        "Disaster warning live",
                        &body,
                        Some(special_icon(SpecialMode::Disaster)),
                    ) {
                        warn!("Notification failed: {}", e);
                    }
                }
                Response::Ok {
                    message: "Disaster warning live".to_string(),
                }
            } else {
                Response::Rejected {
                    message: "Tag and content must not be blank".to_string(),
                }
            }
        }

        Request::ClearSpecial => {
            overlay.clear_special();
            if config.settings.notify_special {
                let _ = send_notification("Special broadcast cleared", "Back to the live feed", None);
            }
            Response::Ok {
                message: "Special data cleared, live feed active".to_string(),
            }
        }

        Request::SetMourning { active } => {
            overlay.set_mourning(active);
            Response::Ok {
                message: format!("Mourning theme {}", if active { "on" } else { "off" }),
            }
        }

        Request::SetTet { active } => {
            overlay.set_tet(active);
            Response::Ok {
                message: format!("Tet theme {}", if active { "on" } else { "off" }),
            }
        }

        Request::SetWeatherBar { visible } => {
            overlay.set_weather_bar_visible(visible);
            Response::Ok {
                message: format!("Weather strip {}", if visible { "visible" } else { "hidden" }),
            }
        }

        Request::SetClockMode { mode } => {
            overlay.set_clock_mode(mode, Instant::now());
            Response::Ok {
                message: format!("Clock mode: {}", mode.name()),
            }
        }

        Request::SetClockText { text } => {
            overlay.set_clock_text(text);
            Response::Ok {
                message: "Clock text updated".to_string(),
            }
        }

        Request::SetClockDurations {
            clock_secs,
            custom_secs,
        } => {
            overlay.set_clock_durations(clock_secs, custom_secs, Instant::now());
            Response::Ok {
                message: format!("Alternate durations: {clock_secs}s clock / {custom_secs}s text"),
            }
        }

        Request::PanelOpen => {
            overlay.open_panel();
            Response::Ok {
                message: "Panel open".to_string(),
            }
        }

        Request::PanelClose => {
            overlay.close_panel();
            Response::Ok {
                message: "Panel closed".to_string(),
            }
        }

        Request::RefreshFeed => {
            overlay.feed_mut().is_fetching = true;
            spawn_feed_fetch(config, fetch_tx);
            Response::Ok {
                message: "Feed refresh started".to_string(),
            }
        }

        Request::Reload => match Config::load() {
            Ok(_) => Response::Ok {
                message: "Config validated; daemon applies it via the file watcher".to_string(),
            },
            Err(e) => Response::Error {
                message: format!("Config validation failed: {e:#}"),
            },
        },

        Request::Shutdown => {
            shutdown = true;
            Response::Ok {
                message: "Daemon shutting down...".to_string(),
            }
        }
    };

    ipc::write_response(stream, &response).await?;
    Ok(shutdown)
}

fn notify_special(config: &Config, special: SpecialMode, tag: &str) {
    if !config.settings.notify_special {
        return;
    }
    if let Err(e) = send_notification("Breaking news live", tag, Some(special_icon(special))) {
        warn!("Notification failed: {}", e);
    }
}
