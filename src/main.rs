//! tickerd entry point
//!
//! Parses the CLI and dispatches to the daemon, the one-shot operator
//! commands, or the terminal control panel.

use clap::Parser;
use color_eyre::eyre::Result;

use tickerd::cli::{Args, Command};
use tickerd::config::Config;
use tickerd::ipc::Request;
use tickerd::{commands, daemon};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    match args.command {
        // Bare `tickerd` is a status query, like the help text promises
        None => commands::status(false).await,

        Some(Command::Daemon { foreground }) => {
            let config = Config::load()?;
            daemon::run(config, foreground).await
        }

        Some(Command::Status { json }) => commands::status(json).await,
        Some(Command::Frame { json }) => commands::frame(json).await,

        Some(Command::Rss) => commands::simple(Request::SelectRss).await,
        Some(Command::Pause) => commands::simple(Request::Pause).await,
        Some(Command::Resume) => commands::simple(Request::Resume).await,
        Some(Command::Clear) => commands::simple(Request::ClearSpecial).await,

        Some(Command::Custom { action }) => commands::custom(action).await,

        Some(Command::Breaking { action }) => {
            let config = Config::load()?;
            commands::breaking(&config, action).await
        }

        Some(Command::Disaster {
            tag,
            content,
            location,
        }) => commands::disaster(tag, content, location).await,

        Some(Command::Theme { theme }) => commands::theme(theme).await,
        Some(Command::WeatherBar { state }) => commands::weather_bar(state).await,
        Some(Command::Clock { action }) => commands::clock(action).await,
        Some(Command::Panel { state }) => commands::panel(state).await,

        Some(Command::Refresh) => commands::simple(Request::RefreshFeed).await,
        Some(Command::Reload) => commands::simple(Request::Reload).await,
        Some(Command::Shutdown) => commands::simple(Request::Shutdown).await,

        Some(Command::Validate) => commands::validate(),

        #[cfg(feature = "tui")]
        Some(Command::Tui) => tickerd::tui::run().await,
    }
}
