//! Process entry point and session supervisor.
//!
//! Wires the connection task and the UI task under one supervising
//! join: the process exits only after both loops have returned, and a
//! task-level failure surfaces here instead of being swallowed.

mod app;
mod config;
mod logging;
mod theme;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use ptz_core::{ConnectionManager, ServerEndpoint, ShutdownCoordinator, TcpDialer};

use app::{App, UiEvent};
use config::ClientConfig;
use theme::Theme;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cfg = ClientConfig::load(Path::new("ptz-client.toml"));
    let _log_guard = logging::init(&cfg.logging)?;
    let theme = Theme::load(Path::new(&cfg.ui.theme_file), &cfg.ui.theme);

    let endpoint = ServerEndpoint::new(cfg.network.host.clone(), cfg.network.port);
    let manager = Arc::new(ConnectionManager::with_retry_timer(
        TcpDialer,
        endpoint,
        Duration::from_secs(cfg.network.retry_secs),
    ));
    let session = manager.session();
    let coordinator = ShutdownCoordinator::new(Arc::clone(&manager));

    // Input task: dedicated blocking thread polling crossterm,
    // forwarding events to the UI loop over a channel.
    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let input_ui_tx = ui_tx.clone();
    tokio::task::spawn_blocking(move || {
        loop {
            if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                if let Ok(event) = event::read() {
                    match event {
                        Event::Key(key) => {
                            if input_ui_tx.send(UiEvent::Key(key)).is_err() {
                                break;
                            }
                        }
                        Event::Resize(w, h) => {
                            if input_ui_tx.send(UiEvent::Resize(w, h)).is_err() {
                                break;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    });

    // Connection task: dial → handshake → ready, retrying forever.
    let conn_handle = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move { manager.connect().await })
    };

    // Terminal setup.
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
    terminal.clear()?;

    let app = App::new(session, theme);

    // UI task: render status, wait for keys, route quit through the
    // shutdown coordinator.
    let ui_handle = tokio::spawn(async move {
        loop {
            terminal.draw(|f| app.draw(f))?;

            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if let UiEvent::Key(key) = event {
                        if key.kind == KeyEventKind::Press {
                            match key.code {
                                KeyCode::Char('q') => {
                                    request_shutdown(&coordinator).await;
                                    break;
                                }
                                KeyCode::Char('c')
                                    if key.modifiers.contains(KeyModifiers::CONTROL) =>
                                {
                                    request_shutdown(&coordinator).await;
                                    break;
                                }
                                _ => {}
                            }
                        }
                    }
                }

                // Periodic redraw so the status line tracks the
                // connection task without any key press.
                _ = tokio::time::sleep(Duration::from_millis(100)) => {}
            }
        }
        std::io::Result::Ok(())
    });

    // Supervisor: both loops must finish before the process exits;
    // panics and task errors surface here.
    let (conn_res, ui_res) =
        tokio::try_join!(conn_handle, ui_handle).map_err(std::io::Error::other)?;
    conn_res.map_err(std::io::Error::other)?;
    ui_res?;

    // Restore terminal.
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;

    Ok(())
}

async fn request_shutdown(coordinator: &ShutdownCoordinator<TcpDialer>) {
    if let Err(e) = coordinator.request_shutdown().await {
        tracing::warn!("shutdown: close failed: {e}");
    }
}
