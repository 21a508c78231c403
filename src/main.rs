mod app;
mod config;
mod debounce;
mod history;
mod logging;
mod model;
mod net;
mod pager;
mod recover;
mod runtime;
mod storage;
mod ui;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use app::App;
use config::parse_args;
use logging::init as init_logging;
use net::spawn_fetcher;
use runtime::{init_terminal, restore_terminal, run_app, NetChannels};
use tracing::{debug, info, warn};

fn main() -> Result<()> {
    let config = parse_args()?;
    let _log_guard = init_logging(&config);
    info!("skyconnect-tui starting");
    debug!("config path: {}", config.config_path.display());

    if config.api_key.trim().is_empty() {
        warn!("no API key configured; upstream requests will be rejected");
    }

    let history_path = if config.history_file.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(config.history_file.trim()))
    };

    // History rehydrates in the background; the UI starts with an empty,
    // not-yet-hydrated log and adopts the stored one when this delivers.
    let (hydrate_tx, hydrate_rx) = mpsc::channel();
    if let Some(path) = history_path.clone() {
        thread::spawn(move || {
            let items = match storage::load_history(&path) {
                Ok(items) => items,
                Err(err) => {
                    warn!("history load failed: {err}");
                    Vec::new()
                }
            };
            let _ = hydrate_tx.send(items);
        });
    } else {
        let _ = hydrate_tx.send(Vec::new());
    }

    let (req_tx, req_rx) = mpsc::channel();
    let (res_tx, res_rx) = mpsc::channel();
    spawn_fetcher(
        config.api_url.clone(),
        config.api_key.clone(),
        Duration::from_secs(config.fetch_timeout_secs.max(1)),
        req_rx,
        res_tx,
    );

    let mut app = App::new(
        config.page_size,
        config.query.clone(),
        config.upstream_search,
        Duration::from_millis(config.debounce_ms),
        history_path,
        config.config_path.clone(),
    );

    if let Some(code) = config.airport.as_deref() {
        app.open_deep_link(code);
    }

    let mut terminal = init_terminal()?;
    let res = run_app(
        &mut terminal,
        app,
        NetChannels { req_tx, res_rx },
        hydrate_rx,
    );
    restore_terminal(&mut terminal)?;

    if let Err(err) = res {
        warn!("runtime error: {err}");
        eprintln!("{err}");
    }

    info!("skyconnect-tui exited");
    Ok(())
}
