use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::{mpsc, watch};

use surge_watch::binance::ws::BinanceWsClient;
use surge_watch::clock::{Clock, SystemClock};
use surge_watch::config::Config;
use surge_watch::event::AppEvent;
use surge_watch::input::{parse_alert_command, parse_main_command, UiCommand};
use surge_watch::model::ticker::RankedEntry;
use surge_watch::surge::alarm::{AlarmPlayer, ChannelAlertSink, TerminalBell};
use surge_watch::surge::{run_detector, DetectorCommand, SurgeDetector};
use surge_watch::ui::{self, AppState};

const FRAME_CHANNEL_CAPACITY: usize = 64;
const APP_CHANNEL_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    // Log to file so it doesn't interfere with the TUI
    let log_file = std::fs::File::create("surge-watch.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::try_new(&config.logging.level)
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let stream_url = config.binance.stream_url();
    let quote_suffixes = config.surge.normalized_suffixes();
    tracing::info!(
        url = %stream_url,
        suffixes = ?quote_suffixes,
        threshold_pct = config.surge.threshold_pct,
        window = config.surge.history_len,
        "Starting surge-watch"
    );

    // Channels
    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(APP_CHANNEL_CAPACITY);
    let (frame_tx, frame_rx) = mpsc::channel::<String>(FRAME_CHANNEL_CAPACITY);
    let (cmd_tx, cmd_rx) = mpsc::channel::<DetectorCommand>(16);
    let (alert_tx, mut alert_rx) = watch::channel::<Option<RankedEntry>>(None);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Stream task
    let ws_client = BinanceWsClient::new(
        &stream_url,
        config.surge.reconnect_interval(),
        clock.clone(),
    );
    let ws_app_tx = app_tx.clone();
    let ws_shutdown = shutdown_rx.clone();
    let ws_task = tokio::spawn(async move {
        if let Err(e) = ws_client
            .connect_and_run(frame_tx, ws_app_tx.clone(), ws_shutdown)
            .await
        {
            tracing::error!(error = %e, "WebSocket task failed");
            let _ = ws_app_tx.send(AppEvent::Error(format!("WS task: {:#}", e))).await;
        }
    });

    // Detector task
    let player: Arc<dyn AlarmPlayer> = Arc::new(TerminalBell);
    let sink = ChannelAlertSink::new(alert_tx, player, config.surge.alarm_interval());
    let detector = SurgeDetector::new(&config.surge, clock, sink);
    let detector_task = tokio::spawn(run_detector(
        detector,
        frame_rx,
        cmd_rx,
        app_tx.clone(),
        shutdown_rx.clone(),
    ));

    // Ctrl+C handler
    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    // TUI main loop
    let mut terminal = ratatui::init();
    let mut app_state = AppState::new(
        quote_suffixes,
        config.surge.history_len,
        config.ui.max_rows,
    );
    app_state.push_log(format!("surge-watch started | {}", stream_url));

    let result: Result<()> = async {
        loop {
            terminal.draw(|frame| ui::render(frame, &app_state))?;

            if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    let cmd = if app_state.is_alert_open() {
                        parse_alert_command(&key.code)
                    } else {
                        parse_main_command(&key.code)
                    };
                    match cmd {
                        Some(UiCommand::Quit) => {
                            tracing::info!("User quit");
                            let _ = shutdown_tx.send(true);
                            break;
                        }
                        Some(UiCommand::DismissAlert) => {
                            let _ = cmd_tx.send(DetectorCommand::DismissAlert).await;
                        }
                        Some(UiCommand::Reset) => {
                            app_state.push_log("[UI] reset price history".to_string());
                            let _ = cmd_tx.send(DetectorCommand::Reset).await;
                        }
                        Some(UiCommand::ScrollUp) => app_state.scroll_up(),
                        Some(UiCommand::ScrollDown) => app_state.scroll_down(),
                        None => {}
                    }
                }
            }

            // Drain events from channel
            while let Ok(evt) = app_rx.try_recv() {
                app_state.apply(evt);
            }
            if alert_rx.has_changed().unwrap_or(false) {
                let alert = alert_rx.borrow_and_update().clone();
                app_state.apply(match alert {
                    Some(entry) => AppEvent::AlertRaised(entry),
                    None => AppEvent::AlertCleared,
                });
            }

            if *shutdown_rx.borrow() {
                break;
            }
        }
        Ok(())
    }
    .await;

    ratatui::restore();

    // Teardown: close the stream and stop the alarm before exiting.
    let _ = shutdown_tx.send(true);
    if let Err(e) = detector_task.await {
        tracing::warn!(error = %e, "Detector task join failed");
    }
    if tokio::time::timeout(Duration::from_secs(2), ws_task).await.is_err() {
        tracing::warn!("WebSocket task did not stop in time");
    }

    tracing::info!("Shutdown complete");
    println!("Goodbye! Check surge-watch.log for details.");
    result
}
