use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite;

use crate::clock::Clock;
use crate::error::AppError;
use crate::event::{AppEvent, ConnectionState};
use crate::surge::reconnect::ReconnectScheduler;

/// How a single connection ended.
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Shutdown,
    Closed,
}

pub struct BinanceWsClient {
    url: String,
    reconnect_interval: Duration,
    clock: Arc<dyn Clock>,
}

impl BinanceWsClient {
    pub fn new(stream_url: &str, reconnect_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            url: stream_url.to_string(),
            reconnect_interval,
            clock,
        }
    }

    /// Connect and keep the stream alive until shutdown.
    ///
    /// Text frames go to `frame_tx` untouched; lifecycle changes go to `status_tx`.
    /// After a close, one retry timer fires every `reconnect_interval` until a
    /// connection opens again. Retries are unlimited.
    pub async fn connect_and_run(
        &self,
        frame_tx: mpsc::Sender<String>,
        status_tx: mpsc::Sender<AppEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let mut scheduler = ReconnectScheduler::new(self.reconnect_interval);

        loop {
            let _ = status_tx
                .send(AppEvent::WsStatus(ConnectionState::Connecting))
                .await;

            match self
                .connect_once(&frame_tx, &status_tx, &mut shutdown, &mut scheduler)
                .await
            {
                Ok(SessionEnd::Shutdown) => break,
                Ok(SessionEnd::Closed) => {
                    tracing::warn!(url = %self.url, "WebSocket disconnected");
                }
                Err(e) => {
                    tracing::error!(url = %self.url, error = %format!("{:#}", e), "WebSocket error");
                    let _ = status_tx
                        .send(AppEvent::LogMessage(format!("WS error: {:#}", e)))
                        .await;
                }
            }

            if scheduler.on_close(self.clock.now_ms()) {
                tracing::info!(
                    retry_in_ms = self.reconnect_interval.as_millis() as u64,
                    "Reconnect scheduled"
                );
            }

            loop {
                let now_ms = self.clock.now_ms();
                if scheduler.poll_due(now_ms) {
                    break;
                }
                let delay = scheduler.delay_until_due(now_ms).unwrap_or(self.reconnect_interval);
                let _ = status_tx
                    .send(AppEvent::WsStatus(ConnectionState::ClosedReconnecting {
                        attempt: scheduler.attempts() + 1,
                        retry_in_ms: delay.as_millis() as u64,
                    }))
                    .await;

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown.changed() => {
                        tracing::info!("Shutdown during reconnect wait");
                        return Ok(());
                    }
                }
            }
        }

        let _ = status_tx
            .send(AppEvent::LogMessage("WebSocket closed".to_string()))
            .await;
        Ok(())
    }

    async fn connect_once(
        &self,
        frame_tx: &mpsc::Sender<String>,
        status_tx: &mpsc::Sender<AppEvent>,
        shutdown: &mut watch::Receiver<bool>,
        scheduler: &mut ReconnectScheduler,
    ) -> Result<SessionEnd> {
        tracing::info!(url = %self.url, "Connecting");

        let connect = tokio_tungstenite::connect_async(self.url.as_str());
        let (ws_stream, _resp) = tokio::select! {
            res = connect => res.context("WebSocket connect failed")?,
            _ = shutdown.changed() => return Ok(SessionEnd::Shutdown),
        };

        scheduler.on_open();
        tracing::info!(url = %self.url, "WebSocket connected");
        let _ = status_tx
            .send(AppEvent::WsStatus(ConnectionState::Open))
            .await;

        let (mut write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(tungstenite::Message::Text(text))) => {
                            if frame_tx.try_send(text.to_string()).is_err() {
                                tracing::warn!("Frame channel full, dropping ticker message");
                            }
                        }
                        Some(Ok(tungstenite::Message::Close(frame))) => {
                            tracing::info!(?frame, "WebSocket closed by server");
                            return Ok(SessionEnd::Closed);
                        }
                        Some(Ok(tungstenite::Message::Ping(_))) => {
                            // tokio-tungstenite handles pong automatically
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            // Errors always close the socket before reconnecting.
                            let _ = write.close().await;
                            return Err(AppError::WebSocket(e.to_string()).into());
                        }
                        None => return Ok(SessionEnd::Closed),
                    }
                }
                _ = shutdown.changed() => {
                    let _ = write.close().await;
                    return Ok(SessionEnd::Shutdown);
                }
            }
        }
    }
}
