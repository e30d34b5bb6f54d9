use tokio::sync::{mpsc, watch};

use super::alert::{AlertGate, AlertSink};
use super::history::PriceHistory;
use super::ingest::{IngestStats, PriceSnapshot, StreamIngestor};
use super::ranker::rank;
use crate::binance::types::decode_ticker_array;
use crate::clock::Clock;
use crate::config::SurgeConfig;
use crate::event::AppEvent;
use crate::model::ticker::{RankedEntry, TickerUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorCommand {
    DismissAlert,
    Reset,
}

/// What one stream message did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleOutcome {
    pub accepted: usize,
    /// `false` when nothing passed the throttle and the ranking was left as is.
    pub recomputed: bool,
    pub alert: Option<RankedEntry>,
}

/// Ingest → history → ranking → alert, run once per stream message.
pub struct SurgeDetector<C: Clock, S: AlertSink> {
    clock: C,
    ingestor: StreamIngestor,
    history: PriceHistory,
    gate: AlertGate<S>,
    ranked: Vec<RankedEntry>,
}

impl<C: Clock, S: AlertSink> SurgeDetector<C, S> {
    pub fn new(config: &SurgeConfig, clock: C, sink: S) -> Self {
        Self {
            clock,
            ingestor: StreamIngestor::new(config.normalized_suffixes(), config.throttle_ms),
            history: PriceHistory::new(config.history_len),
            gate: AlertGate::new(config.threshold_pct, config.cooldown_ms(), sink),
            ranked: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> &PriceSnapshot {
        self.ingestor.snapshot()
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    pub fn ranked(&self) -> &[RankedEntry] {
        &self.ranked
    }

    pub fn gate(&self) -> &AlertGate<S> {
        &self.gate
    }

    pub fn stats(&self) -> IngestStats {
        self.ingestor.stats()
    }

    /// Decode and process one text frame. Malformed frames are counted and
    /// skipped; `None` is returned for them.
    pub fn on_text(&mut self, text: &str) -> Option<CycleOutcome> {
        match decode_ticker_array(text) {
            Ok(batch) => Some(self.on_updates(&batch.updates)),
            Err(e) => {
                self.ingestor.record_malformed();
                tracing::warn!(error = %e, bytes = text.len(), "Skipping malformed ticker message");
                None
            }
        }
    }

    pub fn on_updates(&mut self, updates: &[TickerUpdate]) -> CycleOutcome {
        let now_ms = self.clock.now_ms();
        let accepted = self.ingestor.ingest(updates, now_ms);
        if accepted == 0 {
            return CycleOutcome::default();
        }

        self.history.record_snapshot(self.ingestor.snapshot());
        self.ranked = rank(self.ingestor.snapshot(), &self.history);
        let alert = self.gate.evaluate(&self.ranked, now_ms);

        CycleOutcome {
            accepted,
            recomputed: true,
            alert,
        }
    }

    pub fn dismiss_alert(&mut self) -> bool {
        self.gate.dismiss()
    }

    /// Drop prices, history and throttle state. Cooldown records are kept.
    pub fn reset(&mut self) {
        self.ingestor.reset();
        self.history.clear();
        self.ranked.clear();
        tracing::info!("Detector state reset");
    }

    /// Stop any alert presentation before the detector goes away.
    pub fn teardown(&mut self) {
        self.gate.dismiss();
    }
}

/// Detector task: consumes raw frames and UI commands until shutdown.
pub async fn run_detector<C: Clock, S: AlertSink>(
    mut detector: SurgeDetector<C, S>,
    mut frame_rx: mpsc::Receiver<String>,
    mut cmd_rx: mpsc::Receiver<DetectorCommand>,
    app_tx: mpsc::Sender<AppEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            frame = frame_rx.recv() => {
                let Some(text) = frame else { break };
                let event = match detector.on_text(&text) {
                    Some(outcome) if outcome.recomputed => AppEvent::Ranking {
                        entries: detector.ranked().to_vec(),
                        tracked_symbols: detector.snapshot().len(),
                        stats: detector.stats(),
                    },
                    _ => AppEvent::Stats(detector.stats()),
                };
                if app_tx.try_send(event).is_err() {
                    tracing::debug!("UI channel full, dropping ranking update");
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(DetectorCommand::DismissAlert) => {
                        detector.dismiss_alert();
                    }
                    Some(DetectorCommand::Reset) => {
                        detector.reset();
                        let cleared = AppEvent::Ranking {
                            entries: Vec::new(),
                            tracked_symbols: 0,
                            stats: detector.stats(),
                        };
                        if app_tx.try_send(cleared).is_err() {
                            tracing::warn!("UI channel full, dropping reset ranking");
                        }
                    }
                    None => break,
                }
            }
            _ = shutdown.changed() => break,
        }
    }
    detector.teardown();
    tracing::info!("Detector stopped");
}
