use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::alert::AlertSink;
use crate::model::ticker::RankedEntry;

/// Plays one alarm cue.
pub trait AlarmPlayer: Send + Sync + 'static {
    fn play(&self);
}

/// Rings the terminal bell.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl AlarmPlayer for TerminalBell {
    fn play(&self) {
        let mut out = std::io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            tracing::debug!(error = %e, "Failed to ring terminal bell");
        }
    }
}

/// Repeating alarm task. The first cue plays one interval after start.
/// Dropping the handle stops the task.
pub struct AlarmLoop {
    handle: JoinHandle<()>,
}

impl AlarmLoop {
    pub fn start(player: Arc<dyn AlarmPlayer>, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                player.play();
            }
        });
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        // Drop aborts.
    }
}

impl Drop for AlarmLoop {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Sink used by the TUI: publishes the active alert on a watch channel and owns the
/// alarm loop.
pub struct ChannelAlertSink {
    alert_tx: watch::Sender<Option<RankedEntry>>,
    player: Arc<dyn AlarmPlayer>,
    interval: Duration,
    alarm: Option<AlarmLoop>,
}

impl ChannelAlertSink {
    pub fn new(
        alert_tx: watch::Sender<Option<RankedEntry>>,
        player: Arc<dyn AlarmPlayer>,
        interval: Duration,
    ) -> Self {
        Self {
            alert_tx,
            player,
            interval,
            alarm: None,
        }
    }

    pub fn is_alarm_running(&self) -> bool {
        self.alarm.as_ref().is_some_and(AlarmLoop::is_running)
    }

    fn publish(&self, alert: Option<RankedEntry>) {
        self.alert_tx.send_replace(alert);
    }
}

impl AlertSink for ChannelAlertSink {
    fn show(&mut self, entry: &RankedEntry) {
        // Restart so the cadence follows the newest alert.
        if let Some(alarm) = self.alarm.take() {
            alarm.stop();
        }
        self.alarm = Some(AlarmLoop::start(self.player.clone(), self.interval));
        self.publish(Some(entry.clone()));
    }

    fn dismiss(&mut self) {
        if let Some(alarm) = self.alarm.take() {
            alarm.stop();
        }
        self.publish(None);
    }
}
