use std::time::Duration;

/// A single repeating retry timer, armed on close and disarmed on open.
///
/// Repeated closes while armed do not stack timers; once due, the timer
/// re-arms itself one interval later until a connection opens.
#[derive(Debug, Clone)]
pub struct ReconnectScheduler {
    interval_ms: u64,
    next_due_ms: Option<u64>,
    attempts: u32,
}

impl ReconnectScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: interval.as_millis() as u64,
            next_due_ms: None,
            attempts: 0,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.next_due_ms
    }

    /// Retries fired since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns `true` if this close armed a new timer.
    pub fn on_close(&mut self, now_ms: u64) -> bool {
        if self.next_due_ms.is_some() {
            return false;
        }
        self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
        true
    }

    pub fn on_open(&mut self) {
        self.next_due_ms = None;
        self.attempts = 0;
    }

    /// Fire the timer if due, re-arming it for the next interval.
    pub fn poll_due(&mut self, now_ms: u64) -> bool {
        match self.next_due_ms {
            Some(due) if now_ms >= due => {
                self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
                self.attempts = self.attempts.saturating_add(1);
                true
            }
            _ => false,
        }
    }

    pub fn delay_until_due(&self, now_ms: u64) -> Option<Duration> {
        self.next_due_ms
            .map(|due| Duration::from_millis(due.saturating_sub(now_ms)))
    }
}
