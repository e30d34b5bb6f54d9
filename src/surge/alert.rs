use std::collections::HashMap;

use crate::model::ticker::RankedEntry;

/// Presentation side of an alert: a popup plus the repeating alarm.
pub trait AlertSink {
    fn show(&mut self, entry: &RankedEntry);
    fn dismiss(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlertPresentation {
    Hidden,
    Shown(RankedEntry),
}

/// Decides when a ranked symbol becomes an alert.
///
/// Per cycle only the first entry at or above the threshold is considered,
/// and each symbol alerts at most once per cooldown window. Dismissing hides
/// the presentation but keeps the cooldown record.
pub struct AlertGate<S: AlertSink> {
    threshold_pct: f64,
    cooldown_ms: u64,
    last_alert_ms: HashMap<String, u64>,
    presentation: AlertPresentation,
    sink: S,
}

impl<S: AlertSink> AlertGate<S> {
    pub fn new(threshold_pct: f64, cooldown_ms: u64, sink: S) -> Self {
        Self {
            threshold_pct,
            cooldown_ms,
            last_alert_ms: HashMap::new(),
            presentation: AlertPresentation::Hidden,
            sink,
        }
    }

    pub fn presentation(&self) -> &AlertPresentation {
        &self.presentation
    }

    pub fn active_alert(&self) -> Option<&RankedEntry> {
        match &self.presentation {
            AlertPresentation::Shown(entry) => Some(entry),
            AlertPresentation::Hidden => None,
        }
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.presentation, AlertPresentation::Shown(_))
    }

    pub fn last_alert_ms(&self, symbol: &str) -> Option<u64> {
        self.last_alert_ms.get(symbol).copied()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_cooling_down(&self, symbol: &str, now_ms: u64) -> bool {
        self.last_alert_ms
            .get(symbol)
            .is_some_and(|&last| now_ms.saturating_sub(last) < self.cooldown_ms)
    }

    /// Evaluate one ranking cycle. Returns the entry that fired, if any.
    pub fn evaluate(&mut self, ranked: &[RankedEntry], now_ms: u64) -> Option<RankedEntry> {
        let candidate = ranked
            .iter()
            .find(|entry| entry.percent_change >= self.threshold_pct)?;

        if self.is_cooling_down(&candidate.symbol, now_ms) {
            tracing::trace!(symbol = %candidate.symbol, "Surge suppressed by cooldown");
            return None;
        }

        self.last_alert_ms.insert(candidate.symbol.clone(), now_ms);
        self.presentation = AlertPresentation::Shown(candidate.clone());
        self.sink.show(candidate);
        tracing::info!(
            symbol = %candidate.symbol,
            percent_change = candidate.percent_change,
            reference_price = candidate.reference_price,
            current_price = candidate.current_price,
            "Price surge alert"
        );
        Some(candidate.clone())
    }

    /// Hide the presentation. Returns `false` if nothing was shown.
    pub fn dismiss(&mut self) -> bool {
        if !self.is_shown() {
            return false;
        }
        self.presentation = AlertPresentation::Hidden;
        self.sink.dismiss();
        tracing::info!("Surge alert dismissed");
        true
    }
}
