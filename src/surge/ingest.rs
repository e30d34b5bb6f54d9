use std::collections::HashMap;

use indexmap::IndexMap;

use crate::model::ticker::TickerUpdate;

/// Latest accepted price per symbol, in first-seen order.
pub type PriceSnapshot = IndexMap<String, f64>;

/// Running counters for the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub messages: u64,
    pub accepted: u64,
    pub throttled: u64,
    pub filtered: u64,
    pub malformed: u64,
}

/// Filter + per-symbol throttle in front of the price snapshot.
#[derive(Debug)]
pub struct StreamIngestor {
    quote_suffixes: Vec<String>,
    throttle_ms: u64,
    last_accepted_ms: HashMap<String, u64>,
    snapshot: PriceSnapshot,
    stats: IngestStats,
}

impl StreamIngestor {
    pub fn new(quote_suffixes: Vec<String>, throttle_ms: u64) -> Self {
        Self {
            quote_suffixes,
            throttle_ms,
            last_accepted_ms: HashMap::new(),
            snapshot: PriceSnapshot::new(),
            stats: IngestStats::default(),
        }
    }

    pub fn snapshot(&self) -> &PriceSnapshot {
        &self.snapshot
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn is_tracked(&self, symbol: &str) -> bool {
        self.quote_suffixes
            .iter()
            .any(|suffix| symbol.ends_with(suffix.as_str()))
    }

    /// Apply one stream message. Accepted prices are merged into the snapshot
    /// as a single batch; returns the number of symbols accepted.
    pub fn ingest(&mut self, updates: &[TickerUpdate], now_ms: u64) -> usize {
        self.stats.messages += 1;

        let mut accepted: Vec<(&str, f64)> = Vec::new();
        for update in updates {
            if !self.is_tracked(&update.symbol) {
                self.stats.filtered += 1;
                continue;
            }
            let due = match self.last_accepted_ms.get(&update.symbol) {
                Some(&last) => now_ms.saturating_sub(last) >= self.throttle_ms,
                None => true,
            };
            if !due {
                self.stats.throttled += 1;
                continue;
            }
            self.last_accepted_ms.insert(update.symbol.clone(), now_ms);
            accepted.push((update.symbol.as_str(), update.price));
        }

        for (symbol, price) in &accepted {
            // A repeated symbol within one message is throttled: first record wins.
            self.snapshot.insert((*symbol).to_string(), *price);
        }
        self.stats.accepted += accepted.len() as u64;
        accepted.len()
    }

    pub fn record_malformed(&mut self) {
        self.stats.messages += 1;
        self.stats.malformed += 1;
    }

    /// Forget all prices and throttle timestamps. Counters survive.
    pub fn reset(&mut self) {
        self.snapshot.clear();
        self.last_accepted_ms.clear();
    }
}
