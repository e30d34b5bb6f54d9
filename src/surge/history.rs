use std::collections::{HashMap, VecDeque};

use super::ingest::PriceSnapshot;

/// Bounded per-symbol sample buffers, oldest first.
#[derive(Debug)]
pub struct PriceHistory {
    capacity: usize,
    samples: HashMap<String, VecDeque<f64>>,
}

impl PriceHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            samples: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, symbol: &str) -> Option<&VecDeque<f64>> {
        self.samples.get(symbol)
    }

    pub fn len_of(&self, symbol: &str) -> usize {
        self.samples.get(symbol).map_or(0, VecDeque::len)
    }

    pub fn is_full(&self, symbol: &str) -> bool {
        self.len_of(symbol) >= self.capacity
    }

    pub fn symbol_count(&self) -> usize {
        self.samples.len()
    }

    /// Append `price` unless it equals the last sample. Returns whether it was stored.
    pub fn record(&mut self, symbol: &str, price: f64) -> bool {
        let capacity = self.capacity;
        let buf = self
            .samples
            .entry(symbol.to_string())
            .or_insert_with(|| VecDeque::with_capacity(capacity));
        if buf.back() == Some(&price) {
            return false;
        }
        buf.push_back(price);
        while buf.len() > self.capacity {
            let _ = buf.pop_front();
        }
        true
    }

    /// Fold a whole snapshot into the buffers. Returns the number of samples appended.
    pub fn record_snapshot(&mut self, snapshot: &PriceSnapshot) -> usize {
        snapshot
            .iter()
            .filter(|(symbol, price)| self.record(symbol, **price))
            .count()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
