/// One `{symbol, last price}` record from the all-symbols ticker feed.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerUpdate {
    pub symbol: String,
    pub price: f64,
}

impl TickerUpdate {
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }
}

/// A symbol with a full history window, as produced by the ranker.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub symbol: String,
    pub current_price: f64,
    /// Oldest sample of the window.
    pub reference_price: f64,
    pub percent_change: f64,
}

impl RankedEntry {
    pub fn is_gain(&self) -> bool {
        self.percent_change >= 0.0
    }
}
