use serde::Deserialize;

use crate::error::AppError;
use crate::model::ticker::TickerUpdate;

/// Raw price field: Binance sends strings, some mirrors send numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Text(String),
    Number(f64),
}

impl RawPrice {
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Number(n) => Some(*n),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Element of the `!ticker@arr` stream. Only the fields the detector reads are kept.
#[derive(Debug, Deserialize)]
pub struct BinanceTickerEvent {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "c")]
    pub last_price: RawPrice,
}

impl BinanceTickerEvent {
    pub fn to_update(&self) -> Result<TickerUpdate, AppError> {
        match self.last_price.to_f64() {
            Some(price) if price.is_finite() && price > 0.0 => {
                Ok(TickerUpdate::new(self.symbol.clone(), price))
            }
            _ => Err(AppError::InvalidPrice {
                symbol: self.symbol.clone(),
                raw: self.last_price.describe(),
            }),
        }
    }
}

/// Result of decoding one stream message.
#[derive(Debug, Default)]
pub struct DecodedBatch {
    pub updates: Vec<TickerUpdate>,
    /// Records dropped because their price could not be used.
    pub rejected: usize,
}

/// Decode one `!ticker@arr` text frame. A payload that is not an array of
/// ticker objects is an error; individual records with a bad price are skipped.
pub fn decode_ticker_array(text: &str) -> Result<DecodedBatch, AppError> {
    let events: Vec<BinanceTickerEvent> = serde_json::from_str(text)?;
    let mut batch = DecodedBatch {
        updates: Vec::with_capacity(events.len()),
        rejected: 0,
    };
    for event in &events {
        match event.to_update() {
            Ok(update) => batch.updates.push(update),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping ticker record");
                batch.rejected += 1;
            }
        }
    }
    Ok(batch)
}
