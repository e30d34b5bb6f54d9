use crate::model::ticker::RankedEntry;

use super::history::PriceHistory;
use super::ingest::PriceSnapshot;

pub fn percent_change(current: f64, reference: f64) -> f64 {
    (current - reference) / reference * 100.0
}

/// Rank every symbol whose history window is full, largest gain first.
///
/// The sort is stable, so equal changes keep snapshot (first-seen) order.
pub fn rank(snapshot: &PriceSnapshot, history: &PriceHistory) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = snapshot
        .iter()
        .filter_map(|(symbol, &current_price)| {
            if !history.is_full(symbol) {
                return None;
            }
            let reference_price = history.get(symbol)?.front().copied()?;
            Some(RankedEntry {
                symbol: symbol.clone(),
                current_price,
                reference_price,
                percent_change: percent_change(current_price, reference_price),
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.percent_change.total_cmp(&a.percent_change));
    ranked
}
