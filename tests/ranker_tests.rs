use surge_watch::surge::history::PriceHistory;
use surge_watch::surge::ingest::PriceSnapshot;
use surge_watch::surge::ranker::{percent_change, rank};

const WINDOW: usize = 60;

/// Fill a full window that starts at `reference` and ends at `current`.
fn fill(
    history: &mut PriceHistory,
    snapshot: &mut PriceSnapshot,
    symbol: &str,
    reference: f64,
    current: f64,
) {
    for i in 0..WINDOW - 1 {
        history.record(symbol, reference + i as f64 * 1e-6);
    }
    history.record(symbol, current);
    snapshot.insert(symbol.to_string(), current);
}

#[test]
fn percent_change_formula() {
    assert!((percent_change(102.0, 100.0) - 2.0).abs() < 1e-9);
    assert!((percent_change(95.0, 100.0) + 5.0).abs() < 1e-9);
}

#[test]
fn rank_excludes_symbols_without_full_window() {
    let mut history = PriceHistory::new(WINDOW);
    let mut snapshot = PriceSnapshot::new();
    for i in 0..59 {
        history.record("ETHUSDT", 3_000.0 + i as f64);
    }
    snapshot.insert("ETHUSDT".to_string(), 3_058.0);

    assert!(rank(&snapshot, &history).is_empty());
}

#[test]
fn rank_sorts_descending_by_change() {
    let mut history = PriceHistory::new(WINDOW);
    let mut snapshot = PriceSnapshot::new();
    fill(&mut history, &mut snapshot, "AAAUSDT", 100.0, 99.0);
    fill(&mut history, &mut snapshot, "BBBUSDT", 100.0, 103.0);
    fill(&mut history, &mut snapshot, "CCCUSDT", 100.0, 101.0);

    let ranked = rank(&snapshot, &history);
    let symbols: Vec<&str> = ranked.iter().map(|e| e.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BBBUSDT", "CCCUSDT", "AAAUSDT"]);

    let top = &ranked[0];
    assert_eq!(top.reference_price, 100.0);
    assert_eq!(top.current_price, 103.0);
    assert!((top.percent_change - 3.0).abs() < 1e-9);
    assert!(!ranked[2].is_gain());
}

#[test]
/// Equal changes keep the snapshot's first-seen order.
fn rank_ties_keep_snapshot_order() {
    let mut history = PriceHistory::new(WINDOW);
    let mut snapshot = PriceSnapshot::new();
    fill(&mut history, &mut snapshot, "ZZZUSDT", 10.0, 11.0);
    fill(&mut history, &mut snapshot, "AAAUSDT", 10.0, 11.0);
    fill(&mut history, &mut snapshot, "MMMUSDT", 10.0, 11.0);

    let ranked = rank(&snapshot, &history);
    let symbols: Vec<&str> = ranked.iter().map(|e| e.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["ZZZUSDT", "AAAUSDT", "MMMUSDT"]);
}

#[test]
fn rank_uses_current_snapshot_price() {
    let mut history = PriceHistory::new(WINDOW);
    let mut snapshot = PriceSnapshot::new();
    fill(&mut history, &mut snapshot, "BTCUSDT", 100.0, 101.0);
    snapshot.insert("BTCUSDT".to_string(), 104.0);

    let ranked = rank(&snapshot, &history);
    assert_eq!(ranked[0].current_price, 104.0);
    assert!((ranked[0].percent_change - 4.0).abs() < 1e-9);
}
