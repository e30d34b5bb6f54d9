use surge_watch::surge::history::PriceHistory;
use surge_watch::surge::ingest::PriceSnapshot;

#[test]
fn record_skips_repeated_price() {
    let mut h = PriceHistory::new(60);
    assert!(h.record("BTCUSDT", 100.0));
    assert!(!h.record("BTCUSDT", 100.0));
    assert!(h.record("BTCUSDT", 101.0));
    assert!(h.record("BTCUSDT", 100.0));
    assert_eq!(h.len_of("BTCUSDT"), 3);
}

#[test]
fn record_evicts_oldest_at_capacity() {
    let mut h = PriceHistory::new(60);
    for i in 0..75 {
        h.record("BTCUSDT", 100.0 + i as f64);
    }
    let buf = h.get("BTCUSDT").unwrap();
    assert_eq!(buf.len(), 60);
    assert_eq!(buf.front(), Some(&115.0));
    assert_eq!(buf.back(), Some(&174.0));
    assert!(h.is_full("BTCUSDT"));
}

#[test]
/// Length cap and no-adjacent-duplicates hold under a noisy feed.
fn invariants_hold_for_oscillating_prices() {
    let mut h = PriceHistory::new(60);
    for i in 0..500u32 {
        let price = [1.0, 1.0, 2.0, 2.0, 3.0, 1.0][(i % 6) as usize];
        h.record("DOGEUSDT", price);
    }
    let buf = h.get("DOGEUSDT").unwrap();
    assert!(buf.len() <= 60);
    for (a, b) in buf.iter().zip(buf.iter().skip(1)) {
        assert_ne!(a, b);
    }
}

#[test]
fn record_snapshot_appends_only_changed_symbols() {
    let mut h = PriceHistory::new(60);
    let mut snap = PriceSnapshot::new();
    snap.insert("BTCUSDT".to_string(), 100.0);
    snap.insert("ETHUSDT".to_string(), 3_000.0);
    assert_eq!(h.record_snapshot(&snap), 2);

    snap.insert("BTCUSDT".to_string(), 100.5);
    assert_eq!(h.record_snapshot(&snap), 1);
    assert_eq!(h.len_of("BTCUSDT"), 2);
    assert_eq!(h.len_of("ETHUSDT"), 1);
    assert_eq!(h.len_of("SOLUSDT"), 0);
    assert_eq!(h.symbol_count(), 2);
}

#[test]
fn clear_forgets_all_symbols() {
    let mut h = PriceHistory::new(3);
    h.record("BTCUSDT", 1.0);
    h.clear();
    assert_eq!(h.symbol_count(), 0);
    assert!(h.get("BTCUSDT").is_none());
}
