use surge_watch::model::ticker::RankedEntry;
use surge_watch::surge::alert::{AlertGate, AlertPresentation, AlertSink};

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Default)]
struct RecordingSink {
    shown: Vec<String>,
    dismissed: usize,
}

impl AlertSink for RecordingSink {
    fn show(&mut self, entry: &RankedEntry) {
        self.shown.push(entry.symbol.clone());
    }

    fn dismiss(&mut self) {
        self.dismissed += 1;
    }
}

fn entry(symbol: &str, pct: f64) -> RankedEntry {
    RankedEntry {
        symbol: symbol.to_string(),
        current_price: 100.0 + pct,
        reference_price: 100.0,
        percent_change: pct,
    }
}

fn gate() -> AlertGate<RecordingSink> {
    AlertGate::new(2.0, DAY_MS, RecordingSink::default())
}

#[test]
fn below_threshold_never_fires() {
    let mut g = gate();
    assert!(g.evaluate(&[entry("BTCUSDT", 1.99)], 0).is_none());
    assert!(g.evaluate(&[], 0).is_none());
    assert_eq!(*g.presentation(), AlertPresentation::Hidden);
}

#[test]
fn threshold_is_inclusive() {
    let mut g = gate();
    let fired = g.evaluate(&[entry("BTCUSDT", 2.0)], 5);
    assert_eq!(fired.map(|e| e.symbol), Some("BTCUSDT".to_string()));
    assert_eq!(g.last_alert_ms("BTCUSDT"), Some(5));
    assert!(g.is_shown());
    assert_eq!(g.sink().shown, vec!["BTCUSDT"]);
}

#[test]
/// A symbol that alerted at T stays silent until T+24h even while still surging.
fn cooldown_suppresses_repeat_alerts_for_a_day() {
    let mut g = gate();
    let t = 1_000;
    assert!(g.evaluate(&[entry("BTCUSDT", 3.0)], t).is_some());
    g.dismiss();

    assert!(g.evaluate(&[entry("BTCUSDT", 3.0)], t + 1).is_none());
    assert!(g.evaluate(&[entry("BTCUSDT", 5.0)], t + DAY_MS - 1).is_none());
    assert!(!g.is_shown());

    assert!(g.evaluate(&[entry("BTCUSDT", 3.0)], t + DAY_MS).is_some());
    assert_eq!(g.sink().shown.len(), 2);
}

#[test]
/// Only the top qualifying entry is evaluated; if it is cooling down nothing fires.
fn only_top_qualifying_entry_is_considered() {
    let mut g = gate();
    let ranked = vec![entry("AAAUSDT", 6.0), entry("BBBUSDT", 4.0)];
    assert_eq!(g.evaluate(&ranked, 0).unwrap().symbol, "AAAUSDT");
    assert!(g.evaluate(&ranked, 10).is_none());
    assert!(g.last_alert_ms("BBBUSDT").is_none());

    let reordered = vec![entry("BBBUSDT", 7.0), entry("AAAUSDT", 6.0)];
    assert_eq!(g.evaluate(&reordered, 20).unwrap().symbol, "BBBUSDT");
}

#[test]
fn first_entry_at_or_above_threshold_is_used_even_if_not_first_in_list() {
    let mut g = AlertGate::new(2.0, DAY_MS, RecordingSink::default());
    // Ranked lists are sorted, but the gate only relies on "first qualifying".
    let ranked = vec![entry("AAAUSDT", 1.0), entry("BBBUSDT", 2.5)];
    assert_eq!(g.evaluate(&ranked, 0).unwrap().symbol, "BBBUSDT");
}

#[test]
fn dismiss_hides_but_keeps_cooldown() {
    let mut g = gate();
    g.evaluate(&[entry("BTCUSDT", 2.5)], 100);
    assert!(g.dismiss());
    assert_eq!(*g.presentation(), AlertPresentation::Hidden);
    assert_eq!(g.sink().dismissed, 1);
    assert_eq!(g.last_alert_ms("BTCUSDT"), Some(100));
    assert!(g.is_cooling_down("BTCUSDT", 200));
}

#[test]
fn dismiss_when_hidden_is_a_no_op() {
    let mut g = gate();
    assert!(!g.dismiss());
    assert_eq!(g.sink().dismissed, 0);
}

#[test]
fn new_alert_while_shown_replaces_active_entry() {
    let mut g = gate();
    g.evaluate(&[entry("AAAUSDT", 2.5)], 0);
    g.evaluate(&[entry("BBBUSDT", 3.5)], 1);
    assert_eq!(g.active_alert().map(|e| e.symbol.as_str()), Some("BBBUSDT"));
    assert_eq!(g.sink().shown, vec!["AAAUSDT", "BBBUSDT"]);
}
