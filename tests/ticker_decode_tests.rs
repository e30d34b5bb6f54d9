use surge_watch::binance::types::decode_ticker_array;
use surge_watch::error::AppError;

#[test]
fn decode_reads_symbol_and_string_price() {
    let text = r#"[
        {"e":"24hrTicker","E":1700000000000,"s":"BTCUSDT","c":"64250.10000000","o":"63000.0"},
        {"e":"24hrTicker","E":1700000000000,"s":"ETHUSDT","c":"3120.5"}
    ]"#;
    let batch = decode_ticker_array(text).unwrap();
    assert_eq!(batch.updates.len(), 2);
    assert_eq!(batch.updates[0].symbol, "BTCUSDT");
    assert!((batch.updates[0].price - 64_250.1).abs() < 1e-9);
    assert_eq!(batch.rejected, 0);
}

#[test]
fn decode_accepts_numeric_price() {
    let batch = decode_ticker_array(r#"[{"s":"SOLUSDC","c":142.25}]"#).unwrap();
    assert_eq!(batch.updates[0].price, 142.25);
}

#[test]
fn decode_skips_records_with_unusable_price() {
    let text = r#"[
        {"s":"BTCUSDT","c":"abc"},
        {"s":"ETHUSDT","c":"0"},
        {"s":"XRPUSDT","c":"-1"},
        {"s":"ADAUSDT","c":"0.45"}
    ]"#;
    let batch = decode_ticker_array(text).unwrap();
    assert_eq!(batch.updates.len(), 1);
    assert_eq!(batch.updates[0].symbol, "ADAUSDT");
    assert_eq!(batch.rejected, 3);
}

#[test]
fn decode_rejects_non_array_payload() {
    assert!(matches!(
        decode_ticker_array(r#"{"result":null,"id":1}"#),
        Err(AppError::Json(_))
    ));
    assert!(decode_ticker_array("not json").is_err());
    assert!(decode_ticker_array(r#"[{"c":"1.0"}]"#).is_err());
}

#[test]
fn decode_empty_array_is_empty_batch() {
    let batch = decode_ticker_array("[]").unwrap();
    assert!(batch.updates.is_empty());
}
