use coinreturns_api::types::ChartResponse;

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_btc_chart() {
    let json = load_fixture("btc_chart.json");
    let resp: ChartResponse = serde_json::from_str(&json).unwrap();
    assert!(resp.chart.error.is_none());

    let results = resp.chart.result.unwrap();
    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.meta.symbol, "BTC-USD");
    assert_eq!(result.meta.exchange_name.as_deref(), Some("CCC"));
    assert_eq!(result.meta.instrument_type.as_deref(), Some("CRYPTOCURRENCY"));
    assert_eq!(result.meta.gmtoffset, 0);
    assert_eq!(result.timestamp[0], 1704067200);

    let quote = &result.indicators.quote[0];
    assert_eq!(quote.close.len(), 6);
    assert_eq!(quote.close[2], None);
    assert_eq!(quote.volume[0], Some(18426978443));
}

#[test]
fn deserialize_error_envelope() {
    let json = load_fixture("not_found.json");
    let resp: ChartResponse = serde_json::from_str(&json).unwrap();
    assert!(resp.chart.result.is_none());
    let err = resp.chart.error.unwrap();
    assert_eq!(err.code, "Not Found");
}

#[test]
fn deserialize_result_without_timestamps() {
    let json = load_fixture("empty_result.json");
    let resp: ChartResponse = serde_json::from_str(&json).unwrap();
    let result = &resp.chart.result.unwrap()[0];
    assert!(result.timestamp.is_empty());
    assert!(result.indicators.quote[0].close.is_empty());
    assert!(result.daily_closes().is_empty());
}

#[test]
fn daily_closes_from_eth_fixture() {
    let json = load_fixture("eth_chart.json");
    let resp: ChartResponse = serde_json::from_str(&json).unwrap();
    let closes = resp.chart.result.unwrap()[0].daily_closes();
    assert_eq!(closes.len(), 6);
    assert_eq!(closes[0].date.to_string(), "2024-01-03");
    assert_eq!(closes.iter().filter(|c| c.close.is_none()).count(), 1);
}
