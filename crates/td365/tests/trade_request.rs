use rstest::rstest;
use serde_json::Value;

use td365::http::models::TradeReq;
use td365::types::{TradeDirection, TradeRequest};

fn request(dir: TradeDirection) -> TradeRequest {
    TradeRequest {
        dir,
        market_id: 450,
        quote_id: 15001,
        price: 100.52,
        stake: 2.5,
        stop: 95.0,
        limit: 110.0,
        key: "aGFzaA==".to_string(),
    }
}

#[test]
fn trade_body_uses_the_venue_field_names() {
    let body = serde_json::to_value(TradeReq::from(&request(TradeDirection::Buy))).unwrap();

    assert_eq!(body["marketID"], 450);
    assert_eq!(body["quoteID"], 15001);
    assert_eq!(body["price"], 100.52);
    assert_eq!(body["tradeType"], 1);
    assert_eq!(body["hasClosingOrder"], true);
    assert_eq!(body["isGuaranteed"], false);
    assert_eq!(body["orderModeID"], 3);
    assert_eq!(body["orderTypeID"], 2);
    assert_eq!(body["orderPriceModeID"], 2);
    assert_eq!(body["trailingPoint"], 0);
    assert_eq!(body["closePositionID"], 0);
    assert_eq!(body["isKaazingFeed"], true);
    assert_eq!(body["key"], "aGFzaA==");
    assert!(body["userAgent"].as_str().unwrap().starts_with("Firefox"));
}

#[test]
fn monetary_legs_are_stringified() {
    let body = serde_json::to_value(TradeReq::from(&request(TradeDirection::Buy))).unwrap();
    assert_eq!(body["stake"], Value::String("2.5".into()));
    assert_eq!(body["limitOrderPrice"], Value::String("110".into()));
    assert_eq!(body["stopOrderPrice"], Value::String("95".into()));
}

#[rstest]
#[case(TradeDirection::Buy, false)]
#[case(TradeDirection::Sell, true)]
fn trade_mode_flags_the_sell_side(#[case] dir: TradeDirection, #[case] expected: bool) {
    let body = serde_json::to_value(TradeReq::from(&request(dir))).unwrap();
    assert_eq!(body["tradeMode"], expected);
}
