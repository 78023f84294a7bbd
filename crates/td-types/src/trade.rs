use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// Inputs for a market order.
///
/// `key` must be the `hash` of the tick the decision was taken on; the venue
/// rejects stale quotes by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequest {
    pub dir: TradeDirection,
    pub market_id: i32,
    pub quote_id: i32,
    pub price: f64,
    pub stake: f64,
    pub stop: f64,
    pub limit: f64,
    pub key: String,
}

/// The venue's reply to `RequestTrade`, kept as the raw document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeResponse(pub serde_json::Value);

/// Stream notification that a trade has been booked, kept as the raw
/// document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeEstablished(pub serde_json::Value);
