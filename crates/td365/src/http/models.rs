use serde::{Deserialize, Serialize};
use td_types::{TradeDirection, TradeRequest};

use crate::common::consts;

/// Every `/UTSAPI.asmx` response wraps its payload in a `d` key.
#[derive(Debug, Deserialize)]
pub struct DResponse<T> {
    pub d: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketGroupReq {
    pub super_group_id: i32,
}

#[derive(Debug, Serialize)]
pub struct MarketQuoteReq {
    #[serde(rename = "groupID")]
    pub group_id: i32,
    pub keyword: String,
    pub popular: bool,
    pub portfolio: bool,
    pub search: bool,
}

impl MarketQuoteReq {
    pub fn for_group(group_id: i32) -> Self {
        MarketQuoteReq {
            group_id,
            keyword: String::new(),
            popular: false,
            portfolio: false,
            search: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MarketDetailsReq {
    #[serde(rename = "marketID")]
    pub market_id: i32,
}

/// Body of `RequestTrade` and `RequestTradeSimulate`: fixed order/mode ids
/// for a market order, monetary legs stringified the way the venue expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReq {
    #[serde(rename = "marketID")]
    pub market_id: i32,
    #[serde(rename = "quoteID")]
    pub quote_id: i32,
    pub price: f64,
    pub stake: String,
    pub trade_type: i32,
    pub trade_mode: bool,
    pub has_closing_order: bool,
    pub is_guaranteed: bool,
    #[serde(rename = "orderModeID")]
    pub order_mode_id: i32,
    #[serde(rename = "orderTypeID")]
    pub order_type_id: i32,
    #[serde(rename = "orderPriceModeID")]
    pub order_price_mode_id: i32,
    pub limit_order_price: String,
    pub stop_order_price: String,
    pub trailing_point: i32,
    #[serde(rename = "closePositionID")]
    pub close_position_id: i32,
    pub is_kaazing_feed: bool,
    pub user_agent: String,
    pub key: String,
}

impl From<&TradeRequest> for TradeReq {
    fn from(request: &TradeRequest) -> Self {
        TradeReq {
            market_id: request.market_id,
            quote_id: request.quote_id,
            price: request.price,
            stake: request.stake.to_string(),
            trade_type: 1,
            trade_mode: request.dir == TradeDirection::Sell,
            has_closing_order: true,
            is_guaranteed: false,
            order_mode_id: 3,
            order_type_id: 2,
            order_price_mode_id: 2,
            limit_order_price: request.limit.to_string(),
            stop_order_price: request.stop.to_string(),
            trailing_point: 0,
            close_position_id: 0,
            is_kaazing_feed: true,
            user_agent: consts::TRADE_USER_AGENT.to_string(),
            key: request.key.clone(),
        }
    }
}

/// `UpdateClientSessionID` result; any non-zero status means the venue has
/// logged the session out.
#[derive(Debug, Deserialize)]
pub struct SessionStatus {
    #[serde(rename = "Status")]
    pub status: i32,
}

/// Body of the chart host's minute endpoint.
#[derive(Debug, Deserialize)]
pub struct ChartData {
    pub data: Vec<String>,
}
