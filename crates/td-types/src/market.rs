use serde::{Deserialize, Serialize};

/// One entry of the market discovery tree.
///
/// Returned by both the super-group and group listings; when
/// `is_white_label_popular_market` is set the entry is not a real super
/// group and quotes can be listed for it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketGroup {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "IsSuperGroup")]
    pub is_super_group: bool,
    #[serde(rename = "IsWhiteLabelPopularMarket")]
    pub is_white_label_popular_market: bool,
    #[serde(rename = "HasSubscription")]
    pub has_subscription: bool,
}

/// A tradable market as listed by `GetMarketQuote`, field names exactly as
/// the venue emits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    #[serde(rename = "MarketID")]
    pub market_id: i32,
    #[serde(rename = "QuoteID")]
    pub quote_id: i32,
    #[serde(rename = "AtQuoteAtMarket")]
    pub at_quote_at_market: i32,
    #[serde(rename = "ExchangeID")]
    pub exchange_id: i32,
    #[serde(rename = "PrcGenFractionalPrice")]
    pub prc_gen_fractional_price: i32,
    #[serde(rename = "PrcGenDecimalPlaces")]
    pub prc_gen_decimal_places: i32,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "DailyChange")]
    pub daily_change: f64,
    #[serde(rename = "Bid")]
    pub bid: f64,
    #[serde(rename = "Ask")]
    pub ask: f64,
    #[serde(rename = "BetPer")]
    pub bet_per: f64,
    #[serde(rename = "IsGSLPercent")]
    pub is_gsl_percent: i32,
    #[serde(rename = "GSLDis")]
    pub gsl_dis: f64,
    #[serde(rename = "MinCloseOrderDisTicks")]
    pub min_close_order_dis_ticks: f64,
    #[serde(rename = "MinOpenOrderDisTicks")]
    pub min_open_order_dis_ticks: f64,
    #[serde(rename = "DisplayBetPer")]
    pub display_bet_per: f64,
    #[serde(rename = "IsInPortfolio")]
    pub is_in_portfolio: bool,
    #[serde(rename = "Tradable")]
    pub tradable: bool,
    #[serde(rename = "TradeOnWeb")]
    pub trade_on_web: bool,
    #[serde(rename = "CallOnly")]
    pub call_only: bool,
    #[serde(rename = "MarketName")]
    pub market_name: String,
    #[serde(rename = "TradeStartTime")]
    pub trade_start_time: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "AllowGtdsStops")]
    pub allow_gtds_stops: i32,
    #[serde(rename = "ForceOpen")]
    pub force_open: bool,
    #[serde(rename = "Margin")]
    pub margin: f64,
    #[serde(rename = "MarginType")]
    pub margin_type: bool,
    #[serde(rename = "GSLCharge")]
    pub gsl_charge: f64,
    #[serde(rename = "IsGSLChargePercent")]
    pub is_gsl_charge_percent: i32,
    #[serde(rename = "Spread")]
    pub spread: f64,
    #[serde(rename = "TradeRateType")]
    pub trade_rate_type: i32,
    #[serde(rename = "OpenTradeRate")]
    pub open_trade_rate: f64,
    #[serde(rename = "CloseTradeRate")]
    pub close_trade_rate: f64,
    #[serde(rename = "MinOpenTradeRate")]
    pub min_open_trade_rate: f64,
    #[serde(rename = "MinCloseTradeRate")]
    pub min_close_trade_rate: f64,
    #[serde(rename = "PriceDecimal")]
    pub price_decimal: f64,
    #[serde(rename = "Subscription")]
    pub subscription: bool,
    #[serde(rename = "SuperGroupID")]
    pub super_group_id: i32,
}

/// `GetMarketDetails` returns the same record shape as the quote listing.
pub type MarketDetails = Market;

/// Per-account trading defaults attached to a market details response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientWebOptionInfo {
    #[serde(rename = "CFDDefaultStake")]
    pub cfd_default_stake: f64,
    #[serde(rename = "IsDealAlwayHedge")]
    pub is_deal_alway_hedge: bool,
    #[serde(rename = "IsDealAlwayGuarantee")]
    pub is_deal_alway_guarantee: bool,
    #[serde(rename = "IsOneClickTrade")]
    pub is_one_click_trade: bool,
    #[serde(rename = "IsOrderAlwayHedge")]
    pub is_order_alway_hedge: bool,
    #[serde(rename = "IsOrderAlwayGuarantee")]
    pub is_order_alway_guarantee: bool,
    #[serde(rename = "StopTypeID")]
    pub stop_type_id: i32,
    #[serde(rename = "TradeOrderTypeID")]
    pub trade_order_type_id: i32,
    #[serde(rename = "DealDefaultStake")]
    pub deal_default_stake: f64,
    #[serde(rename = "OrderDefaultStake")]
    pub order_default_stake: f64,
    #[serde(rename = "WebMinStake")]
    pub web_min_stake: f64,
    #[serde(rename = "WebMaxStake")]
    pub web_max_stake: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDetailsResponse {
    #[serde(rename = "MarketDetails")]
    pub market_details: MarketDetails,
    #[serde(rename = "WebInfo")]
    pub web_info: ClientWebOptionInfo,
}
