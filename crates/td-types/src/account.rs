use serde::{Deserialize, Serialize};

/// Rolled-up account state pushed over the stream.
///
/// The venue also publishes a placeholder summary with `platform_id == 0`
/// for non-trading platforms; the session layer drops those.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    #[serde(rename = "AccountID")]
    pub account_id: String,
    #[serde(rename = "PlatformID")]
    pub platform_id: i32,
    #[serde(rename = "AccountValuation")]
    pub account_valuation: f64,
    #[serde(rename = "FundedPercentage", default)]
    pub funded_percentage: String,
    #[serde(rename = "ClientID")]
    pub client_id: i32,
    #[serde(rename = "TradingAccountType", default)]
    pub trading_account_type: String,
    #[serde(rename = "Margin")]
    pub margin: f64,
    #[serde(rename = "OpenPnLQuote")]
    pub open_pnl_quote: f64,
    #[serde(rename = "AccountBalance")]
    pub account_balance: f64,
    #[serde(rename = "Credit")]
    pub credit: f64,
    #[serde(rename = "WaivedMargin")]
    pub waived_margin: f64,
    #[serde(rename = "Resources")]
    pub resources: f64,
    #[serde(rename = "ChangeIMR")]
    pub change_imr: f64,
    #[serde(rename = "VariationMarginRequired")]
    pub variation_margin_required: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertList {
    #[serde(rename = "TotalRecords", default)]
    pub total_records: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyRecord {
    #[serde(rename = "AccountBalance")]
    pub account_balance: f64,
    #[serde(rename = "AccountValuation")]
    pub account_valuation: f64,
    #[serde(rename = "CreditAllocation")]
    pub credit_allocation: f64,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "CurrencyCode")]
    pub currency_code: String,
    #[serde(rename = "CurrencySymbol")]
    pub currency_symbol: String,
    #[serde(rename = "InitialMargin")]
    pub initial_margin: f64,
    #[serde(rename = "IsTotal")]
    pub is_total: bool,
    #[serde(rename = "MarginPercentage")]
    pub margin_percentage: String,
    #[serde(rename = "OpenPL")]
    pub open_pl: f64,
    #[serde(rename = "Percentage")]
    pub percentage: String,
    #[serde(rename = "Status")]
    pub status: i32,
    #[serde(rename = "TradingResources")]
    pub trading_resources: f64,
    #[serde(rename = "VariationMarginRequired")]
    pub variation_margin_required: f64,
    #[serde(rename = "WaivedInitialMarginLimit")]
    pub waived_initial_margin_limit: f64,
    #[serde(rename = "PT", default)]
    pub pt: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencySet {
    #[serde(rename = "Records", default)]
    pub records: Vec<CurrencyRecord>,
    #[serde(rename = "Status", default)]
    pub status: i32,
    #[serde(rename = "TotalRecords", default)]
    pub total_records: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpeningOrders {
    #[serde(rename = "Status", default)]
    pub status: i32,
    #[serde(rename = "TotalRecords", default)]
    pub total_records: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRecord {
    #[serde(rename = "BetPer")]
    pub bet_per: f64,
    #[serde(rename = "CreationTime")]
    pub creation_time: String,
    #[serde(rename = "CreationTimeUTC")]
    pub creation_time_utc: String,
    #[serde(rename = "CurrencyCode")]
    pub currency_code: String,
    #[serde(rename = "CurrencySymbol")]
    pub currency_symbol: String,
    #[serde(rename = "CurrentPrice")]
    pub current_price: String,
    #[serde(rename = "CurrentPriceDecimal")]
    pub current_price_decimal: f64,
    #[serde(rename = "Direction")]
    pub direction: String,
    #[serde(rename = "ExpiryDateTime")]
    pub expiry_date_time: String,
    #[serde(rename = "IMR")]
    pub imr: f64,
    #[serde(rename = "IsRollingMarket")]
    pub is_rolling_market: bool,
    #[serde(rename = "IsTotal")]
    pub is_total: bool,
    #[serde(rename = "IsTriggered")]
    pub is_triggered: bool,
    #[serde(rename = "LimitOrderPrice")]
    pub limit_order_price: String,
    #[serde(rename = "LimitOrderPriceDecimal")]
    pub limit_order_price_decimal: f64,
    #[serde(rename = "MarginFactor")]
    pub margin_factor: f64,
    #[serde(rename = "MarketID")]
    pub market_id: i32,
    #[serde(rename = "MarketName")]
    pub market_name: String,
    #[serde(rename = "NotionalValue")]
    pub notional_value: f64,
    #[serde(rename = "OpenPL")]
    pub open_pl: f64,
    #[serde(rename = "OpeningPrice")]
    pub opening_price: String,
    #[serde(rename = "OpeningPriceDecimal")]
    pub opening_price_decimal: f64,
    #[serde(rename = "OrderID")]
    pub order_id: i64,
    #[serde(rename = "OrderType")]
    pub order_type: String,
    #[serde(rename = "PositionID")]
    pub position_id: i64,
    #[serde(rename = "PrcGenDecimalPlaces")]
    pub prc_gen_decimal_places: i32,
    #[serde(rename = "QuoteID")]
    pub quote_id: i64,
    #[serde(rename = "Stake")]
    pub stake: f64,
    #[serde(rename = "StopOrderPrice")]
    pub stop_order_price: String,
    #[serde(rename = "StopOrderPriceDecimal")]
    pub stop_order_price_decimal: f64,
    #[serde(rename = "StopType")]
    pub stop_type: String,
    #[serde(rename = "Tradable")]
    pub tradable: bool,
    #[serde(rename = "Type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionSet {
    #[serde(rename = "Records", default)]
    pub records: Vec<PositionRecord>,
    #[serde(rename = "Status", default)]
    pub status: i32,
    #[serde(rename = "TotalRecords", default)]
    pub total_records: i32,
}

/// Full account breakdown pushed over the stream.
///
/// The container sections are not always present; an absent section decodes
/// as its empty form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDetails {
    #[serde(rename = "Alerts", default)]
    pub alerts: AlertList,
    #[serde(rename = "CalculatedUtcTicks", default)]
    pub calculated_utc_ticks: i64,
    #[serde(rename = "ClientID", default)]
    pub client_id: i32,
    #[serde(rename = "ClientLanguageID", default)]
    pub client_language_id: i32,
    #[serde(rename = "Currencies", default)]
    pub currencies: CurrencySet,
    #[serde(rename = "OpeningOrders", default)]
    pub opening_orders: OpeningOrders,
    #[serde(rename = "Positions", default)]
    pub positions: PositionSet,
    #[serde(rename = "TradingAccountType", default)]
    pub trading_account_type: String,
}
