use serde_json::{json, Value};

use crate::common::consts;

/// A decoded server frame, keyed by the top-level `"t"` tag.
#[derive(Debug)]
pub enum ServerMessage {
    ConnectResponse,
    AuthenticationResponse { cid: Option<String>, result: bool },
    ReconnectResponse { cid: Option<String> },
    Heartbeat { counters: Value },
    SubscribeResponse { has_error: bool, grouping: String, current: Vec<String> },
    PriceData { groups: Value },
    AccountSummary { payload: Value },
    AccountDetails { payload: Value },
    TradeEstablished { payload: Value },
    Unknown { tag: String, raw: Value },
}

impl ServerMessage {
    pub fn parse(text: &str) -> serde_json::Result<ServerMessage> {
        let value: Value = serde_json::from_str(text)?;
        let tag = value["t"].as_str().unwrap_or_default().to_string();
        Ok(match tag.as_str() {
            "connectResponse" => ServerMessage::ConnectResponse,
            "authenticationResponse" => ServerMessage::AuthenticationResponse {
                cid: value["cid"].as_str().map(str::to_string),
                result: value["d"]["Result"].as_bool().unwrap_or(false),
            },
            "reconnectResponse" => ServerMessage::ReconnectResponse {
                cid: value["cid"].as_str().map(str::to_string),
            },
            "heartbeat" => ServerMessage::Heartbeat { counters: value["d"].clone() },
            "subscribeResponse" => ServerMessage::SubscribeResponse {
                has_error: value["d"]["HasError"].as_bool().unwrap_or(true),
                grouping: value["d"]["PriceGrouping"].as_str().unwrap_or_default().to_string(),
                current: value["d"]["Current"]
                    .as_array()
                    .map(|lines| {
                        lines.iter().filter_map(|l| l.as_str().map(str::to_string)).collect()
                    })
                    .unwrap_or_default(),
            },
            "p" => ServerMessage::PriceData { groups: value["d"].clone() },
            "accountSummary" => ServerMessage::AccountSummary { payload: value["d"].clone() },
            "accountDetails" => ServerMessage::AccountDetails { payload: value["d"].clone() },
            "tradeEstablished" => ServerMessage::TradeEstablished { payload: value["d"].clone() },
            _ => ServerMessage::Unknown { tag, raw: value },
        })
    }
}

pub fn authentication(login_id: &str, token: &str) -> Value {
    json!({
        "action": "authentication",
        "loginId": login_id,
        "tradingAccountType": "SPREAD",
        "token": token,
        "reason": "Connect",
        "clientVersion": consts::WS_CLIENT_VERSION,
    })
}

pub fn reconnect(original_connection_id: &str) -> Value {
    json!({
        "action": "reconnect",
        "originalConnectionId": original_connection_id,
    })
}

// The server expects `data` as a JSON-encoded string, not an object.
const OPTIONS_DATA: &str = r#"{"SubscribeToAccountSummary":true,"SubscribeToAccountDetails":true}"#;

pub fn options() -> Value {
    json!({
        "action": "options",
        "data": OPTIONS_DATA,
    })
}

/// Echo the server's counters back untouched, flagged visible.
pub fn heartbeat_echo(counters: &Value) -> Value {
    json!({
        "SentByServer": counters["SentByServer"],
        "MessagesReceived": counters["MessagesReceived"],
        "PricesReceived": counters["PricesReceived"],
        "MessagesSent": counters["MessagesSent"],
        "PricesSent": counters["PricesSent"],
        "Visible": true,
        "action": "heartbeat",
    })
}

pub fn subscription(action: &str, quote_id: i32) -> Value {
    json!({
        "quoteId": quote_id,
        "priceGrouping": "Sampled",
        "action": action,
    })
}
