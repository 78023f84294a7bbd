use thiserror::Error;
use tokio_tungstenite::tungstenite;

pub type Result<T, E = TdError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TdError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected http status {status} from {path}: {body}")]
    Status { path: String, status: u16, body: String },
    #[error("redirect chain from {start} exceeded {max} hops")]
    MaxRedirectDepth { start: String, max: usize },
    #[error("missing {what} in {context}")]
    Extract { what: &'static str, context: String },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("codec error: {0}")]
    Codec(#[from] td_types::CodecError),
    #[error("websocket protocol error: {0}")]
    WsProtocol(String),
    #[error("websocket error: {0}")]
    Ws(#[from] tungstenite::Error),
    #[error("response body over {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("bad json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("timed out")]
    Timeout,
    #[error("cancelled by shutdown")]
    Cancelled,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
