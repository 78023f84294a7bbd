pub mod account;
pub mod candle;
pub mod error;
pub mod event;
pub mod market;
pub mod tick;
pub mod trade;

pub use account::{AccountDetails, AccountSummary};
pub use candle::Candle;
pub use error::CodecError;
pub use event::Event;
pub use market::{ClientWebOptionInfo, Market, MarketDetails, MarketDetailsResponse, MarketGroup};
pub use tick::{Direction, Grouping, Tick};
pub use trade::{TradeDirection, TradeEstablished, TradeRequest, TradeResponse};
