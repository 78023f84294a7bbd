use crate::account::{AccountDetails, AccountSummary};
use crate::tick::Tick;
use crate::trade::TradeEstablished;

/// One decoded item off the stream, delivered in socket order.
#[derive(Debug, Clone)]
pub enum Event {
    Tick(Tick),
    AccountSummary(AccountSummary),
    AccountDetails(AccountDetails),
    TradeEstablished(TradeEstablished),
    /// Subscription acknowledged; carries the current snapshot ticks.
    SubscribeAck(Vec<Tick>),
    /// A bounded `wait` elapsed with nothing to deliver.
    Timeout,
    /// The session ended and will not reconnect.
    ConnectionClosed,
    /// A non-fatal protocol problem, e.g. a rejected subscription.
    Error(String),
}
