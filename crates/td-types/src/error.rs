use thiserror::Error;

/// Failure while decoding one of the venue's wire payloads.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("tick record has {found} fields, expected {expected}")]
    FieldCount { found: usize, expected: usize },
    #[error("bad integer in {field}: {value:?}")]
    BadInt { field: &'static str, value: String },
    #[error("bad decimal in {field}: {value:?}")]
    BadDecimal { field: &'static str, value: String },
    #[error("bad timestamp: {0:?}")]
    BadTimestamp(String),
    #[error("unknown price grouping key: {0:?}")]
    UnknownGrouping(String),
}
