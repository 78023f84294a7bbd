use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// One OHLCV bar, second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

const CANDLE_FIELDS: usize = 6;

impl Candle {
    /// Decode one line of the chart host's minute feed:
    /// `2025-06-16T07:32:00+00:00,107109.5,107155.5,107109.5,107128.5,29`.
    pub fn parse(line: &str) -> Result<Self, CodecError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != CANDLE_FIELDS {
            return Err(CodecError::FieldCount { found: fields.len(), expected: CANDLE_FIELDS });
        }

        let timestamp = DateTime::parse_from_rfc3339(fields[0])
            .map_err(|_| CodecError::BadTimestamp(fields[0].to_string()))?
            .with_timezone(&Utc);

        Ok(Candle {
            timestamp,
            open: parse_f64("open", fields[1])?,
            high: parse_f64("high", fields[2])?,
            low: parse_f64("low", fields[3])?,
            close: parse_f64("close", fields[4])?,
            volume: parse_f64("volume", fields[5])?,
        })
    }
}

fn parse_f64(field: &'static str, value: &str) -> Result<f64, CodecError> {
    value.parse().map_err(|_| CodecError::BadDecimal { field, value: value.to_string() })
}
