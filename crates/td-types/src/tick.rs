use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Offset between the .NET tick epoch (0001-01-01) and the Unix epoch,
/// in 100 ns ticks.
pub const WINDOWS_TICKS_TO_UNIX_EPOCH: i64 = 621_355_968_000_000_000;

/// One .NET tick is 100 ns.
pub const NANOS_PER_WINDOWS_TICK: i64 = 100;

/// Convert a .NET tick count into a UTC instant with nanosecond resolution.
pub fn windows_ticks_to_utc(windows_ticks: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos((windows_ticks - WINDOWS_TICKS_TO_UNIX_EPOCH) * NANOS_PER_WINDOWS_TICK)
}

/// Movement of the quote relative to the previous update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Unchanged,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// The venue's classification of a price update.
///
/// `Grouped` is book aggregation, `Sampled` is rate limited, `Delayed` is
/// unlicensed data and `Candle1m` is a one-minute bar update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    Grouped,
    Sampled,
    Delayed,
    Candle1m,
}

impl Grouping {
    /// Map a wire token onto its grouping.
    ///
    /// The venue spells groupings several ways (`"Sampled"` in subscribe
    /// acknowledgements, `"sp"` as a price-frame key); the first character
    /// is discriminating in every spelling.
    pub fn from_key(key: &str) -> Result<Self, CodecError> {
        match key.as_bytes().first().map(u8::to_ascii_uppercase) {
            Some(b'G') => Ok(Grouping::Grouped),
            Some(b'S') => Ok(Grouping::Sampled),
            Some(b'D') => Ok(Grouping::Delayed),
            Some(b'C') => Ok(Grouping::Candle1m),
            _ => Err(CodecError::UnknownGrouping(key.to_string())),
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grouping::Grouped => write!(f, "grouped"),
            Grouping::Sampled => write!(f, "sampled"),
            Grouping::Delayed => write!(f, "delayed"),
            Grouping::Candle1m => write!(f, "candle1m"),
        }
    }
}

/// A single price update for one quote stream.
///
/// Decoded from the venue's 13-field comma-separated record:
/// `quote_id,bid,ask,daily_change,dir,tradable,high,low,hash,call_only,mid_price,windows_ticks,field13`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tick {
    pub quote_id: i32,
    pub bid: f64,
    pub ask: f64,
    pub daily_change: f64,
    pub dir: Direction,
    pub tradable: bool,
    pub high: f64,
    pub low: f64,
    /// Base64 opaque quote token; echoed back as `key` on trade requests so
    /// the venue can check quote freshness.
    pub hash: String,
    pub call_only: bool,
    pub mid_price: f64,
    /// Server-side send time, converted from .NET ticks.
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    pub timestamp: DateTime<Utc>,
    /// Trailing wire field of unknown purpose; preserved verbatim.
    pub field13: i32,
    pub group: Grouping,
    /// Receive time minus `timestamp`, measured at decode.
    #[serde(with = "nanos")]
    pub latency: TimeDelta,
}

const TICK_FIELDS: usize = 13;

impl Tick {
    /// Decode one comma-separated price record.
    ///
    /// The grouping is not part of the record; it is carried by the
    /// containing JSON key and supplied by the caller.
    pub fn parse(line: &str, group: Grouping) -> Result<Self, CodecError> {
        let mut fields = [""; TICK_FIELDS];
        let mut n = 0;
        for part in line.split(',') {
            if n == TICK_FIELDS {
                return Err(CodecError::FieldCount { found: n + 1, expected: TICK_FIELDS });
            }
            fields[n] = part;
            n += 1;
        }
        if n != TICK_FIELDS {
            return Err(CodecError::FieldCount { found: n, expected: TICK_FIELDS });
        }

        let dir = match fields[4].as_bytes().first() {
            Some(b'u') => Direction::Up,
            Some(b'd') => Direction::Down,
            _ => Direction::Unchanged,
        };

        let windows_ticks = parse_i64("timestamp", fields[11])?;
        let timestamp = windows_ticks_to_utc(windows_ticks);
        let latency = Utc::now() - timestamp;

        Ok(Tick {
            quote_id: parse_i32("quote_id", fields[0])?,
            bid: parse_f64("bid", fields[1])?,
            ask: parse_f64("ask", fields[2])?,
            daily_change: parse_f64("daily_change", fields[3])?,
            dir,
            tradable: fields[5] == "1",
            high: parse_f64("high", fields[6])?,
            low: parse_f64("low", fields[7])?,
            hash: fields[8].to_string(),
            call_only: fields[9] == "1",
            mid_price: parse_f64("mid_price", fields[10])?,
            timestamp,
            field13: parse_i32("field13", fields[12])?,
            group,
            latency,
        })
    }

    /// Bid/ask spread.
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tick {{ quote_id: {}, bid: {}, ask: {}, spread: {}, change: {}, dir: {}, high: {}, low: {}, mid: {}, tradable: {}, call_only: {}, field13: {}, time: {}, latency: {:.3}ms, type: {} }}",
            self.quote_id,
            self.bid,
            self.ask,
            self.spread(),
            self.daily_change,
            self.dir,
            self.high,
            self.low,
            self.mid_price,
            self.tradable,
            self.call_only,
            self.field13,
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.latency.num_nanoseconds().unwrap_or(i64::MAX) as f64 / 1e6,
            self.group,
        )
    }
}

fn parse_i32(field: &'static str, value: &str) -> Result<i32, CodecError> {
    value.parse().map_err(|_| CodecError::BadInt { field, value: value.to_string() })
}

fn parse_i64(field: &'static str, value: &str) -> Result<i64, CodecError> {
    value.parse().map_err(|_| CodecError::BadInt { field, value: value.to_string() })
}

fn parse_f64(field: &'static str, value: &str) -> Result<f64, CodecError> {
    value.parse().map_err(|_| CodecError::BadDecimal { field, value: value.to_string() })
}

/// Serialize a `TimeDelta` as a nanosecond count.
mod nanos {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        value.num_nanoseconds().unwrap_or(i64::MAX).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        Ok(TimeDelta::nanoseconds(i64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_tick_epoch_boundary() {
        let at_epoch = windows_ticks_to_utc(WINDOWS_TICKS_TO_UNIX_EPOCH);
        assert_eq!(at_epoch, DateTime::<Utc>::UNIX_EPOCH);
        let one_tick_later = windows_ticks_to_utc(WINDOWS_TICKS_TO_UNIX_EPOCH + 1);
        assert_eq!((one_tick_later - at_epoch).num_nanoseconds(), Some(100));
    }

    #[test]
    fn direction_defaults_to_unchanged() {
        let line = "1,1.0,1.1,0.0,x,1,2.0,0.5,aGFzaA==,0,1.05,638500000000000000,3";
        let t = Tick::parse(line, Grouping::Grouped).unwrap();
        assert_eq!(t.dir, Direction::Unchanged);
    }

    #[test]
    fn rejects_short_record() {
        let err = Tick::parse("1,2,3", Grouping::Sampled).unwrap_err();
        assert!(matches!(err, CodecError::FieldCount { found: 3, .. }));
    }

    #[test]
    fn rejects_long_record() {
        let line = "1,1.0,1.1,0.0,u,1,2.0,0.5,h,0,1.05,638500000000000000,3,extra";
        assert!(matches!(
            Tick::parse(line, Grouping::Sampled),
            Err(CodecError::FieldCount { .. })
        ));
    }

    #[test]
    fn rejects_bad_decimal() {
        let line = "1,abc,1.1,0.0,u,1,2.0,0.5,h,0,1.05,638500000000000000,3";
        assert!(matches!(
            Tick::parse(line, Grouping::Sampled),
            Err(CodecError::BadDecimal { field: "bid", .. })
        ));
    }
}
