use rstest::rstest;
use td_types::tick::{windows_ticks_to_utc, WINDOWS_TICKS_TO_UNIX_EPOCH};
use td_types::{Direction, Grouping, Tick};

const SAMPLED_LINE: &str =
    "15001,100.50,100.52,+0.25,u,1,101.00,99.80,aGFzaA==,0,100.51,638500000000000000,3";

#[test]
fn parses_a_sampled_tick() {
    let t = Tick::parse(SAMPLED_LINE, Grouping::Sampled).unwrap();
    assert_eq!(t.quote_id, 15001);
    assert_eq!(t.bid, 100.50);
    assert_eq!(t.ask, 100.52);
    assert_eq!(t.daily_change, 0.25);
    assert_eq!(t.dir, Direction::Up);
    assert!(t.tradable);
    assert_eq!(t.high, 101.00);
    assert_eq!(t.low, 99.80);
    assert_eq!(t.hash, "aGFzaA==");
    assert!(!t.call_only);
    assert_eq!(t.mid_price, 100.51);
    assert_eq!(t.field13, 3);
    assert_eq!(t.group, Grouping::Sampled);

    let expected_ns = (638_500_000_000_000_000i64 - WINDOWS_TICKS_TO_UNIX_EPOCH) * 100;
    assert_eq!(t.timestamp.timestamp_nanos_opt(), Some(expected_ns));
}

#[rstest]
#[case(WINDOWS_TICKS_TO_UNIX_EPOCH, 0)]
#[case(WINDOWS_TICKS_TO_UNIX_EPOCH + 1, 100)]
#[case(WINDOWS_TICKS_TO_UNIX_EPOCH + 10_000_000, 1_000_000_000)]
#[case(638_500_000_000_000_000, 1_714_403_200_000_000_000)]
fn windows_ticks_conversion(#[case] ticks: i64, #[case] expected_unix_ns: i64) {
    let ts = windows_ticks_to_utc(ticks);
    assert_eq!(ts.timestamp_nanos_opt(), Some(expected_unix_ns));
}

#[rstest]
#[case("G", Grouping::Grouped)]
#[case("S", Grouping::Sampled)]
#[case("D", Grouping::Delayed)]
#[case("C", Grouping::Candle1m)]
#[case("gp", Grouping::Grouped)]
#[case("sp", Grouping::Sampled)]
#[case("dp", Grouping::Delayed)]
#[case("c1m", Grouping::Candle1m)]
#[case("Grouped", Grouping::Grouped)]
#[case("Sampled", Grouping::Sampled)]
#[case("Delayed", Grouping::Delayed)]
#[case("Candle1Minute", Grouping::Candle1m)]
fn grouping_keys_map_by_first_char(#[case] key: &str, #[case] expected: Grouping) {
    assert_eq!(Grouping::from_key(key).unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("x")]
#[case("1m")]
fn grouping_rejects_unknown_keys(#[case] key: &str) {
    assert!(Grouping::from_key(key).is_err());
}

#[rstest]
#[case("u", Direction::Up)]
#[case("up", Direction::Up)]
#[case("d", Direction::Down)]
#[case("down", Direction::Down)]
#[case("n", Direction::Unchanged)]
#[case("", Direction::Unchanged)]
fn direction_token_first_char(#[case] token: &str, #[case] expected: Direction) {
    let line = format!("1,1.0,1.1,0.0,{token},1,2.0,0.5,h,0,1.05,638500000000000000,3");
    assert_eq!(Tick::parse(&line, Grouping::Grouped).unwrap().dir, expected);
}

/// Rust's float formatting is shortest-round-trip, so stringifying a parsed
/// field and reparsing must reproduce the value bit for bit.
#[rstest]
#[case("0.1")]
#[case("107109.5")]
#[case("-0.3333333333333333")]
#[case("1e-12")]
fn numeric_fields_round_trip(#[case] repr: &str) {
    let line = format!("1,{repr},1.1,0.0,u,1,2.0,0.5,h,0,1.05,638500000000000000,3");
    let t = Tick::parse(&line, Grouping::Sampled).unwrap();
    let reparsed: f64 = format!("{}", t.bid).parse().unwrap();
    assert_eq!(reparsed.to_bits(), t.bid.to_bits());
}

#[test]
fn json_round_trip_preserves_every_field() {
    let t = Tick::parse(SAMPLED_LINE, Grouping::Delayed).unwrap();
    let json = serde_json::to_string(&t).unwrap();
    let back: Tick = serde_json::from_str(&json).unwrap();
    assert_eq!(back.quote_id, t.quote_id);
    assert_eq!(back.hash, t.hash);
    assert_eq!(back.timestamp, t.timestamp);
    assert_eq!(back.group, t.group);
    assert_eq!(back.field13, t.field13);
    assert_eq!(back.latency, t.latency);
}
