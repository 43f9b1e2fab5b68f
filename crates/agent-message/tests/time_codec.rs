// Test module - relaxed lint rules
#![allow(clippy::default_trait_access)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::panic)]
#![allow(clippy::manual_assert)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]

use agent_message::times::TIMESTAMP_FORMAT;
use agent_message::{format_timestamp, parse_timestamp, ErrorCode, Timestamp};
use chrono::{TimeZone, Utc};

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn parses_canonical_text() {
    let ts = parse_timestamp("2016-07-19T22:30:09.123Z").unwrap();
    let expected = Utc.with_ymd_and_hms(2016, 7, 19, 22, 30, 9).unwrap()
        + chrono::Duration::milliseconds(123);
    assert_eq!(ts.as_datetime(), expected);
}

#[test]
fn rejects_text_outside_the_pattern() {
    let cases = [
        "",
        "2016-07-19",
        "2016-07-19T22:30:09Z",
        "2016-07-19T22:30:09.12Z",
        "2016-07-19T22:30:09.1234Z",
        "2016-07-19T22:30:09.123",
        "2016-07-19T22:30:09.123+00:00",
        "2016-07-19 22:30:09.123Z",
        "2016/07/19T22:30:09.123Z",
        "+016-07-19T22:30:09.123Z",
        " 2016-07-19T22:30:09.123Z",
        "２016-07-19T22:30:09.123Z",
    ];
    for text in cases {
        let err = parse_timestamp(text).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidTimestamp, "accepted {text:?}");
    }
}

#[test]
fn rejects_impossible_dates() {
    for text in [
        "2016-13-01T00:00:00.000Z",
        "2016-02-30T00:00:00.000Z",
        "2015-02-29T00:00:00.000Z",
        "2016-07-19T24:00:00.000Z",
        "2016-07-19T22:61:00.000Z",
        "2016-00-10T00:00:00.000Z",
    ] {
        assert!(parse_timestamp(text).is_err(), "accepted {text}");
    }
}

#[test]
fn rejects_leap_second_text() {
    let err = parse_timestamp("2016-12-31T23:59:60.000Z").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTimestamp);
}

#[test]
fn rejects_leap_second_datetime() {
    let leap = chrono::NaiveDate::from_ymd_opt(2016, 12, 31)
        .unwrap()
        .and_hms_milli_opt(23, 59, 59, 1_500)
        .unwrap()
        .and_utc();
    let err = Timestamp::from_datetime(leap).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTimestamp);
}

#[test]
fn accepts_leap_day() {
    assert!(parse_timestamp("2016-02-29T12:00:00.000Z").is_ok());
}

// =============================================================================
// Formatting
// =============================================================================

#[test]
fn formats_with_millisecond_precision() {
    let ts = Timestamp::from_unix_millis(1_468_967_409_005).unwrap();
    assert_eq!(format_timestamp(ts), "2016-07-19T22:30:09.005Z");
    assert_eq!(ts.to_string(), "2016-07-19T22:30:09.005Z");
}

#[test]
fn truncates_sub_millisecond_precision() {
    let precise = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()
        + chrono::Duration::nanoseconds(987_654_321);
    let ts = Timestamp::from_datetime(precise).unwrap();
    assert_eq!(format_timestamp(ts), "2020-01-02T03:04:05.987Z");
}

#[test]
fn rejects_years_beyond_four_digits() {
    let far = Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap();
    assert!(Timestamp::from_datetime(far).is_err());
}

#[test]
fn format_string_matches_canonical_layout() {
    let ts = parse_timestamp("1999-12-31T23:59:59.999Z").unwrap();
    assert_eq!(
        ts.as_datetime().format(TIMESTAMP_FORMAT).to_string(),
        "1999-12-31T23:59:59.999Z"
    );
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn parse_inverts_format_across_the_range() {
    let samples = [
        Timestamp::zero(),
        Timestamp::now(),
        Timestamp::from_unix_millis(0).unwrap(),
        Timestamp::from_unix_millis(-1).unwrap(),
        Timestamp::from_unix_millis(1_468_967_409_123).unwrap(),
        parse_timestamp("0000-01-01T00:00:00.000Z").unwrap(),
        parse_timestamp("9999-12-31T23:59:59.999Z").unwrap(),
    ];
    for ts in samples {
        assert_eq!(parse_timestamp(&format_timestamp(ts)).unwrap(), ts);
    }
}

#[test]
fn serde_uses_canonical_text() {
    let ts = parse_timestamp("2016-07-19T22:30:09.123Z").unwrap();
    let json = serde_json::to_string(&ts).unwrap();
    assert_eq!(json, "\"2016-07-19T22:30:09.123Z\"");
    let back: Timestamp = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ts);
    assert!(serde_json::from_str::<Timestamp>("\"yesterday\"").is_err());
}

#[test]
fn default_is_the_unset_wire_time() {
    assert_eq!(Timestamp::default(), Timestamp::zero());
    assert_eq!(Timestamp::zero().to_string(), "0001-01-01T00:00:00.000Z");
}
