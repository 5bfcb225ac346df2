//! Property-based tests for scalar decoding
//!
//! Backend rows are untrusted input, so decoding must reject garbage with an
//! error rather than panic, and must read only the leading
//! `yyyy-MM-dd'T'HH:mm:ss` part of a timestamp.

use chrono::{NaiveDate, NaiveTime};
use codeweek_proto::{
    CHANNEL_MAIN, MessageRecord,
    codec::{decode_timestamp, encode_timestamp},
    decode_channel,
};
use proptest::prelude::*;

/// Strategy for timestamps the backend could plausibly render.
fn arbitrary_datetime() -> impl Strategy<Value = chrono::DateTime<chrono::Utc>> {
    (1970i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(year, month, day, hour, minute, second)| {
            let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
            let time = NaiveTime::from_hms_opt(hour, minute, second).unwrap_or_default();
            date.and_time(time).and_utc()
        },
    )
}

/// Suffixes the backend appends after the seconds field.
fn arbitrary_suffix() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("Z".to_string()),
        "\\.[0-9]{1,6}",
        "\\.[0-9]{1,6}\\+[0-9]{2}:[0-9]{2}",
        "[+-][0-9]{2}:[0-9]{2}",
    ]
}

proptest! {
    #[test]
    fn prop_timestamp_decode_never_panics(input in ".*") {
        let _ = decode_timestamp(&input);
    }

    #[test]
    fn prop_timestamp_suffix_is_ignored(ts in arbitrary_datetime(), suffix in arbitrary_suffix()) {
        let rendered = format!("{}{suffix}", encode_timestamp(&ts));
        prop_assert_eq!(decode_timestamp(&rendered).ok(), Some(ts));
    }

    #[test]
    fn prop_decode_channel_keeps_only_target_channel(
        channels in prop::collection::vec(prop_oneof![Just("main"), Just("random"), Just("")], 0..32)
    ) {
        let records: Vec<MessageRecord> = channels
            .iter()
            .enumerate()
            .map(|(i, channel)| MessageRecord {
                id: uuid::Uuid::from_u128(i as u128 + 1).to_string(),
                created: "2019-10-12T14:03:21.123+00:00".to_string(),
                channel: (*channel).to_string(),
                user_name: None,
                content: i.to_string(),
            })
            .collect();

        let messages = decode_channel(records, CHANNEL_MAIN).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let expected: Vec<String> = channels
            .iter()
            .enumerate()
            .filter(|(_, channel)| **channel == CHANNEL_MAIN)
            .map(|(i, _)| i.to_string())
            .collect();
        let actual: Vec<String> = messages.into_iter().map(|m| m.content).collect();
        prop_assert_eq!(actual, expected);
    }
}
