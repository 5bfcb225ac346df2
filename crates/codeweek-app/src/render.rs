//! Pure text helpers shared by every frontend.

use std::fmt::Display;

use chrono::TimeZone;
use codeweek_proto::Message;

/// Shown in place of a blank author.
pub const UNKNOWN_AUTHOR: &str = "<Unknown>";

/// Author as displayed. Empty or whitespace-only names become
/// [`UNKNOWN_AUTHOR`].
pub fn display_author(author: &str) -> &str {
    if author.trim().is_empty() { UNKNOWN_AUTHOR } else { author }
}

/// One list line: `"HH:MM - author: content"`, with the time shown in `tz`.
pub fn format_line<Tz>(message: &Message, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time = message.created.with_timezone(tz).format("%H:%M");
    format!("{time} - {}: {}", display_author(&message.author), message.content)
}

/// Character counter label.
pub fn character_count_label(count: usize) -> String {
    format!("{count} characters")
}

/// Message counter label.
pub fn message_count_label(count: usize) -> String {
    format!("{count} messages")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{FixedOffset, Utc};
    use codeweek_proto::codec::decode_timestamp;

    use super::*;

    fn message(author: &str) -> Message {
        Message {
            id: "0f8fad5b-d9cb-469f-a165-70867728950e".parse().unwrap(),
            created: decode_timestamp("2019-10-12T14:03:21.123+00:00").unwrap(),
            channel: "main".to_string(),
            author: author.to_string(),
            content: "hello".to_string(),
        }
    }

    #[test]
    fn blank_author_is_unknown() {
        assert_eq!(display_author(""), "<Unknown>");
        assert_eq!(display_author("   "), "<Unknown>");
        assert_eq!(display_author("alice"), "alice");
    }

    #[test]
    fn line_in_utc() {
        assert_eq!(format_line(&message("alice"), &Utc), "14:03 - alice: hello");
    }

    #[test]
    fn line_in_other_zone() {
        let cest = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_line(&message(""), &cest), "16:03 - <Unknown>: hello");
    }

    #[test]
    fn labels() {
        assert_eq!(character_count_label(0), "0 characters");
        assert_eq!(message_count_label(12), "12 messages");
    }
}
