//! Final document formatting.

use chrono::{DateTime, TimeZone};

use crate::result::Conversation;

/// Timestamp layout of the export line, e.g. `3/7/2025, 2:05:09 PM`.
pub const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Wrap the assembled body with the title and export timestamp.
///
/// ```text
/// # <title>
///
/// *Exported on: <timestamp>*
///
/// <body>
/// ```
#[must_use]
pub fn emit(conversation: &Conversation) -> String {
    format!(
        "# {}\n\n*Exported on: {}*\n\n{}",
        conversation.title,
        format_timestamp(&conversation.exported_at),
        conversation.body
    )
}

/// Human-readable export timestamp.
#[must_use]
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, Utc};

    use crate::result::Content;

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap();
        assert_eq!(format_timestamp(&at), "3/7/2025, 2:05:09 PM");
    }

    #[test]
    fn test_header_lines() {
        let conversation = Conversation {
            title: "Borrow checker".to_string(),
            exported_at: Local::now(),
            content: Content::Raw("x".to_string()),
            body: "BODY".to_string(),
        };
        let out = emit(&conversation);
        assert!(out.starts_with("# Borrow checker\n\n*Exported on: "));
        assert!(out.ends_with("*\n\nBODY"));
    }
}
