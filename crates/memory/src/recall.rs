//! Recall (conversation) memory search.
//!
//! Recall memory is the agent's committed history. Searches run over the
//! visible text of each message and return the newest matches first, so
//! page 0 is always the most recent window.

use chrono::{DateTime, NaiveDate, Utc};
use mnemos_core::error::MemoryError;
use mnemos_core::message::{Message, MessageBody};

use crate::page::Page;

/// Case-insensitive substring search.
pub fn search_text(history: &[Message], query: &str, page: usize, page_size: usize) -> Page<String> {
    let needle = query.to_lowercase();
    let hits = history
        .iter()
        .rev()
        .filter_map(|message| {
            let text = visible_text(message);
            text.to_lowercase()
                .contains(&needle)
                .then(|| render_hit(message, &text))
        })
        .collect();
    Page::paginate(hits, page, page_size)
}

/// Messages whose timestamp falls within `[start_date, end_date]`.
///
/// Dates are `YYYY-MM-DD`, both ends inclusive, interpreted in UTC.
pub fn search_date(
    history: &[Message],
    start_date: &str,
    end_date: &str,
    page: usize,
    page_size: usize,
) -> Result<Page<String>, MemoryError> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    if end < start {
        return Err(MemoryError::QueryFailed(format!(
            "end_date {end_date} is before start_date {start_date}"
        )));
    }

    let hits = history
        .iter()
        .rev()
        .filter(|message| {
            let day = message.timestamp.date_naive();
            day >= start && day <= end
        })
        .map(|message| render_hit(message, &visible_text(message)))
        .collect();
    Ok(Page::paginate(hits, page, page_size))
}

fn parse_date(raw: &str) -> Result<NaiveDate, MemoryError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| MemoryError::QueryFailed(format!("invalid date '{raw}' (expected YYYY-MM-DD): {e}")))
}

/// The text a person would recognise: user envelopes are unwrapped to the
/// message they carry.
fn visible_text(message: &Message) -> String {
    match &message.body {
        MessageBody::User { text } => unwrap_user_envelope(text).unwrap_or_else(|| text.clone()),
        _ => message.searchable_text(),
    }
}

fn unwrap_user_envelope(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

fn render_hit(message: &Message, text: &str) -> String {
    format!(
        "[{}] {}: {}",
        format_timestamp(&message.timestamp),
        message.role_label(),
        text
    )
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mnemos_core::message::FunctionCall;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn history() -> Vec<Message> {
        vec![
            Message::user(r#"{"type":"user_message","message":"I adopted a cat named Miso"}"#)
                .at(at(1, 9)),
            Message::function_call(
                FunctionCall::new("send_message", r#"{"message":"Miso is a lovely name!"}"#),
                "",
            )
            .at(at(1, 9)),
            Message::function_result("send_message", r#"{"status":"OK","message":""}"#)
                .at(at(1, 9)),
            Message::user(r#"{"type":"user_message","message":"Going hiking tomorrow"}"#)
                .at(at(5, 18)),
            Message::assistant("User is outdoorsy").at(at(5, 18)),
        ]
    }

    #[test]
    fn text_search_is_case_insensitive_and_newest_first() {
        let page = search_text(&history(), "MISO", 0, 5);
        assert_eq!(page.total, 2);
        assert!(page.items[0].starts_with("[2024-03-01 09:00:00 UTC] assistant: send_message("));
        assert_eq!(
            page.items[1],
            "[2024-03-01 09:00:00 UTC] user: I adopted a cat named Miso"
        );
    }

    #[test]
    fn text_search_ignores_envelope_keys() {
        // "type" and "user_message" belong to the envelope, not to what was said
        let page = search_text(&history(), "user_message", 0, 5);
        assert!(page.is_empty());
    }

    #[test]
    fn text_search_paginates_from_most_recent() {
        let page = search_text(&history(), "", 1, 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert!(page.items[0].contains("function: "));
    }

    #[test]
    fn date_search_is_inclusive() {
        let page = search_date(&history(), "2024-03-05", "2024-03-05", 0, 5).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(
            page.items[0],
            "[2024-03-05 18:00:00 UTC] assistant: User is outdoorsy"
        );

        let all = search_date(&history(), "2024-03-01", "2024-03-05", 0, 10).unwrap();
        assert_eq!(all.total, 5);
    }

    #[test]
    fn date_search_rejects_bad_input() {
        assert!(matches!(
            search_date(&history(), "March 1st", "2024-03-05", 0, 5),
            Err(MemoryError::QueryFailed(_))
        ));
        assert!(matches!(
            search_date(&history(), "2024-03-05", "2024-03-01", 0, 5),
            Err(MemoryError::QueryFailed(_))
        ));
    }

    #[test]
    fn empty_history_finds_nothing() {
        assert_eq!(search_text(&[], "cat", 0, 5).summary(), "No results found.");
    }
}
