//! Line parser for chat records.
//!
//! Each input line is either a JSON object describing one message or plain
//! text. Parsing is pure; the caller decides what to do with failures.

use crate::model::error::ParseError;
use crate::model::{HighlightKind, MessageBuilder, MessageRecord, ScrollbarHighlight};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

/// Formatting choices applied while building records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Emit a visible timestamp element when the line carries one.
    pub show_timestamps: bool,
    /// `chrono` format for that element.
    pub timestamp_format: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            timestamp_format: "%H:%M".to_string(),
        }
    }
}

impl From<&crate::config::ViewSettings> for ParseOptions {
    fn from(settings: &crate::config::ViewSettings) -> Self {
        Self {
            show_timestamps: settings.show_timestamps,
            timestamp_format: settings.timestamp_format.clone(),
        }
    }
}

/// Raw JSON structure for one chat line.
#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, alias = "login")]
    user: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    highlighted: bool,
    #[serde(default)]
    system: bool,
    #[serde(default)]
    do_not_notify: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    emotes: Vec<RawEmote>,
}

/// Word replaced by an inline image.
#[derive(Debug, Deserialize)]
struct RawEmote {
    name: String,
    #[serde(default = "default_emote_size")]
    width: f32,
    #[serde(default = "default_emote_size")]
    height: f32,
}

fn default_emote_size() -> f32 {
    1.0
}

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines. Lines starting with `{` must be a
/// valid JSON message; anything else becomes a plain-text record.
///
/// # Errors
///
/// Returns `ParseError` if the JSON is malformed, has no `text`, or carries
/// a timestamp that is not RFC 3339.
pub fn parse_line(
    raw: &str,
    line_number: usize,
    options: &ParseOptions,
) -> Result<Option<MessageRecord>, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !trimmed.starts_with('{') {
        return Ok(Some(MessageRecord::plain(trimmed)));
    }

    let message: RawMessage =
        serde_json::from_str(trimmed).map_err(|e| ParseError::InvalidJson {
            line: line_number,
            message: e.to_string(),
        })?;

    build_record(message, line_number, options).map(Some)
}

/// Parse one line, turning failures into a visible system message.
///
/// Never fails; blank lines still yield `None`.
pub fn parse_line_graceful(
    raw: &str,
    line_number: usize,
    options: &ParseOptions,
) -> Option<MessageRecord> {
    match parse_line(raw, line_number, options) {
        Ok(record) => record,
        Err(error) => {
            warn!(line = line_number, %error, "malformed input line");
            Some(system_message(&error.to_string()))
        }
    }
}

/// Client-generated notice.
pub fn system_message(text: &str) -> MessageRecord {
    MessageBuilder::new()
        .text(text)
        .system(true)
        .do_not_notify(true)
        .scrollbar_highlight(ScrollbarHighlight::new(HighlightKind::System))
        .build()
}

fn build_record(
    message: RawMessage,
    line_number: usize,
    options: &ParseOptions,
) -> Result<MessageRecord, ParseError> {
    let text = message.text.ok_or(ParseError::MissingField {
        line: line_number,
        field: "text",
    })?;

    let mut builder = MessageBuilder::new();

    if let Some(raw_ts) = message.timestamp {
        let at = parse_timestamp(&raw_ts, line_number)?;
        builder = if options.show_timestamps {
            builder.timestamp(at, &options.timestamp_format)
        } else {
            builder.sent_at(at)
        };
    }

    if let Some(login) = message.user.as_deref() {
        let display = message.display_name.as_deref().unwrap_or(login);
        builder = builder.author(login, display);
    }

    for word in text.split_whitespace() {
        builder = match message.emotes.iter().find(|emote| emote.name == word) {
            Some(emote) => builder.image(&emote.name, emote.width, emote.height),
            None => builder.text(word),
        };
    }

    Ok(builder
        .highlighted(message.highlighted)
        .system(message.system)
        .do_not_notify(message.do_not_notify)
        .disabled(message.disabled)
        .build())
}

fn parse_timestamp(raw: &str, line_number: usize) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ParseError::InvalidTimestamp {
            line: line_number,
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, ElementRole, Link};

    fn texts(record: &MessageRecord) -> Vec<String> {
        record
            .elements()
            .iter()
            .map(|e| e.display_text().to_string())
            .collect()
    }

    mod plain_lines {
        use super::*;

        #[test]
        fn blank_line_yields_nothing() {
            let result = parse_line("   ", 1, &ParseOptions::default());
            assert_eq!(result.map(|r| r.is_none()), Ok(true));
        }

        #[test]
        fn non_json_line_becomes_plain_record() {
            let record = parse_line("hello there", 1, &ParseOptions::default())
                .expect("plain text parses")
                .expect("not blank");
            assert_eq!(texts(&record), vec!["hello", "there"]);
            assert!(record.login_name().is_none());
        }
    }

    mod json_lines {
        use super::*;

        #[test]
        fn full_message_builds_author_timestamp_and_words() {
            let line = r#"{"user":"alice","display_name":"Alice","text":"hi https://example.com","timestamp":"2024-05-01T12:34:56Z"}"#;
            let record = parse_line(line, 3, &ParseOptions::default())
                .expect("valid")
                .expect("not blank");

            assert_eq!(
                texts(&record),
                vec!["12:34", "Alice:", "hi", "https://example.com"]
            );
            assert_eq!(record.login_name(), Some("alice"));
            assert!(record.timestamp().is_some());
            let link = &record.elements()[3];
            assert_eq!(link.role(), ElementRole::Link);
            assert_eq!(link.link(), Some(&Link::Url("https://example.com".to_string())));
        }

        #[test]
        fn hidden_timestamps_still_record_send_time() {
            let options = ParseOptions {
                show_timestamps: false,
                ..ParseOptions::default()
            };
            let line = r#"{"text":"quiet","timestamp":"2024-05-01T12:34:56Z"}"#;
            let record = parse_line(line, 1, &options).expect("valid").expect("not blank");
            assert_eq!(texts(&record), vec!["quiet"]);
            assert!(record.timestamp().is_some());
        }

        #[test]
        fn emote_words_become_images() {
            let line = r#"{"text":"nice Kappa","emotes":[{"name":"Kappa","width":2.0}]}"#;
            let record = parse_line(line, 1, &ParseOptions::default())
                .expect("valid")
                .expect("not blank");
            match record.elements()[1].kind() {
                ElementKind::Image { alt, width, height } => {
                    assert_eq!(alt, "Kappa");
                    assert_eq!(*width, 2.0);
                    assert_eq!(*height, 1.0);
                }
                other => panic!("expected image, got {other:?}"),
            }
        }

        #[test]
        fn highlighted_flag_sets_mention_marker() {
            let line = r#"{"text":"@me","highlighted":true}"#;
            let record = parse_line(line, 1, &ParseOptions::default())
                .expect("valid")
                .expect("not blank");
            assert_eq!(record.scrollbar_highlight().kind(), HighlightKind::Mention);
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn malformed_json_reports_line() {
            let err = parse_line("{not json", 7, &ParseOptions::default())
                .expect_err("should fail");
            assert!(matches!(err, ParseError::InvalidJson { line: 7, .. }));
        }

        #[test]
        fn missing_text_is_reported() {
            let err = parse_line(r#"{"user":"bob"}"#, 2, &ParseOptions::default())
                .expect_err("should fail");
            assert_eq!(
                err,
                ParseError::MissingField {
                    line: 2,
                    field: "text"
                }
            );
        }

        #[test]
        fn bad_timestamp_is_reported() {
            let err = parse_line(
                r#"{"text":"x","timestamp":"yesterday"}"#,
                4,
                &ParseOptions::default(),
            )
            .expect_err("should fail");
            assert_eq!(err.line(), 4);
            assert!(matches!(err, ParseError::InvalidTimestamp { .. }));
        }

        #[test]
        fn graceful_parse_turns_error_into_system_message() {
            let record = parse_line_graceful("{oops", 9, &ParseOptions::default())
                .expect("system message");
            assert!(record.flags().system);
            assert!(record.flags().do_not_notify);
            assert_eq!(record.scrollbar_highlight().kind(), HighlightKind::System);
            assert!(record.copy_text().contains("line 9"));
        }
    }
}
