#![forbid(unsafe_code)]

//! Add-to-calendar export.
//!
//! Builds a single-event iCalendar (RFC 5545) document. Lines end in CRLF,
//! text values are escaped, and lines longer than 75 octets are folded.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// MIME type of the generated file.
pub const ICS_MIME: &str = "text/calendar;charset=utf-8";

const MAX_LINE_OCTETS: usize = 75;
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// One configured event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    /// RFC 3339 in configuration.
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

/// Why an event definition was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    EmptyTitle,
    /// `end` is not after `start`.
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "event title is empty"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "event ends at {end} which is not after its start {start}")
            }
        }
    }
}

impl std::error::Error for CalendarError {}

impl CalendarEvent {
    pub fn validate(&self) -> Result<(), CalendarError> {
        if self.title.trim().is_empty() {
            return Err(CalendarError::EmptyTitle);
        }
        if self.end <= self.start {
            return Err(CalendarError::EndBeforeStart {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Calendar producer identity used in `PRODID` and `UID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsExport {
    organizer: String,
    domain: String,
}

impl Default for IcsExport {
    fn default() -> Self {
        Self::new("Grace Community Church", "yourchurch.local")
    }
}

impl IcsExport {
    pub fn new(organizer: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            organizer: organizer.into(),
            domain: domain.into(),
        }
    }

    /// Download name for the event stored under `key`.
    #[must_use]
    pub fn file_name(key: &str) -> String {
        format!("{key}.ics")
    }

    /// Render `event` as a VCALENDAR stamped at `now`.
    #[must_use]
    pub fn render(&self, key: &str, event: &CalendarEvent, now: DateTime<Utc>) -> String {
        let uid = format!("{key}-{}@{}", now.timestamp_millis(), self.domain);
        let lines = [
            "BEGIN:VCALENDAR".to_owned(),
            "VERSION:2.0".to_owned(),
            format!("PRODID:-//{}//Events//EN", self.organizer),
            "CALSCALE:GREGORIAN".to_owned(),
            "METHOD:PUBLISH".to_owned(),
            "BEGIN:VEVENT".to_owned(),
            format!("UID:{uid}"),
            format!("DTSTAMP:{}", now.format(STAMP_FORMAT)),
            format!("DTSTART:{}", event.start.format(STAMP_FORMAT)),
            format!("DTEND:{}", event.end.format(STAMP_FORMAT)),
            format!("SUMMARY:{}", escape_text(&event.title)),
            format!("LOCATION:{}", escape_text(&event.location)),
            format!("DESCRIPTION:{}", escape_text(&event.description)),
            "END:VEVENT".to_owned(),
            "END:VCALENDAR".to_owned(),
        ];
        let mut out = String::new();
        for line in &lines {
            fold_into(&mut out, line);
        }
        out
    }
}

/// Escape a TEXT property value.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Append `line` to `out`, folded at 75 octets, terminated by CRLF.
fn fold_into(out: &mut String, line: &str) {
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            // The leading space counts toward the continuation line.
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn midweek() -> CalendarEvent {
        CalendarEvent {
            title: "Midweek Prayer".into(),
            start: Utc.with_ymd_and_hms(2026, 1, 7, 13, 30, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 1, 7, 14, 30, 0).unwrap(),
            location: "Grace Community Church".into(),
            description: "Prayer gathering.".into(),
        }
    }

    #[test]
    fn renders_expected_properties() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let ics = IcsExport::default().render("midweek-prayer", &midweek(), now);
        let lines: Vec<&str> = ics.split("\r\n").collect();
        assert_eq!(lines[0], "BEGIN:VCALENDAR");
        assert!(lines.contains(&"PRODID:-//Grace Community Church//Events//EN"));
        assert!(lines.contains(&"DTSTART:20260107T133000Z"));
        assert!(lines.contains(&"DTEND:20260107T143000Z"));
        assert!(lines.contains(&"DTSTAMP:20260102T030405Z"));
        assert!(lines.contains(&"SUMMARY:Midweek Prayer"));
        let uid = format!("UID:midweek-prayer-{}@yourchurch.local", now.timestamp_millis());
        assert!(lines.contains(&uid.as_str()));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(!ics.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn escapes_text_values() {
        assert_eq!(escape_text("Lunch, then; games\\fun\nbye"), "Lunch\\, then\\; games\\\\fun\\nbye");
    }

    #[test]
    fn folds_long_lines() {
        let mut event = midweek();
        event.description = "word ".repeat(40);
        let ics = IcsExport::default().render("k", &event, Utc::now());
        for line in ics.split("\r\n") {
            assert!(line.len() <= MAX_LINE_OCTETS, "{line:?} too long");
        }
        let unfolded = ics.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("DESCRIPTION:{}", "word ".repeat(40))));
    }

    #[test]
    fn folding_respects_char_boundaries() {
        let mut out = String::new();
        fold_into(&mut out, &"é".repeat(60));
        for line in out.split("\r\n") {
            assert!(line.len() <= MAX_LINE_OCTETS);
        }
        assert_eq!(out.replace("\r\n ", "").trim_end(), "é".repeat(60));
    }

    #[test]
    fn validation() {
        assert!(midweek().validate().is_ok());
        let mut bad = midweek();
        bad.end = bad.start;
        assert!(matches!(bad.validate(), Err(CalendarError::EndBeforeStart { .. })));
        bad = midweek();
        bad.title = " ".into();
        assert_eq!(bad.validate(), Err(CalendarError::EmptyTitle));
    }

    #[test]
    fn deserializes_rfc3339() {
        let src = r#"
            title = "Serve Day"
            start = "2026-01-24T03:30:00Z"
            end = "2026-01-24T06:30:00Z"
        "#;
        let event: CalendarEvent = toml::from_str(src).unwrap();
        assert_eq!(event.start.format(STAMP_FORMAT).to_string(), "20260124T033000Z");
        assert!(event.location.is_empty());
    }
}
