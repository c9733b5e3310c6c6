use chrono::{DateTime, SecondsFormat, Utc};
use url::form_urlencoded;

use crate::config::EventConfig;

/// Compact UTC stamp used by calendar links and ICS fields (YYYYMMDDTHHMMSSZ).
pub fn format_calendar_date(date: &DateTime<Utc>) -> String {
    date.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn google_calendar_link(event: &EventConfig) -> String {
    let dates = format!(
        "{}/{}",
        format_calendar_date(&event.start),
        format_calendar_date(&event.end)
    );
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("action", "TEMPLATE")
        .append_pair("text", &event.title)
        .append_pair("dates", &dates)
        .append_pair("details", &event.description)
        .append_pair("location", &event.location)
        .append_pair("trp", "false")
        .append_pair("sprop", "website")
        .finish();
    format!("https://calendar.google.com/calendar/render?{query}")
}

pub fn outlook_calendar_link(event: &EventConfig) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("subject", &event.title)
        .append_pair(
            "startdt",
            &event.start.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
        .append_pair(
            "enddt",
            &event.end.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
        .append_pair("body", &event.description)
        .append_pair("location", &event.location)
        .append_pair("path", "/calendar/action/compose")
        .append_pair("rru", "addevent")
        .finish();
    format!("https://outlook.live.com/calendar/0/deeplink/compose?{query}")
}

/// A downloadable single-event calendar document.
pub fn ics_content(event: &EventConfig) -> String {
    build_ics(event, Utc::now())
}

fn build_ics(event: &EventConfig, stamped_at: DateTime<Utc>) -> String {
    [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Memorial Service//EN".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@memorial-service.com", stamped_at.timestamp_millis()),
        format!("DTSTAMP:{}", format_calendar_date(&stamped_at)),
        format!("DTSTART:{}", format_calendar_date(&event.start)),
        format!("DTEND:{}", format_calendar_date(&event.end)),
        format!("SUMMARY:{}", event.title),
        format!("DESCRIPTION:{}", event.description),
        format!("LOCATION:{}", event.location),
        "STATUS:CONFIRMED".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ]
    .join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_event() -> EventConfig {
        EventConfig {
            title: "Minningarathöfn".to_string(),
            description: "Athöfn í kirkjunni".to_string(),
            location: "Linnetsstígur 6, Hafnarfjörður".to_string(),
            start: Utc.with_ymd_and_hms(2025, 6, 16, 13, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 6, 16, 15, 0, 0).unwrap(),
        }
    }

    #[test]
    fn calendar_dates_are_compact_utc() {
        let date = Utc.with_ymd_and_hms(2025, 6, 16, 13, 0, 0).unwrap();
        assert_eq!(format_calendar_date(&date), "20250616T130000Z");
    }

    #[test]
    fn google_link_carries_the_event_window() {
        let link = google_calendar_link(&test_event());
        assert!(link.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE"));
        assert!(link.contains("dates=20250616T130000Z%2F20250616T150000Z"));
        assert!(link.contains("text=Minningarath%C3%B6fn"));
        assert!(link.contains("sprop=website"));
    }

    #[test]
    fn outlook_link_uses_iso_timestamps() {
        let link = outlook_calendar_link(&test_event());
        assert!(link.starts_with("https://outlook.live.com/calendar/0/deeplink/compose?"));
        assert!(link.contains("startdt=2025-06-16T13%3A00%3A00.000Z"));
        assert!(link.contains("enddt=2025-06-16T15%3A00%3A00.000Z"));
        assert!(link.contains("rru=addevent"));
    }

    #[test]
    fn ics_document_is_complete_and_crlf_separated() {
        let stamped = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();
        let ics = build_ics(&test_event(), stamped);
        let expected = [
            "BEGIN:VCALENDAR",
            "VERSION:2.0",
            "PRODID:-//Memorial Service//EN",
            "BEGIN:VEVENT",
            &format!("UID:{}@memorial-service.com", stamped.timestamp_millis()),
            "DTSTAMP:20250601T083000Z",
            "DTSTART:20250616T130000Z",
            "DTEND:20250616T150000Z",
            "SUMMARY:Minningarathöfn",
            "DESCRIPTION:Athöfn í kirkjunni",
            "LOCATION:Linnetsstígur 6, Hafnarfjörður",
            "STATUS:CONFIRMED",
            "END:VEVENT",
            "END:VCALENDAR",
        ]
        .join("\r\n");
        assert_eq!(ics, expected);
    }
}
