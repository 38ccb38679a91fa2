use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::str::FromStr;
use url::Url;

use crate::models::booking::BookingConfirmation;

const GOOGLE_CALENDAR_URL: &str = "https://calendar.google.com/calendar/render";
const OUTLOOK_CALENDAR_URL: &str = "https://outlook.live.com/calendar/0/deeplink/compose";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarTarget {
    Google,
    Outlook,
    Apple,
    Ics,
}

#[derive(Debug, PartialEq)]
pub struct UnknownCalendar(pub String);

impl std::fmt::Display for UnknownCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown calendar '{}'", self.0)
    }
}

impl std::error::Error for UnknownCalendar {}

impl FromStr for CalendarTarget {
    type Err = UnknownCalendar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(CalendarTarget::Google),
            "outlook" => Ok(CalendarTarget::Outlook),
            "apple" => Ok(CalendarTarget::Apple),
            "ics" => Ok(CalendarTarget::Ics),
            other => Err(UnknownCalendar(other.to_string())),
        }
    }
}

/// A hotel stay as a calendar event. Dates start at midnight UTC.
#[derive(Debug, Clone)]
pub struct StayEvent {
    pub booking_id: String,
    pub hotel_name: String,
    pub address: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarLinks {
    pub google: String,
    pub outlook: String,
    /// Apple Calendar and plain downloads both use the `.ics` file.
    pub ics: String,
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `2024-12-15T00:00:00Z` -> `20241215T000000Z`
pub fn format_date_for_calendar(date: DateTime<Utc>) -> String {
    date.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escapes an iCalendar TEXT value (RFC 5545 3.3.11).
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn ics_filename(booking_id: &str) -> String {
    format!("hotel-booking-{}.ics", booking_id)
}

impl StayEvent {
    /// `None` when the booking was made without stay dates.
    pub fn from_confirmation(confirmation: &BookingConfirmation) -> Option<Self> {
        let check_in = confirmation.dates.check_in?;
        let check_out = confirmation.dates.check_out?;

        Some(Self {
            booking_id: confirmation.booking_id.clone(),
            hotel_name: confirmation.hotel_name.clone(),
            address: confirmation.hotel_address.clone(),
            start: midnight(check_in),
            end: midnight(check_out),
        })
    }

    pub fn title(&self) -> String {
        format!("Hotel Stay: {}", self.hotel_name)
    }

    fn details(&self, line_break: &str) -> String {
        format!(
            "Booking ID: {}{br}Hotel: {}{br}Address: {}",
            self.booking_id,
            self.hotel_name,
            self.address,
            br = line_break
        )
    }

    /// iCalendar body with CRLF line endings. Text values are escaped, so
    /// line breaks inside the description become a literal `\n`.
    pub fn to_ics(&self, now: DateTime<Utc>) -> String {
        let lines = [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//StayFinder//EN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}@stayfinder.com", self.booking_id),
            format!("DTSTAMP:{}", format_date_for_calendar(now)),
            format!("DTSTART:{}", format_date_for_calendar(self.start)),
            format!("DTEND:{}", format_date_for_calendar(self.end)),
            format!("SUMMARY:{}", escape_text(&self.title())),
            format!("DESCRIPTION:{}", escape_text(&self.details("\n"))),
            format!("LOCATION:{}", escape_text(&self.address)),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ];

        let mut body = lines.join("\r\n");
        body.push_str("\r\n");
        body
    }

    fn date_range(&self) -> (String, String) {
        (format_date_for_calendar(self.start), format_date_for_calendar(self.end))
    }

    pub fn google_url(&self) -> Result<Url, url::ParseError> {
        let (start, end) = self.date_range();
        let dates = format!("{}/{}", start, end);
        let details = self.details("\n");

        Url::parse_with_params(
            GOOGLE_CALENDAR_URL,
            &[
                ("action", "TEMPLATE"),
                ("text", self.title().as_str()),
                ("dates", dates.as_str()),
                ("details", details.as_str()),
                ("location", self.address.as_str()),
            ],
        )
    }

    pub fn outlook_url(&self) -> Result<Url, url::ParseError> {
        let (start, end) = self.date_range();
        let details = self.details("\n");

        Url::parse_with_params(
            OUTLOOK_CALENDAR_URL,
            &[
                ("subject", self.title().as_str()),
                ("startdt", start.as_str()),
                ("enddt", end.as_str()),
                ("body", details.as_str()),
                ("location", self.address.as_str()),
            ],
        )
    }

    /// `ics_path` is where the `.ics` download is served.
    pub fn links(&self, ics_path: &str) -> Result<CalendarLinks, url::ParseError> {
        Ok(CalendarLinks {
            google: self.google_url()?.into(),
            outlook: self.outlook_url()?.into(),
            ics: ics_path.to_string(),
        })
    }
}
