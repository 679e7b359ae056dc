//! Calendar export for bookings (iCalendar VEVENT)

use chrono::{DateTime, Utc};

use crate::{models::BookingRecord, platform::Download};

pub const CALENDAR_CONTENT_TYPE: &str = "text/calendar";
const PRODID: &str = "-//Venuity//Bookings//EN";
/// Content lines longer than this many octets are folded
const MAX_LINE_OCTETS: usize = 75;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// DTSTAMP; taken from the booking so the output is reproducible
    pub stamp: DateTime<Utc>,
}

impl CalendarEvent {
    pub fn from_booking(booking: &BookingRecord) -> Self {
        let mut description = vec![
            format!("Venue: {}", booking.venue.name),
            format!("Booking ID: {}", booking.id),
            format!("Status: {}", booking.status),
        ];
        if let Some(guests) = booking.guest_count {
            description.push(format!("Guests: {}", guests));
        }
        if !booking.services.is_empty() {
            let services: Vec<String> = booking
                .services
                .iter()
                .map(|s| format!("{} ({})", s.kind, s.provider))
                .collect();
            description.push(format!("Services: {}", services.join(", ")));
        }

        Self {
            uid: format!("{}@venuity.app", booking.id),
            summary: booking.title(),
            description: description.join("\n"),
            location: booking.venue.location.clone(),
            start: booking.start,
            end: booking.end,
            stamp: booking.created_at,
        }
    }

    /// Serialize as a one-event VCALENDAR with CRLF line endings
    pub fn to_ics(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", PRODID),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", escape_text(&self.uid)),
            format!("DTSTAMP:{}", format_timestamp(self.stamp)),
            format!("DTSTART:{}", format_timestamp(self.start)),
            format!("DTEND:{}", format_timestamp(self.end)),
            format!("SUMMARY:{}", escape_text(&self.summary)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
        ];
        if let Some(location) = &self.location {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        let mut out = String::new();
        for line in lines {
            out.push_str(&fold_line(&line));
            out.push_str("\r\n");
        }
        out
    }
}

/// Calendar file for a booking, ready to hand to the platform
pub fn booking_download(booking: &BookingRecord) -> Download {
    Download {
        file_name: format!("venuity-booking-{}.ics", sanitize_file_part(&booking.id)),
        content_type: CALENDAR_CONTENT_TYPE.to_string(),
        body: CalendarEvent::from_booking(booking).to_ics(),
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%dT%H%M%SZ").to_string()
}

/// TEXT value escaping (RFC 5545 3.3.11)
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

/// Split a content line into 75-octet chunks joined by CRLF + space,
/// never cutting a UTF-8 sequence
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for c in line.chars() {
        // Continuation lines start with a space, which counts toward the limit
        if width + c.len_utf8() > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += c.len_utf8();
    }
    out
}

fn sanitize_file_part(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}
