//! Booking model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::enums::{BookingStatus, Bucket, PaymentStatus};

/// Venue summary embedded in a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueSummary {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Payment summary; the currency is implied by the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub status: PaymentStatus,
    pub total: Decimal,
}

/// Additional service attached to a booking (catering, photography, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    #[serde(rename = "type")]
    pub kind: String,
    pub provider: String,
}

/// Booking as returned by `GET /api/bookings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_event_dates"))]
pub struct BookingRecord {
    #[serde(alias = "_id")]
    #[validate(length(min = 1))]
    pub id: String,
    pub status: BookingStatus,
    #[serde(alias = "startDate")]
    pub start: DateTime<Utc>,
    #[serde(alias = "endDate")]
    pub end: DateTime<Utc>,
    pub venue: VenueSummary,
    pub payment: PaymentSummary,
    #[serde(default)]
    pub services: Vec<ServiceLine>,
    pub created_at: DateTime<Utc>,
    /// Free-form event title entered at booking time
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub guest_count: Option<u32>,
}

fn validate_event_dates(booking: &BookingRecord) -> Result<(), ValidationError> {
    if booking.end < booking.start {
        let mut err = ValidationError::new("event_dates");
        err.message = Some("booking ends before it starts".into());
        return Err(err);
    }
    Ok(())
}

impl BookingRecord {
    /// Display bucket at `now`. Never stored: callers pass the current clock.
    pub fn bucket(&self, now: DateTime<Utc>) -> Bucket {
        match self.status {
            BookingStatus::Cancelled => Bucket::Cancelled,
            BookingStatus::Pending => Bucket::Pending,
            _ if self.end < now => Bucket::Past,
            _ => Bucket::Upcoming,
        }
    }

    pub fn total(&self) -> Decimal {
        self.payment.total
    }

    /// Whether any attached service has the given type (case-insensitive)
    pub fn has_service(&self, kind: &str) -> bool {
        self.services.iter().any(|s| s.kind.eq_ignore_ascii_case(kind))
    }

    /// Title used for calendar entries and share text
    pub fn title(&self) -> String {
        match self.event_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("{} at {}", name, self.venue.name),
            _ => format!("Booking at {}", self.venue.name),
        }
    }
}

/// Body of `PATCH /api/bookings/:id/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

/// Query parameters for `GET /api/bookings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::Duration;

    pub fn booking(id: &str, status: BookingStatus, start: DateTime<Utc>, end: DateTime<Utc>) -> BookingRecord {
        BookingRecord {
            id: id.to_string(),
            status,
            start,
            end,
            venue: VenueSummary {
                id: format!("venue-{}", id),
                name: "The Glasshouse".to_string(),
                location: Some("12 Harbour Road, Leith".to_string()),
                images: vec![],
            },
            payment: PaymentSummary {
                status: PaymentStatus::Paid,
                total: Decimal::new(100, 0),
            },
            services: vec![],
            created_at: start - Duration::days(30),
            event_name: None,
            guest_count: None,
        }
    }
}
