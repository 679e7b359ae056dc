//! Bookings endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::{query_pairs, retain_valid, ApiClient};
use crate::{
    error::AppResult,
    models::{BookingQuery, BookingRecord, BookingStatus, StatusUpdate},
};

pub const BOOKINGS_PATH: &str = "/api/bookings";

pub fn status_path(booking_id: &str) -> String {
    format!("{}/{}/status", BOOKINGS_PATH, booking_id)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingsApi: Send + Sync {
    /// Fetch the signed-in user's bookings
    async fn list_bookings(&self, query: &BookingQuery) -> AppResult<Vec<BookingRecord>>;

    /// Move a booking to a new status
    async fn update_status(&self, booking_id: &str, status: BookingStatus) -> AppResult<()>;
}

#[async_trait]
impl BookingsApi for ApiClient {
    async fn list_bookings(&self, query: &BookingQuery) -> AppResult<Vec<BookingRecord>> {
        let records: Vec<BookingRecord> = self.get_data(BOOKINGS_PATH, &query_pairs(query)?).await?;
        tracing::debug!("Fetched {} bookings", records.len());
        Ok(retain_valid("booking", records))
    }

    async fn update_status(&self, booking_id: &str, status: BookingStatus) -> AppResult<()> {
        let body = serde_json::to_value(StatusUpdate { status })?;
        self.send_ignoring_body(Method::PATCH, &status_path(booking_id), Some(body))
            .await?;
        tracing::info!("Booking {} moved to {}", booking_id, status);
        Ok(())
    }
}
