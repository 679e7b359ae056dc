//! Bookings page: list controller and booking actions

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use async_trait::async_trait;

use super::{
    calendar,
    listing::{DateWindow, FilterState, Listable},
    page::{Fetcher, ListPage},
    share::{self, ShareOutcome},
    view::FetchOutcome,
    Notice,
};
use crate::{
    api::BookingsApi,
    error::{AppError, AppResult},
    models::{BookingQuery, BookingRecord, BookingSort, BookingStatus, Bucket},
    platform::{Download, Platform, SharePayload},
    repository::CollectionCache,
};

impl Listable for BookingRecord {
    type Tab = Bucket;
    type Sort = BookingSort;
    type Query = BookingQuery;

    fn id(&self) -> &str {
        &self.id
    }

    fn in_tab(&self, tab: Bucket, now: DateTime<Utc>) -> bool {
        self.bucket(now) == tab
    }

    fn matches_kind(&self, kind: &str) -> bool {
        self.has_service(kind)
    }

    fn date_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start, self.end))
    }

    fn compare(a: &Self, b: &Self, sort: BookingSort) -> Ordering {
        match sort {
            BookingSort::Price => b.total().cmp(&a.total()),
            BookingSort::EventDate => a.start.cmp(&b.start),
            BookingSort::Recent => b.created_at.cmp(&a.created_at),
        }
    }

    fn server_query(filter: &FilterState<Self>) -> BookingQuery {
        let timestamp = |ts: DateTime<Utc>| ts.to_rfc3339_opts(SecondsFormat::Secs, true);
        BookingQuery {
            status: Some(filter.tab.as_str().to_string()),
            service_type: filter.kind.clone(),
            from: filter.window.start.map(timestamp),
            to: filter.window.end.map(timestamp),
        }
    }
}

#[async_trait]
impl Fetcher<BookingRecord> for Arc<dyn BookingsApi> {
    async fn fetch(&self, query: &BookingQuery) -> AppResult<Vec<BookingRecord>> {
        self.list_bookings(query).await
    }
}

pub type BookingsList = ListPage<BookingRecord, Arc<dyn BookingsApi>>;

/// Dashboard numbers derived from every booking, whatever the active tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    /// Count per bucket, in tab order
    pub counts: IndexMap<Bucket, usize>,
    /// Soonest upcoming booking
    pub next: Option<BookingRecord>,
}

pub struct BookingsPage {
    list: BookingsList,
    platform: Arc<dyn Platform>,
    web_url: String,
    /// All bookings, unfiltered; the tab view only holds one bucket
    overview: Vec<BookingRecord>,
}

impl BookingsPage {
    pub fn new(
        api: Arc<dyn BookingsApi>,
        cache: CollectionCache<BookingRecord>,
        platform: Arc<dyn Platform>,
        web_url: impl Into<String>,
        page_size: usize,
    ) -> Self {
        Self {
            list: ListPage::new(api, cache, page_size),
            platform,
            web_url: web_url.into().trim_end_matches('/').to_string(),
            overview: Vec::new(),
        }
    }

    pub fn list(&self) -> &BookingsList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut BookingsList {
        &mut self.list
    }

    /// Show cached bookings, then fetch the active tab and the overview
    pub async fn mount(&mut self) -> FetchOutcome {
        self.overview = self.list.cache().load();
        let outcome = self.list.mount().await;
        let _ = self.refresh_overview().await;
        outcome
    }

    pub async fn refresh(&mut self) -> FetchOutcome {
        let outcome = self.list.refresh().await;
        let _ = self.refresh_overview().await;
        outcome
    }

    /// Fetch every booking without filters. The result feeds the summary
    /// and replaces the cached collection; on failure both are kept.
    pub async fn refresh_overview(&mut self) -> AppResult<usize> {
        match self.list.fetcher().list_bookings(&BookingQuery::default()).await {
            Ok(all) => {
                self.list.store(&all);
                self.overview = all;
                Ok(self.overview.len())
            }
            Err(e) => {
                tracing::warn!("Booking overview not refreshed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn set_tab(&mut self, tab: Bucket) -> Option<FetchOutcome> {
        self.list.update_filter(|f| f.tab = tab).await
    }

    /// Client-side only: never re-enters `loading`
    pub fn set_sort(&mut self, sort: BookingSort) {
        self.list.update_local_filter(|f| f.sort = sort);
    }

    pub async fn set_service_type(&mut self, kind: Option<String>) -> Option<FetchOutcome> {
        self.list.update_filter(|f| f.kind = kind).await
    }

    pub async fn set_date_window(&mut self, window: DateWindow) -> Option<FetchOutcome> {
        self.list.update_filter(|f| f.window = window).await
    }

    fn find(&self, booking_id: &str) -> AppResult<&BookingRecord> {
        self.list
            .find(booking_id)
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))
    }

    /// Cancel an upcoming booking, then reload from the server.
    ///
    /// The list is never patched locally: a successful cancel is followed by
    /// a full fetch. Failures leave the list as it was and raise a notice.
    pub async fn cancel_booking(&mut self, booking_id: &str, now: DateTime<Utc>) -> AppResult<()> {
        let bucket = self.find(booking_id)?.bucket(now);
        if bucket != Bucket::Upcoming {
            let err = AppError::BusinessRule(format!(
                "Only upcoming bookings can be cancelled (this one is {})",
                bucket.as_str()
            ));
            self.list.notify(Notice::error(err.user_message()));
            return Err(err);
        }

        match self.list.fetcher().update_status(booking_id, BookingStatus::Cancelled).await {
            Ok(()) => {
                tracing::info!("Booking {} cancelled, reloading", booking_id);
                self.list.notify(Notice::success("Booking cancelled"));
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Cancel of booking {} failed: {}", booking_id, e);
                self.list.notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }

    pub fn share_payload(&self, booking_id: &str) -> AppResult<SharePayload> {
        let booking = self.find(booking_id)?;
        let mut text = booking.start.format("%a %-d %b %Y, %H:%M UTC").to_string();
        if let Some(location) = &booking.venue.location {
            text.push_str(&format!(", {}", location));
        }
        Ok(SharePayload {
            title: booking.title(),
            text,
            url: Some(format!("{}/bookings/{}", self.web_url, booking.id)),
        })
    }

    pub fn share_booking(&mut self, booking_id: &str) -> AppResult<ShareOutcome> {
        let payload = self.share_payload(booking_id)?;
        let outcome = share::share(self.platform.as_ref(), &payload);
        self.list.notify(match &outcome {
            Ok(ShareOutcome::Shared) => Notice::success("Booking shared"),
            Ok(ShareOutcome::Copied) => Notice::success("Booking details copied to clipboard"),
            Err(e) => Notice::error(e.user_message()),
        });
        outcome
    }

    pub fn copy_booking_id(&mut self, booking_id: &str) -> AppResult<()> {
        let id = self.find(booking_id)?.id.clone();
        let result = share::copy_text(self.platform.as_ref(), &id);
        self.list.notify(match &result {
            Ok(()) => Notice::success("Booking ID copied"),
            Err(e) => Notice::error(e.user_message()),
        });
        result
    }

    /// Build the booking's `.ics` file and hand it to the platform
    pub fn add_to_calendar(&mut self, booking_id: &str) -> AppResult<Download> {
        let download = calendar::booking_download(self.find(booking_id)?);
        let result = self.platform.offer_download(&download);
        self.list.notify(match &result {
            Ok(()) => Notice::success("Calendar file downloaded"),
            Err(e) => Notice::error(e.user_message()),
        });
        result.map(|()| download)
    }

    pub fn summary(&self, now: DateTime<Utc>) -> BookingSummary {
        summarize(&self.overview, now)
    }
}

pub fn summarize(records: &[BookingRecord], now: DateTime<Utc>) -> BookingSummary {
    let mut counts: IndexMap<Bucket, usize> = Bucket::ALL.iter().map(|b| (*b, 0)).collect();
    for record in records {
        *counts.entry(record.bucket(now)).or_default() += 1;
    }
    let next = records
        .iter()
        .filter(|b| b.bucket(now) == Bucket::Upcoming)
        .min_by_key(|b| b.start)
        .cloned();
    BookingSummary { counts, next }
}
