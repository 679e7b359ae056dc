//! Filter, sort and paginate engine shared by the list pages
//!
//! Everything here is pure: the same records, filter, limit and clock always
//! give the same [`VisibleSlice`]. Record types plug in through [`Listable`].

use std::cmp::Ordering;
use std::fmt::Debug;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// A record type that can be shown in a filterable collection view
pub trait Listable: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Exactly one tab is active at a time
    type Tab: Copy + Eq + Default + Debug + Send + Sync;
    /// Sort key table
    type Sort: Copy + Eq + Default + Debug + Send + Sync;
    /// Query parameters the server filters on
    type Query: Clone + PartialEq + Default + Debug + Send + Sync;

    fn id(&self) -> &str;

    /// Whether the record belongs to `tab` at `now`
    fn in_tab(&self, tab: Self::Tab, now: DateTime<Utc>) -> bool;

    /// Type/category filter
    fn matches_kind(&self, kind: &str) -> bool;

    /// Event span checked against the date window; `None` when undated
    fn date_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        None
    }

    /// Collection tag checked against the collection filter
    fn collection(&self) -> Option<&str> {
        None
    }

    /// Ordering for `sort`; equal records keep their relative order
    fn compare(a: &Self, b: &Self, sort: Self::Sort) -> Ordering;

    /// Server-side part of the filter
    fn server_query(filter: &FilterState<Self>) -> Self::Query;
}

/// Inclusive date window; either bound may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// Window covering whole calendar days (UTC), both ends inclusive
    pub fn days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let last_instant = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        Self {
            start: start.map(|d| d.and_time(NaiveTime::MIN).and_utc()),
            end: end.map(|d| d.and_time(last_instant).and_utc()),
        }
    }

    pub fn is_set(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// `start >= window.start` and `end <= window.end`, for the bounds given
    pub fn admits(&self, span: Option<(DateTime<Utc>, DateTime<Utc>)>) -> bool {
        if !self.is_set() {
            return true;
        }
        let Some((start, end)) = span else {
            return false;
        };
        self.start.map_or(true, |from| start >= from) && self.end.map_or(true, |to| end <= to)
    }
}

/// User-selected criteria of a list page. Pure UI state.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState<L: Listable> {
    pub tab: L::Tab,
    pub sort: L::Sort,
    pub kind: Option<String>,
    pub window: DateWindow,
    pub collection: Option<String>,
}

impl<L: Listable> Default for FilterState<L> {
    fn default() -> Self {
        Self {
            tab: L::Tab::default(),
            sort: L::Sort::default(),
            kind: None,
            window: DateWindow::default(),
            collection: None,
        }
    }
}

impl<L: Listable> FilterState<L> {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Strict conjunction of every active criterion
    pub fn admits(&self, record: &L, now: DateTime<Utc>) -> bool {
        record.in_tab(self.tab, now)
            && self.kind.as_deref().map_or(true, |kind| record.matches_kind(kind))
            && self.window.admits(record.date_span())
            && self
                .collection
                .as_deref()
                .map_or(true, |wanted| record.collection() == Some(wanted))
    }
}

/// Incremental reveal: the limit grows by one page at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    limit: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self { page_size, limit: page_size }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn load_more(&mut self) {
        self.limit += self.page_size;
    }

    pub fn reset(&mut self) {
        self.limit = self.page_size;
    }
}

/// Records currently rendered, after filter, sort and reveal limit
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleSlice<L> {
    pub items: Vec<L>,
    /// Number of records passing the filter, before the limit
    pub total: usize,
}

impl<L> VisibleSlice<L> {
    pub fn visible_count(&self) -> usize {
        self.items.len()
    }

    pub fn has_more(&self) -> bool {
        self.total > self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Filter, sort (stably) and cut `records` down to at most `limit` items
pub fn derive_visible<L: Listable>(
    records: &[L],
    filter: &FilterState<L>,
    limit: usize,
    now: DateTime<Utc>,
) -> VisibleSlice<L> {
    let mut matching: Vec<&L> = records.iter().filter(|r| filter.admits(r, now)).collect();
    matching.sort_by(|a, b| L::compare(a, b, filter.sort));
    let total = matching.len();
    VisibleSlice {
        items: matching.into_iter().take(limit).cloned().collect(),
        total,
    }
}

/// Ascending comparison with missing values last
pub(crate) fn cmp_present_first<T, F>(a: Option<T>, b: Option<T>, cmp: F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::fixtures::booking;
    use crate::models::{BookingRecord, BookingSort, BookingStatus, Bucket};
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn upcoming(id: &str, days_ahead: i64, total: i64) -> BookingRecord {
        let start = now() + Duration::days(days_ahead);
        let mut b = booking(id, BookingStatus::Confirmed, start, start + Duration::hours(4));
        b.payment.total = Decimal::new(total, 0);
        b
    }

    fn ids(slice: &VisibleSlice<BookingRecord>) -> Vec<&str> {
        slice.items.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_tabs_partition_scenario() {
        let yesterday = now() - Duration::days(1);
        let next_week = now() + Duration::days(7);
        let records = vec![
            booking("cancelled", BookingStatus::Cancelled, next_week, next_week + Duration::hours(3)),
            booking("past", BookingStatus::Confirmed, yesterday - Duration::hours(3), yesterday),
            booking("upcoming", BookingStatus::Confirmed, next_week, next_week + Duration::hours(3)),
        ];

        let mut filter = FilterState::<BookingRecord>::default();
        let slice = derive_visible(&records, &filter, 8, now());
        assert_eq!(ids(&slice), vec!["upcoming"]);

        filter.tab = Bucket::Past;
        assert_eq!(ids(&derive_visible(&records, &filter, 8, now())), vec!["past"]);

        filter.tab = Bucket::Cancelled;
        assert_eq!(ids(&derive_visible(&records, &filter, 8, now())), vec!["cancelled"]);

        filter.tab = Bucket::Pending;
        assert!(derive_visible(&records, &filter, 8, now()).is_empty());
    }

    #[test]
    fn test_price_sort_descending() {
        let records = vec![upcoming("a", 1, 50), upcoming("b", 2, 200), upcoming("c", 3, 10)];
        let filter = FilterState::<BookingRecord> {
            sort: BookingSort::Price,
            ..Default::default()
        };
        let slice = derive_visible(&records, &filter, 8, now());
        let totals: Vec<Decimal> = slice.items.iter().map(|b| b.total()).collect();
        assert_eq!(totals, vec![Decimal::new(200, 0), Decimal::new(50, 0), Decimal::new(10, 0)]);
    }

    #[test]
    fn test_sort_is_stable() {
        let records = vec![upcoming("a", 1, 75), upcoming("b", 2, 75), upcoming("c", 3, 75)];
        let filter = FilterState::<BookingRecord> {
            sort: BookingSort::Price,
            ..Default::default()
        };
        assert_eq!(ids(&derive_visible(&records, &filter, 8, now())), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_limit_and_idempotence() {
        let records: Vec<BookingRecord> = (0..20).map(|i| upcoming(&format!("b{:02}", i), 20 - i, 10 * i)).collect();
        let filter = FilterState::<BookingRecord>::default();

        let first = derive_visible(&records, &filter, 8, now());
        assert_eq!(first.visible_count(), 8);
        assert_eq!(first.total, 20);
        assert!(first.has_more());
        assert_eq!(first, derive_visible(&records, &filter, 8, now()));

        // Default sort is event date: b19 starts soonest
        assert_eq!(first.items[0].id, "b19");

        let all = derive_visible(&records, &filter, 24, now());
        assert_eq!(all.visible_count(), 20);
        assert!(!all.has_more());
        // Growing the limit keeps the earlier items in place
        assert_eq!(&all.items[..8], &first.items[..]);
    }

    #[test]
    fn test_conjunction_with_kind_and_window() {
        let mut with_catering = upcoming("catered", 3, 100);
        with_catering.services.push(crate::models::ServiceLine {
            kind: "catering".to_string(),
            provider: "Fennel & Co".to_string(),
        });
        let plain = upcoming("plain", 3, 100);
        let later = {
            let mut b = upcoming("later", 30, 100);
            b.services = with_catering.services.clone();
            b
        };
        let records = vec![with_catering, plain, later];

        let filter = FilterState::<BookingRecord> {
            kind: Some("Catering".to_string()),
            window: DateWindow {
                start: Some(now()),
                end: Some(now() + Duration::days(10)),
            },
            ..Default::default()
        };
        assert_eq!(ids(&derive_visible(&records, &filter, 8, now())), vec!["catered"]);
    }

    #[test]
    fn test_window_bounds() {
        let start = now();
        let end = now() + Duration::hours(2);
        let window = DateWindow { start: Some(start), end: None };
        assert!(window.admits(Some((start, end))));
        assert!(!window.admits(Some((start - Duration::seconds(1), end))));
        assert!(!window.admits(None));
        assert!(DateWindow::default().admits(None));

        let day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let whole_day = DateWindow::days(Some(day), Some(day));
        assert!(whole_day.admits(Some((start, start + Duration::hours(11)))));
        assert!(!whole_day.admits(Some((start, start + Duration::hours(13)))));
    }

    #[test]
    fn test_collection_filter_excludes_untagged() {
        let records = vec![upcoming("a", 1, 10)];
        let filter = FilterState::<BookingRecord> {
            collection: Some("Wedding".to_string()),
            ..Default::default()
        };
        assert!(derive_visible(&records, &filter, 8, now()).is_empty());
    }

    #[test]
    fn test_pager() {
        let mut pager = Pager::new(8);
        pager.load_more();
        pager.load_more();
        assert_eq!(pager.limit(), 24);
        pager.reset();
        assert_eq!(pager.limit(), 8);
        assert_eq!(Pager::new(0).page_size(), 1);
    }
}
