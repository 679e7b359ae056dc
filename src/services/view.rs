//! Generic list view controller
//!
//! Holds the collection on screen, the filter, the reveal limit and the
//! `idle -> loading -> (ready | failed)` phase. The controller never talks to
//! the network itself: a fetch is started with a [`FetchTicket`] and finished
//! by handing the result back to [`CollectionView::complete_fetch`]. Only the
//! most recently issued ticket is applied, so a slow answer to an older
//! query can never overwrite a newer one.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::listing::{derive_visible, FilterState, Listable, Pager, VisibleSlice};
use crate::error::{AppError, AppResult, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Where the records on screen came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    None,
    Cache,
    Network,
}

/// Error banner shown above the (retained) list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub kind: ErrorKind,
    pub message: String,
    /// Show a "Retry" button
    pub retryable: bool,
    /// The UI should route to the login view
    pub login_required: bool,
}

impl From<&AppError> for Banner {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
            retryable: err.is_retryable(),
            login_required: err.kind() == ErrorKind::SessionExpired,
        }
    }
}

/// Empty result after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    /// Filters differ from their defaults, so "reset filters" can help
    pub can_reset: bool,
}

/// A fetch the caller must run and report back
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket<Q> {
    pub seq: u64,
    pub query: Q,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Fresh records replaced the collection
    Applied { count: usize },
    /// The fetch failed; the previous records stay on screen
    Failed,
    /// A newer fetch was issued in the meantime; result discarded
    Superseded,
}

pub struct CollectionView<L: Listable> {
    records: Vec<L>,
    source: DataSource,
    filter: FilterState<L>,
    pager: Pager,
    phase: ViewPhase,
    banner: Option<Banner>,
    latest_seq: u64,
}

impl<L: Listable> CollectionView<L> {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            source: DataSource::None,
            filter: FilterState::default(),
            pager: Pager::new(page_size),
            phase: ViewPhase::Idle,
            banner: None,
            latest_seq: 0,
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ViewPhase::Loading
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn filter(&self) -> &FilterState<L> {
        &self.filter
    }

    pub fn records(&self) -> &[L] {
        &self.records
    }

    pub fn limit(&self) -> usize {
        self.pager.limit()
    }

    /// Show cached records right away, then start the first fetch
    pub fn mount(&mut self, cached: Vec<L>) -> FetchTicket<L::Query> {
        if !cached.is_empty() {
            tracing::debug!("Rendering {} cached records while fetching", cached.len());
            self.records = cached;
            self.source = DataSource::Cache;
        }
        self.begin_fetch()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket<L::Query> {
        self.latest_seq += 1;
        self.phase = ViewPhase::Loading;
        FetchTicket {
            seq: self.latest_seq,
            query: L::server_query(&self.filter),
        }
    }

    /// Re-issue the fetch after a failure
    pub fn retry(&mut self) -> FetchTicket<L::Query> {
        self.banner = None;
        self.begin_fetch()
    }

    pub fn complete_fetch(&mut self, seq: u64, result: AppResult<Vec<L>>) -> FetchOutcome {
        if seq != self.latest_seq {
            tracing::debug!("Discarding fetch #{} superseded by #{}", seq, self.latest_seq);
            return FetchOutcome::Superseded;
        }
        match result {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.source = DataSource::Network;
                self.phase = ViewPhase::Ready;
                self.banner = None;
                FetchOutcome::Applied { count }
            }
            Err(e) => {
                tracing::warn!("Fetch #{} failed, keeping {} records: {}", seq, self.records.len(), e);
                self.phase = ViewPhase::Failed;
                self.banner = Some(Banner::from(&e));
                FetchOutcome::Failed
            }
        }
    }

    /// Change the filter. Always resets the reveal limit; returns a ticket
    /// when the server-side query changed and the collection must be fetched
    /// again.
    pub fn update_filter<F>(&mut self, change: F) -> Option<FetchTicket<L::Query>>
    where
        F: FnOnce(&mut FilterState<L>),
    {
        let before = L::server_query(&self.filter);
        change(&mut self.filter);
        self.pager.reset();
        if L::server_query(&self.filter) != before {
            Some(self.begin_fetch())
        } else {
            None
        }
    }

    /// Restore every filter field to its default and fetch again
    pub fn reset_filters(&mut self) -> FetchTicket<L::Query> {
        self.filter = FilterState::default();
        self.pager.reset();
        self.begin_fetch()
    }

    /// Reveal one more page; `false` when everything is already visible
    pub fn load_more(&mut self, now: DateTime<Utc>) -> bool {
        if !self.visible(now).has_more() {
            return false;
        }
        self.pager.load_more();
        true
    }

    pub fn visible(&self, now: DateTime<Utc>) -> VisibleSlice<L> {
        derive_visible(&self.records, &self.filter, self.pager.limit(), now)
    }

    /// `Some` when nothing matches and there is no fetch in flight
    pub fn empty_state(&self, now: DateTime<Utc>) -> Option<EmptyState> {
        if self.is_loading() || !self.visible(now).is_empty() {
            return None;
        }
        Some(EmptyState {
            can_reset: !self.filter.is_default(),
        })
    }

    /// Insert or replace a server-confirmed record; at most one copy per id.
    /// New records go first, replacements keep their position.
    pub fn upsert(&mut self, record: L) {
        upsert_record(&mut self.records, record);
    }

    /// Remove every record with this id; returns how many were removed
    pub fn remove(&mut self, id: &str) -> usize {
        remove_records(&mut self.records, id)
    }
}

pub(crate) fn upsert_record<L: Listable>(records: &mut Vec<L>, record: L) {
    match records.iter().position(|r| r.id() == record.id()) {
        Some(idx) => {
            let id = record.id().to_string();
            records[idx] = record;
            let mut seen = false;
            records.retain(|r| {
                if r.id() != id {
                    return true;
                }
                let keep = !seen;
                seen = true;
                keep
            });
        }
        None => records.insert(0, record),
    }
}

pub(crate) fn remove_records<L: Listable>(records: &mut Vec<L>, id: &str) -> usize {
    let before = records.len();
    records.retain(|r| r.id() != id);
    before - records.len()
}
