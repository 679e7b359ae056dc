//! Fetch and cache plumbing shared by the list pages
//!
//! [`ListPage`] owns a [`CollectionView`], the collection's cache and the
//! [`Fetcher`] that loads it. The bookings and favorites pages wrap one each
//! and only add their own actions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    listing::{FilterState, Listable, VisibleSlice},
    view::{remove_records, upsert_record, CollectionView, EmptyState, FetchOutcome, FetchTicket},
    Notice,
};
use crate::{error::AppResult, repository::CollectionCache};

/// Loads a collection for a server-side query
#[async_trait]
pub trait Fetcher<L: Listable>: Send + Sync {
    async fn fetch(&self, query: &L::Query) -> AppResult<Vec<L>>;
}

/// A finished fetch, to hand back to [`ListPage::apply`]
#[derive(Debug)]
pub struct Fetched<L: Listable> {
    pub ticket: FetchTicket<L::Query>,
    pub result: AppResult<Vec<L>>,
}

pub struct ListPage<L: Listable, F> {
    fetcher: F,
    cache: CollectionCache<L>,
    view: CollectionView<L>,
    notice: Option<Notice>,
}

impl<L, F> ListPage<L, F>
where
    L: Listable,
    F: Fetcher<L> + Clone,
{
    pub fn new(fetcher: F, cache: CollectionCache<L>, page_size: usize) -> Self {
        Self {
            fetcher,
            cache,
            view: CollectionView::new(page_size),
            notice: None,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache(&self) -> &CollectionCache<L> {
        &self.cache
    }

    pub fn view(&self) -> &CollectionView<L> {
        &self.view
    }

    pub fn records(&self) -> &[L] {
        self.view.records()
    }

    pub fn find(&self, id: &str) -> Option<&L> {
        self.view.records().iter().find(|r| r.id() == id)
    }

    pub fn visible(&self, now: DateTime<Utc>) -> VisibleSlice<L> {
        self.view.visible(now)
    }

    pub fn empty_state(&self, now: DateTime<Utc>) -> Option<EmptyState> {
        self.view.empty_state(now)
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Take the pending notification, if any
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Show cached records, then fetch fresh ones
    pub async fn mount(&mut self) -> FetchOutcome {
        let ticket = self.view.mount(self.cache.load());
        self.run(ticket).await
    }

    pub async fn refresh(&mut self) -> FetchOutcome {
        let ticket = self.view.begin_fetch();
        self.run(ticket).await
    }

    pub async fn retry(&mut self) -> FetchOutcome {
        let ticket = self.view.retry();
        self.run(ticket).await
    }

    /// Start a fetch to be run with [`ListPage::fetch`]. Several may be in
    /// flight; only the last one begun is applied.
    pub fn begin(&mut self) -> FetchTicket<L::Query> {
        self.view.begin_fetch()
    }

    /// Run a ticket without borrowing the page
    pub async fn fetch(fetcher: F, ticket: FetchTicket<L::Query>) -> Fetched<L> {
        let result = fetcher.fetch(&ticket.query).await;
        Fetched { ticket, result }
    }

    /// Apply a finished fetch.
    ///
    /// Only an unfiltered collection is written to the cache, so a tab or
    /// category subset never replaces the full fallback copy.
    pub fn apply(&mut self, fetched: Fetched<L>) -> FetchOutcome {
        let Fetched { ticket, result } = fetched;
        let outcome = self.view.complete_fetch(ticket.seq, result);
        if let FetchOutcome::Applied { .. } = outcome {
            if ticket.query == L::Query::default() {
                self.store(self.view.records());
            }
        }
        outcome
    }

    /// Overwrite the cached collection, logging failures
    pub fn store(&self, records: &[L]) {
        if let Err(e) = self.cache.save(records) {
            tracing::warn!("Failed to write cache {}: {}", self.cache.key(), e);
        }
    }

    async fn run(&mut self, ticket: FetchTicket<L::Query>) -> FetchOutcome {
        let fetched = Self::fetch(self.fetcher.clone(), ticket).await;
        self.apply(fetched)
    }

    /// Change the filter, fetching again when the server query changed
    pub async fn update_filter<C>(&mut self, change: C) -> Option<FetchOutcome>
    where
        C: FnOnce(&mut FilterState<L>),
    {
        match self.view.update_filter(change) {
            Some(ticket) => Some(self.run(ticket).await),
            None => None,
        }
    }

    /// Change a filter field that is applied client-side only
    pub fn update_local_filter<C>(&mut self, change: C)
    where
        C: FnOnce(&mut FilterState<L>),
    {
        let ticket = self.view.update_filter(change);
        debug_assert!(ticket.is_none(), "server-side filter changed without a fetch");
    }

    pub async fn reset_filters(&mut self) -> FetchOutcome {
        let ticket = self.view.reset_filters();
        self.run(ticket).await
    }

    pub fn load_more(&mut self, now: DateTime<Utc>) -> bool {
        self.view.load_more(now)
    }

    /// Store a server-confirmed record in the view and the cached copy
    pub fn upsert(&mut self, record: L) {
        let mut cached = self.cache.load();
        upsert_record(&mut cached, record.clone());
        self.store(&cached);
        self.view.upsert(record);
    }

    /// Drop every copy of `id` from the view and the cached copy
    pub fn remove(&mut self, id: &str) -> usize {
        let mut cached = self.cache.load();
        if remove_records(&mut cached, id) > 0 {
            self.store(&cached);
        }
        self.view.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::favorite::fixtures::favorite;
    use crate::models::{FavoriteItem, FavoriteQuery, FavoriteTab, FavoriteType};
    use crate::repository::MemoryStore;
    use std::sync::{Arc, Mutex};

    /// Answers from a fixed list, honouring the type filter
    #[derive(Clone, Default)]
    struct StaticFetcher {
        queries: Arc<Mutex<Vec<FavoriteQuery>>>,
    }

    #[async_trait]
    impl Fetcher<FavoriteItem> for StaticFetcher {
        async fn fetch(&self, query: &FavoriteQuery) -> AppResult<Vec<FavoriteItem>> {
            self.queries.lock().unwrap().push(query.clone());
            let all = vec![
                favorite("v1", FavoriteType::Venue, "Old Mill"),
                favorite("s1", FavoriteType::Service, "DJ Nova"),
            ];
            Ok(all
                .into_iter()
                .filter(|f| query.item_type.as_deref().map_or(true, |t| f.item_type.as_str() == t))
                .collect())
        }
    }

    fn page() -> ListPage<FavoriteItem, StaticFetcher> {
        let cache = CollectionCache::new(Arc::new(MemoryStore::new()), "venuity.favorites");
        ListPage::new(StaticFetcher::default(), cache, 8)
    }

    #[tokio::test]
    async fn test_filtered_fetch_keeps_full_cache() {
        let mut page = page();
        assert_eq!(page.mount().await, FetchOutcome::Applied { count: 2 });
        assert_eq!(page.cache().load().len(), 2);

        page.update_filter(|f| f.tab = FavoriteTab::Venues).await;
        assert_eq!(page.records().len(), 1);
        assert_eq!(page.cache().load().len(), 2);
    }

    #[tokio::test]
    async fn test_last_begun_fetch_wins() {
        let mut page = page();
        let first = page.begin();
        let second = page.begin();

        let newer = ListPage::<FavoriteItem, StaticFetcher>::fetch(page.fetcher().clone(), second).await;
        let older = ListPage::<FavoriteItem, StaticFetcher>::fetch(page.fetcher().clone(), first).await;
        assert_eq!(page.apply(newer), FetchOutcome::Applied { count: 2 });
        assert_eq!(page.apply(older), FetchOutcome::Superseded);
        assert_eq!(page.fetcher().queries.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_upsert_and_remove_patch_cache() {
        let mut page = page();
        page.mount().await;
        page.update_filter(|f| f.tab = FavoriteTab::Services).await;

        page.upsert(favorite("v2", FavoriteType::Venue, "Arches Loft"));
        assert_eq!(page.cache().load().len(), 3);

        assert_eq!(page.remove("v1"), 0, "not in the Services subset");
        let cached: Vec<String> = page.cache().load().into_iter().map(|f| f.id).collect();
        assert_eq!(cached, vec!["v2", "s1"]);
    }
}
