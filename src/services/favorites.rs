//! Favorites page: list controller and favorite toggling

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexSet;

use super::{
    listing::{cmp_present_first, DateWindow, FilterState, Listable},
    page::{Fetcher, ListPage},
    share::{self, ShareOutcome},
    view::FetchOutcome,
    Notice,
};
use crate::{
    api::FavoritesApi,
    error::{AppError, AppResult},
    models::{FavoriteItem, FavoriteQuery, FavoriteSort, FavoriteTab, FavoriteType},
    platform::{Platform, SharePayload},
    repository::CollectionCache,
};

impl Listable for FavoriteItem {
    type Tab = FavoriteTab;
    type Sort = FavoriteSort;
    type Query = FavoriteQuery;

    fn id(&self) -> &str {
        &self.id
    }

    fn in_tab(&self, tab: FavoriteTab, _now: DateTime<Utc>) -> bool {
        tab.item_type().map_or(true, |t| self.item_type == t)
    }

    fn matches_kind(&self, kind: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|category| category.eq_ignore_ascii_case(kind))
    }

    fn date_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.added_at.map(|at| (at, at))
    }

    fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    fn compare(a: &Self, b: &Self, sort: FavoriteSort) -> Ordering {
        match sort {
            FavoriteSort::Recent => Ordering::Equal,
            FavoriteSort::Price => cmp_present_first(a.price, b.price, |x, y| x.cmp(y)),
            FavoriteSort::Rating => cmp_present_first(a.rating, b.rating, |x, y| y.total_cmp(x)),
            FavoriteSort::Distance => cmp_present_first(a.distance, b.distance, |x, y| x.total_cmp(y)),
            FavoriteSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }

    fn server_query(filter: &FilterState<Self>) -> FavoriteQuery {
        FavoriteQuery {
            item_type: filter.tab.item_type().map(|t| t.as_str().to_string()),
            category: filter.kind.clone(),
        }
    }
}

#[async_trait]
impl Fetcher<FavoriteItem> for Arc<dyn FavoritesApi> {
    async fn fetch(&self, query: &FavoriteQuery) -> AppResult<Vec<FavoriteItem>> {
        self.list_favorites(query).await
    }
}

pub type FavoritesList = ListPage<FavoriteItem, Arc<dyn FavoritesApi>>;

pub struct FavoritesPage {
    list: FavoritesList,
    platform: Arc<dyn Platform>,
    web_url: String,
}

impl FavoritesPage {
    pub fn new(
        api: Arc<dyn FavoritesApi>,
        cache: CollectionCache<FavoriteItem>,
        platform: Arc<dyn Platform>,
        web_url: impl Into<String>,
        page_size: usize,
    ) -> Self {
        Self {
            list: ListPage::new(api, cache, page_size),
            platform,
            web_url: web_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn list(&self) -> &FavoritesList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut FavoritesList {
        &mut self.list
    }

    pub fn is_favorite(&self, item_id: &str) -> bool {
        self.list.find(item_id).is_some()
    }

    /// Distinct collection tags, in first-seen order
    pub fn collections(&self) -> Vec<String> {
        self.list
            .records()
            .iter()
            .filter_map(|f| f.collection.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect::<IndexSet<&str>>()
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub async fn set_tab(&mut self, tab: FavoriteTab) -> Option<FetchOutcome> {
        self.list.update_filter(|f| f.tab = tab).await
    }

    pub fn set_sort(&mut self, sort: FavoriteSort) {
        self.list.update_local_filter(|f| f.sort = sort);
    }

    pub async fn set_category(&mut self, category: Option<String>) -> Option<FetchOutcome> {
        self.list.update_filter(|f| f.kind = category).await
    }

    /// Filter on when items were favorited. Client-side only.
    pub fn set_date_window(&mut self, window: DateWindow) {
        self.list.update_local_filter(|f| f.window = window);
    }

    pub fn set_collection(&mut self, collection: Option<String>) {
        self.list.update_local_filter(|f| f.collection = collection);
    }

    /// Toggle `candidate` on the server and apply the answer.
    ///
    /// The server's `isFavorite` decides the outcome: `true` stores exactly one
    /// copy of the item (the echoed one when present), `false` drops every
    /// copy. On error nothing changes locally.
    pub async fn toggle_favorite(&mut self, candidate: &FavoriteItem) -> AppResult<bool> {
        let response = match self.list.fetcher().toggle_favorite(&candidate.id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Toggle of favorite {} failed: {}", candidate.id, e);
                self.list.notify(Notice::error(e.user_message()));
                return Err(e);
            }
        };

        if response.is_favorite {
            let item = response.item.unwrap_or_else(|| candidate.clone());
            self.list.upsert(item);
            self.list.notify(Notice::success(format!("{} added to favorites", candidate.name)));
        } else {
            let removed = self.list.remove(&candidate.id);
            tracing::debug!("Removed {} copies of favorite {}", removed, candidate.id);
            self.list.notify(Notice::success(format!("{} removed from favorites", candidate.name)));
        }
        Ok(response.is_favorite)
    }

    pub fn share_payload(&self, item_id: &str) -> AppResult<SharePayload> {
        let item = self
            .list
            .find(item_id)
            .ok_or_else(|| AppError::NotFound(format!("Favorite {} not found", item_id)))?;

        let section = match item.item_type {
            FavoriteType::Venue => "venues",
            FavoriteType::Service => "services",
        };
        let mut details = Vec::new();
        if let Some(category) = &item.category {
            details.push(category.clone());
        }
        if let Some(location) = &item.location {
            details.push(location.clone());
        }
        if let Some(rating) = item.rating {
            details.push(format!("{:.1}/5", rating));
        }
        Ok(SharePayload {
            title: item.name.clone(),
            text: details.join(" · "),
            url: Some(format!("{}/{}/{}", self.web_url, section, item.id)),
        })
    }

    pub fn share_favorite(&mut self, item_id: &str) -> AppResult<ShareOutcome> {
        let payload = self.share_payload(item_id)?;
        let outcome = share::share(self.platform.as_ref(), &payload);
        self.list.notify(match &outcome {
            Ok(ShareOutcome::Shared) => Notice::success("Shared"),
            Ok(ShareOutcome::Copied) => Notice::success("Link copied to clipboard"),
            Err(e) => Notice::error(e.user_message()),
        });
        outcome
    }
}
