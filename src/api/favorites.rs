//! Favorites endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::{query_pairs, retain_valid, ApiClient};
use crate::{
    error::AppResult,
    models::{FavoriteItem, FavoriteQuery, ToggleFavoriteResponse},
};

pub const FAVORITES_PATH: &str = "/api/favorites";

pub fn toggle_path(item_id: &str) -> String {
    format!("{}/toggle/{}", FAVORITES_PATH, item_id)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoritesApi: Send + Sync {
    async fn list_favorites(&self, query: &FavoriteQuery) -> AppResult<Vec<FavoriteItem>>;

    /// Flip the favorite flag; the answer carries the new state
    async fn toggle_favorite(&self, item_id: &str) -> AppResult<ToggleFavoriteResponse>;
}

#[async_trait]
impl FavoritesApi for ApiClient {
    async fn list_favorites(&self, query: &FavoriteQuery) -> AppResult<Vec<FavoriteItem>> {
        let items: Vec<FavoriteItem> = self.get_data(FAVORITES_PATH, &query_pairs(query)?).await?;
        tracing::debug!("Fetched {} favorites", items.len());
        Ok(retain_valid("favorite", items))
    }

    async fn toggle_favorite(&self, item_id: &str) -> AppResult<ToggleFavoriteResponse> {
        let response: ToggleFavoriteResponse = self
            .send_data(Method::POST, &toggle_path(item_id), Some(serde_json::json!({})))
            .await?;
        tracing::info!("Favorite {} is now {}", item_id, response.is_favorite);
        Ok(response)
    }
}
