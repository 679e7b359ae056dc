//! Favorite model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::FavoriteType;

/// A favorited venue or service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    #[serde(alias = "_id")]
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: FavoriteType,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Average review score, 0 to 5
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    /// Distance from the user in kilometres
    #[serde(default)]
    pub distance: Option<f64>,
    /// User-defined grouping ("Wedding shortlist", ...)
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

/// Payload of `POST /api/favorites/toggle/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteResponse {
    pub is_favorite: bool,
    /// Some deployments echo the stored item; it wins over the local copy
    #[serde(default)]
    pub item: Option<FavoriteItem>,
}

/// Query parameters for `GET /api/favorites`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
