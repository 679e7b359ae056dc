//! Page controllers and the actions behind them

pub mod bookings;
pub mod calendar;
pub mod favorites;
pub mod listing;
pub mod page;
pub mod share;
pub mod users;
pub mod view;

use std::sync::Arc;

use serde::Serialize;

use crate::{
    api::ApiClient,
    config::AppConfig,
    error::AppResult,
    platform::Platform,
    repository::Repository,
    session::Session,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient toast raised by an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub api: ApiClient,
    pub repository: Repository,
    pub users: users::UsersService,
    platform: Arc<dyn Platform>,
    web_url: String,
    page_size: usize,
}

impl Services {
    /// Create all services sharing one API client and cache
    pub fn new(
        config: &AppConfig,
        session: Session,
        repository: Repository,
        platform: Arc<dyn Platform>,
    ) -> AppResult<Self> {
        let api = ApiClient::new(&config.api, session.clone())?;
        Ok(Self::with_api(api, config, session, repository, platform))
    }

    pub fn with_api(
        api: ApiClient,
        config: &AppConfig,
        session: Session,
        repository: Repository,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            users: users::UsersService::new(Arc::new(api.clone()), session),
            api,
            repository,
            platform,
            web_url: config.links.web_url.clone(),
            page_size: config.listing.page_size,
        }
    }

    /// A fresh bookings page controller
    pub fn bookings_page(&self) -> bookings::BookingsPage {
        bookings::BookingsPage::new(
            Arc::new(self.api.clone()),
            self.repository.bookings.clone(),
            self.platform.clone(),
            self.web_url.clone(),
            self.page_size,
        )
    }

    /// A fresh favorites page controller
    pub fn favorites_page(&self) -> favorites::FavoritesPage {
        favorites::FavoritesPage::new(
            Arc::new(self.api.clone()),
            self.repository.favorites.clone(),
            self.platform.clone(),
            self.web_url.clone(),
            self.page_size,
        )
    }
}
