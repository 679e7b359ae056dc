//! Venuity client core
//!
//! Client-side controller for the Venuity bookings and favorites pages:
//! fetching collections from the REST API with base-URL fallback, caching
//! them locally, deriving the visible slice (filter, sort, incremental
//! reveal) and dispatching the page actions (cancel, toggle favorite,
//! share, copy, add to calendar).

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod platform;
pub mod repository;
pub mod services;
pub mod session;
pub mod telemetry;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use platform::Platform;
pub use session::Session;

use repository::Repository;
use services::Services;

/// Client state shared across all pages
#[derive(Clone)]
pub struct ClientState {
    pub config: Arc<AppConfig>,
    pub session: Session,
    pub services: Arc<Services>,
}

impl ClientState {
    /// Wire the API client, file cache and services from `config`
    pub fn new(config: AppConfig, platform: Arc<dyn Platform>) -> AppResult<Self> {
        let session = Session::new();
        let repository = Repository::from_config(&config.cache);
        let services = Services::new(&config, session.clone(), repository, platform)?;
        tracing::info!(
            "Venuity client ready with {} base URL(s)",
            config.api.base_urls.len()
        );
        Ok(Self {
            config: Arc::new(config),
            session,
            services: Arc::new(services),
        })
    }

    /// End the session and forget every cached collection
    pub fn sign_out(&self) {
        self.session.sign_out();
        self.services.repository.clear();
    }
}
