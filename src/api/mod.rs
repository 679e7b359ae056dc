//! HTTP client for the Venuity REST API
//!
//! [`ApiClient`] owns the transport concerns shared by every resource:
//! bearer authentication from the [`Session`], the 401 policy with its
//! soft-fail exemptions, the ordered base-URL fallback and the mapping of
//! responses onto [`AppError`]. The resource traits in the submodules are
//! what the list pages depend on.

pub mod bookings;
pub mod favorites;
pub mod users;

pub use bookings::BookingsApi;
pub use favorites::FavoritesApi;
pub use users::UsersApi;

use chrono::Utc;
use reqwest::{header::AUTHORIZATION, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    models::{Envelope, ErrorBody},
    session::Session,
};

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_urls: Vec<String>,
    soft_fail_endpoints: Vec<String>,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(http, config, session))
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    pub fn with_client(http: reqwest::Client, config: &ApiConfig, session: Session) -> Self {
        Self {
            http,
            base_urls: config
                .base_urls
                .iter()
                .map(|url| url.trim_end_matches('/').to_string())
                .collect(),
            soft_fail_endpoints: config.soft_fail_endpoints.clone(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }

    /// `GET path?query` and unwrap the `data` envelope
    pub async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> AppResult<T> {
        let response = self.execute(Method::GET, path, query, None).await?;
        Self::parse_envelope(path, response).await
    }

    /// Send a JSON body and unwrap the `data` envelope of the answer
    pub async fn send_data<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> AppResult<T> {
        let response = self.execute(method, path, &[], body.as_ref()).await?;
        Self::parse_envelope(path, response).await
    }

    /// Send a JSON body where only the status of the answer matters.
    ///
    /// Any 2xx is accepted, including `204 No Content` and an empty body.
    pub async fn send_ignoring_body(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> AppResult<()> {
        let response = self.execute(method, path, &[], body.as_ref()).await?;
        tracing::debug!("{} answered {}, body ignored", path, response.status());
        Ok(())
    }

    fn is_soft_fail(&self, path: &str) -> bool {
        self.soft_fail_endpoints.iter().any(|endpoint| endpoint == path)
    }

    /// Try every base URL in order until one answers.
    ///
    /// Only transport failures move on to the next candidate: an HTTP
    /// response, whatever its status, ends the search.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
    ) -> AppResult<Response> {
        let token = self.session.bearer_token(Utc::now());
        let request_id = Uuid::new_v4();
        let mut last_error = None;

        for (idx, base_url) in self.base_urls.iter().enumerate() {
            let url = format!("{}{}", base_url, path);
            tracing::debug!(%request_id, "{} {} (candidate {}/{})", method, url, idx + 1, self.base_urls.len());

            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(REQUEST_ID_HEADER, request_id.to_string());
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(ref token) = token {
                request = request.header(AUTHORIZATION, format!("Bearer {}", token));
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => {
                    tracing::debug!(%request_id, "{} answered {}", base_url, response.status());
                    return self.check_status(path, response).await;
                }
                Err(e) => {
                    tracing::warn!(%request_id, "Base URL {} unreachable: {}", base_url, e);
                    last_error = Some(e);
                }
            }
        }

        let detail = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no API base URL configured".to_string());
        tracing::error!(%request_id, "All base URLs failed for {}: {}", path, detail);
        Err(AppError::Transport(detail))
    }

    /// Apply the 401 policy and turn error statuses into [`AppError::Server`]
    async fn check_status(&self, path: &str, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = Self::error_message(response).await;

        if status == StatusCode::UNAUTHORIZED {
            if self.is_soft_fail(path) {
                tracing::info!("401 on soft-fail endpoint {}, keeping session", path);
                return Err(AppError::Authentication(
                    message.unwrap_or_else(|| "Authentication failed".to_string()),
                ));
            }
            self.session.expire(path);
            return Err(AppError::SessionExpired { endpoint: path.to_string() });
        }

        tracing::warn!("{} failed with {}: {:?}", path, status, message);
        Err(AppError::Server { status: status.as_u16(), message })
    }

    async fn error_message(response: Response) -> Option<String> {
        let text = response.text().await.ok()?;
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.into_message(),
            // Plain-text error pages are passed through when short enough to be a sentence
            Err(_) => {
                let text = text.trim();
                (!text.is_empty() && text.len() <= 200 && !text.starts_with('<')).then(|| text.to_string())
            }
        }
    }

    async fn parse_envelope<T: DeserializeOwned>(path: &str, response: Response) -> AppResult<T> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        serde_json::from_slice::<Envelope<T>>(&bytes)
            .map(|envelope| envelope.data)
            .map_err(|e| {
                tracing::error!("Malformed response from {}: {}", path, e);
                AppError::Server { status, message: None }
            })
    }
}

/// Flatten a query struct into `key=value` pairs, skipping nulls
pub fn query_pairs<Q: Serialize>(query: &Q) -> AppResult<Vec<(String, String)>> {
    let value = serde_json::to_value(query)?;
    let serde_json::Value::Object(map) = value else {
        return Err(AppError::Validation("query must serialize to an object".to_string()));
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

/// Drop records that fail validation, logging each one
pub(crate) fn retain_valid<T: Validate>(resource: &str, records: Vec<T>) -> Vec<T> {
    let total = records.len();
    let valid: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| match record.validate() {
            Ok(()) => Some(record),
            Err(e) => {
                tracing::warn!("Dropping invalid {} record #{}: {}", resource, idx, e);
                None
            }
        })
        .collect();
    if valid.len() < total {
        tracing::warn!("Kept {}/{} {} records", valid.len(), total, resource);
    }
    valid
}
