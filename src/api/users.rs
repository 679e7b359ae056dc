//! User profile endpoints

use async_trait::async_trait;
use reqwest::Method;
use validator::Validate;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{UpdateProfile, UserProfile},
};

pub const ME_PATH: &str = "/api/users/me";
/// Soft-fail by default: a 401 here is reported to the form, not a logout
pub const PROFILE_PATH: &str = "/api/users/profile";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn current_user(&self) -> AppResult<UserProfile>;

    async fn update_profile(&self, update: &UpdateProfile) -> AppResult<UserProfile>;
}

#[async_trait]
impl UsersApi for ApiClient {
    async fn current_user(&self) -> AppResult<UserProfile> {
        self.get_data(ME_PATH, &[]).await
    }

    async fn update_profile(&self, update: &UpdateProfile) -> AppResult<UserProfile> {
        update.validate()?;
        let body = serde_json::to_value(update)?;
        self.send_data(Method::PUT, PROFILE_PATH, Some(body)).await
    }
}
