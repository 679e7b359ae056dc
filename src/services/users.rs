//! Current user and profile service

use std::sync::Arc;

use crate::{
    api::UsersApi,
    error::{AppError, AppResult},
    models::{UpdateProfile, UserProfile},
    session::Session,
};

#[derive(Clone)]
pub struct UsersService {
    api: Arc<dyn UsersApi>,
    session: Session,
}

impl UsersService {
    pub fn new(api: Arc<dyn UsersApi>, session: Session) -> Self {
        Self { api, session }
    }

    /// Fetch the signed-in user and store it on the session
    pub async fn load_current_user(&self) -> AppResult<UserProfile> {
        let user = self.api.current_user().await?;
        tracing::debug!("Loaded profile of user {}", user.id);
        self.session.set_user(user.clone());
        Ok(user)
    }

    /// Save profile changes.
    ///
    /// The profile endpoint is soft-fail: a rejected token comes back as
    /// [`AppError::Authentication`] and the session stays as it is.
    pub async fn update_profile(&self, update: &UpdateProfile) -> AppResult<UserProfile> {
        match self.api.update_profile(update).await {
            Ok(user) => {
                tracing::info!("Profile of user {} updated", user.id);
                self.session.set_user(user.clone());
                Ok(user)
            }
            Err(e @ AppError::Authentication(_)) => {
                tracing::warn!("Profile update rejected: {}", e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
