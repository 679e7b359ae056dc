//! Session context shared by the API client and the list pages
//!
//! The session is an explicit object: it is created by the embedding
//! application, handed to [`crate::api::ApiClient`] and cloned into every
//! page that needs to know who is signed in. Clones share the same state.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::models::{SessionClaims, UserProfile};

/// Lifecycle of the client session
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    SignedOut,
    Active {
        token: String,
        /// `None` when the token is opaque rather than a JWT
        claims: Option<SessionClaims>,
        user: Option<UserProfile>,
    },
    /// The API rejected the token; the UI must send the user to the login view
    LoginRequired { endpoint: String },
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an authenticated session with a bearer token
    pub fn sign_in(&self, token: impl Into<String>) {
        let token = token.into();
        let claims = match SessionClaims::from_token(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!("Bearer token is not a decodable JWT: {}", e);
                None
            }
        };
        tracing::info!(
            "Session started{}",
            claims.as_ref().map(|c| format!(" for {}", c.sub)).unwrap_or_default()
        );
        *self.write() = SessionState::Active { token, claims, user: None };
    }

    /// Attach the signed-in user's profile. Ignored unless the session is active.
    pub fn set_user(&self, profile: UserProfile) {
        if let SessionState::Active { user, .. } = &mut *self.write() {
            *user = Some(profile);
        }
    }

    /// Token to send at `now`, or `None` when signed out.
    ///
    /// A token whose `exp` has passed ends the session locally, the same way
    /// a 401 would.
    pub fn bearer_token(&self, now: DateTime<Utc>) -> Option<String> {
        let mut state = self.write();
        match &*state {
            SessionState::Active { token, claims, .. } => {
                if !claims.as_ref().is_some_and(|c| c.is_expired(now)) {
                    return Some(token.clone());
                }
            }
            _ => return None,
        }
        tracing::info!("Bearer token expired locally, login required");
        *state = SessionState::LoginRequired {
            endpoint: "<local expiry>".to_string(),
        };
        None
    }

    pub fn user(&self) -> Option<UserProfile> {
        match &*self.read() {
            SessionState::Active { user, .. } => user.clone(),
            _ => None,
        }
    }

    /// Clear the token after a 401 and ask for a new login
    pub fn expire(&self, endpoint: &str) {
        tracing::warn!("Session rejected by {}, clearing token", endpoint);
        *self.write() = SessionState::LoginRequired {
            endpoint: endpoint.to_string(),
        };
    }

    pub fn sign_out(&self) {
        *self.write() = SessionState::SignedOut;
    }

    pub fn is_active(&self) -> bool {
        matches!(&*self.read(), SessionState::Active { .. })
    }

    pub fn requires_login(&self) -> bool {
        matches!(&*self.read(), SessionState::LoginRequired { .. })
    }

    pub fn state(&self) -> SessionState {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn jwt(exp: i64) -> String {
        let claims = SessionClaims { sub: "user_7".to_string(), exp, iat: None };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"k")).unwrap()
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::new();
        let view_copy = session.clone();
        session.sign_in("opaque-token");
        assert!(view_copy.is_active());
        assert_eq!(view_copy.bearer_token(Utc::now()).as_deref(), Some("opaque-token"));

        view_copy.expire("/api/bookings");
        assert!(session.requires_login());
        assert_eq!(session.bearer_token(Utc::now()), None);
    }

    #[test]
    fn test_local_expiry() {
        let session = Session::new();
        session.sign_in(jwt(1_800_000_000));

        let before = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert!(session.bearer_token(before).is_some());

        let after = Utc.timestamp_opt(1_800_000_001, 0).unwrap();
        assert!(session.bearer_token(after).is_none());
        assert!(session.requires_login());
    }

    #[test]
    fn test_user_only_on_active_session() {
        let session = Session::new();
        let profile = UserProfile {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            avatar: None,
        };
        session.set_user(profile.clone());
        assert_eq!(session.user(), None);

        session.sign_in("t");
        session.set_user(profile.clone());
        assert_eq!(session.user(), Some(profile));

        session.sign_out();
        assert_eq!(session.state(), SessionState::SignedOut);
    }
}
