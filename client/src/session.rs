//! Authentication state for the running console.
//!
//! [`SessionStore`] is built once at startup with [`SessionStore::restore`]
//! and passed to whatever needs it. Every mutating action writes durable
//! storage first and only then touches the in-memory copy, under the same
//! lock, so the two never drift apart.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use shared::types::{ChangePasswordRequest, Envelope, LoginRequest, RegisterRequest, UserProfile};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::api::auth;
use crate::error::ApiError;
use crate::storage::{DurableStorage, StorageWrite, TOKEN_KEY, USER_KEY, USERNAME_KEY};
use crate::transport::Transport;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Snapshot of the session. Authentication is derived from the token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }
}

/// Broadcast to subscribers (e.g. the navigator) when the session changes
/// in a way the rest of the console must react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Ended,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct SessionStore<T: Transport> {
    transport: T,
    storage: Arc<dyn DurableStorage>,
    session: RwLock<Session>,
    events: broadcast::Sender<SessionEvent>,
}

impl<T: Transport> SessionStore<T> {
    /// Build the store, hydrating token and user from durable storage.
    pub fn restore(transport: T, storage: Arc<dyn DurableStorage>) -> Self {
        let session = match storage.token() {
            Some(token) => {
                let user = storage.get(USER_KEY).and_then(|raw| parse_user(&raw));
                info!(
                    "Restored session for {}",
                    user.as_ref().and_then(|u| u.username()).unwrap_or("<unknown user>")
                );
                Session { token, user }
            }
            None => {
                debug!("No stored token, starting anonymous");
                Session::default()
            }
        };

        let (events, _) = broadcast::channel(16);

        Self {
            transport,
            storage,
            session: RwLock::new(session),
            events,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn storage(&self) -> &Arc<dyn DurableStorage> {
        &self.storage
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> Session {
        self.session.read().clone()
    }

    pub fn token(&self) -> String {
        self.session.read().token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.session.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    pub fn state(&self) -> SessionState {
        self.session.read().state()
    }

    // -----------------------------------------------------------------------
    // Remote actions
    // -----------------------------------------------------------------------

    pub async fn login(&self, credentials: &LoginRequest) -> Result<Envelope, ApiError> {
        info!("Logging in: {}", credentials);

        let response = auth::login(&self.transport, credentials)
            .await
            .inspect_err(|e| error!("Login failed: {}", e))?;

        let (token, user) = login_grant(&response.data)?;
        let username = user
            .username()
            .map(str::to_string)
            .unwrap_or_else(|| credentials.username.clone());
        let user_json = encode_user(&user)?;

        {
            let mut session = self.session.write();
            self.storage.apply(&[
                StorageWrite::set(TOKEN_KEY, token.as_str()),
                StorageWrite::set(USER_KEY, user_json),
                StorageWrite::set(USERNAME_KEY, username.as_str()),
            ])?;
            session.token = token;
            session.user = Some(user);
        }

        info!("Logged in as {}", username);
        Ok(response)
    }

    /// Registration does not sign the new student in.
    pub async fn register(&self, details: &RegisterRequest) -> Result<Envelope, ApiError> {
        info!("Registering student {}", details.name);
        auth::register(&self.transport, details)
            .await
            .inspect_err(|e| error!("Registration failed: {}", e))
    }

    pub async fn fetch_profile(&self) -> Result<Envelope, ApiError> {
        let response = auth::profile(&self.transport)
            .await
            .inspect_err(|e| error!("Fetching profile failed: {}", e))?;

        let user = UserProfile::from_value(response.data.clone())
            .ok_or_else(|| ApiError::MalformedResponse("profile is not an object".to_string()))?;
        let user_json = encode_user(&user)?;

        {
            let mut session = self.session.write();
            self.storage.set(USER_KEY, &user_json)?;
            session.user = Some(user);
        }

        debug!("Profile refreshed");
        Ok(response)
    }

    /// Always ends the local session, whatever the server says. The cleanup
    /// also runs if this future is dropped before the remote call finishes.
    pub async fn logout(&self) {
        let _cleanup = EndSessionOnDrop { store: self };

        match auth::logout(&self.transport).await {
            Ok(_) => debug!("Server acknowledged logout"),
            Err(e) => warn!("Remote logout failed, clearing local session anyway: {}", e),
        }
    }

    pub async fn change_password(
        &self,
        data: &ChangePasswordRequest,
    ) -> Result<Envelope, ApiError> {
        let response = auth::change_password(&self.transport, data)
            .await
            .inspect_err(|e| error!("Password change failed: {}", e))?;

        let mut session = self.session.write();
        if let Some(mut user) = session.user.clone() {
            user.set_first_login(false);
            self.storage.set(USER_KEY, &encode_user(&user)?)?;
            session.user = Some(user);
        }
        drop(session);

        info!("Password changed");
        Ok(response)
    }

    // -----------------------------------------------------------------------
    // Local actions
    // -----------------------------------------------------------------------

    /// Shallow-merge `partial` into the current user; later fields win.
    pub fn update_user_info(&self, partial: Map<String, Value>) -> Result<(), ApiError> {
        let mut session = self.session.write();

        let mut user = session.user.clone().unwrap_or_default();
        user.merge(partial);
        self.storage.set(USER_KEY, &encode_user(&user)?)?;
        session.user = Some(user);

        Ok(())
    }

    pub fn set_token(&self, token: &str) -> Result<(), ApiError> {
        let mut session = self.session.write();

        if token.is_empty() {
            self.storage.remove(TOKEN_KEY)?;
            debug!("Token cleared");
        } else {
            self.storage.set(TOKEN_KEY, token)?;
            debug!("Token set");
        }
        session.token = token.to_string();

        Ok(())
    }

    fn end_session(&self) {
        let mut session = self.session.write();

        if let Err(e) = self.storage.apply(&[
            StorageWrite::remove(TOKEN_KEY),
            StorageWrite::remove(USER_KEY),
            StorageWrite::remove(USERNAME_KEY),
        ]) {
            error!("Failed to clear stored session: {}", e);
        }
        *session = Session::default();
        drop(session);

        info!("Session ended");
        if self.events.send(SessionEvent::Ended).is_err() {
            debug!("No subscribers for session end");
        }
    }
}

struct EndSessionOnDrop<'a, T: Transport> {
    store: &'a SessionStore<T>,
}

impl<T: Transport> Drop for EndSessionOnDrop<'_, T> {
    fn drop(&mut self) {
        self.store.end_session();
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pull `token` and `user` out of a login response's `data`.
fn login_grant(data: &Value) -> Result<(String, UserProfile), ApiError> {
    let token = data
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::MalformedResponse("login response has no token".to_string()))?
        .to_string();

    let user = data
        .get("user")
        .cloned()
        .and_then(UserProfile::from_value)
        .ok_or_else(|| ApiError::MalformedResponse("login response has no user".to_string()))?;

    Ok((token, user))
}

fn encode_user(user: &UserProfile) -> Result<String, ApiError> {
    serde_json::to_string(user)
        .map_err(|e| ApiError::MalformedResponse(format!("user profile not serializable: {}", e)))
}

fn parse_user(raw: &str) -> Option<UserProfile> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => UserProfile::from_value(value),
        Err(e) => {
            warn!("Ignoring unreadable stored user record: {}", e);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
