//! The auth session store.
//!
//! Holds the current [`AuthState`] behind a watch channel, applies
//! transitions through [`AuthState::reduce`] and writes the persisted
//! subset to `auth-storage` after every transition. The refresh token lives
//! in its own `refresh-token` slot.
//!
//! Writes are serialized and always persist the latest state, so the blob
//! on disk never lags behind a later transition.

use std::sync::{Arc, Mutex, PoisonError};

use rollcall_auth::{AUTH_STORAGE_KEY, AuthEvent, AuthState, PersistedAuth, REFRESH_TOKEN_KEY};
use rollcall_core::storage::{load_json, save_json};
use rollcall_core::{ClientError, Notification, Notifier, StateStorage};
use rollcall_models::{LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest, User};
use rollcall_observability::{track_login_failure, track_login_success};
use tokio::sync::{Mutex as AsyncMutex, watch};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::client::ApiClient;
use crate::modules::auth::AuthService;

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    state: watch::Sender<AuthState>,
    refresh_token: Mutex<Option<String>>,
    persist_lock: AsyncMutex<()>,
    storage: Arc<dyn StateStorage>,
    notifier: Arc<dyn Notifier>,
}

impl SessionStore {
    /// Restores the persisted session.
    ///
    /// Must run before the first guarded route is evaluated.
    pub async fn load(
        storage: Arc<dyn StateStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        let state = load_json::<PersistedAuth>(storage.as_ref(), AUTH_STORAGE_KEY)
            .await?
            .map(AuthState::rehydrate)
            .unwrap_or_default();

        let refresh_token = if state.is_authenticated {
            load_json::<String>(storage.as_ref(), REFRESH_TOKEN_KEY).await?
        } else {
            None
        };

        info!(
            authenticated = state.is_authenticated,
            role = ?state.role(),
            "session restored"
        );
        Ok(Self::with_state(storage, notifier, state, refresh_token))
    }

    fn with_state(
        storage: Arc<dyn StateStorage>,
        notifier: Arc<dyn Notifier>,
        state: AuthState,
        refresh_token: Option<String>,
    ) -> Self {
        let (sender, _) = watch::channel(state);
        Self {
            inner: Arc::new(SessionInner {
                state: sender,
                refresh_token: Mutex::new(refresh_token),
                persist_lock: AsyncMutex::new(()),
                storage,
                notifier,
            }),
        }
    }

    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner
            .refresh_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Applies a transition and persists the result.
    #[instrument(skip(self, event), fields(event = event.name()))]
    pub async fn dispatch(&self, event: AuthEvent) -> AuthState {
        let mut next = AuthState::default();
        self.inner.state.send_modify(|state| {
            *state = std::mem::take(state).reduce(event);
            next = state.clone();
        });
        self.save().await;
        next
    }

    // The in-memory state stays authoritative when the write fails.
    async fn save(&self) {
        let _guard = self.inner.persist_lock.lock().await;
        let persisted = self.inner.state.borrow().persisted();
        if let Err(e) =
            save_json(self.inner.storage.as_ref(), AUTH_STORAGE_KEY, &persisted).await
        {
            warn!(error = %e, "failed to persist session");
        }
    }

    pub async fn set_refresh_token(&self, token: Option<String>) {
        *self
            .inner
            .refresh_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = token;

        let _guard = self.inner.persist_lock.lock().await;
        let latest = self.refresh_token();
        let storage = self.inner.storage.as_ref();
        let result = match &latest {
            Some(token) => save_json(storage, REFRESH_TOKEN_KEY, token).await,
            None => storage.remove(REFRESH_TOKEN_KEY).await,
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to persist refresh token");
        }
    }

    /// Replaces the bearer token after a successful refresh.
    pub async fn token_refreshed(&self, token: String, refresh_token: Option<String>) {
        self.dispatch(AuthEvent::TokenRefreshed { token }).await;
        if refresh_token.is_some() {
            self.set_refresh_token(refresh_token).await;
        }
    }

    /// Tears the session down after an unrecoverable 401.
    pub async fn expire(&self) {
        self.dispatch(AuthEvent::SessionExpired).await;
        self.set_refresh_token(None).await;
    }

    pub async fn login(&self, api: &ApiClient, request: LoginRequest) -> Result<User, ClientError> {
        request.validate()?;
        self.dispatch(AuthEvent::Authenticating).await;

        let result = AuthService::login(api, &request).await;
        self.finish_authentication(result, "Login successful!").await
    }

    pub async fn register(
        &self,
        api: &ApiClient,
        request: RegisterRequest,
    ) -> Result<User, ClientError> {
        request.validate()?;
        self.dispatch(AuthEvent::Authenticating).await;

        let result = AuthService::register(api, &request).await;
        self.finish_authentication(result, "Registration successful!")
            .await
    }

    async fn finish_authentication(
        &self,
        result: Result<LoginResponse, ClientError>,
        success_message: &str,
    ) -> Result<User, ClientError> {
        match result {
            Ok(LoginResponse {
                user,
                token,
                refresh_token,
            }) => {
                self.set_refresh_token(refresh_token).await;
                self.dispatch(AuthEvent::Authenticated {
                    user: user.clone(),
                    token,
                })
                .await;
                track_login_success(user.role.as_str());
                self.inner
                    .notifier
                    .notify(Notification::success(success_message));
                info!(user_id = %user.id, role = %user.role, "signed in");
                Ok(user)
            }
            Err(err) => {
                self.set_refresh_token(None).await;
                self.dispatch(AuthEvent::AuthenticationFailed {
                    message: err.to_string(),
                })
                .await;
                let reason = err
                    .status()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "network".to_string());
                track_login_failure(&reason);
                Err(err)
            }
        }
    }

    /// Clears the session locally. There is no server round-trip.
    pub async fn logout(&self) {
        self.dispatch(AuthEvent::LoggedOut).await;
        self.set_refresh_token(None).await;
        self.inner
            .notifier
            .notify(Notification::success("Logged out successfully!"));
    }

    pub async fn update_profile(
        &self,
        api: &ApiClient,
        request: UpdateProfileRequest,
    ) -> Result<User, ClientError> {
        request.validate()?;
        self.dispatch(AuthEvent::ProfileUpdateStarted).await;

        match AuthService::update_profile(api, &request).await {
            Ok(user) => {
                self.dispatch(AuthEvent::ProfileUpdated { user: user.clone() })
                    .await;
                self.inner
                    .notifier
                    .notify(Notification::success("Profile updated successfully!"));
                Ok(user)
            }
            Err(err) => {
                self.dispatch(AuthEvent::ProfileUpdateFailed {
                    message: err.to_string(),
                })
                .await;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use rollcall_core::storage::StorageFuture;
    use rollcall_core::{MemoryStateStorage, RecordingNotifier};
    use rollcall_models::{Role, UserId};
    use tokio::sync::Notify;

    /// Memory storage whose first `auth-storage` write stalls.
    #[derive(Default)]
    struct SlowFirstWrite {
        inner: MemoryStateStorage,
        delayed: AtomicBool,
        started: Notify,
    }

    impl StateStorage for SlowFirstWrite {
        fn load<'a>(&'a self, name: &'a str) -> StorageFuture<'a, Option<String>> {
            self.inner.load(name)
        }

        fn save<'a>(&'a self, name: &'a str, contents: &'a str) -> StorageFuture<'a, ()> {
            Box::pin(async move {
                if name == AUTH_STORAGE_KEY && !self.delayed.swap(true, Ordering::SeqCst) {
                    self.started.notify_one();
                    tokio::time::sleep(Duration::from_millis(200)).await;
                }
                self.inner.save(name, contents).await
            })
        }

        fn remove<'a>(&'a self, name: &'a str) -> StorageFuture<'a, ()> {
            self.inner.remove(name)
        }
    }

    fn user() -> User {
        User {
            id: UserId::new("u1"),
            email: "ada@uni.edu".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: Role::Faculty,
            profile_picture: None,
            department: None,
            phone_number: None,
            student_id: None,
            employee_id: Some("E-1".to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    async fn store(storage: Arc<MemoryStateStorage>) -> SessionStore {
        store_on(storage).await
    }

    async fn store_on(storage: Arc<dyn StateStorage>) -> SessionStore {
        SessionStore::load(storage, Arc::new(RecordingNotifier::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_every_transition_is_persisted() {
        let storage = Arc::new(MemoryStateStorage::new());
        let session = store(storage.clone()).await;

        session
            .dispatch(AuthEvent::Authenticated {
                user: user(),
                token: "t1".to_string(),
            })
            .await;

        let saved: PersistedAuth = load_json(storage.as_ref(), AUTH_STORAGE_KEY)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.token.as_deref(), Some("t1"));
        assert!(saved.is_authenticated);
    }

    #[tokio::test]
    async fn test_reload_restores_session_without_loading_or_error() {
        let storage = Arc::new(MemoryStateStorage::new());
        let session = store(storage.clone()).await;
        session.dispatch(AuthEvent::Authenticating).await;
        session
            .dispatch(AuthEvent::Authenticated {
                user: user(),
                token: "t1".to_string(),
            })
            .await;
        session.set_refresh_token(Some("r1".to_string())).await;

        let restored = store(storage).await;
        let state = restored.state();
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(state.user, Some(user()));
        assert_eq!(restored.refresh_token().as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_expire_clears_session_and_refresh_token() {
        let storage = Arc::new(MemoryStateStorage::new());
        let session = store(storage.clone()).await;
        session
            .dispatch(AuthEvent::Authenticated {
                user: user(),
                token: "t1".to_string(),
            })
            .await;
        session.set_refresh_token(Some("r1".to_string())).await;

        session.expire().await;

        assert!(!session.state().is_authenticated);
        assert_eq!(session.token(), None);
        assert_eq!(session.refresh_token(), None);
        assert_eq!(storage.load(REFRESH_TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let session = store(Arc::new(MemoryStateStorage::new())).await;
        let mut receiver = session.subscribe();

        session.dispatch(AuthEvent::Authenticating).await;
        receiver.changed().await.unwrap();
        assert!(receiver.borrow().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_during_slow_write_persists_signed_out_state() {
        let storage = Arc::new(SlowFirstWrite::default());
        let session = SessionStore::load(storage.clone(), Arc::new(RecordingNotifier::new()))
            .await
            .unwrap();

        let signing_in = {
            let session = session.clone();
            tokio::spawn(async move {
                session
                    .dispatch(AuthEvent::Authenticated {
                        user: user(),
                        token: "t1".to_string(),
                    })
                    .await
            })
        };
        storage.started.notified().await;

        session.dispatch(AuthEvent::LoggedOut).await;
        signing_in.await.unwrap();

        let saved: PersistedAuth = load_json(storage.as_ref(), AUTH_STORAGE_KEY)
            .await
            .unwrap()
            .unwrap();
        assert!(!session.state().is_authenticated);
        assert!(!saved.is_authenticated);
        assert_eq!(saved.token, None);
        assert_eq!(saved.user, None);

        let restored = store_on(storage).await;
        assert!(!restored.state().is_authenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_token_write_keeps_latest_value() {
        let session = store(Arc::new(MemoryStateStorage::new())).await;
        let storage = session.inner.storage.clone();

        tokio::join!(
            session.set_refresh_token(Some("r1".to_string())),
            session.set_refresh_token(None),
        );

        assert_eq!(session.refresh_token(), None);
        assert_eq!(storage.load(REFRESH_TOKEN_KEY).await.unwrap(), None);
    }
}
