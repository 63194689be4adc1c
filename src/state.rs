use std::sync::Arc;

use rollcall_auth::{GuardDecision, guard_route};
use rollcall_cache::QueryClient;
use rollcall_config::AppConfig;
use rollcall_core::{ClientError, LocalStateStorage, Notifier, StateStorage};
use rollcall_models::{LoginRequest, RegisterRequest, User};
use tracing::info;

use crate::client::ApiClient;
use crate::stores::{SessionStore, ThemeStore};

/// Everything a command needs: the HTTP client, the query cache and the
/// persisted stores. Cheap to clone.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub api: ApiClient,
    pub cache: QueryClient,
    pub session: SessionStore,
    pub theme: ThemeStore,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Restores persisted state and wires the client together.
    pub async fn init(
        config: AppConfig,
        storage: Arc<dyn StateStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        let session = SessionStore::load(storage.clone(), notifier.clone()).await?;
        let theme = ThemeStore::load(storage).await?;
        let api = ApiClient::new(config.api.clone(), session.clone(), notifier.clone())?;
        let cache = QueryClient::new(config.query.clone());

        info!(base_url = %config.api.base_url, "client context ready");
        Ok(Self {
            config,
            api,
            cache,
            session,
            theme,
            notifier,
        })
    }

    /// [`AppContext::init`] with state persisted under the configured directory.
    pub async fn from_config(
        config: AppConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        let storage = Arc::new(LocalStateStorage::new(config.storage.dir.clone()));
        Self::init(config, storage, notifier).await
    }

    // Cached data belongs to the previous identity.
    pub async fn login(&self, request: LoginRequest) -> Result<User, ClientError> {
        self.cache.clear();
        self.session.login(&self.api, request).await
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User, ClientError> {
        self.cache.clear();
        self.session.register(&self.api, request).await
    }

    pub async fn logout(&self) {
        self.session.logout().await;
        self.cache.clear();
    }

    /// Route guard decision for `location` under the current session.
    pub fn guard(&self, location: &str) -> GuardDecision {
        guard_route(&self.session.state(), location)
    }
}
