use std::sync::Arc;
use std::time::Instant;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use rollcall_config::ApiConfig;
use rollcall_core::errors::FALLBACK_MESSAGE;
use rollcall_core::{ClientError, Notification, Notifier, decode};
use rollcall_models::{RefreshRequest, RefreshResponse};
use rollcall_observability::{track_session_expired, track_token_refresh};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::endpoints;
use super::request::ApiRequest;
use crate::stores::SessionStore;

const REQUEST_ID_HEADER: &str = "x-request-id";

enum Outcome {
    Body(Value),
    Unauthorized(Value),
}

/// The single configured HTTP client.
///
/// Attaches the session's bearer token, recovers from one 401 per call by
/// refreshing the token and replaying the request, and reports every other
/// failure through the [`Notifier`] exactly once.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiInner>,
}

struct ApiInner {
    http: reqwest::Client,
    config: ApiConfig,
    session: SessionStore,
    notifier: Arc<dyn Notifier>,
    refresh_lock: AsyncMutex<()>,
}

impl ApiClient {
    pub fn new(
        config: ApiConfig,
        session: SessionStore,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ApiInner {
                http,
                config,
                session,
                notifier,
                refresh_lock: AsyncMutex::new(()),
            }),
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.inner.notifier
    }

    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    pub async fn get(&self, path: impl Into<String>) -> Result<Value, ClientError> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        query: &Q,
    ) -> Result<Value, ClientError> {
        self.send(ApiRequest::get(path).query(query)?).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Value, ClientError> {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    /// POST without a request body.
    pub async fn post_empty(&self, path: impl Into<String>) -> Result<Value, ClientError> {
        self.send(ApiRequest::post(path)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Value, ClientError> {
        self.send(ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: impl Into<String>) -> Result<Value, ClientError> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Sends a request and returns the raw JSON body.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let result = self.send_with_refresh(&request).await;
        if let Err(err) = &result {
            self.inner
                .notifier
                .notify(Notification::error(user_message(err)));
        }
        result
    }

    async fn send_with_refresh(&self, request: &ApiRequest) -> Result<Value, ClientError> {
        let token = self.inner.session.token();

        let body = match self.execute(request, token.as_deref()).await? {
            Outcome::Body(body) => return Ok(body),
            Outcome::Unauthorized(body) => body,
        };

        // Without a bearer token there is nothing to refresh.
        let Some(stale_token) = token else {
            return Err(ClientError::from_response(401, &body));
        };

        let fresh_token = match self.refresh(&stale_token).await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                track_token_refresh("failure");
                self.expire().await;
                return Err(ClientError::AuthExpired);
            }
        };

        match self.execute(request, Some(&fresh_token)).await? {
            Outcome::Body(body) => Ok(body),
            Outcome::Unauthorized(_) => {
                warn!("replayed request rejected after refresh");
                self.expire().await;
                Err(ClientError::AuthExpired)
            }
        }
    }

    /// Exchanges the stored refresh token for a new bearer token.
    ///
    /// Concurrent 401s share one refresh: a caller that finds the token
    /// already replaced reuses it.
    async fn refresh(&self, stale_token: &str) -> Result<String, ClientError> {
        let _guard = self.inner.refresh_lock.lock().await;

        if let Some(current) = self.inner.session.token() {
            if current != stale_token {
                debug!("token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        let refresh_token = self
            .inner
            .session
            .refresh_token()
            .ok_or(ClientError::AuthExpired)?;

        let request = ApiRequest::post(endpoints::auth::REFRESH).json(&RefreshRequest {
            refresh_token,
        })?;
        let refreshed: RefreshResponse = match self.execute(&request, None).await? {
            Outcome::Body(body) => decode(body)?,
            Outcome::Unauthorized(body) => return Err(ClientError::from_response(401, &body)),
        };

        if refreshed.token.trim().is_empty() {
            return Err(ClientError::Decode(
                "refresh response carried no token".to_string(),
            ));
        }

        self.inner
            .session
            .token_refreshed(refreshed.token.clone(), refreshed.refresh_token)
            .await;
        track_token_refresh("success");
        info!("bearer token refreshed");
        Ok(refreshed.token)
    }

    async fn expire(&self) {
        track_session_expired();
        self.inner.session.expire().await;
    }

    async fn execute(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<Outcome, ClientError> {
        let url = self.inner.config.url(&request.path);
        let request_id = Uuid::new_v4().to_string();

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), &url)
            .header(REQUEST_ID_HEADER, &request_id);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            metrics::counter!(
                "http_client_requests_total",
                "method" => request.method.to_string(),
                "status" => "network_error"
            )
            .increment(1);
            warn!(request_id = %request_id, error = %e, "request failed without response");
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let latency = started.elapsed();

        metrics::counter!(
            "http_client_requests_total",
            "method" => request.method.to_string(),
            "status" => status.as_u16().to_string()
        )
        .increment(1);
        metrics::histogram!(
            "http_client_request_duration_seconds",
            "method" => request.method.to_string()
        )
        .record(latency.as_secs_f64());

        match status.as_u16() {
            200..=399 => {
                debug!(
                    request_id = %request_id,
                    status = status.as_u16(),
                    latency_ms = latency.as_millis() as u64,
                    "request completed"
                );
            }
            400..=499 => {
                warn!(
                    request_id = %request_id,
                    status = status.as_u16(),
                    latency_ms = latency.as_millis() as u64,
                    "client error"
                );
            }
            _ => {
                error!(
                    request_id = %request_id,
                    status = status.as_u16(),
                    latency_ms = latency.as_millis() as u64,
                    "server error"
                );
            }
        }

        if status.is_success() {
            if bytes.is_empty() {
                return Ok(Outcome::Body(Value::Null));
            }
            return serde_json::from_slice(&bytes)
                .map(Outcome::Body)
                .map_err(|e| ClientError::Network(format!("invalid response body: {}", e)));
        }

        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        if status == StatusCode::UNAUTHORIZED {
            return Ok(Outcome::Unauthorized(body));
        }
        Err(ClientError::from_response(status.as_u16(), &body))
    }
}

/// What a notification shows for an error.
fn user_message(err: &ClientError) -> String {
    match err {
        ClientError::Http { message, .. } | ClientError::Domain { message, .. } => message.clone(),
        ClientError::AuthExpired => err.to_string(),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}
