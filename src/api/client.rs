//! HTTP client for the SIGAC API with transparent access-token refresh.
//!
//! Every authenticated call goes through [`ApiClient::send_with_refresh`].
//! When the API rejects an access token as expired, the first caller to
//! notice starts one refresh; everyone else arriving during that window
//! queues up and is replayed, in arrival order, once the new pair lands.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::{auth, types::ErrorBody};
use crate::config::Config;
use crate::error::ApiError;
use crate::token::{cookies, MemoryTokenStore, TokenStore};

/// Message the API returns on a 401 caused by an expired access token, as
/// opposed to a missing or foreign one.
pub const INVALID_TOKEN_MESSAGE: &str = "Token inválido!";

/// Where the client is running.
///
/// A `Server` client is built per incoming request while rendering on behalf
/// of a browser; it has no user interface to drive, so session loss surfaces
/// as [`ApiError::AuthToken`] instead of a sign-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeContext {
    Browser,
    Server,
}

type SignOutHook = Arc<dyn Fn() + Send + Sync>;

pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    context: RuntimeContext,
    refresh_timeout: Duration,
    sign_out_hook: Mutex<Option<SignOutHook>>,
    refresh: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Browser-context client over a shared token store.
    pub fn new(config: &Config, store: Arc<dyn TokenStore>) -> Self {
        Self::with_context(config, store, RuntimeContext::Browser)
    }

    /// Server-context client for one incoming request, its store seeded from
    /// the request's `Cookie` header.
    pub fn for_request(config: &Config, cookie_header: Option<&str>) -> Self {
        let store = match cookie_header.and_then(cookies::pair_from_header) {
            Some(pair) => MemoryTokenStore::with_pair(config.token_ttl(), pair),
            None => MemoryTokenStore::new(config.token_ttl()),
        };
        Self::with_context(config, Arc::new(store), RuntimeContext::Server)
    }

    pub fn with_context(
        config: &Config,
        store: Arc<dyn TokenStore>,
        context: RuntimeContext,
    ) -> Self {
        ApiClient {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
            store,
            context,
            refresh_timeout: config.refresh_timeout(),
            sign_out_hook: Mutex::new(None),
            refresh: Arc::new(RefreshCoordinator::default()),
        }
    }

    /// Called once, in a browser context, when the session can no longer be
    /// recovered. The session layer hangs its sign-out routine here.
    pub fn set_sign_out_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        let mut slot = self
            .sign_out_hook
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(Arc::new(hook));
    }

    pub fn context(&self) -> RuntimeContext {
        self.context
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// GET with optional query parameters, returning the parsed JSON body.
    pub async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        self.request(Method::GET, path, None, params).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, Some(body), &[]).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.request(Method::PATCH, path, Some(body), &[]).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, None, &[]).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        params: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self
            .send_with_refresh(|| {
                let mut request = self.client.request(method.clone(), &url);
                if !params.is_empty() {
                    request = request.query(params);
                }
                if let Some(body) = body {
                    request = request.json(body);
                }
                Ok(request)
            })
            .await?;

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await.map_err(ApiError::from)?;
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::Decode(format!("failed to parse response: {}", e)))
        } else {
            let message = Self::read_error_message(response).await;
            Err(ApiError::Api { status, message })
        }
    }

    /// Sends the request built by `build` with the current access token
    /// attached, refreshing and replaying once if the token has expired.
    pub(crate) async fn send_with_refresh<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> Result<RequestBuilder, ApiError>,
    {
        let response = self.dispatch(&build).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let message = Self::read_error_message(response).await;
        if message != INVALID_TOKEN_MESSAGE {
            return self.handle_session_loss(message);
        }

        debug!("access token rejected, waiting on refresh");
        let token = self.await_refreshed_token().await?;
        let request = build()?.bearer_auth(token);
        request.send().await.map_err(ApiError::from)
    }

    async fn dispatch<F>(&self, build: &F) -> Result<Response, ApiError>
    where
        F: Fn() -> Result<RequestBuilder, ApiError>,
    {
        let mut request = build()?;
        // token read at send time so a refresh or sign-in since construction
        // is always picked up
        if let Some(pair) = self.store.get() {
            request = request.bearer_auth(pair.access_token());
        }
        request.send().await.map_err(ApiError::from)
    }

    fn handle_session_loss(&self, message: String) -> Result<Response, ApiError> {
        match self.context {
            RuntimeContext::Browser => {
                warn!("unauthenticated response outside the refresh flow, ending session");
                self.force_sign_out();
                Err(ApiError::Api {
                    status: StatusCode::UNAUTHORIZED,
                    message,
                })
            }
            RuntimeContext::Server => Err(ApiError::AuthToken),
        }
    }

    /// Joins the current refresh window, starting one if none is in flight,
    /// and resolves to the refreshed access token.
    async fn await_refreshed_token(&self) -> Result<String, ApiError> {
        let ticket = self.refresh.enlist();
        if ticket.is_leader() {
            self.spawn_refresh();
        }
        ticket.wait().await
    }

    /// Drives one refresh on a detached task so the outcome reaches every
    /// queued waiter even if the request that started it is cancelled.
    fn spawn_refresh(&self) {
        let driver = RefreshDriver {
            http: self.client.clone(),
            base_url: self.base_url.clone(),
            store: self.store.clone(),
            timeout: self.refresh_timeout,
            context: self.context,
            hook: self
                .sign_out_hook
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
            coordinator: self.refresh.clone(),
        };
        tokio::spawn(driver.run());
    }

    fn force_sign_out(&self) {
        self.store.clear();
        let hook = self
            .sign_out_hook
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    pub(crate) async fn map_json_response<R>(&self, response: Response) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::Decode(format!("failed to parse response: {}", e)))
        } else {
            let message = Self::read_error_message(response).await;
            Err(ApiError::Api { status, message })
        }
    }

    pub(crate) async fn map_unit_response(&self, response: Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = Self::read_error_message(response).await;
            Err(ApiError::Api { status, message })
        }
    }

    pub(crate) async fn read_error_message(response: Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => format!("request failed with status {}", status),
        }
    }
}

struct RefreshDriver {
    http: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    timeout: Duration,
    context: RuntimeContext,
    hook: Option<SignOutHook>,
    coordinator: Arc<RefreshCoordinator>,
}

impl RefreshDriver {
    async fn run(self) {
        let result = self.refresh_once().await;
        match &result {
            Ok(_) => info!("access token refreshed"),
            Err(error) => {
                warn!(%error, "token refresh failed, session is over");
                self.store.clear();
                if self.context == RuntimeContext::Browser {
                    if let Some(hook) = &self.hook {
                        hook();
                    }
                }
            }
        }
        self.coordinator.settle(result);
    }

    async fn refresh_once(&self) -> Result<String, ApiError> {
        let Some(pair) = self.store.get() else {
            return Err(ApiError::AuthToken);
        };
        let refreshed = auth::execute_refresh(
            &self.http,
            &self.base_url,
            pair.refresh_token(),
            self.timeout,
        )
        .await?;
        let access = refreshed.access_token().to_string();
        self.store.set(refreshed);
        Ok(access)
    }
}

type RefreshWaiter = oneshot::Sender<Result<String, ApiError>>;

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<RefreshWaiter>,
}

/// Serializes refreshes for one client. All state lives on the instance, so
/// independent clients never share a refresh window.
#[derive(Default)]
struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    /// Registers a waiter for the current window. The first caller of a
    /// window becomes its leader and must start the refresh.
    fn enlist(&self) -> Ticket {
        let (tx, rx) = oneshot::channel();
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.waiters.push(tx);
        if state.in_flight {
            Ticket::Follower(rx)
        } else {
            state.in_flight = true;
            Ticket::Leader(rx)
        }
    }

    /// Closes the window and delivers `result` to every waiter in the order
    /// they enlisted.
    fn settle(&self, result: Result<String, ApiError>) {
        let waiters = {
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
    }
}

enum Ticket {
    Leader(oneshot::Receiver<Result<String, ApiError>>),
    Follower(oneshot::Receiver<Result<String, ApiError>>),
}

impl Ticket {
    fn is_leader(&self) -> bool {
        matches!(self, Ticket::Leader(_))
    }

    async fn wait(self) -> Result<String, ApiError> {
        let (Ticket::Leader(rx) | Ticket::Follower(rx)) = self;
        match rx.await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Transport("token refresh was abandoned".into())),
        }
    }
}
