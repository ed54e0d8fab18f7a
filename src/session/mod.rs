//! Session lifecycle: sign-in, sign-out, profile restore, and cross-tab
//! coordination.

pub mod broadcast;

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::api::{ApiClient, CreateSessionRequest, UserResponse};
use crate::config::Config;
use crate::error::ApiError;
use crate::token::{MemoryTokenStore, TokenPair, TokenStore};

use broadcast::{AuthMessage, ChannelHandle, AUTH_CHANNEL};

/// Route unauthenticated visitors land on.
pub const SIGN_IN_ROUTE: &str = "/";
/// Route signed-in users land on.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Embedder callbacks.
///
/// `navigate` receives the route the page should move to. `on_error`
/// receives failures worth surfacing to the person at the screen, such as
/// rejected credentials.
#[derive(Default)]
pub struct SessionHooks {
    pub navigate: Option<Box<dyn Fn(&str) + Send + Sync>>,
    pub on_error: Option<Box<dyn Fn(&ApiError) + Send + Sync>>,
}

/// A browser tab's view of who is signed in.
///
/// The session owns the tab's [`ApiClient`] and keeps the current user in
/// sync with the token store. Constructors must run inside a Tokio runtime:
/// each session listens for sign-out broadcasts on a background task.
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    user: RwLock<Option<UserResponse>>,
    hooks: SessionHooks,
    channel: ChannelHandle,
}

impl Session {
    /// Session backed by a fresh in-memory store.
    pub fn new(config: &Config, hooks: SessionHooks) -> Self {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new(config.token_ttl()));
        Self::with_store(config, store, hooks)
    }

    /// Session over an existing store, e.g. one seeded from cookies.
    pub fn with_store(config: &Config, store: Arc<dyn TokenStore>, hooks: SessionHooks) -> Self {
        Self::with_channel(config, store, hooks, AUTH_CHANNEL)
    }

    /// Same as [`Session::with_store`] but on a custom channel name, for
    /// embedders that need to keep unrelated sessions from hearing each
    /// other's sign-outs.
    pub fn with_channel(
        config: &Config,
        store: Arc<dyn TokenStore>,
        hooks: SessionHooks,
        channel: &str,
    ) -> Self {
        let client = ApiClient::new(config, store.clone());
        let inner = Arc::new(SessionInner {
            client,
            store,
            user: RwLock::new(None),
            hooks,
            channel: ChannelHandle::open(channel),
        });

        // the client must not keep the session alive on its own
        let weak = Arc::downgrade(&inner);
        inner.client.set_sign_out_hook(move || {
            if let Some(inner) = weak.upgrade() {
                inner.sign_out(true);
            }
        });
        Self::spawn_channel_listener(&inner);

        Session { inner }
    }

    fn spawn_channel_listener(inner: &Arc<SessionInner>) {
        let mut subscription = inner.channel.subscribe();
        let weak = Arc::downgrade(inner);
        tokio::spawn(async move {
            while let Some(message) = subscription.recv().await {
                let Some(inner) = weak.upgrade() else { break };
                match message {
                    AuthMessage::SignOut => {
                        info!("sign-out heard from another tab, ending session locally");
                        inner.sign_out(false);
                    }
                }
            }
        });
    }

    /// Exchanges credentials for a token pair and loads the user.
    ///
    /// On success the pair is stored and the page is sent to the dashboard.
    /// On failure the error goes through the `on_error` hook and comes back
    /// to the caller.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request = CreateSessionRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.inner.client.create_session(request).await {
            Ok(response) => {
                self.inner
                    .store
                    .set(TokenPair::new(response.token, response.refresh_token));
                info!(user = %response.user.id, "signed in");
                self.inner.set_user(Some(response.user));
                self.inner.navigate(DASHBOARD_ROUTE);
                Ok(())
            }
            Err(error) => {
                warn!(%error, "sign-in rejected");
                self.inner.notify_error(&error);
                Err(error)
            }
        }
    }

    /// Restores the session on page load.
    ///
    /// With no stored tokens the visitor stays anonymous. With
    /// tokens the profile is fetched so the console knows who is signed in;
    /// if that fails the stale session is ended.
    pub async fn initialize(&self) -> Result<(), ApiError> {
        if self.inner.store.get().is_none() {
            return Ok(());
        }
        match self.inner.client.get_profile().await {
            Ok(user) => {
                self.inner.set_user(Some(user));
                Ok(())
            }
            Err(error) => {
                warn!(%error, "profile restore failed, ending session");
                self.inner.sign_out(true);
                Err(error)
            }
        }
    }

    /// Ends the session everywhere: clears the store, tells other tabs,
    /// and sends the page back to sign-in.
    pub fn sign_out(&self) {
        self.inner.sign_out(true);
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn current_user(&self) -> Option<UserResponse> {
        self.inner
            .user
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The client bound to this session's tokens.
    pub fn api(&self) -> &ApiClient {
        &self.inner.client
    }
}

impl SessionInner {
    fn sign_out(&self, publish: bool) {
        self.store.clear();
        self.set_user(None);
        if publish {
            self.channel.publish(AuthMessage::SignOut);
        }
        self.navigate(SIGN_IN_ROUTE);
    }

    fn set_user(&self, user: Option<UserResponse>) {
        let mut slot = self
            .user
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = user;
    }

    fn navigate(&self, route: &str) {
        if let Some(navigate) = &self.hooks.navigate {
            navigate(route);
        }
    }

    fn notify_error(&self, error: &ApiError) {
        if let Some(on_error) = &self.hooks.on_error {
            on_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::api::test_support::*;

    fn recording_hooks() -> (SessionHooks, Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<String>>>) {
        let routes = Arc::new(Mutex::new(Vec::new()));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let hooks = SessionHooks {
            navigate: Some(Box::new({
                let routes = routes.clone();
                move |route: &str| routes.lock().unwrap().push(route.to_string())
            })),
            on_error: Some(Box::new({
                let errors = errors.clone();
                move |error: &ApiError| errors.lock().unwrap().push(error.to_string())
            })),
        };
        (hooks, routes, errors)
    }

    type Recorded = Arc<Mutex<Vec<String>>>;

    fn session_on(
        server: &MockServer,
        channel: &str,
    ) -> (Session, Arc<MemoryTokenStore>, Recorded, Recorded) {
        let store = Arc::new(MemoryTokenStore::new(chrono::Duration::days(30)));
        let (hooks, routes, errors) = recording_hooks();
        let session = Session::with_channel(&test_config(server), store.clone(), hooks, channel);
        (session, store, routes, errors)
    }

    #[tokio::test]
    async fn sign_in_stores_the_pair_and_lands_on_the_dashboard() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/sessions")
                .json_body(json!({ "email": "ana.silva@example.edu", "password": "correta" }));
            then.status(200).json_body(session_json("student"));
        });

        let (session, store, routes, errors) = session_on(&server, "test.session.sign-in");
        session.sign_in("ana.silva@example.edu", "correta").await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.current_user().unwrap().id, "u1");
        let pair = store.get().unwrap();
        assert_eq!(pair.access_token(), FRESH_ACCESS);
        assert_eq!(*routes.lock().unwrap(), vec![DASHBOARD_ROUTE.to_string()]);
        assert!(errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_credentials_go_through_the_error_hook() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/sessions");
            then.status(401)
                .json_body(json!({ "message": "E-mail ou senha incorretos." }));
        });

        let (session, store, routes, errors) = session_on(&server, "test.session.rejected");
        let error = session
            .sign_in("ana.silva@example.edu", "errada")
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "E-mail ou senha incorretos.");
        assert!(!session.is_authenticated());
        assert!(store.get().is_none());
        assert!(routes.lock().unwrap().is_empty());
        assert_eq!(
            *errors.lock().unwrap(),
            vec!["E-mail ou senha incorretos.".to_string()]
        );
    }

    #[tokio::test]
    async fn initialize_restores_the_profile_from_stored_tokens() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/users/profile");
            then.status(200).json_body(user_json("u1", "courseCoordinator"));
        });

        let (session, store, _routes, _errors) = session_on(&server, "test.session.restore");
        store.set(TokenPair::new(STALE_ACCESS, STALE_REFRESH));

        session.initialize().await.unwrap();
        assert!(session.is_authenticated());
        assert_eq!(
            session.current_user().unwrap().access_level,
            crate::api::AccessLevel::CourseCoordinator
        );
    }

    #[tokio::test]
    async fn initialize_without_tokens_stays_anonymous() {
        let server = MockServer::start_async().await;
        let (session, _store, routes, _errors) = session_on(&server, "test.session.anonymous");

        session.initialize().await.unwrap();
        assert!(!session.is_authenticated());
        assert!(routes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn initialize_ends_the_session_when_the_profile_cannot_load() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/users/profile");
            then.status(500).json_body(json!({ "message": "Erro interno." }));
        });

        let (session, store, routes, _errors) = session_on(&server, "test.session.restore-failure");
        store.set(TokenPair::new(STALE_ACCESS, STALE_REFRESH));

        let error = session.initialize().await.unwrap_err();
        assert_eq!(error.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!session.is_authenticated());
        assert!(store.get().is_none());
        assert_eq!(*routes.lock().unwrap(), vec![SIGN_IN_ROUTE.to_string()]);
    }

    #[tokio::test]
    async fn sign_out_clears_state_and_navigates_home() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/sessions");
            then.status(200).json_body(session_json("student"));
        });

        let (session, store, routes, _errors) = session_on(&server, "test.session.sign-out");
        session.sign_in("ana.silva@example.edu", "correta").await.unwrap();

        session.sign_out();
        assert!(!session.is_authenticated());
        assert!(store.get().is_none());
        assert_eq!(
            *routes.lock().unwrap(),
            vec![DASHBOARD_ROUTE.to_string(), SIGN_IN_ROUTE.to_string()]
        );
    }

    #[tokio::test]
    async fn sign_out_in_one_tab_reaches_the_others() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/users/profile");
            then.status(200).json_body(user_json("u1", "student"));
        });

        let channel = "test.session.cross-tab";
        let (tab_a, _store_a, _routes_a, _errors_a) = session_on(&server, channel);
        let (tab_b, store_b, routes_b, _errors_b) = session_on(&server, channel);

        store_b.set(TokenPair::new(STALE_ACCESS, STALE_REFRESH));
        tab_b.initialize().await.unwrap();
        assert!(tab_b.is_authenticated());

        tab_a.sign_out();

        let drained = tokio::time::timeout(Duration::from_secs(2), async {
            while tab_b.is_authenticated() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(drained.is_ok());
        assert!(store_b.get().is_none());
        assert!(routes_b
            .lock()
            .unwrap()
            .contains(&SIGN_IN_ROUTE.to_string()));
    }
}
