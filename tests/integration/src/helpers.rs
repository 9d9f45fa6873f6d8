//! Test helpers for integration tests
//!
//! Provides a test server over the in-memory stores, a minimal cookie-keeping
//! browser session and response assertions.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use forum_api::{create_app, create_app_state_with};
use forum_cache::{InMemoryOAuthStateStore, InMemoryProviderSessionStore};
use forum_common::{AppConfig, SessionCodec, SigningKey};
use forum_db::InMemoryForumStore;
use forum_service::{ServiceContext, ServiceContextBuilder};
use reqwest::{header, redirect, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{login_form, register_form, test_config, FakeGitHub, TEST_PASSWORD};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    /// Seed threads and comments or inspect counters directly
    pub store: InMemoryForumStore,
    pub provider_sessions: InMemoryProviderSessionStore,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with GitHub login enabled
    pub async fn start() -> Result<Self> {
        Self::start_with(test_config(), |builder| builder).await
    }

    /// Start a test server, adjusting the service context before it is built
    pub async fn start_with(
        config: AppConfig,
        configure: impl FnOnce(ServiceContextBuilder) -> ServiceContextBuilder,
    ) -> Result<Self> {
        let store = InMemoryForumStore::new();
        let provider_sessions = InMemoryProviderSessionStore::new();

        let builder = ServiceContext::builder()
            .user_repo(Arc::new(store.clone()))
            .reaction_store(Arc::new(store.clone()))
            .oauth_states(Arc::new(InMemoryOAuthStateStore::new()))
            .provider_sessions(Arc::new(provider_sessions.clone()))
            .session_codec(SessionCodec::new(&SigningKey::generate(), config.session.ttl()))
            .store_timeout(config.reactions.store_timeout())
            .provider(Arc::new(FakeGitHub));
        let ctx = configure(builder).build()?;

        let app = create_app(create_app_state_with(ctx, config))?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Redirects are asserted, never followed
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            addr,
            client,
            store,
            provider_sessions,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// GET with the browser's cookies; cookies set by the response are kept
    pub async fn get(&self, path: &str, browser: &mut Browser) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        let mut request = self.client.get(&url);
        if let Some(cookie) = browser.cookie_header() {
            request = request.header(header::COOKIE, cookie);
        }
        let response = request.send().await?;
        browser.absorb(&response);
        Ok(response)
    }

    /// POST an url-encoded form with the browser's cookies
    pub async fn post_form(
        &self,
        path: &str,
        browser: &mut Browser,
        form: &[(&str, String)],
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        let mut request = self.client.post(&url).form(form);
        if let Some(cookie) = browser.cookie_header() {
            request = request.header(header::COOKIE, cookie);
        }
        let response = request.send().await?;
        browser.absorb(&response);
        Ok(response)
    }

    /// Register a local account and log in as it
    pub async fn sign_up(&self, username: &str) -> Result<Browser> {
        let mut browser = Browser::default();

        let response = self
            .post_form("/register", &mut browser, &register_form(username))
            .await?;
        assert_redirect(&response, "/login")?;

        let response = self
            .post_form("/login", &mut browser, &login_form(username, TEST_PASSWORD))
            .await?;
        assert_redirect(&response, "/index")?;

        Ok(browser)
    }
}

/// Cookies a browser would hold for the test server
#[derive(Debug, Clone, Default)]
pub struct Browser {
    cookies: BTreeMap<String, String>,
}

impl Browser {
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Apply `Set-Cookie` headers; an empty value deletes the cookie
    fn absorb(&mut self, response: &Response) {
        for raw in response.headers().get_all(header::SET_COOKIE) {
            let Ok(raw) = raw.to_str() else { continue };
            let pair = raw.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if value.is_empty() {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }
}

/// Location header of a redirect response
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Assert a `303 See Other` to `target`
pub fn assert_redirect(response: &Response, target: &str) -> Result<()> {
    if response.status() != StatusCode::SEE_OTHER {
        anyhow::bail!("Expected 303, got {}", response.status());
    }
    let actual = location(response);
    if actual.as_deref() != Some(target) {
        anyhow::bail!("Expected redirect to {target}, got {actual:?}");
    }
    Ok(())
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("No error code in {body}"))
}
