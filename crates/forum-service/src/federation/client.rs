//! `oauth2` + `reqwest` implementation of [`ProviderClient`]

use async_trait::async_trait;
use forum_common::OAuthProviderConfig;
use forum_core::{FederatedProfile, IdentityProvider, ProviderToken};
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{FederationError, ProviderClient, ProviderEndpoints};

type ConfiguredClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

pub struct HttpProviderClient {
    provider: IdentityProvider,
    oauth: ConfiguredClient,
    http: reqwest::Client,
    scopes: Vec<String>,
    profile_url: &'static str,
}

impl HttpProviderClient {
    pub fn new(
        provider: IdentityProvider,
        config: &OAuthProviderConfig,
    ) -> Result<Self, FederationError> {
        let endpoints = ProviderEndpoints::for_provider(provider);
        let invalid = |e: oauth2::url::ParseError| FederationError::Configuration(e.to_string());

        let oauth = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(endpoints.authorize.to_string()).map_err(invalid)?)
            .set_token_uri(TokenUrl::new(endpoints.token.to_string()).map_err(invalid)?)
            .set_redirect_uri(RedirectUrl::new(config.redirect_url.clone()).map_err(invalid)?);

        // Token and profile requests never follow redirects
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("forum-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FederationError::Configuration(e.to_string()))?;

        let scopes = if config.scopes.is_empty() {
            endpoints
                .default_scopes
                .iter()
                .map(ToString::to_string)
                .collect()
        } else {
            config.scopes.clone()
        };

        Ok(Self {
            provider,
            oauth,
            http,
            scopes,
            profile_url: endpoints.profile,
        })
    }
}

impl std::fmt::Debug for HttpProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProviderClient")
            .field("provider", &self.provider)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    fn provider(&self) -> IdentityProvider {
        self.provider
    }

    fn authorize_url(&self, state: &str) -> String {
        let state = state.to_string();
        let (url, _) = self
            .oauth
            .authorize_url(move || CsrfToken::new(state))
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .url();
        url.to_string()
    }

    #[instrument(skip(self, code), fields(provider = %self.provider))]
    async fn exchange_code(&self, code: &str) -> Result<ProviderToken, FederationError> {
        let response = self
            .oauth
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| FederationError::Exchange(e.to_string()))?;

        let now = chrono::Utc::now().timestamp();
        let scopes = response.scopes().map_or_else(
            || self.scopes.clone(),
            |granted| granted.iter().map(|s| s.to_string()).collect(),
        );

        debug!("Provider token obtained");

        Ok(ProviderToken {
            provider: self.provider,
            access_token: response.access_token().secret().clone(),
            refresh_token: response.refresh_token().map(|t| t.secret().clone()),
            expires_at: response
                .expires_in()
                .map(|ttl| now.saturating_add(ttl.as_secs() as i64)),
            scopes,
        })
    }

    #[instrument(skip(self, token), fields(provider = %self.provider))]
    async fn fetch_profile(&self, token: &ProviderToken) -> Result<FederatedProfile, FederationError> {
        let body = self
            .http
            .get(self.profile_url)
            .bearer_auth(&token.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| FederationError::Profile(e.to_string()))?
            .text()
            .await
            .map_err(|e| FederationError::Profile(e.to_string()))?;

        parse_profile(self.provider, &body)
    }
}

#[derive(Deserialize)]
struct GoogleProfile {
    id: String,
    email: Option<String>,
}

#[derive(Deserialize)]
struct GitHubProfile {
    id: i64,
    login: String,
    email: Option<String>,
}

#[derive(Deserialize)]
struct FacebookProfile {
    id: String,
    email: Option<String>,
}

/// Map a provider's profile document onto a [`FederatedProfile`].
///
/// The login is the provider-unique handle: the email for Google, the
/// account login for GitHub and the numeric id for Facebook.
pub(crate) fn parse_profile(
    provider: IdentityProvider,
    body: &str,
) -> Result<FederatedProfile, FederationError> {
    let invalid = |e: serde_json::Error| FederationError::Profile(e.to_string());

    let profile = match provider {
        IdentityProvider::Google => {
            let p: GoogleProfile = serde_json::from_str(body).map_err(invalid)?;
            FederatedProfile {
                provider,
                login: p.email.clone().unwrap_or_else(|| p.id.clone()),
                subject: p.id,
                email: p.email,
            }
        }
        IdentityProvider::GitHub => {
            let p: GitHubProfile = serde_json::from_str(body).map_err(invalid)?;
            FederatedProfile {
                provider,
                subject: p.id.to_string(),
                login: p.login,
                email: p.email,
            }
        }
        IdentityProvider::Facebook => {
            let p: FacebookProfile = serde_json::from_str(body).map_err(invalid)?;
            FederatedProfile {
                provider,
                login: p.id.clone(),
                subject: p.id,
                email: p.email,
            }
        }
    };

    if profile.subject.is_empty() || profile.login.is_empty() {
        return Err(FederationError::Profile("empty subject or login".to_string()));
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OAuthProviderConfig {
        OAuthProviderConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_url: "http://localhost:8080/auth/github/callback".to_string(),
            scopes: Vec::new(),
        }
    }

    #[test]
    fn test_authorize_url_carries_state_and_scopes() {
        let client = HttpProviderClient::new(IdentityProvider::GitHub, &config()).unwrap();
        let url = client.authorize_url("n0nce");

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("state=n0nce"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("scope=user%3Aemail"));
    }

    #[test]
    fn test_bad_redirect_url_is_rejected() {
        let mut config = config();
        config.redirect_url = "not a url".to_string();
        assert!(matches!(
            HttpProviderClient::new(IdentityProvider::Google, &config),
            Err(FederationError::Configuration(_))
        ));
    }

    #[test]
    fn test_parse_github_profile() {
        let profile = parse_profile(
            IdentityProvider::GitHub,
            r#"{"id": 583231, "login": "octocat", "email": null}"#,
        )
        .unwrap();
        assert_eq!(profile.subject, "583231");
        assert_eq!(profile.username(), "github:octocat");
        assert_eq!(profile.email, None);
    }

    #[test]
    fn test_parse_google_profile_prefers_email() {
        let profile = parse_profile(
            IdentityProvider::Google,
            r#"{"id": "1098", "email": "jo@example.com", "name": "Jo"}"#,
        )
        .unwrap();
        assert_eq!(profile.login, "jo@example.com");
        assert_eq!(profile.subject, "1098");
    }

    #[test]
    fn test_parse_facebook_profile_uses_id() {
        let profile =
            parse_profile(IdentityProvider::Facebook, r#"{"id": "77", "name": "Jo Doe"}"#).unwrap();
        assert_eq!(profile.username(), "facebook:77");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_profile(IdentityProvider::GitHub, "<html>").is_err());
        assert!(parse_profile(IdentityProvider::Facebook, r#"{"id": ""}"#).is_err());
    }
}
