//! Google OAuth 2.0 client
//!
//! Builds the consent URL, exchanges the authorization code for tokens and
//! reads the caller's identity out of the returned ID token.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::Method;
use roombook_domain::{GoogleConfig, Result, RoombookError};
use serde::Deserialize;
use tracing::warn;
use url::Url;

use super::pkce::PkceChallenge;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Calendar access plus read-only directory resources.
pub const SCOPES: [&str; 4] = [
    "openid",
    "email",
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/admin.directory.resource.calendar.readonly",
];

/// Consent URL together with the secrets that must survive until the
/// callback.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Where to send the user.
    pub url: String,
    /// CSRF token the callback has to echo.
    pub state: String,
    /// PKCE verifier for the code exchange.
    pub code_verifier: String,
}

/// Token endpoint answer.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Identity claims read from the ID token payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub email: String,
}

/// Authorization-code client with PKCE for the configured provider.
#[derive(Clone)]
pub struct OAuthClient {
    http: HttpClient,
    config: GoogleConfig,
}

impl OAuthClient {
    /// Client posting to the endpoints in `config`.
    pub fn new(http: HttpClient, config: GoogleConfig) -> Self {
        Self { http, config }
    }

    /// Fresh consent URL with new PKCE and state values.
    pub fn authorization_request(&self) -> Result<AuthorizationRequest> {
        let challenge = PkceChallenge::generate();
        let scope = SCOPES.join(" ");

        let url = Url::parse_with_params(
            &self.config.authorization_endpoint,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", challenge.state.as_str()),
                ("code_challenge", challenge.code_challenge.as_str()),
                ("code_challenge_method", challenge.challenge_method()),
                ("access_type", "online"),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|err| RoombookError::Config(format!("invalid authorization endpoint: {err}")))?;

        Ok(AuthorizationRequest {
            url: url.into(),
            state: challenge.state,
            code_verifier: challenge.code_verifier,
        })
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<TokenResponse> {
        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ];
        let builder = self.http.request(Method::POST, &self.config.token_endpoint).form(&form);
        let response = self.http.send(builder).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => format!("token endpoint returned HTTP {}", status.as_u16()),
            };
            warn!(%status, %message, "authorization code exchange failed");
            return Err(RoombookError::UpstreamAuth(message));
        }

        response.json::<TokenResponse>().await.map_err(|err| RoombookError::from(InfraError::from(err)))
    }
}

/// Read `sub` and `email` from an ID token.
///
/// The signature is not checked: the token arrives directly from the token
/// endpoint over TLS.
pub fn decode_id_token(id_token: &str) -> Result<IdentityClaims> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| RoombookError::UpstreamAuth("malformed ID token".into()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| RoombookError::UpstreamAuth(format!("undecodable ID token: {err}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|err| RoombookError::UpstreamAuth(format!("ID token lacks identity claims: {err}")))
}
