use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use roombook_domain::{GoogleConfig, RoombookError};
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with a request timeout.
///
/// Provider adapters build requests through [`HttpClient::request`] and send
/// them with [`HttpClient::send`]. Every send is exactly one round-trip: a
/// repeated insert could book the room twice, so nothing is retried here.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client configured from the provider section of the configuration.
    pub fn from_config(config: &GoogleConfig) -> Result<Self, RoombookError> {
        Self::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(concat!("roombook/", env!("CARGO_PKG_VERSION")))
            .build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request once. Any status comes back as a response;
    /// transport failures become `Upstream` errors.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, RoombookError> {
        let request = builder.build().map_err(into_domain)?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, path = url.path(), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, path = url.path(), status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, path = url.path(), error = %err, "HTTP request failed");
                Err(into_domain(err))
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), user_agent: None }
    }
}

impl HttpClientBuilder {
    /// Whole-request timeout, connect through body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `User-Agent` header sent with every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client. Fails only if reqwest cannot set up its TLS backend.
    pub fn build(self) -> Result<HttpClient, RoombookError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(into_domain)?;
        Ok(HttpClient { client })
    }
}

fn into_domain(err: reqwest::Error) -> RoombookError {
    let infra: InfraError = err.into();
    RoombookError::from(infra)
}
