use std::time::Duration;

use quantdle_core::{ClientConfig, Credentials, QuantdleError};
use url::Url;

use crate::QuantdleHttp;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "QUANTDLE_API_KEY";
/// Environment variable holding the API key identifier.
pub const ENV_API_KEY_ID: &str = "QUANTDLE_API_KEY_ID";
/// Optional environment variable overriding the service host.
pub const ENV_HOST: &str = "QUANTDLE_HOST";

/// Builder for [`QuantdleHttp`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Default, Clone)]
pub struct QuantdleHttpBuilder {
    credentials: Option<Credentials>,
    config: ClientConfig,
    client: Option<reqwest::Client>,
}

impl QuantdleHttpBuilder {
    /// Start from the default client configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Shorthand for [`credentials`](Self::credentials).
    #[must_use]
    pub fn api_key(self, api_key: impl Into<String>, api_key_id: impl Into<String>) -> Self {
        self.credentials(Credentials::new(api_key, api_key_id))
    }

    /// Replace the whole client configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Service base URL.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Per-request deadline.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// `User-Agent` header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Use an existing `reqwest::Client` instead of building one.
    ///
    /// The configured request timeout is still applied per request.
    #[must_use]
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Read credentials (and an optional host override) from the environment.
    ///
    /// # Errors
    /// Returns `InvalidArg` if either credential variable is unset.
    pub fn from_env(self) -> Result<Self, QuantdleError> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| QuantdleError::InvalidArg(format!("environment variable {name} is not set")))
        };
        let mut out = self.api_key(var(ENV_API_KEY)?, var(ENV_API_KEY_ID)?);
        if let Ok(host) = std::env::var(ENV_HOST)
            && !host.trim().is_empty()
        {
            out = out.host(host);
        }
        Ok(out)
    }

    /// Validate and build the connector.
    ///
    /// # Errors
    /// - `InvalidArg` if credentials are missing or empty, the host is not an
    ///   absolute http(s) URL, or the timeout is zero.
    /// - `Other` if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<QuantdleHttp, QuantdleError> {
        let credentials = self
            .credentials
            .ok_or_else(|| QuantdleError::InvalidArg("API credentials are required".into()))?;
        if credentials.api_key.trim().is_empty() || credentials.api_key_id.trim().is_empty() {
            return Err(QuantdleError::InvalidArg(
                "API key and API key id must not be empty".into(),
            ));
        }
        if self.config.request_timeout.is_zero() {
            return Err(QuantdleError::InvalidArg(
                "request timeout must be greater than zero".into(),
            ));
        }

        let base = parse_host(&self.config.host)?;
        let user_agent = self
            .config
            .user_agent
            .clone()
            .unwrap_or_else(|| concat!("quantdle-rs/", env!("CARGO_PKG_VERSION")).to_string());

        let http = match self.client {
            Some(c) => c,
            None => reqwest::Client::builder()
                .timeout(self.config.request_timeout)
                .user_agent(user_agent)
                .build()
                .map_err(|e| QuantdleError::Other(format!("failed to build HTTP client: {e}")))?,
        };

        Ok(QuantdleHttp {
            http,
            base,
            credentials,
            timeout: self.config.request_timeout,
        })
    }
}

fn parse_host(host: &str) -> Result<Url, QuantdleError> {
    let trimmed = host.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| QuantdleError::InvalidArg(format!("invalid host '{host}': {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(QuantdleError::InvalidArg(format!(
            "host '{host}' must be an absolute http(s) URL"
        )));
    }
    Ok(url)
}
