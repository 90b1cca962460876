use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Base address of the public catalog API.
pub const DEFAULT_BASE_URL: &str = "https://potterapi-fedeperin.vercel.app";

/// Errors that can occur when fetching from the catalog API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The upstream answered with a non-success status
    #[error("Upstream returned HTTP {status} for {path}")]
    Status { status: u16, path: String },
    /// The body was not valid JSON
    #[error("Malformed JSON: {0}")]
    Json(serde_json::Error),
    /// The JSON did not have the expected shape
    #[error("Unexpected response shape: {0}")]
    Decode(serde_json::Error),
    /// The configured base URL cannot be parsed
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Source of catalog JSON documents, addressed by relative path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Performs one GET of `path` and returns the parsed body.
    async fn get_json(&self, path: &str) -> Result<Value, ApiError>;
}

/// A builder for creating catalog clients.
#[derive(Debug, Default)]
pub struct CatalogClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout. Unset means the HTTP stack default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<CatalogClient, ApiError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        reqwest::Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        let mut client_builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        Ok(CatalogClient {
            client: client_builder.build()?,
            base_url,
        })
    }
}

/// Long-lived HTTP client bound to the catalog base address.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Creates a new builder.
    pub fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Returns the base URL every request is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url_for(path);
        debug!(%url, "Fetching catalog resource");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(ApiError::Json)
    }
}
