use std::time::Duration;

use engine_logging::engine_trace;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::{FailureKind, FetchError, HttpResponse};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl FetchSettings {
    /// Search submission waits on scraping, so it gets a longer budget.
    pub fn for_search() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            ..Self::default()
        }
    }
}

/// Request/response primitive used by every probe.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Header-only existence check; returns the status code.
    async fn head(&self, url: &str) -> Result<u16, FetchError>;

    /// Full-body retrieval. Non-success statuses are returned, not raised.
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestClient {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn parse_url(url: &str) -> Result<reqwest::Url, FetchError> {
        reqwest::Url::parse(url).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn head(&self, url: &str) -> Result<u16, FetchError> {
        let parsed = Self::parse_url(url)?;
        let response = self
            .client
            .head(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        engine_trace!("HEAD {} -> {}", url, response.status());
        Ok(response.status().as_u16())
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let parsed = Self::parse_url(url)?;
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            body.extend_from_slice(&chunk);
        }
        engine_trace!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse {
            status,
            final_url,
            content_type,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
