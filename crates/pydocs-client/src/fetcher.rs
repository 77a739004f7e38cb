use std::time::Duration;

use pydocs_core::error::AppError;
use pydocs_core::models::RawResponse;
use pydocs_core::traits::Fetcher;
use reqwest::Client;

const USER_AGENT: &str = concat!("pydocs/", env!("CARGO_PKG_VERSION"));

/// HTTP session using reqwest.
///
/// Issues plain GETs with a fixed User-Agent and timeout. Failures to get
/// any response at all map to the transport variants of [`AppError`];
/// error statuses are returned as responses.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let timeout_secs = timeout.as_secs();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    fn classify(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            AppError::NetworkError(format!("Connection failed: {e}"))
        } else {
            AppError::HttpError(e.to_string())
        }
    }
}

impl Fetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<RawResponse, AppError> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))?;

        Ok(RawResponse::new(final_url, status, body.to_vec()))
    }
}
