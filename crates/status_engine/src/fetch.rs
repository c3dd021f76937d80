use std::time::Duration;

use futures_util::StreamExt;
use status_core::StatusEntry;

use crate::wire::parse_status_response;
use crate::{FailureKind, PollFailure};

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
            max_bytes: 1024 * 1024,
        }
    }
}

/// Source of one poll cycle's status snapshot.
#[async_trait::async_trait]
pub trait StatusFetcher: Send + Sync {
    async fn fetch_statuses(&self) -> Result<Vec<StatusEntry>, PollFailure>;
}

/// Fetches the status list with a plain GET to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct ReqwestStatusFetcher {
    endpoint: reqwest::Url,
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestStatusFetcher {
    pub fn new(endpoint: &str, settings: FetchSettings) -> Result<Self, PollFailure> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|err| PollFailure::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = build_client(&settings)?;
        Ok(Self {
            endpoint,
            settings,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, PollFailure> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl StatusFetcher for ReqwestStatusFetcher {
    async fn fetch_statuses(&self) -> Result<Vec<StatusEntry>, PollFailure> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollFailure::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = self.read_body(response).await?;
        parse_status_response(&bytes)
    }
}

fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, PollFailure> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
        .build()
        .map_err(|err| PollFailure::new(FailureKind::Network, err.to_string()))
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> PollFailure {
    PollFailure::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> PollFailure {
    if err.is_timeout() {
        return PollFailure::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return PollFailure::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    PollFailure::new(FailureKind::Network, err.to_string())
}
