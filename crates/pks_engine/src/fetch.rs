use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::{FetchError, FetchFailureKind, FetchMetadata, FetchOutput};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

/// HTML page fetcher with size, time and content-type limits.
#[derive(Debug, Clone)]
pub struct ReqwestPageFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestPageFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FetchFailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn content_type_allowed(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(essence))
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FetchFailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl PageSource for ReqwestPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FetchFailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FetchFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(ct) = content_type.as_deref() {
            if !self.content_type_allowed(ct) {
                return Err(FetchError::new(
                    FetchFailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let final_url = response.url().to_string();
        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            content_type,
            byte_len: bytes.len() as u64,
        };
        Ok(FetchOutput { bytes, metadata })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FetchFailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FetchFailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FetchFailureKind::Network, err.to_string())
}
