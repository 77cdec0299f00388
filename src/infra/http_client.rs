use crate::app::ports::{FetchedPage, PageFetcher};
use crate::common::constants::ACCEPT_HEADER;
use crate::common::error::{Result, ScraperError};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, error};

/// `PageFetcher` backed by a shared reqwest client.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage> {
        debug!("GET {} (timeout {:?})", url, timeout);
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_HEADER)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(url, timeout, e))?;

        let status = resp.status();
        if !status.is_success() {
            error!("HTTP {} while fetching {}", status.as_u16(), url);
            return Err(ScraperError::Fetch {
                url: url.to_string(),
                message: format!("request failed with status: {status}"),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = resp
            .bytes()
            .await
            .map_err(|e| transport_error(url, timeout, e))?
            .to_vec();

        debug!("Fetched {} bytes ({}) from {}", body.len(), content_type, url);
        Ok(FetchedPage {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

fn transport_error(url: &str, timeout: Duration, e: reqwest::Error) -> ScraperError {
    if e.is_timeout() {
        ScraperError::Timeout {
            url: url.to_string(),
            secs: timeout.as_secs_f64(),
        }
    } else {
        ScraperError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
