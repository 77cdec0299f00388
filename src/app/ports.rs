use crate::common::error::Result;
use crate::common::types::Row;
use async_trait::async_trait;
use std::time::Duration;

/// Retrieves one remote page. Owns every HTTP-level concern.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl FetchedPage {
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }
}

/// Turns a fetched page into ordered result rows. Owns every payload-shape concern.
pub trait TableParser: Send + Sync {
    fn parse(&self, page: &FetchedPage) -> Result<Vec<Row>>;
}
