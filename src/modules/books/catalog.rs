//! External book search.
//!
//! [`BookCatalog`] is the search port; [`GoogleBooksCatalog`] implements it
//! against the Google Books `volumes` API.

use std::time::Duration;

use async_trait::async_trait;
use redude_kernel::settings::GoogleSettings;
use serde::Deserialize;

use super::models::Book;

const DEFAULT_PAGE_SIZE: u32 = 10;
const EXTENDED_PAGE_SIZE: u32 = 40;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog answered with status {status}")]
    Status { status: u16 },
    #[error("catalog response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Search the catalog. Returned books have no internal id.
    async fn search(&self, query: &str, extended: bool) -> Result<Vec<Book>, CatalogError>;
}

pub struct GoogleBooksCatalog {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleBooksCatalog {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    pub fn from_settings(settings: &GoogleSettings) -> Result<Self, reqwest::Error> {
        Self::new(
            settings.books_endpoint.clone(),
            settings.books_api_key.clone(),
            Duration::from_millis(settings.timeout_ms),
        )
    }
}

#[async_trait]
impl BookCatalog for GoogleBooksCatalog {
    async fn search(&self, query: &str, extended: bool) -> Result<Vec<Book>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let page_size = if extended {
            EXTENDED_PAGE_SIZE
        } else {
            DEFAULT_PAGE_SIZE
        };
        let mut params = vec![
            ("q", query.to_string()),
            ("maxResults", page_size.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        let response = self.client.get(&self.endpoint).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let books = parse_volumes(&body)?;
        tracing::debug!(query, extended, results = books.len(), "catalog search finished");
        Ok(books)
    }
}

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    id: String,
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    categories: Vec<String>,
}

fn parse_volumes(body: &[u8]) -> Result<Vec<Book>, serde_json::Error> {
    let response: VolumesResponse = serde_json::from_slice(body)?;
    Ok(response
        .items
        .into_iter()
        .map(|volume| Book {
            id: None,
            google_id: volume.id,
            title: volume.volume_info.title,
            author: volume.volume_info.authors.join(", "),
            categories: volume.volume_info.categories.join(", "),
        })
        .collect())
}
