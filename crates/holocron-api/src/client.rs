use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};
use crate::models::Resource;
use crate::page::Page;
use crate::reference::parse_reference;
use crate::retry::{with_retry, RetryConfig};

pub const SWAPI_API_BASE: &str = "https://swapi.dev/api";
pub const DEFAULT_USER_AGENT: &str = "Holocron/0.1.0";

/// Knobs for building a [`SwapiClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub retry_config: RetryConfig,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: SWAPI_API_BASE.to_string(),
            timeout: Some(Duration::from_secs(15)),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry_config: RetryConfig::default(),
        }
    }
}

/// Thin typed client over the Star Wars API
///
/// One GET per entity or page. Every record that comes back has its
/// display id filled in before it reaches the caller.
#[derive(Debug, Clone)]
pub struct SwapiClient {
    client: reqwest::Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl SwapiClient {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(options.user_agent);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            retry_config: options.retry_config,
        })
    }

    /// Point at a mirror or a local mock server
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(ClientOptions {
            base_url: base_url.into(),
            ..ClientOptions::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a single record from its canonical URL
    pub async fn fetch_entity<T: Resource>(&self, reference: &str) -> Result<T> {
        let url = parse_reference(reference)?;
        let mut entity: T = self.get_json(&url).await?;
        entity.assign_display_id();
        Ok(entity)
    }

    /// Fetch a record by its short id, e.g. `("1")` for Luke
    pub async fn fetch_entity_by_id<T: Resource>(&self, id: &str) -> Result<T> {
        let id = id.trim().trim_matches('/');
        if id.is_empty() || id.contains('/') {
            return Err(ApiError::InvalidReference(format!("bad {} id: {:?}", T::KIND, id)));
        }
        let reference = format!("{}/{}/{}/", self.base_url, T::KIND.path(), id);
        self.fetch_entity(&reference).await
    }

    /// Fetch one page (1-based) of a collection
    pub async fn fetch_page<T: Resource>(&self, page: u32) -> Result<Page<T>> {
        if page == 0 {
            return Err(ApiError::InvalidReference(
                "page numbers start at 1".to_string(),
            ));
        }

        let mut url = parse_reference(&format!("{}/{}/", self.base_url, T::KIND.path()))?;
        url.query_pairs_mut().append_pair("page", &page.to_string());

        let mut result: Page<T> = self.get_json(&url).await?;
        result.assign_display_ids();
        debug!(
            "Fetched {} page {}: {} items, next={:?}",
            T::KIND,
            page,
            result.results.len(),
            result.next
        );
        Ok(result)
    }

    /// Fetch a record, logging and swallowing any failure
    ///
    /// Returns the empty record on error. Prefer [`SwapiClient::fetch_entity`]
    /// unless an empty placeholder really is what the caller wants to show.
    pub async fn fetch_entity_or_empty<T: Resource>(&self, reference: &str) -> T {
        match self.fetch_entity(reference).await {
            Ok(entity) => entity,
            Err(e) => {
                warn!("Falling back to empty {} for {}: {}", T::KIND, reference, e);
                T::default()
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &reqwest::Url) -> Result<T> {
        with_retry(&self.retry_config, || async {
            debug!("GET {}", url);
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(url.to_string()));
            }

            // swapi.dev throttles anonymous clients, worth telling apart from a 5xx
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(ApiError::RateLimitExceeded);
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::RequestFailed {
                    status: status.as_u16(),
                    message: body,
                });
            }

            // Decode separately so a bad body is a Decode error, not a Transport one
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        })
        .await
    }
}
