// Where records come from - the live API in production, fakes in tests
use std::sync::Arc;

use async_trait::async_trait;
use holocron_api::{Page, Resource, SwapiClient};

/// Anything that can hand out SWAPI records
///
/// The loaders only ever talk to this trait, so they can be driven by an
/// in-memory source without a network.
#[async_trait]
pub trait EntitySource: Send + Sync {
    async fn fetch_entity<T: Resource>(&self, reference: &str) -> holocron_api::Result<T>;
    async fn fetch_page<T: Resource>(&self, page: u32) -> holocron_api::Result<Page<T>>;
}

#[async_trait]
impl EntitySource for SwapiClient {
    async fn fetch_entity<T: Resource>(&self, reference: &str) -> holocron_api::Result<T> {
        SwapiClient::fetch_entity(self, reference).await
    }

    async fn fetch_page<T: Resource>(&self, page: u32) -> holocron_api::Result<Page<T>> {
        SwapiClient::fetch_page(self, page).await
    }
}

#[async_trait]
impl<S: EntitySource> EntitySource for Arc<S> {
    async fn fetch_entity<T: Resource>(&self, reference: &str) -> holocron_api::Result<T> {
        (**self).fetch_entity(reference).await
    }

    async fn fetch_page<T: Resource>(&self, page: u32) -> holocron_api::Result<Page<T>> {
        (**self).fetch_page(page).await
    }
}
