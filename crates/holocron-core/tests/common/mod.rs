// In-memory EntitySource used by the loader and profile tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use holocron_api::{ApiError, Page, Resource, ResourceKind};
use holocron_core::EntitySource;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

pub const BASE: &str = "https://swapi.test/api";

pub fn url(kind: ResourceKind, id: u32) -> String {
    format!("{}/{}/{}/", BASE, kind.path(), id)
}

#[derive(Default)]
pub struct FakeSource {
    pages: HashMap<(ResourceKind, u32), Value>,
    entities: HashMap<String, Value>,
    failures: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
    page_gate: Option<Arc<Semaphore>>,
    pub page_calls: AtomicU32,
    pub entity_calls: AtomicU32,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, kind: ResourceKind, page: u32, body: Value) -> Self {
        self.pages.insert((kind, page), body);
        self
    }

    pub fn with_entity(mut self, reference: &str, body: Value) -> Self {
        self.entities.insert(reference.to_string(), body);
        self
    }

    pub fn with_failure(mut self, reference: &str, status: u16) -> Self {
        self.failures.insert(reference.to_string(), status);
        self
    }

    pub fn with_delay(mut self, reference: &str, delay: Duration) -> Self {
        self.delays.insert(reference.to_string(), delay);
        self
    }

    /// Every page fetch waits for a permit from this semaphore
    pub fn with_page_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.page_gate = Some(gate);
        self
    }

    pub fn page_calls(&self) -> u32 {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn entity_calls(&self) -> u32 {
        self.entity_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntitySource for FakeSource {
    async fn fetch_entity<T: Resource>(&self, reference: &str) -> holocron_api::Result<T> {
        self.entity_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(reference) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(status) = self.failures.get(reference) {
            return Err(ApiError::RequestFailed {
                status: *status,
                message: "fake failure".to_string(),
            });
        }

        let body = self
            .entities
            .get(reference)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(reference.to_string()))?;
        let mut entity: T = serde_json::from_value(body)?;
        entity.assign_display_id();
        Ok(entity)
    }

    async fn fetch_page<T: Resource>(&self, page: u32) -> holocron_api::Result<Page<T>> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.page_gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let body = self
            .pages
            .get(&(T::KIND, page))
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("{} page {}", T::KIND, page)))?;
        let mut result: Page<T> = serde_json::from_value(body)?;
        result.assign_display_ids();
        Ok(result)
    }
}

pub fn named(kind: ResourceKind, id: u32, name: &str) -> Value {
    match kind {
        ResourceKind::Film => json!({"title": name, "url": url(kind, id)}),
        _ => json!({"name": name, "url": url(kind, id)}),
    }
}

/// A planets page holding ids `first..first + len`
pub fn planet_page(page: u32, first: u32, len: u32, count: u32, has_next: bool) -> Value {
    let results: Vec<Value> = (first..first + len)
        .map(|id| named(ResourceKind::Planet, id, &format!("Planet {}", id)))
        .collect();
    let next = if has_next {
        Value::String(format!("{}/planets/?page={}", BASE, page + 1))
    } else {
        Value::Null
    };

    json!({
        "count": count,
        "next": next,
        "previous": null,
        "results": results,
    })
}
