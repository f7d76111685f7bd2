// Incremental "load more on scroll" list loading
use std::sync::{Mutex, MutexGuard, PoisonError};

use holocron_api::{image_url, Resource};
use tracing::{debug, info, warn};

use crate::cancel::CancelScope;
use crate::config::ListConfig;
use crate::filter::filter;
use crate::source::EntitySource;
use crate::{Error, Result};

/// Where a list is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Why a load request did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not in the state this call needs (e.g. `start` twice)
    NotReady,
    /// A page request is already out
    InFlight,
    /// Trigger index is too far from the end of the list
    OutsideWindow,
    /// No next cursor, the collection is fully loaded
    Exhausted,
    /// A search query is active
    Filtering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page arrived and this many items were appended
    Loaded(usize),
    Skipped(SkipReason),
}

#[derive(Debug)]
struct ListInner<T> {
    state: LoadState,
    items: Vec<T>,
    next: Option<String>,
    count: u32,
    pages_loaded: u32,
    query: String,
}

/// Growing, ordered collection fed one page at a time
///
/// At most one page request is in flight per list. Pages are appended in
/// the order they were received; nothing is reordered or deduplicated.
pub struct PagedList<T, S> {
    source: S,
    prefetch_window: usize,
    cancel: CancelScope,
    inner: Mutex<ListInner<T>>,
}

impl<T: Resource, S: EntitySource> PagedList<T, S> {
    pub fn new(source: S, config: &ListConfig) -> Self {
        Self::with_cancel(source, config, CancelScope::new())
    }

    pub fn with_cancel(source: S, config: &ListConfig, cancel: CancelScope) -> Self {
        Self {
            source,
            prefetch_window: config.prefetch_window,
            cancel,
            inner: Mutex::new(ListInner {
                state: LoadState::Idle,
                items: Vec::new(),
                next: None,
                count: 0,
                pages_loaded: 0,
                query: String::new(),
            }),
        }
    }

    /// Load the first page. Only does anything from `Idle`.
    pub async fn start(&self) -> Result<LoadOutcome> {
        {
            let mut inner = self.lock();
            match &inner.state {
                LoadState::Idle => {}
                LoadState::Loading => return Ok(LoadOutcome::Skipped(SkipReason::InFlight)),
                LoadState::Ready | LoadState::Failed(_) => {
                    return Ok(LoadOutcome::Skipped(SkipReason::NotReady))
                }
            }
            inner.state = LoadState::Loading;
        }

        self.fetch_and_append(1, LoadState::Idle).await
    }

    /// Fetch the next page if `trigger_index` is close enough to the end
    ///
    /// Called whenever an item becomes visible. Suppressed while a search
    /// query is active, since the filtered view shouldn't drive pagination.
    pub async fn load_more(&self, trigger_index: usize) -> Result<LoadOutcome> {
        let page = {
            let mut inner = self.lock();
            match &inner.state {
                LoadState::Ready => {}
                LoadState::Loading => return Ok(LoadOutcome::Skipped(SkipReason::InFlight)),
                LoadState::Idle | LoadState::Failed(_) => {
                    return Ok(LoadOutcome::Skipped(SkipReason::NotReady))
                }
            }

            if !inner.query.is_empty() {
                return Ok(LoadOutcome::Skipped(SkipReason::Filtering));
            }

            if inner.next.is_none() {
                return Ok(LoadOutcome::Skipped(SkipReason::Exhausted));
            }

            let threshold = inner.items.len().saturating_sub(self.prefetch_window);
            if trigger_index < threshold {
                return Ok(LoadOutcome::Skipped(SkipReason::OutsideWindow));
            }

            inner.state = LoadState::Loading;
            inner.pages_loaded + 1
        };

        self.fetch_and_append(page, LoadState::Ready).await
    }

    // `resume` is the state to fall back to if this future is dropped mid-request
    async fn fetch_and_append(&self, page: u32, resume: LoadState) -> Result<LoadOutcome> {
        let guard = PendingPage {
            inner: &self.inner,
            resume: Some(resume),
        };

        debug!("Requesting {} page {}", T::KIND, page);
        let result = self.source.fetch_page::<T>(page).await;

        let mut inner = self.lock();
        guard.disarm();

        if self.cancel.is_cancelled() {
            debug!("Discarding {} page {} after cancellation", T::KIND, page);
            inner.state = LoadState::Failed(Error::Cancelled.user_message());
            return Err(Error::Cancelled);
        }

        match result {
            Ok(fetched) => {
                let appended = fetched.results.len();
                inner.items.extend(fetched.results);
                inner.next = fetched.next;
                inner.count = fetched.count;
                inner.pages_loaded = page;
                inner.state = LoadState::Ready;
                info!(
                    "Loaded {} page {}: {} items ({}/{})",
                    T::KIND,
                    page,
                    appended,
                    inner.items.len(),
                    inner.count
                );
                Ok(LoadOutcome::Loaded(appended))
            }
            Err(e) => {
                let err = Error::from(e);
                warn!("Failed to load {} page {}: {}", T::KIND, page, err);
                inner.state = LoadState::Failed(err.user_message());
                Err(err)
            }
        }
    }

    pub fn state(&self) -> LoadState {
        self.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state == LoadState::Loading
    }

    /// Everything loaded so far, unfiltered
    pub fn items(&self) -> Vec<T> {
        self.lock().items.clone()
    }

    /// What the screen shows: the loaded items through the current query
    pub fn visible(&self) -> Vec<T> {
        let inner = self.lock();
        filter(&inner.items, &inner.query)
    }

    /// Image for the `index`-th visible item
    pub fn visible_image_url(&self, index: usize, image_base: &str) -> Option<String> {
        self.visible()
            .get(index)
            .map(|item| image_url(image_base, T::KIND, item.display_id()))
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.lock().query = query.into();
    }

    /// Total reported by the API, not the number loaded
    pub fn count(&self) -> u32 {
        self.lock().count
    }

    pub fn next(&self) -> Option<String> {
        self.lock().next.clone()
    }

    pub fn pages_loaded(&self) -> u32 {
        self.lock().pages_loaded
    }

    fn lock(&self) -> MutexGuard<'_, ListInner<T>> {
        lock_inner(&self.inner)
    }
}

// The guard is never held across an await, so poisoning can only come
// from a panic in one of the accessors above. The data is still valid.
fn lock_inner<T>(inner: &Mutex<ListInner<T>>) -> MutexGuard<'_, ListInner<T>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a page request as outstanding
///
/// Dropping a load future (timeout, `select!`, an aborted task) would
/// otherwise leave the list in `Loading` for good, and every later trigger
/// would be skipped as in flight.
struct PendingPage<'a, T> {
    inner: &'a Mutex<ListInner<T>>,
    resume: Option<LoadState>,
}

impl<T> PendingPage<'_, T> {
    /// The response made it back, the caller owns the state from here
    fn disarm(mut self) {
        self.resume = None;
    }
}

impl<T> Drop for PendingPage<'_, T> {
    fn drop(&mut self) {
        if let Some(resume) = self.resume.take() {
            let mut inner = lock_inner(self.inner);
            if inner.state == LoadState::Loading {
                debug!("Page request dropped, back to {:?}", resume);
                inner.state = resume;
            }
        }
    }
}
