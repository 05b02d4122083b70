use std::collections::HashSet;

use crate::error::AppError;
use crate::types::{Character, Page};

/// Whether a page request is currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Fetching {
        page: u32,
    },
}

/// Where the list as a whole stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loading,
    Ready,
    LoadingMore,
    Exhausted,
    Error,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Empty => write!(f, "Empty"),
            Phase::Loading => write!(f, "Loading"),
            Phase::Ready => write!(f, "Ready"),
            Phase::LoadingMore => write!(f, "Loading more"),
            Phase::Exhausted => write!(f, "All loaded"),
            Phase::Error => write!(f, "Error"),
        }
    }
}

/// Accumulates fetched pages in order and guards against overlapping fetches.
///
/// Page numbers are 1-indexed and derived from the number of pages already
/// held, so at most one request may be outstanding at a time.
#[derive(Debug, Default)]
pub struct Pagination {
    pages: Vec<Page>,
    fetch: FetchState,
    error: Option<AppError>,
    seen_ids: HashSet<u64>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetch
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.fetch, FetchState::Fetching { .. })
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    /// An empty list assumes a first page exists.
    pub fn has_next_page(&self) -> bool {
        self.pages.last().map_or(true, Page::has_next)
    }

    /// Claim the next page number, or `None` if a fetch is already in flight
    /// or the API reported no further pages. The caller issues the request
    /// and reports back through [`Pagination::complete`].
    pub fn fetch_next_page(&mut self) -> Option<u32> {
        if self.is_fetching() || !self.has_next_page() {
            return None;
        }
        let page = self.pages.len() as u32 + 1;
        self.fetch = FetchState::Fetching { page };
        tracing::debug!(page, "fetch started");
        Some(page)
    }

    /// Record the outcome of the in-flight fetch.
    pub fn complete(&mut self, result: Result<Page, AppError>) {
        let page = match self.fetch {
            FetchState::Fetching { page } => page,
            FetchState::Idle => {
                tracing::warn!("fetch completed with nothing in flight, ignoring");
                return;
            }
        };
        self.fetch = FetchState::Idle;

        match result {
            Ok(fetched) => {
                let dupes: Vec<u64> = fetched
                    .results
                    .iter()
                    .map(|c| c.id)
                    .filter(|id| !self.seen_ids.insert(*id))
                    .collect();
                if !dupes.is_empty() {
                    tracing::warn!(page, ?dupes, "page repeats character ids");
                }
                tracing::debug!(page, count = fetched.results.len(), "page appended");
                self.pages.push(fetched);
            }
            Err(err) => {
                tracing::warn!(page, error = %err, "fetch failed");
                self.error = Some(err);
            }
        }
    }

    /// Explicitly re-attempt after a failure.
    pub fn retry(&mut self) -> Option<u32> {
        if self.is_fetching() {
            return None;
        }
        self.error = None;
        self.fetch_next_page()
    }

    pub fn phase(&self) -> Phase {
        if self.error.is_some() {
            return Phase::Error;
        }
        match (self.pages.is_empty(), self.is_fetching()) {
            (true, true) => Phase::Loading,
            (true, false) => Phase::Empty,
            (false, true) => Phase::LoadingMore,
            (false, false) if self.has_next_page() => Phase::Ready,
            (false, false) => Phase::Exhausted,
        }
    }

    /// The first `per_page` characters of every page, in page order.
    pub fn cards(&self, per_page: usize) -> Vec<&Character> {
        self.pages
            .iter()
            .flat_map(|page| page.results.iter().take(per_page))
            .collect()
    }

    pub fn card_count(&self, per_page: usize) -> usize {
        self.pages
            .iter()
            .map(|page| page.results.len().min(per_page))
            .sum()
    }
}
