//! Region + search filter pipeline of the catalog view.
//!
//! Two stages: a region change issues a base-list fetch (tagged with a request id),
//! and the current search text is applied to whichever base list is current. Search
//! changes only re-filter; they never fetch. A fetch result whose id is not the latest
//! issued is dropped, so only the newest region selection can produce a list.

use crate::error::CatalogError;
use crate::models::{normalize_search, CountryRecord, FilterState, Region};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    CaseInsensitive,
    CaseSensitive,
}

/// A base-list fetch the caller must run and report back via
/// [`FilterPipeline::complete_fetch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub request_id: u64,
    pub region: Region,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer request was issued, or the session was torn down.
    Stale,
}

/// What the consumer renders.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum DerivedList {
    #[default]
    Loading,
    Ready(Vec<CountryRecord>),
    Failed(CatalogError),
}

#[derive(Clone, Debug, Default)]
enum BaseList {
    #[default]
    Pending,
    Ready(Vec<CountryRecord>),
    Failed(CatalogError),
}

#[derive(Clone, Debug)]
pub struct FilterPipeline {
    state: FilterState,
    mode: MatchMode,
    base: BaseList,
    derived: DerivedList,
    latest_request_id: u64,
    closed: bool,
}

/// Countries of `base` whose common name contains the trimmed search text.
///
/// Blank search passes `base` through unchanged.
pub fn filter_by_name(base: &[CountryRecord], search: &str, mode: MatchMode) -> Vec<CountryRecord> {
    let needle = search.trim();
    if needle.is_empty() {
        return base.to_vec();
    }

    match mode {
        MatchMode::CaseSensitive => base
            .iter()
            .filter(|c| c.name.common.contains(needle))
            .cloned()
            .collect(),
        MatchMode::CaseInsensitive => {
            let needle = normalize_search(needle);
            base.iter()
                .filter(|c| c.name.common.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }
    }
}

impl FilterPipeline {
    /// Starts a session with `initial` filters. The returned request loads the first
    /// base list.
    pub fn new(initial: FilterState, mode: MatchMode) -> (Self, FetchRequest) {
        let mut pipeline = Self {
            state: initial,
            mode,
            base: BaseList::Pending,
            derived: DerivedList::Loading,
            latest_request_id: 0,
            closed: false,
        };
        let req = pipeline.issue_fetch();
        (pipeline, req)
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn derived(&self) -> &DerivedList {
        &self.derived
    }

    #[cfg(test)]
    pub fn latest_request_id(&self) -> u64 {
        self.latest_request_id
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn issue_fetch(&mut self) -> FetchRequest {
        self.latest_request_id = self.latest_request_id.saturating_add(1);
        self.base = BaseList::Pending;
        self.derived = DerivedList::Loading;
        tracing::debug!(
            request_id = self.latest_request_id,
            region = ?self.state.region,
            "base list fetch issued"
        );
        FetchRequest {
            request_id: self.latest_request_id,
            region: self.state.region.clone(),
        }
    }

    /// Returns the fetch to run, or `None` when the selector did not change.
    pub fn set_region(&mut self, region: Region) -> Option<FetchRequest> {
        if self.closed || self.state.region == region {
            return None;
        }
        self.state.region = region;
        Some(self.issue_fetch())
    }

    /// Re-filters the current base list. Never fetches.
    pub fn set_search(&mut self, search: impl Into<String>) {
        if self.closed {
            return;
        }
        self.state.search = search.into();
        self.rederive();
    }

    pub fn complete_fetch(
        &mut self,
        request_id: u64,
        result: Result<Vec<CountryRecord>, CatalogError>,
    ) -> FetchOutcome {
        if self.closed || request_id != self.latest_request_id {
            tracing::debug!(
                request_id,
                latest = self.latest_request_id,
                closed = self.closed,
                "stale base list dropped"
            );
            return FetchOutcome::Stale;
        }

        self.base = match result {
            Ok(list) => BaseList::Ready(list),
            Err(e) => {
                tracing::warn!(request_id, error = %e, "base list fetch failed");
                BaseList::Failed(e)
            }
        };
        self.rederive();
        FetchOutcome::Applied
    }

    fn rederive(&mut self) {
        self.derived = match &self.base {
            BaseList::Pending => DerivedList::Loading,
            BaseList::Ready(list) => {
                DerivedList::Ready(filter_by_name(list, &self.state.search, self.mode))
            }
            BaseList::Failed(e) => DerivedList::Failed(e.clone()),
        };
    }

    /// Ends the session: every outstanding and future fetch result is dropped and
    /// no further input is accepted.
    pub fn teardown(&mut self) {
        self.closed = true;
        self.latest_request_id = self.latest_request_id.saturating_add(1);
    }
}
