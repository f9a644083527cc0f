//! Keeps the catalog filters and the address-bar query in step.
//!
//! Reads: every observed query is diffed against the current filters and only the
//! fields that differ (after trim + lower-case) are applied. Writes: filter changes
//! are throttled (trailing edge, one timer at a time) and fields equal to their
//! default are left out of the query. The last query known to be in the address bar
//! is remembered, so our own write-back coming back through the router is a no-op.

use crate::models::{normalize_search, FilterState, Region};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr, EnumIter)]
pub enum QueryKey {
    #[strum(serialize = "search")]
    Search,
    #[strum(serialize = "region")]
    Region,
}

/// Persisted form of [`FilterState`]: absent entries mean "default".
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FilterQuery {
    pub search: Option<String>,
    pub region: Option<String>,
}

impl FilterQuery {
    /// Builds a query from raw entries. Blank values count as absent.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: QueryKey| {
            get(key.as_ref())
                .map(|v| normalize_search(&v))
                .filter(|v| !v.is_empty())
        };
        Self {
            search: read(QueryKey::Search),
            region: read(QueryKey::Region),
        }
    }

    pub fn from_state(state: &FilterState) -> Self {
        let search = state.normalized_search();
        Self {
            search: (!search.is_empty()).then_some(search),
            region: state.region.key().map(str::to_string),
        }
    }

    pub fn to_state(&self) -> FilterState {
        FilterState {
            region: self
                .region
                .as_deref()
                .map(Region::parse)
                .unwrap_or_default(),
            search: self.search.clone().unwrap_or_default(),
        }
    }

    fn value(&self, key: QueryKey) -> Option<&str> {
        match key {
            QueryKey::Search => self.search.as_deref(),
            QueryKey::Region => self.region.as_deref(),
        }
    }

    pub fn pairs(&self) -> Vec<(QueryKey, &str)> {
        QueryKey::iter()
            .filter_map(|k| self.value(k).map(|v| (k, v)))
            .collect()
    }

    /// `?search=...&region=...`, or an empty string when every field is default.
    pub fn to_query_string(&self) -> String {
        let pairs = self.pairs();
        if pairs.is_empty() {
            return String::new();
        }
        let joined = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{joined}")
    }
}

/// Fields to overwrite in the live filters. `None` leaves a field untouched.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StatePatch {
    pub search: Option<String>,
    pub region: Option<Region>,
}

impl StatePatch {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.region.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThrottleStep {
    /// Start the single write-back timer with this delay.
    ArmTimer(u32),
    /// A timer is already pending; its payload was replaced.
    Coalesced,
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TimerStep {
    pub write: Option<FilterQuery>,
    /// Re-arm the timer: a write just happened and opened a new window.
    pub rearm: Option<u32>,
}

/// Trailing-edge throttle: the first value opens a window, later values inside
/// it replace the payload, and the last one is emitted when the window ends.
#[derive(Clone, Debug)]
pub struct WriteThrottle {
    interval_ms: u32,
    pending: Option<FilterQuery>,
    window_open: bool,
    closed: bool,
}

impl WriteThrottle {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            pending: None,
            window_open: false,
            closed: false,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.window_open
    }

    pub fn push(&mut self, query: FilterQuery) -> ThrottleStep {
        if self.closed {
            return ThrottleStep::Ignored;
        }
        self.pending = Some(query);
        if self.window_open {
            ThrottleStep::Coalesced
        } else {
            self.window_open = true;
            ThrottleStep::ArmTimer(self.interval_ms)
        }
    }

    pub fn fire(&mut self) -> TimerStep {
        if self.closed {
            return TimerStep::default();
        }
        match self.pending.take() {
            Some(query) => TimerStep {
                write: Some(query),
                rearm: Some(self.interval_ms),
            },
            None => {
                self.window_open = false;
                TimerStep::default()
            }
        }
    }

    /// The timer for the open window could not be started. Closes the window and keeps
    /// the payload for the next push.
    pub fn disarm(&mut self) {
        self.window_open = false;
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.pending = None;
        self.window_open = false;
    }
}

#[derive(Clone, Debug)]
pub struct QuerySync {
    /// What the address bar is known to hold.
    url_query: Option<FilterQuery>,
    throttle: WriteThrottle,
}

impl QuerySync {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            url_query: None,
            throttle: WriteThrottle::new(interval_ms),
        }
    }

    /// Handles a query read from the address bar (startup, back/forward, or the echo
    /// of our own write).
    pub fn observe(&mut self, query: FilterQuery, current: &FilterState) -> StatePatch {
        if self.url_query.as_ref() == Some(&query) {
            return StatePatch::default();
        }

        let wanted = query.to_state();
        self.url_query = Some(query);

        let mut patch = StatePatch::default();
        if normalize_search(&wanted.search) != current.normalized_search() {
            patch.search = Some(wanted.search);
        }
        if wanted.region != current.region {
            patch.region = Some(wanted.region);
        }

        if !patch.is_empty() {
            tracing::debug!(?patch, "filters updated from address bar");
        }
        patch
    }

    pub fn on_state_change(&mut self, state: &FilterState) -> ThrottleStep {
        self.throttle.push(FilterQuery::from_state(state))
    }

    /// Timer callback. Returns the query to write, if it differs from the address bar.
    pub fn on_timer(&mut self) -> TimerStep {
        let mut step = self.throttle.fire();
        if let Some(query) = step.write.take() {
            if self.url_query.as_ref() != Some(&query) {
                tracing::debug!(query = %query.to_query_string(), "writing filters to address bar");
                self.url_query = Some(query.clone());
                step.write = Some(query);
            }
        }
        step
    }

    pub fn on_timer_failed(&mut self) {
        self.throttle.disarm();
    }

    pub fn teardown(&mut self) {
        self.throttle.close();
    }

    #[cfg(test)]
    pub fn is_timer_armed(&self) -> bool {
        self.throttle.is_armed()
    }
}
