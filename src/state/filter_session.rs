use crate::api::CatalogClient;
use crate::models::{FilterState, Region};
use crate::pipeline::{DerivedList, FetchOutcome, FetchRequest, FilterPipeline, MatchMode};
use crate::sync::{FilterQuery, QuerySync, ThrottleStep};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::{set_timeout_with_handle, TimeoutHandle};
use std::time::Duration;

/// Reactive shell around [`FilterPipeline`] and [`QuerySync`] for one catalog view.
///
/// Responsibilities:
/// - running base-list fetches the pipeline asks for (results carry the request id)
/// - mirroring filters and the derived list into signals for the view
/// - the single write-back timer for the address bar
///
/// Everything runs on the browser's event loop; the stored values are only touched
/// from callbacks on that loop.
#[derive(Clone, Copy)]
pub struct FilterSession {
    catalog: StoredValue<CatalogClient>,
    pipeline: StoredValue<FilterPipeline>,
    sync: StoredValue<QuerySync>,
    timer: StoredValue<Option<TimeoutHandle>>,
    write_query: Callback<FilterQuery>,

    pub search: RwSignal<String>,
    pub region: RwSignal<Region>,
    pub countries: RwSignal<DerivedList>,
}

impl FilterSession {
    /// `initial` is the address-bar query at mount time; it seeds the filters before
    /// the first fetch so a shared link costs exactly one request.
    pub fn start(
        catalog: CatalogClient,
        write_interval_ms: u32,
        initial: FilterQuery,
        write_query: Callback<FilterQuery>,
    ) -> Self {
        let mut sync = QuerySync::new(write_interval_ms);
        let mut state = FilterState::default();
        let patch = sync.observe(initial, &state);
        if let Some(search) = patch.search {
            state.search = search;
        }
        if let Some(region) = patch.region {
            state.region = region;
        }

        let (pipeline, first) = FilterPipeline::new(state.clone(), MatchMode::default());

        let session = Self {
            catalog: StoredValue::new(catalog),
            pipeline: StoredValue::new(pipeline),
            sync: StoredValue::new(sync),
            timer: StoredValue::new(None),
            write_query,
            search: RwSignal::new(state.search),
            region: RwSignal::new(state.region),
            countries: RwSignal::new(DerivedList::Loading),
        };
        session.run_fetch(first);
        session
    }

    pub fn set_search(&self, search: String) {
        if self.search.get_untracked() == search {
            return;
        }
        self.search.set(search.clone());
        if self
            .pipeline
            .try_update_value(|p| p.set_search(search))
            .is_none()
        {
            return;
        }
        self.publish();
        self.schedule_write();
    }

    pub fn set_region(&self, region: Region) {
        if self.region.get_untracked() == region {
            return;
        }
        self.region.set(region.clone());
        let Some(req) = self.pipeline.try_update_value(|p| p.set_region(region)) else {
            return;
        };
        if let Some(req) = req {
            self.countries.set(DerivedList::Loading);
            self.run_fetch(req);
        }
        self.schedule_write();
    }

    pub fn clear_search(&self) {
        self.set_search(String::new());
    }

    pub fn clear_region(&self) {
        self.set_region(Region::Any);
    }

    /// Called whenever the router reports a (possibly unchanged) query.
    pub fn observe_query(&self, query: FilterQuery) {
        let Some(current) = self.pipeline.try_with_value(|p| p.state().clone()) else {
            return;
        };
        let Some(patch) = self.sync.try_update_value(|s| s.observe(query, &current)) else {
            return;
        };
        if let Some(region) = patch.region {
            self.set_region(region);
        }
        if let Some(search) = patch.search {
            self.set_search(search);
        }
    }

    fn run_fetch(&self, req: FetchRequest) {
        let Some(catalog) = self.catalog.try_get_value() else {
            return;
        };
        let this = *self;
        spawn_local(async move {
            let result = catalog.fetch_base_list(&req.region).await;
            let outcome = this
                .pipeline
                .try_update_value(|p| p.complete_fetch(req.request_id, result));
            if outcome == Some(FetchOutcome::Applied) {
                this.publish();
            }
        });
    }

    fn publish(&self) {
        if let Some(derived) = self.pipeline.try_with_value(|p| p.derived().clone()) {
            let _ = self.countries.try_set(derived);
        }
    }

    fn schedule_write(&self) {
        let Some(state) = self.pipeline.try_with_value(|p| p.state().clone()) else {
            return;
        };
        let step = self.sync.try_update_value(|s| s.on_state_change(&state));
        if let Some(ThrottleStep::ArmTimer(ms)) = step {
            self.arm_timer(ms);
        }
    }

    fn arm_timer(&self, ms: u32) {
        let this = *self;
        match set_timeout_with_handle(
            move || this.on_timer(),
            Duration::from_millis(u64::from(ms)),
        ) {
            Ok(handle) => {
                let _ = self.timer.try_set_value(Some(handle));
            }
            Err(e) => {
                tracing::warn!(error = ?e, "failed to arm query write-back timer");
                let _ = self.sync.try_update_value(|s| s.on_timer_failed());
            }
        }
    }

    fn on_timer(&self) {
        let _ = self.timer.try_set_value(None);
        let Some(step) = self.sync.try_update_value(|s| s.on_timer()) else {
            return;
        };
        if let Some(query) = step.write {
            self.write_query.run(query);
        }
        if let Some(ms) = step.rearm {
            self.arm_timer(ms);
        }
    }

    /// Drops late fetch results, clears the pending timer and stops write-backs.
    pub fn teardown(&self) {
        let _ = self.pipeline.try_update_value(|p| p.teardown());
        let _ = self.sync.try_update_value(|s| s.teardown());
        if let Some(Some(handle)) = self.timer.try_update_value(|t| t.take()) {
            handle.clear();
        }
    }
}
