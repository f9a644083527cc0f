pub(crate) mod filter_session;

use crate::api::CatalogClient;
use crate::config::AppConfig;
use crate::error::CatalogError;
use crate::models::RegionOption;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub(crate) use filter_session::FilterSession;

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: AppConfig,
    pub catalog: CatalogClient,

    /// Region options for the selector. `None` while loading.
    pub regions: RwSignal<Option<Result<Vec<RegionOption>, CatalogError>>>,

    /// Flips to true once the code -> name table is usable (border links).
    pub code_table_ready: RwSignal<bool>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let catalog = CatalogClient::new(config.api_url.clone());
        Self {
            config,
            catalog,
            regions: RwSignal::new(None),
            code_table_ready: RwSignal::new(false),
        }
    }

    /// Kicks off the app-lifetime loads: the code table and the region list.
    pub fn start_background_loads(&self) {
        let catalog = self.catalog.clone();
        let ready = self.code_table_ready;
        spawn_local(async move {
            if catalog.load_code_table().await.is_ok() {
                ready.set(true);
            }
        });

        let catalog = self.catalog.clone();
        let regions = self.regions;
        spawn_local(async move {
            let result = catalog.fetch_all_regions().await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "region list failed to load");
            }
            regions.set(Some(result));
        });
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
