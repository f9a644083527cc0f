use crate::components::{Alert, AlertDescription};
use crate::error::CatalogError;
use crate::models::{Region, RegionOption};
use crate::state::{AppContext, FilterSession};
use icons::X;
use leptos::prelude::*;
use strum::{AsRefStr, Display};
use tw_merge::tw_merge;

/// State of a field's clear button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ClearState {
    Active,
    Inactive,
}

impl ClearState {
    pub fn of(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

#[component]
fn ClearButton(
    #[prop(into)] state: Signal<ClearState>,
    on_clear: Callback<()>,
    label: &'static str,
) -> impl IntoView {
    let class = tw_merge!(
        "absolute right-2 top-1/2 -translate-y-1/2 rounded-sm p-1 text-muted-foreground transition-opacity hover:text-foreground",
        "data-[state=inactive]:pointer-events-none data-[state=inactive]:opacity-0"
    );

    view! {
        <button
            type="button"
            class=class
            aria-label=label
            data-state=move || state.get().to_string()
            disabled=move || state.get() == ClearState::Inactive
            on:click=move |_| on_clear.run(())
        >
            <X class="size-4" />
        </button>
    }
}

/// Message to show when the region list could not be loaded.
fn region_load_error(regions: &Option<Result<Vec<RegionOption>, CatalogError>>) -> Option<String> {
    match regions {
        Some(Err(e)) => Some(format!("Regions are unavailable: {e}")),
        _ => None,
    }
}

#[component]
pub fn FilterBar(session: FilterSession) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let regions = app_state.0.regions;

    let region_options = move || -> Vec<RegionOption> {
        match regions.get() {
            Some(Ok(list)) => list,
            _ => Vec::new(),
        }
    };

    let load_error = move || regions.with(region_load_error);

    let field_class = "h-12 w-full rounded-md border border-input bg-card px-4 pr-10 text-sm shadow-xs outline-none focus-visible:ring-2 focus-visible:ring-ring/50";

    view! {
        <div class="flex flex-col justify-between gap-4 md:flex-row md:items-center">
            <div class="relative w-full md:max-w-md">
                <input
                    type="search"
                    data-name="SearchInput"
                    class=field_class
                    placeholder="Search for a country..."
                    prop:value=move || session.search.get()
                    on:input=move |ev| session.set_search(event_target_value(&ev))
                />
                <ClearButton
                    state=Signal::derive(move || ClearState::of(!session.search.get().is_empty()))
                    on_clear=Callback::new(move |_| session.clear_search())
                    label="Clear search"
                />
            </div>

            <div class="relative w-full md:w-56">
                <select
                    data-name="RegionSelect"
                    class=field_class
                    disabled=move || load_error().is_some()
                    on:change=move |ev| session.set_region(Region::parse(&event_target_value(&ev)))
                >
                    <option value="" prop:selected=move || session.region.get().is_any()>
                        "Filter by Region"
                    </option>
                    {move || {
                        region_options()
                            .into_iter()
                            .map(|opt| {
                                let key = opt.key.as_str().to_string();
                                let key_for_selected = key.clone();
                                view! {
                                    <option
                                        value=key
                                        prop:selected=move || {
                                            session.region.get().key() == Some(key_for_selected.as_str())
                                        }
                                    >
                                        {opt.label}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
                <ClearButton
                    state=Signal::derive(move || ClearState::of(!session.region.get().is_any()))
                    on_clear=Callback::new(move |_| session.clear_region())
                    label="Clear region"
                />
                {move || {
                    load_error()
                        .map(|msg| {
                            view! {
                                <Alert class="mt-2">
                                    <AlertDescription>{msg}</AlertDescription>
                                </Alert>
                            }
                        })
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_state() {
        assert_eq!(ClearState::of(true), ClearState::Active);
        assert_eq!(ClearState::of(false).to_string(), "inactive");
        assert_eq!(ClearState::Active.as_ref(), "active");
    }

    #[test]
    fn test_region_load_error_only_for_failures() {
        assert_eq!(region_load_error(&None), None);
        assert_eq!(region_load_error(&Some(Ok(Vec::new()))), None);

        let failed = Some(Err(CatalogError::Transport {
            kind: crate::error::TransportKind::Network,
            message: "offline".to_string(),
        }));
        let msg = region_load_error(&failed).expect("failure is shown");
        assert!(msg.contains("offline"));
    }
}
