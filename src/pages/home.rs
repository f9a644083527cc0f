use crate::components::{Alert, AlertDescription, AlertTitle, CountryCard, FilterBar, Spinner};
use crate::pipeline::DerivedList;
use crate::state::{AppContext, FilterSession};
use crate::sync::FilterQuery;
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate, use_query_map};
use leptos_router::params::ParamsMap;

fn filter_query(params: &ParamsMap) -> FilterQuery {
    FilterQuery::from_lookup(|key| params.get(key))
}

#[component]
pub fn HomePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let query = use_query_map();
    let location = use_location();
    let navigate = StoredValue::new(use_navigate());

    // Write-backs replace the history entry so Back leaves the catalog instead of
    // stepping through every keystroke.
    let write_query = Callback::new(move |q: FilterQuery| {
        let path = location.pathname.get_untracked();
        let hash = location.hash.get_untracked();
        let url = format!("{path}{}{hash}", q.to_query_string());
        navigate.with_value(|nav| {
            nav(
                &url,
                leptos_router::NavigateOptions {
                    replace: true,
                    scroll: false,
                    ..Default::default()
                },
            );
        });
    });

    let session = FilterSession::start(
        app_state.0.catalog.clone(),
        app_state.0.config.query_write_interval_ms,
        query.with_untracked(filter_query),
        write_query,
    );

    // Startup read happened in `start`; this picks up back/forward navigation. Our
    // own write-backs come through here too and are recognized as echoes.
    Effect::new(move |_| {
        let q = query.with(filter_query);
        session.observe_query(q);
    });

    on_cleanup(move || session.teardown());

    let countries = session.countries;

    view! {
        <div class="mx-auto flex w-full max-w-7xl flex-col gap-8 px-4 py-8 md:px-8">
            <FilterBar session=session />

            {move || match countries.get() {
                DerivedList::Loading => view! {
                    <div class="flex justify-center py-16">
                        <Spinner />
                    </div>
                }
                .into_any(),
                DerivedList::Failed(e) => view! {
                    <Alert>
                        <AlertTitle>"Could not load countries"</AlertTitle>
                        <AlertDescription>{e.to_string()}</AlertDescription>
                    </Alert>
                }
                .into_any(),
                DerivedList::Ready(list) if list.is_empty() => view! {
                    <div class="py-16 text-center text-sm text-muted-foreground">
                        "No countries match your filters."
                    </div>
                }
                .into_any(),
                DerivedList::Ready(list) => view! {
                    <div class="grid grid-cols-1 gap-10 sm:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4">
                        {list
                            .into_iter()
                            .map(|country| view! { <CountryCard country=country /> })
                            .collect_view()}
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}
