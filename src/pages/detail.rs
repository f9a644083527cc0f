use crate::api::CodeLookup;
use crate::components::{Alert, AlertDescription, AlertTitle, Spinner};
use crate::error::CatalogError;
use crate::models::CountryRecord;
use crate::state::AppContext;
use crate::util::detail_href;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params};
use leptos_router::params::Params;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct DetailRouteParams {
    pub country_name: Option<String>,
}

#[component]
pub fn CountryDetailPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params::<DetailRouteParams>();
    let navigate = StoredValue::new(use_navigate());

    let country_name = move || {
        params
            .get()
            .ok()
            .and_then(|p| p.country_name)
            .unwrap_or_default()
    };

    let country: RwSignal<Option<Result<CountryRecord, CatalogError>>> = RwSignal::new(None);
    // Ignore stale responses when the name changes faster than the API answers.
    let request_id: RwSignal<u64> = RwSignal::new(0);

    let catalog = app_state.0.catalog.clone();
    Effect::new(move |_| {
        let name = country_name();
        if name.trim().is_empty() {
            tracing::error!("empty country name, redirecting to /");
            navigate.with_value(|nav| nav("/", Default::default()));
            return;
        }

        let req_id = request_id.get_untracked().saturating_add(1);
        request_id.set(req_id);
        country.set(None);

        let catalog = catalog.clone();
        spawn_local(async move {
            let result = catalog.fetch_country_by_exact_name(&name).await;
            if request_id.try_get_untracked() != Some(req_id) {
                return;
            }
            if let Err(e) = &result {
                tracing::warn!(name = %name, error = %e, "country lookup failed");
            }
            let _ = country.try_set(Some(result));
        });
    });

    let go_home = move |_| navigate.with_value(|nav| nav("/", Default::default()));

    view! {
        <div class="mx-auto flex w-full max-w-7xl flex-col gap-10 px-4 py-8 md:px-8">
            <button
                type="button"
                class="w-fit rounded-md bg-card px-6 py-2 text-sm shadow-sm hover:shadow-md"
                on:click=go_home
            >
                "Back"
            </button>

            {move || match country.get() {
                None => view! {
                    <div class="flex justify-center py-16">
                        <Spinner />
                    </div>
                }
                .into_any(),
                Some(Err(e)) => view! {
                    <Alert>
                        <AlertTitle>"Country not available"</AlertTitle>
                        <AlertDescription>{e.to_string()}</AlertDescription>
                    </Alert>
                }
                .into_any(),
                Some(Ok(c)) => view! { <CountryDetail country=c /> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn CountryDetail(country: CountryRecord) -> impl IntoView {
    let properties = country.properties();

    view! {
        <div class="grid grid-cols-1 items-center gap-12 lg:grid-cols-2">
            <img
                src=country.flags.svg
                alt=country.flags.alt
                class="w-full max-w-xl shadow-sm"
            />
            <div class="flex flex-col gap-6">
                <h1 class="text-2xl font-bold">{country.name.common}</h1>
                <dl class="grid grid-cols-1 gap-x-8 gap-y-2 text-sm md:grid-cols-2">
                    {properties
                        .into_iter()
                        .map(|(label, value)| {
                            view! {
                                <div class="flex gap-1">
                                    <dt class="font-semibold">{label}":"</dt>
                                    <dd class="text-muted-foreground">{value}</dd>
                                </div>
                            }
                        })
                        .collect_view()}
                </dl>
                <BorderCountries borders=country.borders />
            </div>
        </div>
    }
}

#[component]
fn BorderCountries(borders: Vec<String>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let catalog = StoredValue::new(app_state.0.catalog.clone());
    let code_table_ready = app_state.0.code_table_ready;
    let navigate = StoredValue::new(use_navigate());

    let open_border = move |code: String| {
        let name = match catalog.with_value(|c| c.resolve_code_to_name(&code)) {
            Ok(name) => name,
            Err(e) => {
                tracing::error!(error = %e, "bad border code");
                return;
            }
        };
        if name.is_empty() {
            tracing::warn!(code = %code, "border country not resolvable yet");
            return;
        }
        navigate.with_value(|nav| nav(&detail_href(&name), Default::default()));
    };

    if borders.is_empty() {
        return ().into_any();
    }

    view! {
        <div class="flex flex-wrap items-center gap-2 text-sm">
            <span class="font-semibold">"Border Countries:"</span>
            {borders
                .into_iter()
                .map(|code| {
                    let code_for_click = code.clone();
                    let label = move || {
                        // Re-render once the table arrives.
                        code_table_ready.track();
                        match catalog.with_value(|c| c.lookup_code(&code)) {
                            Ok(CodeLookup::Resolved(name)) => name,
                            _ => code.clone(),
                        }
                    };
                    view! {
                        <button
                            type="button"
                            class="rounded-sm bg-card px-4 py-1 shadow-sm hover:shadow-md"
                            on:click=move |_| open_border(code_for_click.clone())
                        >
                            {label}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
    .into_any()
}
