use crate::models::CountryRecord;
use crate::util::{detail_href, group_thousands};
use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {CountryCardBody, div, "flex flex-col gap-1 px-5 pt-4 pb-6"}
    clx! {CountryCardTitle, h2, "mb-2 truncate text-base font-bold leading-tight"}
}

pub use components::*;

#[component]
fn CountryFact(label: &'static str, #[prop(into)] value: String) -> impl IntoView {
    view! {
        <p class="text-sm">
            <span class="font-semibold">{label}": "</span>
            <span class="text-muted-foreground">{value}</span>
        </p>
    }
}

#[component]
pub fn CountryCard(country: CountryRecord) -> impl IntoView {
    let href = detail_href(&country.name.common);
    let capital = country.capital.join(", ");

    view! {
        <a
            href=href
            data-name="CountryCard"
            class="flex flex-col overflow-hidden rounded-md bg-card text-card-foreground shadow-sm transition-shadow hover:shadow-md"
        >
            <img
                src=country.flags.svg
                alt=country.flags.alt
                loading="lazy"
                class="aspect-[5/3] w-full object-cover"
            />
            <CountryCardBody>
                <CountryCardTitle>{country.name.common}</CountryCardTitle>
                <CountryFact label="Population" value=group_thousands(country.population) />
                <CountryFact label="Region" value=country.region />
                <CountryFact label="Capital" value=capital />
            </CountryCardBody>
        </a>
    }
}
