use crate::config::AppConfig;
use crate::pages::{CountryDetailPage, HomePage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new(AppConfig::from_window());
    state.start_background_loads();
    provide_context(AppContext(state));

    view! {
        <Router>
            <header class="bg-card shadow-sm">
                <div class="mx-auto flex max-w-7xl items-center justify-between px-4 py-6 md:px-8">
                    <a href="/" class="text-lg font-extrabold">"Where in the world?"</a>
                </div>
            </header>
            <main class="min-h-screen bg-background text-foreground">
                <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                    <Route path=path!("detail/:country_name") view=CountryDetailPage />
                    <Route path=path!("") view=HomePage />
                </Routes>
            </main>
        </Router>
    }
}
