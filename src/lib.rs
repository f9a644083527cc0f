mod api;
mod app;
mod components;
mod config;
mod error;
mod logging;
mod models;
mod normalize;
mod pages;
mod pipeline;
mod state;
mod sync;
mod util;

use crate::app::App;
use crate::config::AppConfig;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::config::{DEFAULT_API_URL, DEFAULT_QUERY_WRITE_INTERVAL_MS};
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn set_env(env: &JsValue) {
        let window = web_sys::window().expect("window");
        js_sys::Reflect::set(&window, &"ENV".into(), env).expect("set window.ENV");
    }

    #[wasm_bindgen_test]
    fn test_config_defaults_without_env() {
        set_env(&JsValue::UNDEFINED);
        let cfg = AppConfig::from_window();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.query_write_interval_ms, DEFAULT_QUERY_WRITE_INTERVAL_MS);
    }

    #[wasm_bindgen_test]
    fn test_config_reads_window_env() {
        let env = js_sys::Object::new();
        js_sys::Reflect::set(&env, &"API_URL".into(), &"http://localhost:8080/v3.1/".into())
            .expect("set API_URL");
        js_sys::Reflect::set(&env, &"query_write_interval_ms".into(), &"250".into())
            .expect("set interval");
        set_env(&env);

        let cfg = AppConfig::from_window();
        assert_eq!(cfg.api_url, "http://localhost:8080/v3.1");
        assert_eq!(cfg.query_write_interval_ms, 250);

        set_env(&JsValue::UNDEFINED);
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init(AppConfig::from_window().log_level);
    mount_to_body(App);
}
