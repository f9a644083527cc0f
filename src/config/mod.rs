use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_API_URL: &str = "https://restcountries.com/v3.1";
pub(crate) const DEFAULT_QUERY_WRITE_INTERVAL_MS: u32 = 1000;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
}

impl LogLevel {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "error" => Some(Self::Warn),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    /// Minimum spacing of filter write-backs into the address bar.
    pub query_write_interval_ms: u32,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            query_write_interval_ms: DEFAULT_QUERY_WRITE_INTERVAL_MS,
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    /// Reads `window.ENV`.
    ///
    /// Both `window.ENV.API_URL` and `window.ENV.api_url` are accepted; the upper-case
    /// spelling wins when both are present. Same for the other keys.
    pub fn from_window() -> Self {
        let env = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        let Some(env) = env else {
            return Self::default();
        };

        Self::from_lookup(|key| {
            js_sys::Reflect::get(&env, &key.into())
                .ok()
                .and_then(|v| v.as_string().or_else(|| v.as_f64().map(|n| n.to_string())))
        })
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |upper: &str| {
            lookup(upper)
                .or_else(|| lookup(&upper.to_ascii_lowercase()))
                .filter(|v| !v.trim().is_empty())
        };

        let mut cfg = Self::default();

        if let Some(url) = get("API_URL") {
            cfg.api_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(ms) = get("QUERY_WRITE_INTERVAL_MS").and_then(|v| parse_interval(&v)) {
            cfg.query_write_interval_ms = ms;
        }

        if let Some(level) = get("LOG_LEVEL").and_then(|v| LogLevel::parse(&v)) {
            cfg.log_level = level;
        }

        cfg
    }
}

fn parse_interval(v: &str) -> Option<u32> {
    // JS numbers arrive as "1000" or "1000.5".
    let n: f64 = v.trim().parse().ok()?;
    if n.is_finite() && n >= 0.0 && n <= u32::MAX as f64 {
        Some(n.round() as u32)
    } else {
        None
    }
}
