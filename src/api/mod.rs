use crate::error::{CatalogError, CatalogResult, TransportKind};
use crate::models::{CountryRecord, Region, RegionName, RegionOption};
use crate::normalize::{normalize, RawCountryRecord};
use crate::util::locale_compare;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Field allow-list sent with every full-record request.
pub(crate) const COUNTRY_FIELDS: &[&str] = &[
    "cca3",
    "name",
    "tld",
    "currencies",
    "region",
    "subregion",
    "languages",
    "capital",
    "latlng",
    "landlocked",
    "area",
    "maps",
    "population",
    "timezones",
    "flags",
    "startOfWeek",
    "borders",
];

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct RegionOnly {
    #[serde(default)]
    pub region: String,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct CodeAndName {
    pub cca3: String,
    pub name: CommonNameOnly,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct CommonNameOnly {
    pub common: String,
}

/// Load state of the code -> common name table used for border navigation.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum CodeTable {
    #[default]
    NotLoaded,
    Loading,
    Loaded(HashMap<String, String>),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeLookup {
    Resolved(String),
    /// Table is loaded but has no entry for the code.
    Unknown,
    /// Table is still loading, or its load failed.
    NotLoaded,
}

/// Read-only client of the restcountries catalog.
///
/// Cloning is cheap; clones share the code table.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    pub(crate) base_url: String,
    codes: Arc<RwLock<CodeTable>>,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            codes: Arc::new(RwLock::new(CodeTable::NotLoaded)),
        }
    }

    pub(crate) fn url(&self, path: &str, fields: &[&str]) -> String {
        format!("{}{}?fields={}", self.base_url, path, fields.join(","))
    }

    pub(crate) fn region_path(region: &RegionName) -> String {
        format!("/region/{}", urlencoding::encode(region.as_str()))
    }

    pub(crate) fn name_path(name: &str) -> String {
        format!("/name/{}", urlencoding::encode(name))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> CatalogResult<T> {
        tracing::debug!(%url, "catalog request");

        let client = reqwest::Client::new();
        let res = client.get(&url).send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "catalog request failed");
            CatalogError::network(e)
        })?;

        let status = res.status();
        let body = res.text().await.map_err(CatalogError::network)?;
        if let Err(e) = Self::check_status(status, &body) {
            tracing::warn!(%url, %status, "catalog returned an error status");
            return Err(e);
        }
        serde_json::from_str(&body).map_err(CatalogError::decode)
    }

    /// Any non-2xx status is a transport failure carrying the status and body.
    pub(crate) fn check_status(status: reqwest::StatusCode, body: &str) -> CatalogResult<()> {
        if status.is_success() {
            Ok(())
        } else {
            Err(CatalogError::http(status, body))
        }
    }

    /// restcountries answers an unknown name with 404; that is a miss, not a failure.
    pub(crate) fn name_lookup_rows(
        name: &str,
        result: CatalogResult<Vec<RawCountryRecord>>,
    ) -> CatalogResult<Vec<RawCountryRecord>> {
        match result {
            Err(CatalogError::Transport {
                kind: TransportKind::Http { status: 404 },
                ..
            }) => Err(CatalogError::NotFound {
                name: name.to_string(),
            }),
            other => other,
        }
    }

    pub async fn fetch_all_regions(&self) -> CatalogResult<Vec<RegionOption>> {
        let rows: Vec<RegionOnly> = self.get_json(self.url("/all", &["region"])).await?;
        Ok(Self::parse_region_response(rows))
    }

    pub async fn fetch_all_countries(&self) -> CatalogResult<Vec<CountryRecord>> {
        let rows: Vec<RawCountryRecord> = self.get_json(self.url("/all", COUNTRY_FIELDS)).await?;
        Self::parse_country_list_response(rows)
    }

    /// A blank region falls back to the full catalog.
    pub async fn fetch_countries_by_region(&self, region: &str) -> CatalogResult<Vec<CountryRecord>> {
        match Region::parse(region) {
            Region::Any => self.fetch_all_countries().await,
            Region::Named(name) => {
                let rows: Vec<RawCountryRecord> = self
                    .get_json(self.url(&Self::region_path(&name), COUNTRY_FIELDS))
                    .await?;
                Self::parse_country_list_response(rows)
            }
        }
    }

    /// Base list for a region selector.
    pub async fn fetch_base_list(&self, region: &Region) -> CatalogResult<Vec<CountryRecord>> {
        match region {
            Region::Any => self.fetch_all_countries().await,
            Region::Named(name) => self.fetch_countries_by_region(name.as_str()).await,
        }
    }

    pub async fn fetch_country_by_exact_name(&self, name: &str) -> CatalogResult<CountryRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::NotFound {
                name: String::new(),
            });
        }

        let result = self
            .get_json(self.url(&Self::name_path(name), COUNTRY_FIELDS))
            .await;
        let rows = Self::name_lookup_rows(name, result)?;

        Self::pick_exact_match(name, rows)
    }

    pub(crate) fn parse_region_response(rows: Vec<RegionOnly>) -> Vec<RegionOption> {
        let mut by_key: BTreeMap<RegionName, String> = BTreeMap::new();
        for row in rows {
            if let Some(key) = RegionName::parse(&row.region) {
                by_key
                    .entry(key)
                    .or_insert_with(|| row.region.trim().to_string());
            }
        }

        let mut out: Vec<RegionOption> = by_key
            .into_iter()
            .map(|(key, label)| RegionOption { key, label })
            .collect();
        out.sort_by(|a, b| a.label.cmp(&b.label));
        out
    }

    pub(crate) fn parse_country_list_response(
        rows: Vec<RawCountryRecord>,
    ) -> CatalogResult<Vec<CountryRecord>> {
        let mut out = rows
            .into_iter()
            .map(normalize)
            .collect::<CatalogResult<Vec<_>>>()?;

        let mut seen = HashSet::with_capacity(out.len());
        for c in &out {
            if !seen.insert(c.name.common.as_str()) {
                return Err(CatalogError::malformed(format!(
                    "duplicate common name {:?} ({})",
                    c.name.common, c.code
                )));
            }
        }

        out.sort_by(|a, b| locale_compare(&a.name.common, &b.name.common));
        Ok(out)
    }

    /// Prefers a record whose common name equals `name` (case-insensitive) over the
    /// API's first partial match.
    pub(crate) fn pick_exact_match(
        name: &str,
        rows: Vec<RawCountryRecord>,
    ) -> CatalogResult<CountryRecord> {
        let wanted = name.trim().to_lowercase();
        let exact = rows.iter().position(|r| {
            r.name
                .as_ref()
                .and_then(|n| n.common.as_deref())
                .is_some_and(|c| c.trim().to_lowercase() == wanted)
        });

        let raw = match exact {
            Some(i) => rows.into_iter().nth(i),
            None => rows.into_iter().next(),
        };

        match raw {
            Some(raw) => normalize(raw),
            None => Err(CatalogError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Populates the code -> name table. The app spawns this right after constructing
    /// the client; callers that need a name before it finishes get `CodeLookup::NotLoaded`.
    pub async fn load_code_table(&self) -> CatalogResult<usize> {
        self.set_code_table(CodeTable::Loading);

        match self
            .get_json::<Vec<CodeAndName>>(self.url("/all", &["cca3", "name"]))
            .await
        {
            Ok(rows) => {
                let table: HashMap<String, String> = rows
                    .into_iter()
                    .map(|r| (r.cca3.trim().to_uppercase(), r.name.common))
                    .collect();
                let n = table.len();
                tracing::debug!(entries = n, "country code table loaded");
                self.set_code_table(CodeTable::Loaded(table));
                Ok(n)
            }
            Err(e) => {
                tracing::warn!(error = %e, "country code table failed to load");
                self.set_code_table(CodeTable::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    pub(crate) fn set_code_table(&self, table: CodeTable) {
        if let Ok(mut guard) = self.codes.write() {
            *guard = table;
        }
    }

    #[cfg(test)]
    pub fn code_table(&self) -> CodeTable {
        self.codes
            .read()
            .map(|t| t.clone())
            .unwrap_or(CodeTable::NotLoaded)
    }

    pub fn lookup_code(&self, code: &str) -> CatalogResult<CodeLookup> {
        let code = code.trim().to_uppercase();
        if code.chars().count() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CatalogError::InvalidCodeFormat { code });
        }

        let Ok(guard) = self.codes.read() else {
            return Ok(CodeLookup::NotLoaded);
        };

        Ok(match &*guard {
            CodeTable::Loaded(table) => match table.get(&code) {
                Some(name) => CodeLookup::Resolved(name.clone()),
                None => CodeLookup::Unknown,
            },
            _ => CodeLookup::NotLoaded,
        })
    }

    /// Common name for `code`, or an empty string when the table cannot answer yet
    /// or has no such entry.
    pub fn resolve_code_to_name(&self, code: &str) -> CatalogResult<String> {
        match self.lookup_code(code)? {
            CodeLookup::Resolved(name) => Ok(name),
            CodeLookup::Unknown => {
                tracing::warn!(code, "unknown country code");
                Ok(String::new())
            }
            CodeLookup::NotLoaded => Ok(String::new()),
        }
    }
}
