use crate::util::group_thousands;
use serde::{Deserialize, Serialize};

/// A key-unique mapping that keeps the order in which the API enumerated its keys.
///
/// restcountries returns `nativeName` and `currencies` as plain JSON objects; we keep
/// them as ordered pairs so the detail view can rely on "last entry" semantics.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts or replaces. A replaced key keeps its original position.
    pub fn insert(&mut self, key: String, value: V) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn last(&self) -> Option<(&str, &V)> {
        self.entries.last().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct LocalizedName {
    pub official: String,
    pub common: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Currency {
    pub name: String,
    pub symbol: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct CountryName {
    pub common: String,
    pub official: String,
    /// language code -> localized name pair
    pub native_name: OrderedMap<LocalizedName>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Flags {
    pub png: String,
    pub svg: String,
    pub alt: String,
}

/// Canonical in-memory country, produced by [`crate::normalize::normalize`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct CountryRecord {
    /// ISO 3166-1 alpha-3 code (`cca3`).
    pub code: String,
    pub name: CountryName,
    pub tld: Vec<String>,
    /// currency code -> currency
    pub currencies: OrderedMap<Currency>,
    pub region: String,
    pub subregion: String,
    /// Spoken languages in the API's declaration order.
    pub languages: Vec<String>,
    pub capital: Vec<String>,
    pub latlng: Option<(f64, f64)>,
    pub landlocked: bool,
    /// Square kilometers.
    pub area: f64,
    pub maps: Vec<String>,
    pub population: u64,
    pub timezones: Vec<String>,
    pub flags: Flags,
    pub start_of_week: String,
    /// Codes of bordering countries.
    pub borders: Vec<String>,
}

impl CountryRecord {
    /// Label/value rows of the detail view, in display order.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        const SEP: &str = ", ";

        let native = self
            .name
            .native_name
            .last()
            .map(|(_, n)| n.common.clone())
            .unwrap_or_default();
        let currencies = self
            .currencies
            .values()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(SEP);

        vec![
            ("Official Name", self.name.official.clone()),
            ("Native Name", native),
            ("Population", group_thousands(self.population)),
            ("Region", self.region.clone()),
            ("Sub Region", self.subregion.clone()),
            ("Capital", self.capital.join(SEP)),
            ("Top Level Domain", self.tld.join(SEP)),
            ("Currencies", currencies),
            ("Languages", self.languages.join(SEP)),
        ]
    }
}

/// Region key as used for filtering: trimmed and lower-cased.
///
/// The catalog spells regions `"Europe"`, the URL carries `"europe"`; both map to the
/// same key so a read-back from the address bar never looks like a new selection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionName(String);

impl RegionName {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Region selector of the catalog view. `Any` means "no region filter".
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    Any,
    Named(RegionName),
}

impl Region {
    pub fn parse(raw: &str) -> Self {
        RegionName::parse(raw).map(Region::Named).unwrap_or_default()
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Region::Any)
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Region::Any => None,
            Region::Named(name) => Some(name.as_str()),
        }
    }
}

/// A region as offered by the selector: normalized key plus the API's spelling.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegionOption {
    pub key: RegionName,
    pub label: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct FilterState {
    pub region: Region,
    pub search: String,
}

impl FilterState {
    /// Search text as persisted and compared: trimmed, lower-cased.
    pub fn normalized_search(&self) -> String {
        normalize_search(&self.search)
    }
}

pub fn normalize_search(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_map_replace_keeps_position() {
        let mut m = OrderedMap::new();
        m.insert("b".to_string(), 1);
        m.insert("a".to_string(), 2);
        m.insert("b".to_string(), 3);
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(m.get("b"), Some(&3));
        assert_eq!(m.last(), Some(("a", &2)));
    }

    #[test]
    fn test_region_parse_normalizes_and_blank_is_any() {
        assert_eq!(Region::parse("  Europe "), Region::Named(RegionName("europe".into())));
        assert_eq!(Region::parse("   "), Region::Any);
        assert_eq!(Region::parse(""), Region::Any);
        assert!(Region::default().is_any());
    }

    #[test]
    fn test_properties_order_and_joins() {
        let mut native_name = OrderedMap::new();
        native_name.insert(
            "deu".to_string(),
            LocalizedName {
                official: "Republik Österreich".to_string(),
                common: "Österreich".to_string(),
            },
        );
        native_name.insert(
            "bar".to_string(),
            LocalizedName {
                official: "Republik Österreich".to_string(),
                common: "Östareich".to_string(),
            },
        );
        let mut currencies = OrderedMap::new();
        currencies.insert(
            "EUR".to_string(),
            Currency {
                name: "Euro".to_string(),
                symbol: "€".to_string(),
            },
        );

        let rec = CountryRecord {
            code: "AUT".to_string(),
            name: CountryName {
                common: "Austria".to_string(),
                official: "Republic of Austria".to_string(),
                native_name,
            },
            tld: vec![".at".to_string()],
            currencies,
            region: "Europe".to_string(),
            subregion: "Central Europe".to_string(),
            languages: vec!["Austro-Bavarian German".to_string(), "German".to_string()],
            capital: vec!["Vienna".to_string()],
            population: 8_917_205,
            ..Default::default()
        };

        let props = rec.properties();
        let labels: Vec<&str> = props.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec![
                "Official Name",
                "Native Name",
                "Population",
                "Region",
                "Sub Region",
                "Capital",
                "Top Level Domain",
                "Currencies",
                "Languages"
            ]
        );
        assert_eq!(props[1].1, "Östareich");
        assert_eq!(props[2].1, "8,917,205");
        assert_eq!(props[7].1, "Euro");
        assert_eq!(props[8].1, "Austro-Bavarian German, German");
    }

    #[test]
    fn test_properties_of_sparse_record() {
        let rec = CountryRecord {
            name: CountryName {
                common: "Antarctica".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let props = rec.properties();
        assert_eq!(props[1].1, "");
        assert_eq!(props[5].1, "");
    }

    #[test]
    fn test_normalized_search() {
        let s = FilterState {
            region: Region::Any,
            search: "  FRA ".to_string(),
        };
        assert_eq!(s.normalized_search(), "fra");
    }
}
