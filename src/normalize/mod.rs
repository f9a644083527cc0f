//! Wire-format country records and their normalization.
//!
//! restcountries encodes `name.nativeName`, `currencies` and `languages` as plain JSON
//! objects keyed by language/currency code. `serde_json` is built with `preserve_order`,
//! so `Map` iteration below follows the response's key order.

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CountryName, CountryRecord, Currency, Flags, LocalizedName, OrderedMap};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub(crate) struct RawName {
    pub common: Option<String>,
    pub official: String,
    #[serde(rename = "nativeName")]
    pub native_name: Map<String, Value>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub(crate) struct RawFlags {
    pub png: String,
    pub svg: String,
    pub alt: String,
}

/// A country as returned by the catalog API, before normalization.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub(crate) struct RawCountryRecord {
    pub cca3: String,
    pub name: Option<RawName>,
    pub tld: Vec<String>,
    pub currencies: Map<String, Value>,
    pub region: String,
    pub subregion: String,
    pub languages: Map<String, Value>,
    pub capital: Vec<String>,
    pub latlng: Vec<f64>,
    pub landlocked: bool,
    pub area: f64,
    pub maps: Map<String, Value>,
    pub population: u64,
    pub timezones: Vec<String>,
    pub flags: RawFlags,
    #[serde(rename = "startOfWeek")]
    pub start_of_week: String,
    pub borders: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawLocalizedName {
    official: String,
    common: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawCurrency {
    name: String,
    symbol: String,
}

fn decode_object_map<W, V>(
    field: &str,
    object: Map<String, Value>,
    convert: impl Fn(W) -> V,
) -> CatalogResult<OrderedMap<V>>
where
    W: for<'de> Deserialize<'de>,
{
    let mut out = OrderedMap::new();
    for (key, value) in object {
        let wire: W = serde_json::from_value(value)
            .map_err(|e| CatalogError::malformed(format!("{field}.{key}: {e}")))?;
        out.insert(key, convert(wire));
    }
    Ok(out)
}

/// Converts a decoded API record into a [`CountryRecord`].
///
/// Only `name.common` is required; every other missing field becomes an empty value.
pub(crate) fn normalize(raw: RawCountryRecord) -> CatalogResult<CountryRecord> {
    let name = raw
        .name
        .ok_or_else(|| CatalogError::malformed(format!("{}: missing name", raw.cca3)))?;
    let common = name
        .common
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| CatalogError::malformed(format!("{}: empty name.common", raw.cca3)))?;

    let native_name = decode_object_map("name.nativeName", name.native_name, |n: RawLocalizedName| {
        LocalizedName {
            official: n.official,
            common: n.common,
        }
    })?;

    let currencies = decode_object_map("currencies", raw.currencies, |c: RawCurrency| Currency {
        name: c.name,
        symbol: c.symbol,
    })?;

    let mut languages = Vec::with_capacity(raw.languages.len());
    for (code, value) in raw.languages {
        match value {
            Value::String(s) => languages.push(s),
            other => {
                return Err(CatalogError::malformed(format!(
                    "languages.{code}: expected string, got {other}"
                )))
            }
        }
    }

    // `maps` is `{ "googleMaps": "...", "openStreetMaps": "..." }`.
    let maps = raw
        .maps
        .into_iter()
        .filter_map(|(_, v)| v.as_str().map(str::to_string))
        .collect();

    let latlng = match raw.latlng.as_slice() {
        [lat, lng] => Some((*lat, *lng)),
        _ => None,
    };

    Ok(CountryRecord {
        code: raw.cca3,
        name: CountryName {
            common,
            official: name.official,
            native_name,
        },
        tld: raw.tld,
        currencies,
        region: raw.region,
        subregion: raw.subregion,
        languages,
        capital: raw.capital,
        latlng,
        landlocked: raw.landlocked,
        area: raw.area,
        maps,
        population: raw.population,
        timezones: raw.timezones,
        flags: Flags {
            png: raw.flags.png,
            svg: raw.flags.svg,
            alt: raw.flags.alt,
        },
        start_of_week: raw.start_of_week,
        borders: raw.borders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawCountryRecord {
        serde_json::from_str(json).expect("fixture should decode")
    }

    #[test]
    fn test_native_name_single_entry() {
        let rec = normalize(raw(
            r#"{
                "cca3": "FRA",
                "name": {
                    "common": "France",
                    "official": "French Republic",
                    "nativeName": {"fra": {"official": "République française", "common": "France"}}
                }
            }"#,
        ))
        .expect("should normalize");

        assert_eq!(rec.name.native_name.len(), 1);
        assert_eq!(
            rec.name.native_name.get("fra"),
            Some(&LocalizedName {
                official: "République française".to_string(),
                common: "France".to_string(),
            })
        );
    }

    #[test]
    fn test_maps_and_languages_keep_source_order() {
        let rec = normalize(raw(
            r#"{
                "cca3": "CHE",
                "name": {
                    "common": "Switzerland",
                    "official": "Swiss Confederation",
                    "nativeName": {
                        "roh": {"official": "Confederaziun svizra", "common": "Svizra"},
                        "gsw": {"official": "Schweizerische Eidgenossenschaft", "common": "Schweiz"},
                        "fra": {"official": "Confédération suisse", "common": "Suisse"},
                        "ita": {"official": "Confederazione Svizzera", "common": "Svizzera"}
                    }
                },
                "currencies": {"CHF": {"name": "Swiss franc", "symbol": "Fr."}},
                "languages": {"roh": "Romansh", "gsw": "Swiss German", "fra": "French", "ita": "Italian"}
            }"#,
        ))
        .expect("should normalize");

        assert_eq!(
            rec.name.native_name.keys().collect::<Vec<_>>(),
            vec!["roh", "gsw", "fra", "ita"]
        );
        assert_eq!(
            rec.languages,
            vec!["Romansh", "Swiss German", "French", "Italian"]
        );
        assert_eq!(rec.currencies.get("CHF").map(|c| c.symbol.as_str()), Some("Fr."));
    }

    #[test]
    fn test_optional_fields_default_to_empty() {
        let rec = normalize(raw(r#"{"name": {"common": "Antarctica"}}"#)).expect("should normalize");
        assert!(rec.code.is_empty());
        assert!(rec.capital.is_empty());
        assert!(rec.currencies.is_empty());
        assert!(rec.languages.is_empty());
        assert!(rec.borders.is_empty());
        assert_eq!(rec.latlng, None);
        assert_eq!(rec.population, 0);
    }

    #[test]
    fn test_full_record_fields() {
        let rec = normalize(raw(
            r#"{
                "cca3": "DEU",
                "name": {"common": "Germany", "official": "Federal Republic of Germany", "nativeName": {}},
                "tld": [".de"],
                "region": "Europe",
                "subregion": "Western Europe",
                "capital": ["Berlin"],
                "latlng": [51.0, 9.0],
                "landlocked": false,
                "area": 357114.0,
                "maps": {"googleMaps": "https://goo.gl/maps/mD9FBMq1nvXUBrkv6", "openStreetMaps": "https://www.openstreetmap.org/relation/51477"},
                "population": 83240525,
                "timezones": ["UTC+01:00"],
                "flags": {"png": "https://flagcdn.com/w320/de.png", "svg": "https://flagcdn.com/de.svg", "alt": "three bands"},
                "startOfWeek": "monday",
                "borders": ["AUT", "BEL"]
            }"#,
        ))
        .expect("should normalize");

        assert_eq!(rec.code, "DEU");
        assert_eq!(rec.latlng, Some((51.0, 9.0)));
        assert_eq!(rec.maps.len(), 2);
        assert!(rec.maps[0].contains("goo.gl"));
        assert_eq!(rec.population, 83_240_525);
        assert_eq!(rec.flags.svg, "https://flagcdn.com/de.svg");
        assert_eq!(rec.start_of_week, "monday");
        assert_eq!(rec.borders, vec!["AUT", "BEL"]);
    }

    #[test]
    fn test_missing_or_empty_common_name_is_malformed() {
        let err = normalize(raw(r#"{"cca3": "XXX"}"#)).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedRecord { .. }));

        let err = normalize(raw(r#"{"cca3": "XXX", "name": {"common": "  "}}"#)).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedRecord { .. }));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let err = normalize(raw(
            r#"{"name": {"common": "X", "nativeName": {"eng": "not an object"}}}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, CatalogError::MalformedRecord { .. }));

        let err = normalize(raw(r#"{"name": {"common": "X"}, "languages": {"eng": 1}}"#))
            .unwrap_err();
        assert!(matches!(err, CatalogError::MalformedRecord { .. }));
    }
}
