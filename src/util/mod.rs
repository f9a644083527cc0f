use std::cmp::Ordering;

#[cfg(not(target_arch = "wasm32"))]
/// Folds a Latin letter with diacritics onto its base letter(s).
fn fold_char(c: char, out: &mut String) {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' | 'ș' => "s",
        'ß' => "ss",
        'ť' | 'ţ' | 'ț' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => {
            out.push(c);
            return;
        }
    };
    out.push_str(base);
}

#[cfg(not(target_arch = "wasm32"))]
fn collation_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        fold_char(c, &mut key);
    }
    key
}

#[cfg(not(target_arch = "wasm32"))]
/// Case tiebreak: lower case sorts before upper case, as in ICU's default tailoring.
fn lower_first(c: char) -> char {
    if c.is_lowercase() {
        c.to_uppercase().next().unwrap_or(c)
    } else if c.is_uppercase() {
        c.to_lowercase().next().unwrap_or(c)
    } else {
        c
    }
}

/// Locale-aware ordering of display names.
///
/// In the browser this is `String.prototype.localeCompare` with the user's locale.
/// Elsewhere (native tests, tooling) it is an approximation of ICU root collation:
/// case and Latin diacritics are folded at the first level, punctuation is kept,
/// then unaccented before accented and lower case before upper case.
pub(crate) fn locale_compare(a: &str, b: &str) -> Ordering {
    #[cfg(target_arch = "wasm32")]
    {
        let ord = js_sys::JsString::from(a).locale_compare(
            b,
            &js_sys::Array::new(),
            &js_sys::Object::new(),
        );
        ord.cmp(&0)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        folded_compare(a, b)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn folded_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.chars().map(lower_first).cmp(b.chars().map(lower_first)))
}

/// Formats an integer with `,` thousands separators (en-US grouping).
pub(crate) fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Route of a country's detail view.
pub(crate) fn detail_href(common_name: &str) -> String {
    format!("/detail/{}", urlencoding::encode(common_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_compare_folds_accents_and_case() {
        assert_eq!(locale_compare("Åland Islands", "Albania"), Ordering::Less);
        assert_eq!(locale_compare("Côte d'Ivoire", "Croatia"), Ordering::Less);
        assert_eq!(locale_compare("réunion", "Romania"), Ordering::Less);
        assert_eq!(locale_compare("Zambia", "zimbabwe"), Ordering::Less);
    }

    #[test]
    fn test_locale_compare_is_total() {
        assert_eq!(locale_compare("France", "France"), Ordering::Equal);
        assert_ne!(locale_compare("Chad", "chad"), Ordering::Equal);
    }

    #[test]
    fn test_locale_compare_lower_case_and_unaccented_first() {
        assert_eq!(locale_compare("chad", "Chad"), Ordering::Less);
        assert_eq!(locale_compare("Curacao", "Curaçao"), Ordering::Less);
    }

    #[test]
    fn test_locale_compare_keeps_punctuation() {
        // "Guinea-Bissau" is not "GuineaBissau": the hyphen sorts before letters.
        assert_eq!(locale_compare("Guinea-Bissau", "Guineab"), Ordering::Less);
        assert_eq!(locale_compare("Guinea", "Guinea-Bissau"), Ordering::Less);
    }

    #[test]
    fn test_sort_country_names() {
        let mut names = vec!["Zimbabwe", "Åland Islands", "Afghanistan", "Curaçao", "Cuba", "Albania"];
        names.sort_by(|a, b| locale_compare(a, b));
        assert_eq!(
            names,
            vec!["Afghanistan", "Åland Islands", "Albania", "Cuba", "Curaçao", "Zimbabwe"]
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(67_391_582), "67,391,582");
        assert_eq!(group_thousands(1_402_112_000), "1,402,112,000");
    }

    #[test]
    fn test_detail_href_encodes_name() {
        assert_eq!(detail_href("France"), "/detail/France");
        assert_eq!(
            detail_href("Bosnia and Herzegovina"),
            "/detail/Bosnia%20and%20Herzegovina"
        );
    }
}
