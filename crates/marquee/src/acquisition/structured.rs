//! Locate and decode the embedded JSON-LD block of a page.
//!
//! Both the list page and the detail pages carry their primary data in a
//! `<script type="application/ld+json">` node. Only the first such node is
//! read; the field readers here tolerate the loose typing schema.org data
//! shows in the wild (numbers as strings, objects where lists are expected).

use scraper::{Html, Selector};
use serde_json::Value;

const JSONLD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// What was found where the structured data block should be.
#[derive(Debug)]
pub enum JsonLdBlock {
    /// No JSON-LD script node on the page.
    Absent,
    /// A node was present but its text did not decode.
    Malformed(serde_json::Error),
    Decoded(Value),
}

/// Read the first JSON-LD block of a parsed document.
pub fn first_jsonld(document: &Html) -> JsonLdBlock {
    let Ok(sel) = Selector::parse(JSONLD_SELECTOR) else {
        return JsonLdBlock::Absent;
    };
    let Some(element) = document.select(&sel).next() else {
        return JsonLdBlock::Absent;
    };

    let text: String = element.text().collect();
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) => JsonLdBlock::Decoded(value),
        Err(e) => JsonLdBlock::Malformed(e),
    }
}

/// String field, absent when missing or not a string.
pub fn str_field(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(|s| s.as_str()).map(|s| s.to_string())
}

/// Float field given either as a number or a numeric string.
pub fn f64_field(v: &Value, key: &str) -> Option<f64> {
    v.get(key).and_then(|r| {
        r.as_f64()
            .or_else(|| r.as_str().and_then(|s| s.trim().parse().ok()))
    })
}

/// Unsigned integer field given either as a number or a numeric string.
///
/// Thousands separators in string form (`"2,950,000"`) are ignored.
pub fn u64_field(v: &Value, key: &str) -> Option<u64> {
    v.get(key).and_then(|r| {
        r.as_u64().or_else(|| {
            r.as_str().and_then(|s| {
                s.chars()
                    .filter(|c| *c != ',')
                    .collect::<String>()
                    .trim()
                    .parse()
                    .ok()
            })
        })
    })
}

/// Field that may be a single string or a list of strings.
pub fn string_list(v: &Value, key: &str) -> Vec<String> {
    match v.get(key) {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|i| i.as_str())
            .map(|s| s.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// `name` of a field that may be one object or a list of objects, in order.
pub fn names(v: &Value, key: &str) -> Vec<String> {
    match v.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(|i| str_field(i, "name")).collect(),
        Some(obj @ Value::Object(_)) => str_field(obj, "name").into_iter().collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_first_jsonld_decoded() {
        let html = r#"
        <html><head>
        <script type="application/ld+json">{"@type": "ItemList", "name": "Top"}</script>
        <script type="application/ld+json">{"@type": "Other"}</script>
        </head></html>
        "#;
        match first_jsonld(&doc(html)) {
            JsonLdBlock::Decoded(v) => assert_eq!(v["@type"], "ItemList"),
            other => panic!("expected decoded block, got {other:?}"),
        }
    }

    #[test]
    fn test_first_jsonld_absent() {
        let html = r#"<html><head><script>var x = 1;</script></head></html>"#;
        assert!(matches!(first_jsonld(&doc(html)), JsonLdBlock::Absent));
    }

    #[test]
    fn test_first_jsonld_malformed() {
        let html = r#"<html><head><script type="application/ld+json">{not json}</script></head></html>"#;
        assert!(matches!(first_jsonld(&doc(html)), JsonLdBlock::Malformed(_)));
    }

    #[test]
    fn test_numeric_fields_accept_strings() {
        let v = json!({"a": 9.3, "b": "8.7", "c": 3000000, "d": "2,950,000", "e": "n/a"});
        assert_eq!(f64_field(&v, "a"), Some(9.3));
        assert_eq!(f64_field(&v, "b"), Some(8.7));
        assert_eq!(u64_field(&v, "c"), Some(3_000_000));
        assert_eq!(u64_field(&v, "d"), Some(2_950_000));
        assert_eq!(u64_field(&v, "e"), None);
        assert_eq!(f64_field(&v, "missing"), None);
    }

    #[test]
    fn test_string_list_scalar_and_array() {
        let v = json!({"one": "Drama", "many": ["Crime", "Drama"], "num": 4});
        assert_eq!(string_list(&v, "one"), vec!["Drama"]);
        assert_eq!(string_list(&v, "many"), vec!["Crime", "Drama"]);
        assert!(string_list(&v, "num").is_empty());
    }

    #[test]
    fn test_names_object_or_list() {
        let v = json!({
            "director": {"@type": "Person", "name": "Sidney Lumet"},
            "actor": [{"name": "A"}, {"url": "/no-name"}, {"name": "B"}]
        });
        assert_eq!(names(&v, "director"), vec!["Sidney Lumet"]);
        assert_eq!(names(&v, "actor"), vec!["A", "B"]);
        assert!(names(&v, "creator").is_empty());
    }
}
