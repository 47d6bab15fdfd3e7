use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use strukt_cast::{LocalizedAttributeResolver, LocalizedValue};
use strukt_model::Record;
use strukt_types::{Locale, LocaleConfig};

fn locale(s: &str) -> Locale {
    s.parse().unwrap()
}

fn make_resolver(active: &str, fallback: &str) -> LocalizedAttributeResolver {
    LocalizedAttributeResolver::new(LocaleConfig::new(locale(active), locale(fallback)))
}

fn attrs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

// ── Candidate keys ───────────────────────────────────────────────

#[test]
fn candidates_follow_locale_then_fallback() {
    let resolver = make_resolver("nb_NO", "en_GB");
    assert_eq!(
        resolver.candidate_keys("title"),
        vec!["title_nb_NO", "title_nb", "title_en_GB", "title_en", "title"]
    );
}

#[test]
fn reserved_keys_skip_fallback_candidates() {
    let resolver = make_resolver("nb_NO", "en");
    assert_eq!(resolver.candidate_keys("name"), vec!["name_nb_NO", "name_nb", "name"]);
}

#[test]
fn same_locale_has_no_fallback_candidates() {
    let resolver = make_resolver("en", "en");
    assert_eq!(resolver.candidate_keys("title"), vec!["title_en", "title"]);
}

#[test]
fn reserved_keys_are_configurable() {
    let resolver = make_resolver("nb", "en").with_reserved_keys(["slug"]);
    assert!(resolver.is_reserved("slug"));
    assert!(!resolver.is_reserved("name"));
    assert_eq!(resolver.candidate_keys("name"), vec!["name_nb", "name_en", "name"]);
}

// ── Resolution ───────────────────────────────────────────────────

#[test]
fn exhausted_chain_falls_back_to_bare_key() {
    let resolver = make_resolver("no_NO", "no_NO");
    let map = attrs(json!({"title_no_NO": null, "title_no": "", "title": "Bare"}));
    assert_eq!(resolver.resolve(&map, "title"), LocalizedValue::Raw(&json!("Bare")));
}

#[test]
fn most_specific_present_value_wins() {
    let resolver = make_resolver("nb_NO", "en");
    let map = attrs(json!({"title_nb": "Hei", "title_en": "Hi", "title": "Bare"}));
    assert_eq!(resolver.resolve(&map, "title").raw(), Some(&json!("Hei")));

    let map = attrs(json!({"title_nb": "", "title_en": "Hi", "title": "Bare"}));
    assert_eq!(resolver.resolve(&map, "title").raw(), Some(&json!("Hi")));
}

#[test]
fn zero_string_counts_as_present() {
    let resolver = make_resolver("nb", "nb");
    let map = attrs(json!({"count_nb": "0", "count": "5"}));
    assert_eq!(resolver.resolve(&map, "count").raw(), Some(&json!("0")));
}

#[test]
fn reserved_key_ignores_fallback_locale() {
    let resolver = make_resolver("nb", "en");
    let map = attrs(json!({"name_en": "English", "name": "Bare"}));
    assert_eq!(resolver.resolve(&map, "name").raw(), Some(&json!("Bare")));
}

#[test]
fn blank_bare_value_is_returned_and_missing_is_missing() {
    let resolver = make_resolver("nb", "en");
    let map = attrs(json!({"title": ""}));
    assert_eq!(resolver.resolve(&map, "title").raw(), Some(&json!("")));
    assert!(resolver.resolve(&map, "other").is_missing());
    assert_eq!(resolver.resolve(&map, "other").to_value(), Value::Null);
}

#[test]
fn forced_locale_overrides_active_locale() {
    let resolver = make_resolver("nb", "en");
    let forced = resolver.forced(locale("de"));
    let map = attrs(json!({"title_nb": "Hei", "title_de": "Hallo"}));
    assert_eq!(forced.resolve(&map, "title").raw(), Some(&json!("Hallo")));
    assert_eq!(forced.locale().fallback_locale, locale("en"));
}

// ── Localized lists ──────────────────────────────────────────────

#[test]
fn list_items_become_localized_views() {
    let resolver = make_resolver("nb", "en");
    let record = Record::from_value(json!({
        "links": [
            {"name_en": "Home", "name": "home"},
            {"name_nb": "Om oss", "name": "about"},
            "plain"
        ]
    }))
    .unwrap();

    let value = resolver.resolve_record(&record, "links");
    let items = value.items();
    assert_eq!(items.len(), 3);

    // views never reserve keys, so `name` uses the fallback locale
    let first = items[0].as_view().unwrap();
    assert_eq!(first.get("name").raw(), Some(&json!("Home")));
    let second = items[1].as_view().unwrap();
    assert_eq!(second.get("name").raw(), Some(&json!("Om oss")));
    assert_eq!(second.raw("name"), Some(&json!("about")));
    assert!(items[2].as_view().is_none());
}

#[test]
fn wrapping_does_not_touch_the_record() {
    let resolver = make_resolver("nb", "en");
    let record = Record::from_value(json!({"links": [{"title_en": "A"}]})).unwrap();
    let before = record.clone();
    let value = resolver.resolve_record(&record, "links");
    assert_eq!(value.to_value(), json!([{"title_en": "A"}]));
    assert_eq!(record, before);
}
