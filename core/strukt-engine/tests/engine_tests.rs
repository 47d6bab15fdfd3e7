mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::{article_schema, counting_transport, CountingTransport};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use strukt_cast::{AttributeCodec, CastContext};
use strukt_engine::{
    DirectoryTransport, EngineConfig, EngineError, EntryModel, GenericEntry, StructureEngine,
};
use strukt_model::{Block, FieldValue, Record};
use strukt_types::{Locale, StructureId};

const ARTICLES: StructureId = StructureId::new(10);

fn make_engine() -> StructureEngine {
    StructureEngine::builder()
        .transport(counting_transport())
        .build()
        .unwrap()
}

fn make_article(data: Value) -> Record {
    let mut record = Record::from_value(data).unwrap();
    record.set_raw("directory_id", json!(10));
    record
}

// ── Building ─────────────────────────────────────────────────────

#[test]
fn builder_requires_transport() {
    assert!(matches!(
        StructureEngine::builder().build(),
        Err(EngineError::MissingTransport)
    ));
}

#[test]
fn builder_propagates_invalid_registrations() {
    let result = StructureEngine::builder()
        .transport(counting_transport())
        .model(Arc::new(GenericEntry))
        .build();
    assert!(matches!(result, Err(EngineError::Registry(_))));
}

// ── Decoding ─────────────────────────────────────────────────────

#[test]
fn attributes_decode_by_schema_tag() {
    let engine = make_engine();
    let record = make_article(json!({
        "tags": "news, tech,",
        "related": "3,4",
        "rating": "4.5",
        "event_date": "2024-06-01 09:00:00",
        "summary": "plain text"
    }));

    assert_eq!(
        engine.get_attribute(&record, "tags"),
        FieldValue::Tags(vec!["news".into(), "tech".into()])
    );
    assert_eq!(engine.get_attribute(&record, "related"), FieldValue::Ids(vec![3, 4]));
    assert_eq!(engine.get_attribute(&record, "rating"), FieldValue::Float(4.5));
    assert_eq!(
        engine.get_attribute(&record, "event_date"),
        FieldValue::Date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    );
    // `text` has no codec
    assert_eq!(
        engine.get_attribute(&record, "summary"),
        FieldValue::Raw(json!("plain text"))
    );
}

#[test]
fn default_fields_cast_without_schema() {
    let engine = make_engine();
    let record = Record::from_value(json!({
        "id": "5",
        "published": "1",
        "use_time": "0",
        "start": "2024-01-02 10:00:00",
        "created": "2024-01-02 10:11:12"
    }))
    .unwrap();

    assert_eq!(engine.get_attribute(&record, "id"), FieldValue::Integer(5));
    assert_eq!(engine.get_attribute(&record, "published"), FieldValue::Bool(true));
    assert_eq!(engine.get_attribute(&record, "use_time"), FieldValue::Bool(false));
    assert_eq!(
        engine.get_attribute(&record, "start"),
        FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
    );
    assert!(matches!(engine.get_attribute(&record, "created"), FieldValue::DateTime(_)));
}

#[test]
fn missing_schema_degrades_to_passthrough() {
    let engine = make_engine();
    let mut record = Record::from_value(json!({"tags": "a,b"})).unwrap();
    record.set_raw("directory_id", json!(404));
    assert_eq!(engine.get_attribute(&record, "tags"), FieldValue::Raw(json!("a,b")));
}

#[test]
fn matrix_attribute_decodes_blocks() {
    let engine = make_engine();
    let record = make_article(json!({
        "links": [{"type": "link", "url": "https://example.com", "new_window": "1"}]
    }));
    let expected = Block::new("link")
        .with("url", FieldValue::Raw(json!("https://example.com")))
        .with("new_window", FieldValue::Raw(json!(true)));
    assert_eq!(
        engine.get_attribute(&record, "links"),
        FieldValue::Matrix(vec![FieldValue::Block(expected)])
    );
}

#[test]
fn schema_is_fetched_once_across_reads() {
    let transport = counting_transport();
    let engine = StructureEngine::builder()
        .transport(transport.clone())
        .build()
        .unwrap();
    let record = make_article(json!({"tags": "a", "rating": "1", "related": "2"}));
    for key in ["tags", "rating", "related"] {
        engine.get_attribute(&record, key);
    }
    assert_eq!(transport.calls(), 1);
}

#[test]
fn unavailable_schema_is_fetched_once_per_read() {
    let transport = counting_transport();
    let engine = StructureEngine::builder()
        .transport(transport.clone())
        .build()
        .unwrap();
    let mut record = Record::from_value(json!({"id": "1", "published": "1", "created": ""})).unwrap();
    record.set_raw("directory_id", json!(404));

    assert_eq!(engine.get_attribute(&record, "published"), FieldValue::Bool(true));
    assert_eq!(transport.calls(), 1);

    engine.set_attribute(&mut record, "published", false);
    assert_eq!(transport.calls(), 2);

    let visible = engine.to_visible_map(&record);
    assert_eq!(visible.get("id"), Some(&json!(1)));
    assert_eq!(transport.calls(), 3);
}

// ── Localization ─────────────────────────────────────────────────

#[test]
fn localized_reads_follow_the_locale_chain() {
    let config = EngineConfig {
        locale: "nb_NO".parse().unwrap(),
        fallback_locale: "en".parse().unwrap(),
        ..EngineConfig::default()
    };
    let engine = StructureEngine::builder()
        .transport(counting_transport())
        .config(config)
        .build()
        .unwrap();
    let record = make_article(json!({
        "lead_en": "<p>Hello</p>",
        "lead": "<p>Bare</p>",
        "name_en": "English name",
        "name": "bare-name"
    }));

    assert_eq!(engine.get_attribute(&record, "lead").as_str(), Some("<p>Hello</p>"));
    assert_eq!(
        engine.resolve_localized_raw(&record, "name").raw(),
        Some(&json!("bare-name"))
    );
    let forced: Locale = "nb".parse().unwrap();
    assert_eq!(
        engine.resolve_localized_raw_in(&record, "lead", forced).raw(),
        Some(&json!("<p>Hello</p>"))
    );
}

// ── Encoding ─────────────────────────────────────────────────────

#[test]
fn set_attribute_encodes_for_the_wire() {
    let engine = make_engine();
    let mut record = make_article(json!({}));

    engine.set_attribute(&mut record, "tags", FieldValue::Tags(vec!["a".into(), "b".into()]));
    engine.set_attribute(&mut record, "rating", 2.5);
    engine.set_attribute(&mut record, "published", true);
    engine.set_attribute(&mut record, "event_date", NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    engine.set_attribute(&mut record, "summary", "kept as is");

    assert_eq!(record.raw("tags"), Some(&json!("a,b")));
    assert_eq!(record.raw("rating"), Some(&json!("2.5")));
    assert_eq!(record.raw("published"), Some(&json!("1")));
    assert_eq!(record.raw("event_date"), Some(&json!("2024-06-01")));
    assert_eq!(record.raw("summary"), Some(&json!("kept as is")));
}

#[test]
fn set_then_get_roundtrips() {
    let engine = make_engine();
    let mut record = make_article(json!({}));
    let value = FieldValue::Ids(vec![8, 9]);
    engine.set_attribute(&mut record, "related", value.clone());
    assert_eq!(engine.get_attribute(&record, "related"), value);
}

// ── Projection ───────────────────────────────────────────────────

#[test]
fn visible_map_decodes_and_hides_default_fields() {
    let engine = make_engine();
    let record = make_article(json!({
        "id": "3",
        "name": "first-article",
        "title": "First",
        "published": "1",
        "revision": "12",
        "tags": "x,y",
        "rating": "3"
    }));

    let visible = engine.to_visible_map(&record);
    assert_eq!(
        Value::Object(visible),
        json!({
            "id": 3,
            "name": "first-article",
            "rating": 3.0
        })
    );
}

struct Product;

impl EntryModel for Product {
    fn structure_id(&self) -> Option<StructureId> {
        Some(ARTICLES)
    }

    fn name(&self) -> &str {
        "Product"
    }

    fn hidden_fields(&self) -> &[&str] {
        &["internal"]
    }

    fn cast_overrides(&self) -> &[(&str, &str)] {
        &[("summary", "editor-large"), ("stock", "integer")]
    }
}

#[test]
fn record_types_override_casts_and_hidden_fields() {
    let engine = StructureEngine::builder()
        .transport(counting_transport())
        .model(Arc::new(Product))
        .build()
        .unwrap();
    let record = make_article(json!({
        "summary": "<p>Sale</p>",
        "stock": "12",
        "tags": "a",
        "internal": "secret"
    }));

    assert!(matches!(engine.get_attribute(&record, "summary"), FieldValue::Html(_)));
    assert_eq!(engine.get_attribute(&record, "stock"), FieldValue::Integer(12));

    let visible = engine.to_visible_map(&record);
    assert!(!visible.contains_key("internal"));
    assert_eq!(visible.get("tags"), Some(&json!(["a"])));
    assert_eq!(visible.get("directory_id"), Some(&json!(10)));
    assert_eq!(engine.materialize(&record).model_name(), "Product");
    assert_eq!(engine.resolve_record_type(ARTICLES).name(), "Product");
}

// ── Custom codecs ────────────────────────────────────────────────

struct CsvCodec;

impl AttributeCodec for CsvCodec {
    fn decode(&self, raw: &Value, _ctx: &CastContext<'_>) -> FieldValue {
        let cells = raw.as_str().unwrap_or_default().split(';').map(str::to_string).collect();
        FieldValue::Tags(cells)
    }

    fn encode(&self, value: &FieldValue, _ctx: &CastContext<'_>) -> Value {
        match value {
            FieldValue::Tags(cells) => Value::from(cells.join(";")),
            other => other.to_plain(),
        }
    }
}

#[test]
fn custom_codecs_apply_to_custom_tags() {
    let transport = Arc::new(CountingTransport::new().with_structure(
        11,
        json!({"id": 11, "fields": [{"alias": "row", "type": "csv"}]}),
    ));
    let engine = StructureEngine::builder()
        .transport(transport)
        .codec("csv", CsvCodec)
        .build()
        .unwrap();
    let mut record = Record::for_structure(StructureId::new(11));
    record.set_raw("row", json!("a;b"));
    assert_eq!(
        engine.get_attribute(&record, "row"),
        FieldValue::Tags(vec!["a".into(), "b".into()])
    );
    engine.set_attribute(&mut record, "row", FieldValue::Tags(vec!["c".into()]));
    assert_eq!(record.raw("row"), Some(&json!("c")));
}

// ── Offline schemas ──────────────────────────────────────────────

#[test]
fn directory_transport_serves_schema_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("10.json"), article_schema().to_string()).unwrap();

    let engine = StructureEngine::builder()
        .transport(Arc::new(DirectoryTransport::new(dir.path())))
        .build()
        .unwrap();

    let schema = engine.schema(ARTICLES).unwrap();
    assert_eq!(schema.name, "Articles");
    assert!(engine.schema(StructureId::new(11)).is_none());
    assert_eq!(engine.field_tags(ARTICLES).unwrap()["tags"], "tags");
}
