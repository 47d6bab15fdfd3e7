use serde_json::json;
use std::collections::HashSet;
use std::str::FromStr;
use strukt_types::{EntryId, StructureId};

// ── StructureId ──────────────────────────────────────────────────

#[test]
fn structure_id_display_and_parse() {
    let id = StructureId::new(42);
    let parsed = StructureId::from_str(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
    assert_eq!(parsed.get(), 42);
}

#[test]
fn structure_id_parse_trims_whitespace() {
    assert_eq!(StructureId::from_str(" 7 ").unwrap(), StructureId::new(7));
}

#[test]
fn structure_id_rejects_zero_and_garbage() {
    assert!(StructureId::from_str("0").is_err());
    assert!(StructureId::from_str("abc").is_err());
    assert!(StructureId::from_str("").is_err());
}

#[test]
fn structure_id_from_value_accepts_numbers_and_strings() {
    assert_eq!(StructureId::from_value(&json!(10)), Some(StructureId::new(10)));
    assert_eq!(StructureId::from_value(&json!("10")), Some(StructureId::new(10)));
    assert_eq!(StructureId::from_value(&json!(10.0)), Some(StructureId::new(10)));
}

#[test]
fn structure_id_from_value_rejects_other_shapes() {
    assert_eq!(StructureId::from_value(&json!(null)), None);
    assert_eq!(StructureId::from_value(&json!(0)), None);
    assert_eq!(StructureId::from_value(&json!(-3)), None);
    assert_eq!(StructureId::from_value(&json!([1])), None);
    assert_eq!(StructureId::from_value(&json!("")), None);
}

#[test]
fn structure_id_serde_is_transparent() {
    let id = StructureId::new(5);
    assert_eq!(serde_json::to_string(&id).unwrap(), "5");
    let back: StructureId = serde_json::from_str("5").unwrap();
    assert_eq!(back, id);
}

#[test]
fn structure_id_hash_and_eq() {
    let mut set = HashSet::new();
    set.insert(StructureId::new(1));
    set.insert(StructureId::new(1));
    set.insert(StructureId::new(2));
    assert_eq!(set.len(), 2);
}

// ── EntryId ──────────────────────────────────────────────────────

#[test]
fn entry_id_roundtrip() {
    let id = EntryId::from(1234);
    assert_eq!(EntryId::from_str("1234").unwrap(), id);
    assert_eq!(id.to_string(), "1234");
}

#[test]
fn entry_id_from_value() {
    assert_eq!(EntryId::from_value(&json!("99")), Some(EntryId::new(99)));
    assert_eq!(EntryId::from_value(&json!(true)), None);
}
