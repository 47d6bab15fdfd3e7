//! Commands behind the `strukt` binary.
//!
//! Every command works offline: schemas are read from a directory of
//! `{id}.json` files through [`DirectoryTransport`], entries from JSON files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use strukt_engine::{DirectoryTransport, EngineConfig, StructureEngine};
use strukt_model::Record;
use strukt_types::StructureId;
use tracing::{debug, info};

/// Builds an engine reading schemas from `schema_dir`, or from the
/// config's `schema_dir` when none is given.
pub fn build_engine(config: EngineConfig, schema_dir: Option<PathBuf>) -> Result<StructureEngine> {
    let dir = schema_dir
        .or_else(|| config.schema_dir.clone())
        .context("no schema directory given (use --schema-dir or set schema_dir in the config)")?;
    if !dir.is_dir() {
        bail!("schema directory {:?} does not exist", dir);
    }
    info!("Reading schemas from {:?}", dir);

    let engine = StructureEngine::builder()
        .transport(Arc::new(DirectoryTransport::new(dir)))
        .config(config)
        .build()?;
    Ok(engine)
}

/// Reads a JSON document from disk.
pub fn read_json(path: &Path) -> Result<Value> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("{:?} is not valid JSON", path))
}

/// Reads one entry or a list of entries.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    records_from_value(read_json(path)?)
}

fn records_from_value(value: Value) -> Result<Vec<Record>> {
    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => bail!("expected an entry object or a list of entries, got {}", other),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Record::from_value(item).with_context(|| format!("entry #{i} is not an object")))
        .collect()
}

/// Summarizes a structure: its name, field count and alias → tag map.
pub fn describe_schema(engine: &StructureEngine, id: StructureId) -> Result<Value> {
    let schema = engine
        .schema(id)
        .with_context(|| format!("structure {id} could not be loaded"))?;
    let tags = engine.field_tags(id).unwrap_or_default();

    let mut report = Map::new();
    report.insert("id".into(), Value::from(schema.id));
    report.insert("name".into(), Value::from(schema.name.as_str()));
    report.insert("fields".into(), Value::from(schema.fields.len()));
    report.insert(
        "casts".into(),
        Value::Object(
            tags.iter()
                .map(|(alias, tag)| (alias.clone(), Value::from(tag.as_str())))
                .collect(),
        ),
    );
    Ok(Value::Object(report))
}

/// Decodes entries into their visible projection.
///
/// Entries without a `directory_id` are read as `structure` when given.
pub fn decode_records(
    engine: &StructureEngine,
    records: Vec<Record>,
    structure: Option<StructureId>,
) -> Value {
    let decoded = records
        .into_iter()
        .map(|mut record| {
            if let (None, Some(id)) = (record.structure_id(), structure) {
                record.set_raw(strukt_model::STRUCTURE_KEY, Value::from(id.get()));
            }
            debug!("Decoding entry {:?}", record.id());
            Value::Object(engine.to_visible_map(&record))
        })
        .collect();
    Value::Array(decoded)
}

/// Prepares entries for a bulk import into `structure`.
pub fn prepare_records(records: &[Record], structure: StructureId) -> Value {
    Value::Array(
        records
            .iter()
            .map(|record| Value::Object(record.prepared_for_import(structure).into_attributes()))
            .collect(),
    )
}
