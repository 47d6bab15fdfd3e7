#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use strukt_engine::{Transport, TransportError, TransportResult};

/// Transport answering from a fixed path → body table and counting calls.
#[derive(Default)]
pub struct CountingTransport {
    bodies: HashMap<String, Value>,
    calls: AtomicUsize,
}

impl CountingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_structure(mut self, id: u64, body: Value) -> Self {
        self.bodies
            .insert(format!("builder/structures/{id}/basic"), body);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for CountingTransport {
    fn get(&self, path: &str) -> TransportResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies
            .get(path)
            .cloned()
            .ok_or_else(|| TransportError::NotFound(path.to_string()))
    }
}

pub fn article_schema() -> Value {
    json!({
        "id": 10,
        "name": "Articles",
        "published": true,
        "fields": [
            {"id": 1, "alias": "lead", "type": "editor-small"},
            {"id": 2, "alias": "tags", "type": "tags"},
            {"id": 3, "alias": "related", "type": "entries"},
            {"id": 4, "alias": "rating", "type": "float"},
            {"id": 5, "alias": "event_date", "type": "date"},
            {"id": 6, "alias": "links", "type": "matrix", "blocks": [
                {"alias": "link", "type": "matrix_block", "fields": [
                    {"alias": "url", "type": "text"},
                    {"alias": "new_window", "type": "checkbox"}
                ]}
            ]},
            {"id": 7, "alias": "summary", "type": "text"}
        ]
    })
}

pub fn counting_transport() -> Arc<CountingTransport> {
    Arc::new(CountingTransport::new().with_structure(10, article_schema()))
}
