//! Catalog ingestion - the static set of character records for one run.

use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

use crate::entities::{CatalogRecord, CharacterId};
use crate::error::{CatalogError, Result};

/// The complete, immutable character catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
}

impl Catalog {
    /// Create a catalog from already-normalized records.
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading catalog");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a catalog from any JSON reader.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let root: Value = serde_json::from_reader(reader)?;
        Self::from_json_value(root)
    }

    /// Parse a catalog from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)?;
        Self::from_json_value(root)
    }

    fn from_json_value(root: Value) -> Result<Self> {
        let entries = match root {
            Value::Array(entries) => entries,
            other => return Err(CatalogError::NotAnArray(json_kind(&other))),
        };

        let mut records = Vec::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            match CatalogRecord::from_value(entry) {
                Some(record) => {
                    if record.family.is_none() || record.personal.is_none() {
                        warn!(
                            position,
                            id = %record.id,
                            "record has malformed relation attributes"
                        );
                    }
                    records.push(record);
                }
                None => warn!(position, "skipping catalog entry without an integer id"),
            }
        }

        debug!(records = records.len(), entries = entries.len(), "catalog parsed");
        Ok(Self { records })
    }

    /// All records in input order.
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    /// Get a record by its catalog id.
    pub fn get(&self, id: CharacterId) -> Option<&CatalogRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Get a record by its exact name.
    pub fn get_by_name(&self, name: &str) -> Option<&CatalogRecord> {
        self.records.iter().find(|r| r.name() == Some(name))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the catalog, returning its records.
    pub fn into_records(self) -> Vec<CatalogRecord> {
        self.records
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
