//! Record persistence used by the importer.
//!
//! [`RecordStore`] is the seam between the import pipeline and whatever keeps
//! survey records. An insert is all-or-nothing: the record is validated in
//! full, its key checked for uniqueness, and its references checked for
//! existence before anything is written, so a rejected row leaves no trace.
//!
//! [`MemoryStore`] keeps records grouped by record type and can be saved to
//! and loaded from a JSON file between runs.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    data::Value,
    error::{StoreError, ValidationErrors},
    schema::{FieldValues, Payload, RecordSchema},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub values: FieldValues,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field).and_then(Option::as_ref)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }
}

pub trait RecordStore {
    /// First record of `model` whose `field` equals `key`.
    fn find(&self, model: &str, field: &str, key: &Value) -> Option<&Record>;

    /// Validates and stores a new record, returning its key.
    fn insert(&mut self, schema: &RecordSchema, payload: Payload) -> Result<Uuid, StoreError>;

    fn count(&self, model: &str) -> usize;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    records: BTreeMap<String, Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store file; a missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Store file {path:?} does not exist yet; starting empty");
            return Ok(Self::new());
        }
        let file = File::open(path).with_context(|| format!("Opening store file {path:?}"))?;
        let store = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing store file {path:?}"))?;
        Ok(store)
    }

    /// Writes the store next to `path` first and renames it into place, so a
    /// failed write leaves the previous store intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let staging = staging_path(path);
        let file =
            File::create(&staging).with_context(|| format!("Creating store file {staging:?}"))?;
        let mut writer = BufWriter::new(file);
        let written = serde_json::to_writer_pretty(&mut writer, self)
            .context("Writing store JSON")
            .and_then(|()| writer.flush().context("Flushing store JSON"));
        if let Err(err) = written {
            let _ = fs::remove_file(&staging);
            return Err(err);
        }
        drop(writer);
        fs::rename(&staging, path)
            .with_context(|| format!("Replacing store file {path:?} with {staging:?}"))
    }

    pub fn records(&self, model: &str) -> &[Record] {
        self.records.get(model).map(Vec::as_slice).unwrap_or_default()
    }

    fn check_references(&self, schema: &RecordSchema, values: &FieldValues) -> Result<(), StoreError> {
        for field in schema.foreign_keys() {
            let (Some(relation), Some(Some(key))) = (field.relation(), values.get(&field.name)) else {
                continue;
            };
            if self.find(&relation.model, &relation.key_field, key).is_none() {
                return Err(StoreError::Integrity(format!(
                    "FOREIGN KEY constraint failed: {}.{} references missing {} {}",
                    schema.name, field.name, relation.model, key
                )));
            }
        }
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl RecordStore for MemoryStore {
    fn find(&self, model: &str, field: &str, key: &Value) -> Option<&Record> {
        self.records(model)
            .iter()
            .find(|record| record.get(field) == Some(key))
    }

    fn insert(&mut self, schema: &RecordSchema, payload: Payload) -> Result<Uuid, StoreError> {
        let values = schema.clean(payload).map_err(StoreError::Validation)?;

        let key_field = &schema.primary_key().name;
        let id = match values.get(key_field) {
            Some(Some(Value::Guid(id))) => *id,
            _ => {
                return Err(StoreError::Integrity(format!(
                    "NOT NULL constraint failed: {}.{}",
                    schema.name, key_field
                )));
            }
        };
        if self.find(&schema.name, key_field, &Value::Guid(id)).is_some() {
            let mut errors = ValidationErrors::new();
            errors.add(key_field, schema.duplicate_key_message());
            return Err(StoreError::Validation(errors));
        }
        self.check_references(schema, &values)?;

        self.records
            .entry(schema.name.clone())
            .or_default()
            .push(Record { id, values });
        Ok(id)
    }

    fn count(&self, model: &str) -> usize {
        self.records(model).len()
    }
}
