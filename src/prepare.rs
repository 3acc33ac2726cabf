//! Converts one parsed row into a record payload.

use std::collections::BTreeMap;

use crate::{
    data::{Value, is_empty_value, parse_typed_value},
    error::RowFailure,
    registry::Dataset,
    schema::{FieldType, Payload},
    store::{Record, RecordStore},
};

pub struct RowPreparer<'a> {
    dataset: &'a Dataset,
}

impl<'a> RowPreparer<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Returns `Ok(None)` for a row with nothing in it.
    ///
    /// Foreign-key columns are resolved against `store` and replaced by the
    /// referenced record's key.
    pub fn prepare(
        &self,
        row: &BTreeMap<String, String>,
        store: &dyn RecordStore,
    ) -> Result<Option<Payload>, RowFailure> {
        if row.values().all(|value| is_empty_value(Some(value.as_str()))) {
            return Ok(None);
        }

        for required in &self.dataset.required_columns {
            if is_empty_value(row.get(required).map(String::as_str)) {
                return Err(RowFailure::MissingRequired {
                    column: required.clone(),
                });
            }
        }

        let mut payload = Payload::new();
        for mapping in &self.dataset.field_map {
            let Some(raw) = row.get(&mapping.column) else {
                continue;
            };
            if is_empty_value(Some(raw.as_str())) {
                continue;
            }
            let Some(field) = self.dataset.schema.field(&mapping.attribute) else {
                continue;
            };
            let value = parse_typed_value(raw, &field.kind).map_err(|source| {
                RowFailure::Conversion {
                    column: mapping.column.clone(),
                    source,
                }
            })?;
            if let FieldType::ForeignKey(relation) = &field.kind {
                let related = store
                    .find(&relation.model, &relation.key_field, &value)
                    .ok_or_else(|| RowFailure::MissingRelation {
                        model: relation.model.clone(),
                        key_field: relation.key_field.clone(),
                        value: raw.clone(),
                    })?;
                payload.insert(
                    field.name.clone(),
                    related_key(related, &relation.key_field, value),
                );
                continue;
            }
            payload.insert(field.name.clone(), value);
        }
        Ok(Some(payload))
    }
}

fn related_key(record: &Record, key_field: &str, fallback: Value) -> Value {
    record.get(key_field).cloned().unwrap_or(fallback)
}
