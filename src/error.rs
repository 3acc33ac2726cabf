//! Error types shared by the parser, row preparer, store, and registry.
//!
//! File-level problems ([`ParseError`]) are hard failures surfaced before any
//! row is touched. Everything raised while handling an individual row
//! ([`RowFailure`], [`StoreError`]) is soft: the importer renders it into a
//! row error and moves on.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("The uploaded file is empty.")]
    EmptyUpload,
    #[error("Unable to decode file as UTF-8.")]
    Undecodable,
    #[error("The file does not contain a header row.")]
    MissingHeader,
    #[error("No data rows were detected in the uploaded file.")]
    NoDataRows,
    #[error("Malformed CSV near line {line}")]
    Malformed {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Cannot interpret '{0}' as a boolean")]
    Boolean(String),
    #[error("Cannot interpret '{0}' as a decimal")]
    Decimal(String),
    #[error("Cannot interpret '{0}' as an integer")]
    Integer(String),
    #[error("Cannot interpret '{0}' as a number")]
    Float(String),
    #[error("Cannot parse '{0}' as a date (expected YYYY-MM-DD, DD-MM-YYYY or DD/MM/YYYY)")]
    Date(String),
    #[error("'{0}' is not a valid UUID")]
    Guid(String),
}

/// Reasons a single row is rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowFailure {
    #[error("Missing value for required column '{column}'")]
    MissingRequired { column: String },
    #[error("Column '{column}': {source}")]
    Conversion {
        column: String,
        #[source]
        source: ConversionError,
    },
    #[error("Related {model} with {key_field}={value} not found")]
    MissingRelation {
        model: String,
        key_field: String,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("{0}")]
    Integrity(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown import target '{0}'")]
pub struct UnknownTarget(pub String);

/// Field-keyed validation messages, kept in the order fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field.to_string(), vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn messages_for(&self, field: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or_default()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (field, messages)) in self.entries.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
