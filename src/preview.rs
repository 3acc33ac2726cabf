//! Pre-import column analysis and the tables shown around an import.
//!
//! [`ColumnReport`] compares an upload's headers with a target's field map:
//! which columns will be used, which are ignored, and which required columns
//! are absent (an import is refused until those are supplied).

use itertools::Itertools;
use serde::Serialize;

use crate::{
    importer::{ImportOutcome, ImportSummary},
    parser::ParsedDataset,
    registry::{Dataset, Registry},
    table::Table,
};

/// Shown in place of empty cells in error detail.
pub const EMPTY_CELL: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognizedColumn {
    /// Header as uploaded.
    pub source: String,
    pub column: String,
    pub attribute: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub row_count: usize,
    pub recognized: Vec<RecognizedColumn>,
    /// Uploaded headers the target does not use.
    pub unused: Vec<String>,
    /// Required columns absent from the upload.
    pub missing: Vec<String>,
}

impl ColumnReport {
    pub fn analyze(dataset: &Dataset, parsed: &ParsedDataset) -> Self {
        let (recognized, unused): (Vec<_>, Vec<_>) = parsed
            .columns
            .iter()
            .partition(|column| dataset.attribute_for(column).is_some());
        let recognized = recognized
            .into_iter()
            .filter_map(|column| {
                dataset.attribute_for(column).map(|attribute| RecognizedColumn {
                    source: parsed.original_header(column).to_string(),
                    column: column.clone(),
                    attribute: attribute.to_string(),
                    label: dataset.humanised_column(column),
                })
            })
            .collect();
        let unused = unused
            .into_iter()
            .map(|column| parsed.original_header(column).to_string())
            .collect();
        let missing = dataset
            .missing_required(parsed.columns.iter().map(String::as_str))
            .into_iter()
            .map(str::to_string)
            .collect();
        Self {
            row_count: parsed.row_count(),
            recognized,
            unused,
            missing,
        }
    }

    pub fn can_import(&self) -> bool {
        self.row_count > 0 && self.missing.is_empty()
    }

    pub fn missing_labels(&self, dataset: &Dataset) -> String {
        self.missing
            .iter()
            .map(|column| dataset.humanised_column(column))
            .join(", ")
    }

    pub fn recognized_table(&self) -> Table {
        let mut table = Table::new(["source column", "field", "label"]);
        for column in &self.recognized {
            table.push_row([
                column.source.as_str(),
                column.attribute.as_str(),
                column.label.as_str(),
            ]);
        }
        table
    }
}

/// First `limit` rows, labelled with the uploaded headers.
pub fn preview_table(parsed: &ParsedDataset, limit: usize) -> Table {
    let mut table = Table::new(
        parsed
            .columns
            .iter()
            .map(|column| parsed.original_header(column)),
    );
    for row in parsed.rows.iter().take(limit) {
        table.push_row(
            parsed
                .columns
                .iter()
                .map(|column| row.get(column).unwrap_or("")),
        );
    }
    table
}

/// One line per retained row error; values shown as `Header=value`.
pub fn error_table(summary: &ImportSummary, parsed: &ParsedDataset) -> Table {
    let mut table = Table::new(["row", "error", "values"]);
    for error in &summary.errors {
        let values = parsed
            .columns
            .iter()
            .map(|column| {
                let value = error.values.get(column).map(String::as_str).unwrap_or("");
                let shown = if value.is_empty() { EMPTY_CELL } else { value };
                format!("{}={shown}", parsed.original_header(column))
            })
            .join("; ");
        table.push_row([error.row_number.to_string(), error.message.clone(), values]);
    }
    table
}

pub fn outcome_message(summary: &ImportSummary, dataset: &Dataset) -> String {
    match summary.outcome() {
        ImportOutcome::Imported => {
            format!("Imported {} rows into {}.", summary.created, dataset.label)
        }
        ImportOutcome::PartiallyImported => format!(
            "Imported {} rows into {} with {} errors.",
            summary.created, dataset.label, summary.failed
        ),
        ImportOutcome::NothingImported if summary.failed == 0 => {
            "No rows were imported; every row was blank.".to_string()
        }
        ImportOutcome::NothingImported => {
            "No rows were imported. See the error details below.".to_string()
        }
    }
}

pub fn targets_table(registry: &Registry) -> Table {
    let mut table = Table::new(["key", "label", "required columns"]);
    for dataset in registry.iter() {
        table.push_row([
            dataset.key.clone(),
            dataset.label.clone(),
            dataset.required_columns.join(", "),
        ]);
    }
    table
}

pub fn expected_columns_table(dataset: &Dataset) -> Table {
    let mut table = Table::new(["column", "field", "type", "required", "label"]);
    for mapping in &dataset.field_map {
        let kind = dataset
            .schema
            .field(&mapping.attribute)
            .map(|field| field.kind.to_string())
            .unwrap_or_default();
        let required = if dataset.is_required(&mapping.column) { "yes" } else { "" };
        table.push_row([
            mapping.column.clone(),
            mapping.attribute.clone(),
            kind,
            required.to_string(),
            dataset.humanised_column(&mapping.column),
        ]);
    }
    table
}
