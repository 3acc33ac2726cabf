//! Row-by-row import orchestration.
//!
//! Each parsed row goes through `prepare → {skip | error | create}`. Row
//! problems never abort the batch: they are turned into [`RowError`]s (kept up
//! to the configured cap, always counted) and the next row is processed.
//! Records are only ever inserted, never updated.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    config::ImportConfig,
    parser::ParsedRow,
    prepare::RowPreparer,
    registry::Dataset,
    store::RecordStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row_number: u64,
    pub message: String,
    pub values: BTreeMap<String, String>,
}

/// How a run went, judged from its counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    /// Every non-blank row was created.
    Imported,
    /// Some rows were created and some failed.
    PartiallyImported,
    /// Nothing was created.
    NothingImported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub created: usize,
    pub skipped: usize,
    /// Rows that errored, including those past the detail cap.
    pub failed: usize,
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Failed rows whose detail was not retained.
    pub fn truncated_errors(&self) -> usize {
        self.failed - self.errors.len()
    }

    pub fn outcome(&self) -> ImportOutcome {
        match (self.created, self.failed) {
            (0, _) => ImportOutcome::NothingImported,
            (_, 0) => ImportOutcome::Imported,
            _ => ImportOutcome::PartiallyImported,
        }
    }
}

pub struct Importer<'a> {
    dataset: &'a Dataset,
    max_errors: usize,
}

impl<'a> Importer<'a> {
    pub fn new(dataset: &'a Dataset, config: &ImportConfig) -> Self {
        Self {
            dataset,
            max_errors: config.max_errors_reported,
        }
    }

    pub fn import_rows(&self, store: &mut dyn RecordStore, rows: &[ParsedRow]) -> ImportSummary {
        let preparer = RowPreparer::new(self.dataset);
        let mut summary = ImportSummary {
            total_rows: rows.len(),
            created: 0,
            skipped: 0,
            failed: 0,
            errors: Vec::new(),
        };

        for row in rows {
            let payload = match preparer.prepare(&row.values, store) {
                Ok(Some(payload)) if !payload.is_empty() => payload,
                Ok(_) => {
                    debug!("Row {} is blank; skipping", row.line_number);
                    summary.skipped += 1;
                    continue;
                }
                Err(failure) => {
                    self.record_failure(&mut summary, row, failure.to_string());
                    continue;
                }
            };

            match store.insert(&self.dataset.schema, payload) {
                Ok(id) => {
                    debug!("Row {} created {} {id}", row.line_number, self.dataset.schema.name);
                    summary.created += 1;
                }
                Err(err) => self.record_failure(&mut summary, row, err.to_string()),
            }
        }

        if summary.truncated_errors() > 0 {
            warn!(
                "Kept details for {} of {} failed row(s)",
                summary.error_count(),
                summary.failed
            );
        }
        info!(
            "Imported '{}': {} row(s), {} created, {} skipped, {} failed",
            self.dataset.key, summary.total_rows, summary.created, summary.skipped, summary.failed
        );
        summary
    }

    fn record_failure(&self, summary: &mut ImportSummary, row: &ParsedRow, message: String) {
        debug!("Row {} failed: {message}", row.line_number);
        summary.failed += 1;
        if summary.errors.len() < self.max_errors {
            summary.errors.push(RowError {
                row_number: row.line_number,
                message,
                values: row.values.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::Registry, store::MemoryStore};

    fn rows(lines: &[&[(&str, &str)]]) -> Vec<ParsedRow> {
        lines
            .iter()
            .enumerate()
            .map(|(idx, pairs)| ParsedRow::new(idx as u64 + 2, pairs.iter().copied()))
            .collect()
    }

    #[test]
    fn mixed_batch_counts_every_row() {
        let registry = Registry::standard();
        let farmers = registry.get("farmers").unwrap();
        let mut store = MemoryStore::new();
        let batch = rows(&[
            &[("name", "Asha"), ("family_males", "2")],
            &[("name", "NA"), ("family_males", "")],
            &[("name", ""), ("family_males", "3")],
            &[("name", "Ravi"), ("family_males", "-1")],
            &[("name", "Kiran"), ("family_males", "three")],
        ]);

        let summary = Importer::new(farmers, &ImportConfig::default()).import_rows(&mut store, &batch);

        assert_eq!(summary.total_rows, 5);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.outcome(), ImportOutcome::PartiallyImported);
        let messages = summary.errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>();
        assert_eq!(
            messages,
            [
                "Missing value for required column 'name'",
                "family_males: Ensure this value is greater than or equal to 0.",
                "Column 'family_males': Cannot interpret 'three' as an integer",
            ]
        );
        assert_eq!(summary.errors[1].row_number, 5);
        assert_eq!(summary.errors[1].values["name"], "Ravi");
        assert_eq!(store.count("Farmer"), 1);
    }

    #[test]
    fn rows_with_only_unmapped_values_are_skipped() {
        let registry = Registry::standard();
        let farmers = registry.get("farmers").unwrap();
        let mut store = MemoryStore::new();
        let batch = rows(&[&[("name", "Asha")], &[("remarks", "call back")]]);
        let mut dataset = farmers.clone();
        dataset.required_columns.clear();

        let summary = Importer::new(&dataset, &ImportConfig::default()).import_rows(&mut store, &batch);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.outcome(), ImportOutcome::Imported);
    }

    #[test]
    fn error_detail_respects_configured_cap() {
        let registry = Registry::standard();
        let farmers = registry.get("farmers").unwrap();
        let mut store = MemoryStore::new();
        let batch = (0..8)
            .map(|idx| ParsedRow::new(idx + 2, [("name", ""), ("village", "Malegaon")]))
            .collect::<Vec<_>>();
        let config = ImportConfig {
            max_errors_reported: 3,
            ..ImportConfig::default()
        };

        let summary = Importer::new(farmers, &config).import_rows(&mut store, &batch);
        assert_eq!(summary.failed, 8);
        assert_eq!(summary.error_count(), 3);
        assert_eq!(summary.truncated_errors(), 5);
        assert_eq!(summary.errors[2].row_number, 4);
        assert_eq!(summary.outcome(), ImportOutcome::NothingImported);
    }
}
