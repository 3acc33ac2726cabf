//! Turns an uploaded CSV file into normalized rows.
//!
//! Headers are mapped through [`normalize_header()`]; the original header text
//! is kept so errors can be shown with the labels the uploader used. Rows in
//! which every cell is blank are dropped before they are counted.

use std::{collections::BTreeMap, sync::OnceLock};

use log::{debug, info};
use regex::Regex;
use serde::Serialize;

use crate::{
    error::ParseError,
    io_utils::{self, DEFAULT_CSV_DELIMITER, DEFAULT_SNIFF_BYTES},
};

/// A single data row; `values` is keyed by normalized column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRow {
    pub line_number: u64,
    pub values: BTreeMap<String, String>,
}

impl ParsedRow {
    pub fn new<I, K, V>(line_number: u64, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            line_number,
            values: values
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsedDataset {
    /// Normalized column names in header order, without duplicates.
    pub columns: Vec<String>,
    /// Normalized name → header text as uploaded.
    pub original_headers: BTreeMap<String, String>,
    pub rows: Vec<ParsedRow>,
    pub delimiter: u8,
}

impl ParsedDataset {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header text as uploaded, falling back to the normalized name.
    pub fn original_header<'a>(&'a self, column: &'a str) -> &'a str {
        self.original_headers
            .get(column)
            .map(String::as_str)
            .unwrap_or(column)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Skip sniffing and use this delimiter.
    pub delimiter: Option<u8>,
    pub sniff_bytes: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            sniff_bytes: DEFAULT_SNIFF_BYTES,
        }
    }
}

fn separator_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^0-9A-Za-z]+").expect("valid header pattern"))
}

/// Lowercase snake_case identifier for a header; idempotent.
pub fn normalize_header(header: &str) -> String {
    separator_runs()
        .replace_all(header, "_")
        .trim_matches('_')
        .to_ascii_lowercase()
}

pub fn parse_csv(bytes: &[u8], options: &ParseOptions) -> Result<ParsedDataset, ParseError> {
    if bytes.is_empty() {
        return Err(ParseError::EmptyUpload);
    }
    let text = io_utils::decode_utf8(bytes).ok_or(ParseError::Undecodable)?;

    let delimiter = match options.delimiter {
        Some(delimiter) => delimiter,
        None => io_utils::sniff_delimiter(&text, options.sniff_bytes).unwrap_or_else(|| {
            debug!("Delimiter sniffing found no candidate; using the default dialect");
            DEFAULT_CSV_DELIMITER
        }),
    };
    debug!(
        "Parsing upload with delimiter '{}'",
        io_utils::printable_delimiter(delimiter)
    );

    let mut reader = io_utils::open_csv_reader(text.as_bytes(), delimiter);
    let mut records = reader.records();
    let header = match records.next() {
        Some(Ok(record)) if !record.is_empty() => record,
        Some(Err(source)) => return Err(malformed(source)),
        _ => return Err(ParseError::MissingHeader),
    };

    let header_map = header.iter().map(normalize_header).collect::<Vec<_>>();
    let mut columns: Vec<String> = Vec::with_capacity(header_map.len());
    let mut original_headers = BTreeMap::new();
    for (original, normalized) in header.iter().zip(&header_map) {
        if !columns.contains(normalized) {
            columns.push(normalized.clone());
        }
        original_headers.insert(normalized.clone(), original.to_string());
    }

    let mut rows = Vec::new();
    let mut blank_rows = 0usize;
    for record in records {
        let record = record.map_err(malformed)?;
        let line_number = record.position().map(|pos| pos.line()).unwrap_or_default();
        let mut values = BTreeMap::new();
        let mut meaningful = false;
        for (idx, normalized) in header_map.iter().enumerate() {
            let value = record.get(idx).unwrap_or("").trim();
            meaningful |= !value.is_empty();
            values.insert(normalized.clone(), value.to_string());
        }
        if !meaningful {
            blank_rows += 1;
            continue;
        }
        rows.push(ParsedRow {
            line_number,
            values,
        });
    }

    if rows.is_empty() {
        return Err(ParseError::NoDataRows);
    }
    info!(
        "Parsed {} data row(s) across {} column(s); dropped {} blank row(s)",
        rows.len(),
        columns.len(),
        blank_rows
    );

    Ok(ParsedDataset {
        columns,
        original_headers,
        rows,
        delimiter,
    })
}

fn malformed(source: csv::Error) -> ParseError {
    let line = source
        .position()
        .map(|pos| pos.line())
        .unwrap_or_default();
    ParseError::Malformed { line, source }
}
