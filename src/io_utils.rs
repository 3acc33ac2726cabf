//! Upload decoding, dialect sniffing, and CSV reader construction.
//!
//! - **Decoding**: uploads are UTF-8 with an optional byte-order mark,
//!   decoded through `encoding_rs` so malformed input is detected rather than
//!   silently replaced.
//! - **Dialect sniffing**: [`sniff_delimiter()`] scores the usual candidates
//!   over a sample of complete lines; callers fall back to a comma.
//! - **stdin**: the `-` path convention reads the upload from standard input.

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result};
use encoding_rs::UTF_8;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_SNIFF_BYTES: usize = 1024;

const DELIMITER_CANDIDATES: &[u8] = &[b',', b';', b'\t', b'|'];
const QUOTE: u8 = b'"';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

/// Reads the whole upload from `path`, or from stdin for `-`.
pub fn read_upload(path: &Path) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    if is_dash(path) {
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("Reading upload from stdin")?;
    } else {
        let mut reader =
            BufReader::new(File::open(path).with_context(|| format!("Opening input file {path:?}"))?);
        reader
            .read_to_end(&mut bytes)
            .with_context(|| format!("Reading input file {path:?}"))?;
    }
    Ok(bytes)
}

/// Decodes UTF-8 text, dropping a leading byte-order mark.
///
/// Returns `None` when the bytes are not valid UTF-8.
pub fn decode_utf8(bytes: &[u8]) -> Option<String> {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

/// Guesses the delimiter of `text` from its first `sample_bytes` bytes.
///
/// Each candidate is counted outside quoted sections on every complete line of
/// the sample and scored by its mean count damped by the spread across lines,
/// so a character that shows up the same number of times on every line beats
/// one that is merely frequent. Returns `None` when no candidate occurs.
pub fn sniff_delimiter(text: &str, sample_bytes: usize) -> Option<u8> {
    let sample = sample_lines(text, sample_bytes);
    if sample.is_empty() {
        return None;
    }

    let mut best: Option<(u8, f64)> = None;
    for &candidate in DELIMITER_CANDIDATES {
        let counts = sample
            .iter()
            .map(|line| count_unquoted(line, candidate))
            .collect::<Vec<_>>();
        let total: usize = counts.iter().sum();
        if total == 0 {
            continue;
        }
        let mean = total as f64 / counts.len() as f64;
        let variance = counts
            .iter()
            .map(|&count| (count as f64 - mean).powi(2))
            .sum::<f64>()
            / counts.len() as f64;
        let score = mean / (1.0 + variance.sqrt());
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }
    best.map(|(delimiter, _)| delimiter)
}

fn sample_lines(text: &str, sample_bytes: usize) -> Vec<&str> {
    let mut end = sample_bytes.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let truncated = end < text.len();
    let mut lines = text[..end]
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();
    // The last line of a cut sample is partial unless it is the only one.
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    lines
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == QUOTE {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Reader over decoded upload text. Rows may be ragged; the header is read
/// as an ordinary record.
pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(delimiter)
        .quote(QUOTE)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
