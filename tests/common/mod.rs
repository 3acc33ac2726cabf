#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use survey_import::{
    config::ImportConfig,
    importer::{ImportSummary, Importer},
    parser::{ParseOptions, ParsedDataset, parse_csv},
    registry::Registry,
    store::MemoryStore,
};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

pub fn parse(text: &str) -> ParsedDataset {
    parse_csv(text.as_bytes(), &ParseOptions::default()).expect("parse upload")
}

/// Parses `text` and imports it into `store` under the default settings.
pub fn import_text(store: &mut MemoryStore, target: &str, text: &str) -> ImportSummary {
    let registry = Registry::standard();
    let dataset = registry.get(target).expect("known target");
    let parsed = parse(text);
    Importer::new(dataset, &ImportConfig::default()).import_rows(store, &parsed.rows)
}
