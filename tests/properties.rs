mod common;

use proptest::prelude::*;
use survey_import::{
    parser::{ParseOptions, normalize_header, parse_csv},
    store::MemoryStore,
};

fn name_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{1,8}",
        Just(String::new()),
        Just("NA".to_string()),
        Just("null".to_string()),
    ]
}

fn count_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..20).prop_map(|n| n.to_string()),
        Just("-3".to_string()),
        Just("many".to_string()),
        Just(String::new()),
        Just("n/a".to_string()),
    ]
}

proptest! {
    #[test]
    fn header_normalization_is_idempotent(header in "\\PC{0,40}") {
        let once = normalize_header(&header);
        prop_assert_eq!(normalize_header(&once), once.clone());
        prop_assert!(!once.starts_with('_') && !once.ends_with('_'));
    }

    #[test]
    fn blank_lines_never_become_rows(
        cells in proptest::collection::vec("[a-z]{1,6}", 1..12),
        blank_after in proptest::collection::vec(0usize..3, 1..12)
    ) {
        let mut upload = String::from("name,village\n");
        for (idx, cell) in cells.iter().enumerate() {
            upload.push_str(&format!("{cell},v{idx}\n"));
            for _ in 0..blank_after.get(idx).copied().unwrap_or(0) {
                upload.push_str(" , \n");
            }
        }
        let parsed = parse_csv(upload.as_bytes(), &ParseOptions::default()).expect("parse");
        prop_assert_eq!(parsed.row_count(), cells.len());
    }

    #[test]
    fn every_row_is_created_skipped_or_failed(
        rows in proptest::collection::vec((name_cell(), count_cell()), 1..80)
    ) {
        let mut upload = String::from("Name,Family Males,Village\n");
        for (name, count) in &rows {
            upload.push_str(&format!("{name},{count},x\n"));
        }
        let mut store = MemoryStore::new();
        let summary = common::import_text(&mut store, "farmers", &upload);

        prop_assert_eq!(summary.total_rows, rows.len());
        prop_assert_eq!(
            summary.total_rows,
            summary.created + summary.skipped + summary.failed
        );
        prop_assert!(summary.errors.len() <= 50);
        prop_assert_eq!(summary.errors.len(), summary.failed.min(50));
    }
}
