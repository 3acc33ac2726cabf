mod common;

use std::fs;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::str::contains;
use survey_import::store::MemoryStore;

fn survey_import() -> Command {
    Command::cargo_bin("survey-import").expect("binary exists")
}

#[test]
fn targets_lists_every_dataset() {
    survey_import()
        .arg("targets")
        .assert()
        .success()
        .stdout(contains("farmers"))
        .stdout(contains("Farmers (Basic Profile)"))
        .stdout(contains("irrigated_rainfed"))
        .stdout(contains("farmer_id, crop_name, particular"));
}

#[test]
fn targets_describes_expected_columns() {
    survey_import()
        .args(["targets", "--target", "land_holdings"])
        .assert()
        .success()
        .stdout(contains("Land Holdings (land_holdings)"))
        .stdout(contains("total_area_ha"))
        .stdout(contains("decimal(10,2)"));
}

#[test]
fn unknown_target_is_rejected() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("farmers.csv", "name\nAsha\n");
    survey_import()
        .args(["import", "-t", "livestock", "-i", input.to_str().unwrap()])
        .current_dir(workspace.path())
        .assert()
        .failure()
        .stderr(contains("Unknown import target 'livestock'"));
}

#[test]
fn preview_reports_column_mapping() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "holdings.csv",
        "Category;Total Area (ha);Remarks\nIrrigated;2.5;good soil\n",
    );
    survey_import()
        .args(["preview", "-t", "land_holdings", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Data rows: 1"))
        .stdout(contains("Delimiter: ';'"))
        .stdout(contains("Total Area (ha)"))
        .stdout(contains("Ignored columns: Remarks"))
        .stdout(contains("required columns are missing: Farmer Id"));
}

#[test]
fn import_refuses_uploads_missing_required_columns() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("holdings.csv", "category,total_area_ha\nIrrigated,2.5\n");
    let store = workspace.path().join("store.json");
    survey_import()
        .args([
            "import",
            "-t",
            "land_holdings",
            "-i",
            input.to_str().unwrap(),
            "--store",
            store.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Required columns are missing: Farmer Id"));
    assert!(!store.exists());
}

#[test]
fn import_saves_store_and_links_child_rows() {
    let workspace = TestWorkspace::new();
    let store = workspace.path().join("store.json");
    let farmers = workspace.write("farmers.csv", "Name,District\nAsha,Solapur\n");
    survey_import()
        .args([
            "import",
            "-t",
            "farmers",
            "-i",
            farmers.to_str().unwrap(),
            "--store",
            store.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("Imported 1 rows into Farmers (Basic Profile)."));

    let saved = MemoryStore::load(&store).expect("load store");
    let farmer_id = saved.records("Farmer")[0].id;
    let assets = workspace.write(
        "assets.csv",
        &format!("farmer_id,item_name\n{farmer_id},Tractor\n{farmer_id},\n"),
    );
    survey_import()
        .args([
            "import",
            "-t",
            "assets",
            "-i",
            assets.to_str().unwrap(),
            "--store",
            store.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("Imported 1 rows into Assets with 1 errors."))
        .stdout(contains("Missing value for required column 'item_name'"))
        .stdout(contains("item_name=—"));

    let saved = MemoryStore::load(&store).expect("reload store");
    assert_eq!(saved.records("Asset").len(), 1);
}

#[test]
fn dry_run_leaves_store_untouched() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("farmers.csv", "name\nAsha\nRavi\n");
    let store = workspace.path().join("store.json");
    survey_import()
        .args([
            "import",
            "-t",
            "farmers",
            "-i",
            input.to_str().unwrap(),
            "--store",
            store.to_str().unwrap(),
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(contains("Created: 2"));
    assert!(!store.exists());
}

#[test]
fn json_summary_and_strict_mode() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("farmers.csv", "name,family_males\nAsha,2\nRavi,-1\n");
    let store = workspace.path().join("store.json");
    let output = survey_import()
        .args([
            "import",
            "-t",
            "farmers",
            "-i",
            input.to_str().unwrap(),
            "--store",
            store.to_str().unwrap(),
            "--json",
        ])
        .output()
        .expect("run import");
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json summary");
    assert_eq!(summary["total_rows"], 2);
    assert_eq!(summary["created"], 1);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["errors"][0]["row_number"], 3);

    fs::remove_file(&store).expect("remove store");
    survey_import()
        .args([
            "import",
            "-t",
            "farmers",
            "-i",
            input.to_str().unwrap(),
            "--store",
            store.to_str().unwrap(),
            "--strict",
        ])
        .assert()
        .failure()
        .stderr(contains("1 row(s) failed to import"));
}

#[test]
fn header_only_upload_fails_with_no_data_rows() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("farmers.csv", "name,district\n");
    survey_import()
        .args(["preview", "-t", "farmers", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("No data rows were detected in the uploaded file."));
}

#[test]
fn stdin_uploads_are_accepted() {
    let workspace = TestWorkspace::new();
    let store = workspace.path().join("store.json");
    survey_import()
        .args([
            "import",
            "-t",
            "farmers",
            "-i",
            "-",
            "--store",
            store.to_str().unwrap(),
        ])
        .write_stdin("name|village\nAsha|Malegaon\n")
        .assert()
        .success()
        .stdout(contains("Created: 1"));
}
