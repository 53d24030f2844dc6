use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct TestFixture {
    _temp_dir: TempDir,
    data_dir: PathBuf,
    project_root: PathBuf,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".aecscan");
        let project_root = temp_dir.path().join("hq-tower");
        fs::create_dir_all(&data_dir).expect("Failed to create data dir");
        fs::create_dir_all(&project_root).expect("Failed to create project root");
        Self {
            _temp_dir: temp_dir,
            data_dir,
            project_root,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("aecscan").expect("binary built");
        cmd.env_remove("AECSCAN_PATH");
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    fn root(&self) -> &PathBuf {
        &self.project_root
    }
}

#[test]
fn help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("aecscan").expect("binary built");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("sessions"));
}

#[test]
fn init_scan_and_query_workflow() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("init")
        .arg(fixture.root())
        .arg("--project")
        .arg("PROJ2024")
        .arg("--name")
        .arg("HQ Tower")
        .assert()
        .success()
        .stdout(predicate::str::contains("PROJ2024"));

    let drawings = fixture.root().join("04_Construction_Documents/Architectural");
    fs::write(drawings.join("CD_A_DWG_001_R3_031524.pdf"), b"%PDF-1.7\n").expect("write drawing");

    // Project number comes from the sidecar written by init.
    fixture
        .command()
        .arg("scan")
        .arg(fixture.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan complete"));

    let output = fixture
        .command()
        .arg("--format")
        .arg("json")
        .arg("projects")
        .output()
        .expect("run projects");
    assert!(output.status.success());
    let projects: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("projects json");
    assert_eq!(projects[0]["project_number"], "PROJ2024");
    assert_eq!(projects[0]["project_name"], "HQ Tower");

    let output = fixture
        .command()
        .arg("--format")
        .arg("json")
        .arg("sessions")
        .output()
        .expect("run sessions");
    assert!(output.status.success());
    let sessions: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("sessions json");
    assert_eq!(sessions[0]["scan_kind"], "full");
    assert_eq!(sessions[0]["status"], "completed");

    fixture
        .command()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("active files"));
}

#[test]
fn scan_json_outcome_is_parseable() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .arg("init")
        .arg(fixture.root())
        .arg("--project")
        .arg("PROJ7001")
        .assert()
        .success();

    let output = fixture
        .command()
        .arg("--format")
        .arg("json")
        .arg("scan")
        .arg(fixture.root())
        .arg("--kind")
        .arg("full")
        .output()
        .expect("run scan");
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).expect("scan json");
    assert_eq!(outcome["success"], true);
    // The sidecar itself is catalogued.
    assert!(outcome["files_scanned"].as_u64().unwrap() >= 1);
}

#[test]
fn single_level_scan_ignores_subdirectories() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .arg("init")
        .arg(fixture.root())
        .arg("--project")
        .arg("PROJ7002")
        .assert()
        .success();
    let drawings = fixture.root().join("04_Construction_Documents/Architectural");
    fs::write(drawings.join("CD_A_DWG_001_R3_031524.pdf"), b"%PDF-1.7\n").expect("write drawing");

    let output = fixture
        .command()
        .arg("--format")
        .arg("json")
        .arg("scan")
        .arg(fixture.root())
        .arg("--single-level")
        .output()
        .expect("run scan");
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).expect("scan json");
    // Only the sidecar sits directly under the root.
    assert_eq!(outcome["files_scanned"], 1);
}

#[test]
fn projects_can_be_archived_and_reactivated() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .arg("init")
        .arg(fixture.root())
        .arg("--project")
        .arg("PROJ7003")
        .assert()
        .success();

    fixture
        .command()
        .arg("projects")
        .arg("--archive")
        .arg("PROJ7003")
        .assert()
        .success()
        .stdout(predicate::str::contains("archived"));

    let output = fixture
        .command()
        .arg("--format")
        .arg("json")
        .arg("projects")
        .output()
        .expect("run projects");
    let projects: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("projects json");
    assert_eq!(projects[0]["status"], "archived");

    fixture
        .command()
        .arg("projects")
        .arg("--activate")
        .arg("PROJ7003")
        .assert()
        .success();

    fixture
        .command()
        .arg("projects")
        .arg("--archive")
        .arg("UNKNOWN")
        .assert()
        .failure();
}

#[test]
fn status_shows_project_breakdown() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .arg("init")
        .arg(fixture.root())
        .arg("--project")
        .arg("PROJ7004")
        .assert()
        .success();
    let drawings = fixture.root().join("04_Construction_Documents/Architectural");
    fs::write(drawings.join("CD_A_DWG_001_R3_031524.pdf"), b"%PDF-1.7\n").expect("write drawing");
    fixture
        .command()
        .arg("scan")
        .arg(fixture.root())
        .assert()
        .success();

    fixture
        .command()
        .arg("status")
        .arg("--project")
        .arg("PROJ7004")
        .assert()
        .success()
        .stdout(predicate::str::contains("File types"))
        .stdout(predicate::str::contains(".pdf"))
        .stdout(predicate::str::contains("Disciplines"));
}

#[test]
fn scan_without_project_or_sidecar_fails() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .arg("scan")
        .arg(fixture.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("aecscan init"));
}

#[test]
fn extract_requires_scanned_project() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .arg("extract")
        .arg("--project")
        .arg("NOPE1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("NOPE1"));
}

#[test]
fn report_summarizes_a_tree() {
    let fixture = TestFixture::new();
    fs::write(fixture.root().join("a.pdf"), b"%PDF-1.4").expect("write");
    fs::write(fixture.root().join("b.txt"), b"notes").expect("write");

    let output = fixture
        .command()
        .arg("--format")
        .arg("json")
        .arg("report")
        .arg(fixture.root())
        .output()
        .expect("run report");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("report json");
    assert_eq!(report["total_files"], 2);
    assert_eq!(report["extension_counts"][".pdf"], 1);
}
