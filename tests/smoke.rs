use assert_cmd::Command;

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("mri-advisor").expect("binary exists");
    cmd.env_remove("MRI_RULES_PATH").env_remove("MRI_TAGGER");
    cmd
}

#[test]
fn cli_help_works() {
    bin().arg("--help").assert().success();
}

#[test]
fn analyze_prints_a_json_report() {
    let output = bin()
        .args(["analyze", "--text", "Pt c/o sudden severe HA with confusion"])
        .output()
        .expect("run analyze");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(
        report["normalized_text"],
        "patient complains of sudden severe headache with confusion"
    );
    assert_eq!(report["tier"], "strongly_recommended");
    assert_eq!(report["recommendation"]["red_flags_detected"], true);
}

#[test]
fn analyze_reads_stdin() {
    let output = bin()
        .args(["analyze", "--recommendation-only"])
        .write_stdin("mild occasional fatigue")
        .output()
        .expect("run analyze");
    assert!(output.status.success());
    let rec: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(rec["symptom_count"], 1);
    assert_eq!(rec["degraded"], false);
}

#[test]
fn normalize_prints_clean_text() {
    let output = bin()
        .args(["normalize", "--text", "HA x 2 wks!!"])
        .output()
        .expect("run normalize");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "headache x 2 weeks");
}

#[test]
fn rules_check_rejects_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(&path, r#"{"symptom_weights": {"headache": 3.0}}"#).unwrap();
    bin()
        .args(["rules", "check"])
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn rules_dump_is_loadable_json() {
    let output = bin().args(["rules", "dump"]).output().expect("run dump");
    assert!(output.status.success());
    let tables: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(tables["version"], "builtin-1");
}
