use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("link_doublet").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn run_json(args: &[&str]) -> Value {
    let exe = assert_cmd::cargo_bin!("deepvisual-cli");
    let output = Command::new(exe)
        .current_dir(repo_root())
        .args(args)
        .output()
        .expect("run deepvisual-cli");
    assert!(
        output.status.success(),
        "deepvisual-cli failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn edge_ids(plan: &Value) -> Vec<u64> {
    plan["plan"]["instructions"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| {
            matches!(
                i["kind"].as_str(),
                Some("selfLoopEdge" | "straightOrCurvedEdge")
            )
        })
        .map(|i| i["relationId"].as_u64().unwrap())
        .collect()
}

#[test]
fn classify_reports_tiers() {
    let path = fixture("basic.json");
    let json = run_json(&["classify", path.to_string_lossy().as_ref()]);

    assert_eq!(json["entities"], serde_json::json!(["A", "B"]));
    let tiers: Vec<&str> = json["relations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["tier"].as_str().unwrap())
        .collect();
    assert_eq!(tiers, vec!["selfLoop", "selfLoop", "direct"]);
    assert_eq!(json["entityEdges"][0]["from"], "A");
    assert_eq!(json["entityEdges"][0]["to"], "B");
}

#[test]
fn layout_places_entities_on_the_circle() {
    let path = fixture("basic.json");
    let json = run_json(&["layout", "--radius", "2", path.to_string_lossy().as_ref()]);

    let a = &json["layout"]["positions"]["A"];
    assert!((a[0].as_f64().unwrap() - 2.0).abs() < 1e-12);
    assert!(a[1].as_f64().unwrap().abs() < 1e-12);
    assert_eq!(json["anchors"]["anchors"].as_array().unwrap().len(), 3);
}

#[test]
fn plan_reads_stdin_by_default() {
    let text = fs::read_to_string(fixture("indirect.json")).unwrap();
    let exe = assert_cmd::cargo_bin!("deepvisual-cli");
    let output = assert_cmd::Command::new(exe)
        .current_dir(repo_root())
        .write_stdin(text)
        .output()
        .expect("run deepvisual-cli");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(edge_ids(&json), vec![1, 2, 3, 4, 5, 6, 7]);
    assert!(json.get("clusters").is_none());
    assert_eq!(json["diagnostics"], serde_json::json!([]));
}

#[test]
fn plan_with_cluster_flag_colors_by_cluster() {
    let path = fixture("triangles.json");
    let json = run_json(&["plan", "--cluster", path.to_string_lossy().as_ref()]);

    assert_eq!(json["clusters"]["clusterCount"], 2);
    assert_eq!(json["clusters"]["converged"], true);
}

#[test]
fn yaml_config_is_applied() {
    let config = fixture("clustered.yaml");
    let path = fixture("triangles.json");
    let json = run_json(&[
        "plan",
        "--config",
        config.to_string_lossy().as_ref(),
        path.to_string_lossy().as_ref(),
    ]);

    let colors: Vec<&str> = json["plan"]["instructions"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["kind"] == "selfLoopEdge")
        .map(|i| i["color"].as_str().unwrap())
        .collect();
    assert_eq!(colors, vec!["red", "red", "red", "blue", "blue", "blue"]);

    let first = &json["plan"]["instructions"][0];
    assert_eq!(first["kind"], "nodeMarker");
    assert!((first["position"][0].as_f64().unwrap() - 3.0).abs() < 1e-12);
}

#[test]
fn no_labels_flag_drops_labels() {
    let path = fixture("basic.json");
    let json = run_json(&["plan", "--no-labels", path.to_string_lossy().as_ref()]);
    assert!(
        json["plan"]["instructions"]
            .as_array()
            .unwrap()
            .iter()
            .all(|i| i["kind"] != "label")
    );
}

#[test]
fn positional_syntax_reads_bare_row_numbers() {
    let path = fixture("positional.json");
    let json = run_json(&[
        "classify",
        "--syntax",
        "positional",
        path.to_string_lossy().as_ref(),
    ]);
    assert_eq!(json["relations"][2]["tier"], "direct");
    assert_eq!(json["relations"][3]["tier"], "indirect");
    assert_eq!(json["diagnostics"], serde_json::json!([]));

    // Under the default syntax the bare numbers are plain labels.
    let json = run_json(&["classify", path.to_string_lossy().as_ref()]);
    assert_eq!(json["relations"].as_array().unwrap().len(), 2);
    assert_eq!(json["diagnostics"].as_array().unwrap().len(), 2);
}

#[test]
fn unresolved_rows_warn_but_succeed() {
    let path = fixture("unresolved.json");
    let exe = assert_cmd::cargo_bin!("deepvisual-cli");
    let output = Command::new(exe)
        .current_dir(repo_root())
        .args(["plan", path.to_string_lossy().as_ref()])
        .output()
        .expect("run deepvisual-cli");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(edge_ids(&json), vec![1, 3]);
    let kinds: Vec<&str> = json["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["unresolvedRow", "unresolvedRow"]);
    assert_eq!(json["diagnostics"][0]["relationId"], 2);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARN"), "stderr: {stderr}");
}

#[test]
fn out_flag_writes_a_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("plan.json");
    let path = fixture("basic.json");

    let exe = assert_cmd::cargo_bin!("deepvisual-cli");
    Command::new(exe)
        .current_dir(repo_root())
        .args([
            "plan",
            "--pretty",
            "--out",
            out.to_string_lossy().as_ref(),
            path.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let text = fs::read_to_string(&out).expect("read plan");
    assert!(text.contains("\n  \"plan\""));
    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(edge_ids(&json), vec![1, 2, 3]);
}

#[test]
fn table_without_entities_fails() {
    let path = fixture("no_entities.json");
    let exe = assert_cmd::cargo_bin!("deepvisual-cli");
    let output = Command::new(exe)
        .current_dir(repo_root())
        .args(["plan", path.to_string_lossy().as_ref()])
        .output()
        .expect("run deepvisual-cli");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no entities"));
}

#[test]
fn invalid_color_in_config_fails() {
    let config = fixture("bad_color.json");
    let path = fixture("basic.json");
    let exe = assert_cmd::cargo_bin!("deepvisual-cli");
    let output = Command::new(exe)
        .current_dir(repo_root())
        .args([
            "plan",
            "--config",
            config.to_string_lossy().as_ref(),
            path.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run deepvisual-cli");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("edgeColor"));
}

#[test]
fn unknown_flag_prints_usage() {
    let exe = assert_cmd::cargo_bin!("deepvisual-cli");
    let output = Command::new(exe)
        .arg("--bogus")
        .output()
        .expect("run deepvisual-cli");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("USAGE"));
}
