//! CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();

        let mut visual = Vec::new();
        for i in 0..10 {
            visual.push(json!({
                "id": format!("v{i}"),
                "species_or_class": "white_birds",
                "confidence": 0.9,
                "lat": 11.0142,
                "lon": 76.9531,
                "timestamp": "2025-02-10T06:30:00Z",
                "bbox": [0.5, 0.5, 0.1, 0.1],
                "survey_id": 1
            }));
        }
        for i in 0..4 {
            visual.push(json!({
                "id": format!("b{i}"),
                "class_name": "black_birds",
                "confidence": 0.8,
                "lat": 11.0150,
                "lon": 76.9540,
                "timestamp": "2025-02-10T06:31:00Z",
                "survey_id": 1
            }));
        }

        let mut acoustic = Vec::new();
        for (species, n) in [("Great Egret", 6), ("Little Egret", 2), ("Asian Openbill", 5)] {
            for i in 0..n {
                acoustic.push(json!({
                    "id": format!("{species}-{i}"),
                    "species_or_class": species,
                    "confidence": 0.7,
                    "lat": 11.0145,
                    "lon": 76.9533,
                    "timestamp": "2025-02-10T06:40:00Z",
                    "aru_id": 1
                }));
            }
        }
        acoustic.push(json!({
            "id": "far",
            "species_or_class": "Grey Heron",
            "confidence": 0.7,
            "lat": 11.0900,
            "lon": 76.9533,
            "timestamp": "2025-02-10T06:40:00Z",
            "aru_id": 2
        }));

        std::fs::write(dir.path().join("visual.json"), Value::Array(visual).to_string()).unwrap();
        std::fs::write(
            dir.path().join("acoustic.json"),
            Value::Array(acoustic).to_string(),
        )
        .unwrap();

        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> PathBuf {
        self.path("config.toml")
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("colonyfuse");
        cmd.env_remove("RUST_LOG")
            .env_remove("COLONYFUSE_OUTPUT")
            .arg("--config")
            .arg(self.config());
        cmd
    }
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_report_json_with_configured_mapping() {
    let fx = Fixture::new();

    fx.cmd().args(["colors", "init"]).assert().success();
    fx.cmd()
        .args(["colors", "set", "black", "Asian Openbill"])
        .assert()
        .success();

    let visual = fx.path("visual.json");
    let acoustic = fx.path("acoustic.json");
    let assert = fx
        .cmd()
        .args(["report", "--output", "json", "--visual", arg(&visual)])
        .args(["--acoustic", arg(&acoustic), "--aru", "1"])
        .assert()
        .success();

    let value = stdout_json(&assert.get_output().stdout);
    assert_eq!(value["event"], "result");
    let payload = &value["payload"];
    assert_eq!(payload["result_type"], "fusion_report");
    assert_eq!(payload["aru_id"], 1);
    assert_eq!(payload["visual_counts"]["white_birds"], 10);

    let inferences = payload["inferences"].as_array().unwrap();
    assert_eq!(inferences.len(), 2);
    assert_eq!(inferences[0]["drone_class"], "white_birds");
    assert_eq!(inferences[0]["species_breakdown"][0]["species"], "Great Egret");
    assert_eq!(inferences[0]["species_breakdown"][0]["probability"], 75);
    assert_eq!(inferences[0]["species_breakdown"][1]["probability"], 25);
    assert_eq!(inferences[0]["unidentified"], 2);
    assert_eq!(inferences[0]["confidence_score"], 80);
    assert_eq!(inferences[1]["drone_class"], "black_birds");
    assert_eq!(inferences[1]["explained_count"], 4);
    assert_eq!(inferences[1]["confidence_score"], 100);
}

#[test]
fn test_report_without_mapping_degrades() {
    let fx = Fixture::new();
    let visual = fx.path("visual.json");
    let acoustic = fx.path("acoustic.json");

    fx.cmd()
        .args(["report", "--visual", arg(&visual), "--acoustic", arg(&acoustic)])
        .assert()
        .success()
        .stdout(predicate::str::contains("No color mapping configured"))
        .stdout(predicate::str::contains("white_birds"))
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_correlate_lists_nearby_recordings() {
    let fx = Fixture::new();
    let visual = fx.path("visual.json");
    let acoustic = fx.path("acoustic.json");

    let assert = fx
        .cmd()
        .args(["correlate", "--output", "json", "--anchor", "v0"])
        .args(["--visual", arg(&visual), "--acoustic", arg(&acoustic)])
        .assert()
        .success();

    let value = stdout_json(&assert.get_output().stdout);
    let payload = &value["payload"];
    assert_eq!(payload["result_type"], "correlation");
    assert_eq!(payload["anchor"]["id"], "v0");
    let matches = payload["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 13);
    assert!(matches.iter().all(|m| m["modality"] == "acoustic"));
    assert!(matches.iter().all(|m| m["detection"]["id"] != "far"));
}

#[test]
fn test_correlate_window_override_excludes_matches() {
    let fx = Fixture::new();
    let visual = fx.path("visual.json");
    let acoustic = fx.path("acoustic.json");

    fx.cmd()
        .args(["correlate", "--anchor", "v0", "--max-minutes", "5"])
        .args(["--visual", arg(&visual), "--acoustic", arg(&acoustic)])
        .assert()
        .success()
        .stdout(predicate::str::contains("No acoustic matches."));
}

#[test]
fn test_correlate_unknown_anchor_fails() {
    let fx = Fixture::new();
    let visual = fx.path("visual.json");
    let acoustic = fx.path("acoustic.json");

    fx.cmd()
        .args(["correlate", "--anchor", "missing"])
        .args(["--visual", arg(&visual), "--acoustic", arg(&acoustic)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("detection 'missing' not found"));
}

#[test]
fn test_stations_filtered_by_footprint() {
    let fx = Fixture::new();
    let visual = fx.path("visual.json");
    let acoustic = fx.path("acoustic.json");

    fx.cmd()
        .args(["stations", "--acoustic", arg(&acoustic)])
        .assert()
        .success()
        .stdout(predicate::str::contains("ARU 1"))
        .stdout(predicate::str::contains("ARU 2"));

    fx.cmd()
        .args(["stations", "--acoustic", arg(&acoustic), "--visual", arg(&visual)])
        .assert()
        .success()
        .stdout(predicate::str::contains("ARU 1"))
        .stdout(predicate::str::contains("ARU 2").not());
}

#[test]
fn test_colors_show_and_clear() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["colors", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("colonyfuse colors init"));

    fx.cmd().args(["colors", "init"]).assert().success();
    fx.cmd().args(["colors", "clear", "brown"]).assert().success();

    let assert = fx
        .cmd()
        .args(["colors", "show", "--output", "json"])
        .assert()
        .success();
    let value = stdout_json(&assert.get_output().stdout);
    let mapping = value["payload"]["species_color_mapping"].as_object().unwrap();
    assert_eq!(mapping.len(), 3);
    assert!(!mapping.contains_key("brown"));
    assert_eq!(mapping["grey"][0], "Grey Heron");
}

#[test]
fn test_invalid_color_rejected() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["colors", "set", "pink", "Greater Flamingo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown color 'pink'"));
}

#[test]
fn test_config_path_and_init() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    fx.cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(fx.config().exists());

    fx.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_distance_m = 500.0"));
}

#[test]
fn test_json_mode_reports_errors_as_envelope() {
    let fx = Fixture::new();
    let visual = fx.path("visual.json");
    let acoustic = fx.path("acoustic.json");

    let assert = fx
        .cmd()
        .args(["correlate", "--output", "json", "--anchor", "missing"])
        .args(["--visual", arg(&visual), "--acoustic", arg(&acoustic)])
        .assert()
        .failure();

    let value = stdout_json(&assert.get_output().stdout);
    assert_eq!(value["event"], "error");
    assert_eq!(value["payload"]["code"], "detection_not_found");
}

#[test]
fn test_json_mode_init_commands_print_status_envelopes() {
    let fx = Fixture::new();

    let assert = fx
        .cmd()
        .args(["config", "init", "--output", "json"])
        .assert()
        .success();
    let value = stdout_json(&assert.get_output().stdout);
    assert_eq!(value["event"], "result");
    assert_eq!(value["payload"]["result_type"], "status");
    assert_eq!(value["payload"]["changed"], true);

    let assert = fx
        .cmd()
        .args(["config", "init", "--output", "json"])
        .assert()
        .success();
    assert_eq!(stdout_json(&assert.get_output().stdout)["payload"]["changed"], false);

    fx.cmd().args(["colors", "init"]).assert().success();
    let assert = fx
        .cmd()
        .args(["colors", "init", "--output", "json"])
        .assert()
        .success();
    let value = stdout_json(&assert.get_output().stdout);
    assert_eq!(value["payload"]["result_type"], "status");
    assert_eq!(value["payload"]["changed"], false);
    assert!(
        value["payload"]["message"]
            .as_str()
            .unwrap()
            .contains("--force")
    );

    let assert = fx
        .cmd()
        .args(["config", "path", "--output", "json"])
        .assert()
        .success();
    let value = stdout_json(&assert.get_output().stdout);
    assert!(value["payload"]["path"].as_str().unwrap().ends_with("config.toml"));
}

#[test]
fn test_report_survives_malformed_records() {
    let fx = Fixture::new();
    let visual = fx.path("visual.json");
    let acoustic = fx.path("mixed.json");
    std::fs::write(
        &acoustic,
        json!([
            {"id": "ok", "species_or_class": "Great Egret", "confidence": 0.8, "aru_id": 1},
            {"id": "bad", "species_or_class": "Great Egret", "confidence": 1.2, "aru_id": 1}
        ])
        .to_string(),
    )
    .unwrap();

    let assert = fx
        .cmd()
        .args(["report", "--output", "json", "--visual", arg(&visual)])
        .args(["--acoustic", arg(&acoustic)])
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping record 2"));

    let value = stdout_json(&assert.get_output().stdout);
    assert_eq!(value["payload"]["acoustic_counts"]["Great Egret"], 1);
}

#[test]
fn test_anchor_modality_settles_id_clash() {
    let fx = Fixture::new();
    let visual = fx.path("visual.json");
    let acoustic = fx.path("clash.json");
    std::fs::write(
        &acoustic,
        json!([{
            "id": "v0",
            "species_or_class": "Great Egret",
            "confidence": 0.7,
            "lat": 11.0145,
            "lon": 76.9533,
            "timestamp": "2025-02-10T06:40:00Z",
            "aru_id": 1
        }])
        .to_string(),
    )
    .unwrap();

    let run = |modality: Option<&str>| {
        let mut cmd = fx.cmd();
        cmd.args(["correlate", "--output", "json", "--anchor", "v0"])
            .args(["--visual", arg(&visual), "--acoustic", arg(&acoustic)]);
        if let Some(m) = modality {
            cmd.args(["--anchor-modality", m]);
        }
        stdout_json(&cmd.assert().success().get_output().stdout)
    };

    let default = run(None);
    assert_eq!(default["payload"]["matches"][0]["modality"], "acoustic");

    let acoustic_anchor = run(Some("acoustic"));
    assert_eq!(acoustic_anchor["payload"]["anchor"]["aru_id"], 1);
    let matches = acoustic_anchor["payload"]["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 14);
    assert!(matches.iter().all(|m| m["modality"] == "visual"));
}
