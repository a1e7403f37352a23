//! Integration tests for the dint CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a dint command isolated from the user's config
fn dint(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dint").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join(".config"))
        .env_remove("DINT_TEMPLATES_DIR")
        .env_remove("DINT_FORMAT")
        .env_remove("DINT_LOG");
    cmd
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// GD&T Tests
// ============================================================================

#[test]
fn test_gdt_parse_text() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["gdt", "parse", "position DIA 0.25 MMC A B C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("position | DIA 0.25 MMC | A | B | C"))
        .stdout(predicate::str::contains("Valid per ASME Y14.5"));
}

#[test]
fn test_gdt_parse_json_with_virtual_condition() {
    let tmp = TempDir::new().unwrap();
    let output = dint(&tmp)
        .args(["gdt", "parse", "position 0.1 MMC A", "--size", "10", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = json_stdout(&output);
    assert_eq!(json["specification"]["characteristic"], "position");
    assert_eq!(json["valid"], true);
    let vc = json["virtual_condition"].as_f64().unwrap();
    assert!((vc - 10.1).abs() < 1e-10);

    let output = dint(&tmp)
        .args(["gdt", "parse", "position 0.1 MMC A", "--size", "10", "--internal", "-f", "json"])
        .output()
        .unwrap();
    let vc = json_stdout(&output)["virtual_condition"].as_f64().unwrap();
    assert!((vc - 9.9).abs() < 1e-10);
}

#[test]
fn test_gdt_parse_unknown_characteristic_fails() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["gdt", "parse", "roundness 0.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized characteristic"));
}

#[test]
fn test_gdt_check_passes_valid_frame() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["gdt", "check", "position 0.5 MMC A B C"])
        .assert()
        .success();
}

#[test]
fn test_gdt_check_rejects_form_with_datum() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["gdt", "check", "flatness 0.05 A"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Form tolerance 'flatness' must not reference datums.",
        ))
        .stderr(predicate::str::contains("1 rule violated"));
}

#[test]
fn test_gdt_code_warns_on_fourth_datum() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["gdt", "code", "position 0.5 A B C D"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gtol.SetFrameDatumRef2(0, 2, \"C\""))
        .stdout(predicate::str::contains("\"D\"").not())
        .stderr(predicate::str::contains("dropped datum reference(s): D"));
}

#[test]
fn test_gdt_code_composite_and_pair() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["gdt", "code", "position 0.5 A", "--refine", "0.1", "--pair"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "// Apply a position tolerance of 0.5 with datum references A to the selected feature.",
        ))
        .stdout(predicate::str::contains("// Composite refinement row"));
}

// ============================================================================
// Sketch Tests
// ============================================================================

#[test]
fn test_sketch_parse_json() {
    let tmp = TempDir::new().unwrap();
    let output = dint(&tmp)
        .args(["sketch", "parse", "line L1 is horizontal", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["kind"], "horizontal");
    assert_eq!(json["entity1"]["name"], "L1");
}

#[test]
fn test_sketch_parse_garbage_fails() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["sketch", "parse", "make it look nice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to parse sketch constraint"));
}

#[test]
fn test_sketch_code_binary_relation() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["sketch", "code", "line AB perpendicular to line CD"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "sketchMgr.AddConstraint((int)swConstraintType_e.swConstraintTypePerpendicular);",
        ));
}

#[test]
fn test_sketch_dof_fully_defined() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["sketch", "dof", "--entities", "1", "point P1 is fixed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 total, 2 consumed, 0 remaining"))
        .stdout(predicate::str::contains("fully defined"));
}

#[test]
fn test_sketch_dof_under_defined_json() {
    let tmp = TempDir::new().unwrap();
    let output = dint(&tmp)
        .args(["sketch", "dof", "-e", "2", "line L1 is horizontal", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["is_fully_defined"], false);
    assert_eq!(json["dof_total"], 4);
    assert_eq!(json["dof_remaining"], 3);
}

#[test]
fn test_sketch_dim_with_tolerance() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["sketch", "dim", "L1", "distance", "25", "--plus", "0.1", "--minus", "-0.05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dimension dim = (Dimension)modelDoc.AddDimension2(0, 0, 0);"))
        .stdout(predicate::str::contains("tolObj.MaxValue = 0.1;"))
        .stdout(predicate::str::contains("tolObj.MinValue = 0.05;"));
}

// ============================================================================
// Parameter Space Tests
// ============================================================================

#[test]
fn test_params_list() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["params", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mounting_hole"))
        .stdout(predicate::str::contains("extrusion_depth"))
        .stdout(predicate::str::contains("8 space(s) found"));
}

#[test]
fn test_params_show_dependencies() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["params", "show", "mounting_hole"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hole_diameter"))
        .stdout(predicate::str::contains("[5.0, 50.0]"))
        .stdout(predicate::str::contains("Dependencies:"));
}

#[test]
fn test_params_resolve_mounting_hole() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["params", "resolve", "mounting_hole", "-s", "hole_diameter=12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hole_diameter_dim.SetValue(12.0);"))
        .stdout(predicate::str::contains("hole_diameter_dim.SetTolerance(0.1, -0.1);"));
}

#[test]
fn test_params_resolve_template_space() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["params", "resolve", "fillet_feature", "--set", "radius_mm=3"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("' Fillet: radius=3.0mm"));
}

#[test]
fn test_params_resolve_reports_unknown_key() {
    let tmp = TempDir::new().unwrap();
    let output = dint(&tmp)
        .args(["params", "resolve", "fillet_feature", "-s", "bogus=1", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = json_stdout(&output);
    let errors = json["validation_errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().contains("Unknown parameter 'bogus'"));
}

#[test]
fn test_params_resolve_unknown_space_fails() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["params", "resolve", "no_such_space"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parameter space 'no_such_space' not found"));
}

#[test]
fn test_params_template_placeholders() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["params", "template", "mounting_hole"])
        .assert()
        .success()
        .stdout(predicate::str::contains("// Generated from parameter space:"))
        .stdout(predicate::str::contains("{{hole_diameter}}"));
}

#[test]
fn test_params_dict() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["params", "dict", "mounting_hole", "-s", "hole_diameter=20"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("new Dictionary<string, object>"))
        .stdout(predicate::str::contains("[\"hole_diameter\"] = 20.0"));
}

#[test]
fn test_params_dict_rejects_out_of_range() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["params", "dict", "mounting_hole", "-s", "hole_diameter=80"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("violates constraint"));
}

// ============================================================================
// Batch Tests
// ============================================================================

#[test]
fn test_batch_plain_lines() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("frames.txt");
    fs::write(&input, "# frames\nposition 0.5 MMC A B C\nroundness 0.1\n\nflatness 0.05\n").unwrap();

    let output = dint(&tmp)
        .args(["batch", "gdt", input.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["line"], 2);
    assert_eq!(records[0]["ok"], true);
    assert_eq!(records[1]["ok"], false);
    assert!(records[1]["error"].as_str().unwrap().contains("roundness"));
    assert_eq!(records[2]["line"], 5);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Batch Summary"));
    assert!(stderr.contains("Failed"));
}

#[test]
fn test_batch_csv_to_output_file() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("constraints.csv");
    let out = tmp.path().join("out.jsonl");
    fs::write(
        &input,
        "id,text\n1,line L1 is horizontal\n2,\"radius of arc A1 = 10\"\n",
    )
    .unwrap();

    dint(&tmp)
        .args(["batch", "sketch", input.to_str().unwrap(), "--pairs", "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&out).unwrap();
    let records: Vec<serde_json::Value> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["line"], 2);
    assert_eq!(records[0]["instruction"], "Make line 'L1' horizontal.");
    assert_eq!(records[1]["line"], 3);
    assert!(records[1]["code"].as_str().unwrap().contains("AddRadialDimension2"));
}

#[test]
fn test_batch_csv_requires_text_column() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("bad.csv");
    fs::write(&input, "phrase\nline L1 is horizontal\n").unwrap();

    dint(&tmp)
        .args(["batch", "sketch", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no 'text' column"));
}

#[test]
fn test_batch_fail_fast_stops() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("frames.txt");
    fs::write(&input, "position 0.5 A\nposition 0.5\nflatness 0.05\n").unwrap();

    let output = dint(&tmp)
        .args(["batch", "gdt", input.to_str().unwrap(), "--fail-fast"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("stopped at line 2"));
}

// ============================================================================
// Config and Misc Tests
// ============================================================================

#[test]
fn test_explicit_config_sets_default_format() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("dint.yaml");
    fs::write(&config, "default_format: json\n").unwrap();

    let output = dint(&tmp)
        .args(["--config", config.to_str().unwrap(), "sketch", "parse", "line L1 is vertical"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["kind"], "vertical");
}

#[test]
fn test_project_config_adds_spaces() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("slots.yaml"),
        "spaces:\n  - name: slot_cut\n    description: Slot cut\n    parameters:\n      - name: slot_depth\n        type: pad_depth\n        domain: feature\n        default_value: 4.0\n        constraint: positive\n",
    )
    .unwrap();
    fs::write(tmp.path().join(".dint.yaml"), "spaces:\n  - slots.yaml\n").unwrap();

    dint(&tmp)
        .args(["params", "resolve", "slot_cut", "-s", "slot_depth=6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("// Pad depth: 6.0mm"));
}

#[test]
fn test_templates_dir_override() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("tpl").join("spaces");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("fillet_feature.vba.tera"), "FILLET {{ radius_mm }}\n").unwrap();

    dint(&tmp)
        .env("DINT_TEMPLATES_DIR", tmp.path().join("tpl"))
        .args(["params", "resolve", "fillet_feature", "-s", "radius_mm=2"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("FILLET 2.0"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    dint(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dint"));
}
