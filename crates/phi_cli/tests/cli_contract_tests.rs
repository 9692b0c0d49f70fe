//! CLI contract tests: subcommand surface, output shapes, exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("phi_cli").unwrap()
}

fn rules() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../rules/yegor.yaml")
}

const DECORATION: &str =
    "{ ⟦ a ↦ ⟦ b ↦ ⟦ c ↦ ∅, d ↦ ⟦ φ ↦ ξ.ρ.c ⟧ ⟧, e ↦ ξ.b(c ↦ ⟦ ⟧).d ⟧.e ⟧ }";
const DECORATION_NORMAL: &str =
    "{ ⟦ a ↦ ξ.b(c ↦ ⟦ ⟧).d(ρ ↦ ⟦ b ↦ ⟦ d ↦ ⟦ φ ↦ ξ.ρ.c, ν ↦ ⟦ Δ ⤍ 00- ⟧ ⟧, c ↦ ∅, ν ↦ ⟦ Δ ⤍ 00- ⟧ ⟧ ⟧) ⟧ }";

#[test]
fn help_lists_the_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("transform"))
        .stdout(predicate::str::contains("dataize"))
        .stdout(predicate::str::contains("test"))
        .stdout(predicate::str::contains("pipeline"));
}

#[test]
fn transform_help_shows_the_flag_surface() {
    cli()
        .args(["transform", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--rules"))
        .stdout(predicate::str::contains("--input-file"))
        .stdout(predicate::str::contains("--chain"))
        .stdout(predicate::str::contains("--single"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--output-file"));
}

#[test]
fn transform_single_prints_the_chosen_result() {
    cli()
        .args(["transform", "--rules", rules(), "--single", DECORATION])
        .assert()
        .success()
        .stdout(format!("{}\n", DECORATION_NORMAL));
}

#[test]
fn transform_default_prints_distinct_results() {
    cli()
        .args(["transform", "--rules", rules(), DECORATION])
        .assert()
        .success()
        .stdout(format!("{}\n", DECORATION_NORMAL));
}

#[test]
fn transform_chain_lists_every_ordering() {
    cli()
        .args(["transform", "--rules", rules(), "--chain", DECORATION])
        .assert()
        .success()
        // Exactly six reduction orderings, four steps each.
        .stdout(predicate::str::contains("chain 1 (complete, 4 steps):"))
        .stdout(predicate::str::contains("chain 6 (complete, 4 steps):"))
        .stdout(predicate::str::contains("chain 7").not())
        .stdout(predicate::str::contains("vertex → "))
        .stdout(predicate::str::contains("dot → "))
        .stdout(predicate::str::contains("nu → "));
}

#[test]
fn transform_json_has_the_documented_schema() {
    let output = cli()
        .args([
            "transform",
            "--rules",
            rules(),
            "--json",
            "{ ⟦ a ↦ ⟦ x ↦ Φ ⟧.x ⟧ }",
        ])
        .output()
        .expect("run CLI");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["schema_version"], 1);
    assert_eq!(json["ruleset"], "Yegor's normalization rules");
    assert_eq!(json["results"][0], "{ ⟦ a ↦ Φ(ρ ↦ ⟦ ⟧) ⟧ }");
    assert!(json.get("chains").is_none());
}

#[test]
fn dataize_prints_bytes() {
    let program = "⟦ Δ ⤍ 00-00-00-00-00-00-00-02, plus ↦ ⟦ λ ⤍ Lorg_eolang_int_plus, α0 ↦ ∅ ⟧ ⟧.plus(α0 ↦ ⟦ Δ ⤍ 00-00-00-00-00-00-00-03 ⟧)";
    cli()
        .args(["dataize", "--rules", rules(), program])
        .assert()
        .success()
        .stdout("00-00-00-00-00-00-00-05\n");
}

#[test]
fn dataize_json_reports_residuals() {
    let output = cli()
        .args(["dataize", "--rules", rules(), "--json", "{ ⟦ a ↦ ξ ⟧ }"])
        .output()
        .expect("run CLI");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["kind"], "residual");
    assert_eq!(json["output"], "{ ⟦ a ↦ ξ ⟧ }");
}

#[test]
fn parse_failures_exit_with_one() {
    cli()
        .args(["transform", "--rules", rules(), "⟦ broken"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn io_failures_exit_with_two() {
    cli()
        .args(["transform", "--rules", "/no/such/ruleset.yaml", "⟦ ⟧"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn malformed_rulesets_exit_with_one() {
    let dir = std::env::temp_dir().join(format!("phi_cli_bad_rules_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad.yaml");
    std::fs::write(&path, "rules:\n  - name: bad\n    pattern: \"!b()\"\n    result: \"!c\"\n")
        .unwrap();
    cli()
        .args(["transform", "--rules", path.to_str().unwrap(), "⟦ ⟧"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not bound"));
}

#[test]
fn output_file_receives_the_result() {
    let dir = std::env::temp_dir().join(format!("phi_cli_out_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("result.phi");
    cli()
        .args([
            "transform",
            "--rules",
            rules(),
            "--single",
            "--output-file",
            path.to_str().unwrap(),
            DECORATION,
        ])
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, format!("{}\n", DECORATION_NORMAL));
}

#[test]
fn test_subcommand_runs_the_embedded_vectors() {
    cli()
        .args(["test", "--rules", rules()])
        .assert()
        .success()
        .stdout(predicate::str::contains("20 vectors, 0 failed"));
}

#[test]
fn pipeline_subcommand_summarizes_the_configuration() {
    let dir = std::env::temp_dir().join(format!("phi_cli_pipeline_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("pipeline.yaml");
    std::fs::write(
        &path,
        r#"
report:
  json: report/report.json
  expected-improved-programs-percentage: 0.5
test-sets:
  - eo: corpus/sum.eo
    phi: corpus/sum.phi
    phi-normalized: corpus/sum.normalized.phi
    bindings-path-before: org.eolang.sum
    bindings-path-after: org.eolang.sum
  - eo: corpus/slow.eo
    phi: corpus/slow.phi
    phi-normalized: corpus/slow.normalized.phi
    bindings-path-before: org.eolang.slow
    bindings-path-after: org.eolang.slow
    enable: false
"#,
    )
    .unwrap();
    cli()
        .args(["pipeline", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 test set(s) enabled, 1 disabled"))
        .stdout(predicate::str::contains("corpus/sum.eo"));
}
