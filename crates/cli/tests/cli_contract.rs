// Contract tests for the `funnelaudit` binary.
//
// stdout must carry exactly one JSON document; diagnostics go to stderr;
// exit codes follow src/exit_codes.rs.
//
// Run with: cargo test -p funnelaudit-cli --test cli_contract -- --nocapture

use std::path::Path;
use std::process::{Command, Output};

const FUNNELS: &str = "\u{feff}id,name\nF1,Sale\nF2,Lead\n";
const OFFERS: &str = "\
project_id,funnel_id,nome_produto,nome_oferta,origem,id_funil
P1,F1,X,Auto-Importado,hotmart,
P1,F9,X,Promo,,
P1,,Y,Promo,,Lançamento
";

fn funnelaudit(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_funnelaudit"));
    cmd.current_dir(cwd);
    cmd.env_remove("FUNNELAUDIT_FUNNELS");
    cmd.env_remove("FUNNELAUDIT_OFFERS");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_sources(dir: &Path) {
    std::fs::write(dir.join("funnels.csv"), FUNNELS).unwrap();
    std::fs::write(dir.join("offers.csv"), OFFERS).unwrap();
}

fn run_with_sources(dir: &Path, extra: &[&str]) -> Output {
    let mut args = vec!["--funnels", "funnels.csv", "--offers", "offers.csv"];
    args.extend_from_slice(extra);
    funnelaudit(dir).args(&args).output().expect("run funnelaudit")
}

/// Assert stdout is a single, parseable JSON value.
fn assert_single_json(stdout: &[u8]) -> serde_json::Value {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    serde_json::from_str(trimmed)
        .unwrap_or_else(|e| panic!("stdout must be valid JSON.\nParse error: {e}\nstdout:\n{trimmed}"))
}

#[test]
fn report_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());

    let output = run_with_sources(dir.path(), &[]);
    assert!(
        output.status.success(),
        "exit code: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    let report = assert_single_json(&output.stdout);
    let sections: Vec<_> = report.as_object().unwrap().keys().cloned().collect();
    assert_eq!(
        sections,
        vec!["totals", "integrity", "duplicates", "semantics", "samples", "remediation"]
    );
    assert_eq!(report["totals"], serde_json::json!({ "funnels": 2, "offers": 3 }));
    assert_eq!(report["integrity"]["offers_missing_funnel_id"], 1);
    assert_eq!(report["integrity"]["offers_with_invalid_funnel_id"], 1);
    assert_eq!(report["integrity"]["funnels_without_offers"], 1);
    assert_eq!(report["semantics"]["generic_offer_names"], 1);
    assert_eq!(report["samples"]["invalid_funnel_ids"], serde_json::json!({ "F9": 1 }));
}

#[test]
fn stdout_uses_two_space_indent() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());

    let output = run_with_sources(dir.path(), &["--quiet"]);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("{\n  \"totals\": {\n    \"funnels\": 2,"));
}

#[test]
fn no_arguments_reads_supabase_dir() {
    let dir = tempfile::tempdir().unwrap();
    let supabase = dir.path().join("supabase");
    std::fs::create_dir(&supabase).unwrap();
    std::fs::write(supabase.join("funnels_utf8.csv"), FUNNELS).unwrap();
    std::fs::write(supabase.join("offer_mappings_full_fixed.csv"), OFFERS).unwrap();

    let output = funnelaudit(dir.path()).output().unwrap();
    assert!(output.status.success());
    let report = assert_single_json(&output.stdout);
    assert_eq!(report["totals"]["offers"], 3);
}

#[test]
fn missing_source_exits_3_without_report() {
    let dir = tempfile::tempdir().unwrap();

    let output = funnelaudit(dir.path())
        .args(["--funnels", "nope.csv", "--offers", "nope.csv"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty(), "no partial report on stdout");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: source not found"), "stderr: {stderr}");
    assert!(stderr.contains("hint:"));
}

#[test]
fn non_utf8_source_exits_4() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());
    std::fs::write(dir.path().join("offers.csv"), b"project_id,nome_oferta\nP1,Promo\xe7\xe3o\n").unwrap();

    let output = run_with_sources(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());
}

#[test]
fn fail_on_findings_exits_6_after_printing() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());

    let output = run_with_sources(dir.path(), &["--fail-on-findings"]);
    assert_eq!(output.status.code(), Some(6));
    assert_single_json(&output.stdout);
}

#[test]
fn fail_on_findings_passes_clean_data() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("funnels.csv"), "id,name\nF1,Sale\n").unwrap();
    std::fs::write(
        dir.path().join("offers.csv"),
        "project_id,funnel_id,nome_produto,nome_oferta,origem\nP1,F1,X,Promo,hotmart\n",
    )
    .unwrap();

    let output = run_with_sources(dir.path(), &["--fail-on-findings"]);
    assert!(output.status.success());
}

#[test]
fn generic_name_flag_replaces_defaults() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());

    let output = run_with_sources(dir.path(), &["--generic-name", "PROMO"]);
    let report = assert_single_json(&output.stdout);
    assert_eq!(report["semantics"]["generic_offer_names"], 2);
}

#[test]
fn output_flag_writes_same_document() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());

    let output = run_with_sources(dir.path(), &["--output", "report.json"]);
    assert!(output.status.success());

    let from_stdout = assert_single_json(&output.stdout);
    let written = std::fs::read_to_string(dir.path().join("report.json")).unwrap();
    let from_file: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(from_stdout, from_file);
}

#[test]
fn bad_config_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());
    std::fs::write(dir.path().join("audit.toml"), "[analysis]\nsample_size = \"ten\"\n").unwrap();

    let output = run_with_sources(dir.path(), &["--config", "audit.toml"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("config parse error"));
}
