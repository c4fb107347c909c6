//! End-to-end grading runs against the sample artifact.

mod common;

use common::{report_path, sample_artifact, sub_results, GradeRun};
use std::process::Command;

const TOTAL: u64 = 120;

#[test]
fn reference_solution_earns_perfect_score() {
    let run = GradeRun::sample(&[], &[]).expect("grade run");
    assert_eq!(run.exit_code(), Some(0), "stderr: {}", run.stderr());

    let stdout = run.stdout();
    assert!(stdout.contains("Grading the question: 0. Count Even"));
    assert!(stdout.contains("🎉 Congratulations!"));
    assert!(!stdout.contains("MISTAKE FOUND"));
    assert!(stdout.trim_end().ends_with("Final score: 120/120"));

    let report = run.report().expect("report");
    assert_eq!(report["total_weight"], TOTAL);
    assert_eq!(report["score_earned"], TOTAL);
    let groups = report["test_groups"].as_array().expect("groups");
    assert_eq!(groups.len(), 12);
    assert!(groups.iter().all(|group| group["is_accepted"] == true));
    assert_eq!(
        sub_results(&report, "2.1 Wordle Matching"),
        vec!["accepted"; 10]
    );
}

#[test]
fn sabotaged_function_fails_its_group_and_skips_the_rest() {
    let run = GradeRun::sample(&[], &["--sabotage", "count_even"]).expect("grade run");
    assert_eq!(run.exit_code(), Some(1));

    let stdout = run.stdout();
    assert!(stdout.contains("Case #1: MISTAKE FOUND"));
    assert!(stdout.contains("AssertionError: null != 2"));
    assert!(stdout.contains("🔧 Skipping 3 remaining tests"));
    assert!(stdout.contains("Final score: 110/120"));

    let report = run.report().expect("report");
    assert_eq!(report["score_earned"], 110);
    assert_eq!(
        sub_results(&report, "0. Count Even"),
        vec!["mistake", "skipped", "skipped", "skipped"]
    );
    assert_eq!(report["test_groups"][0]["is_accepted"], false);
    assert_eq!(report["test_groups"][0]["score_earned"], 0);
    assert_eq!(report["test_groups"][1]["is_accepted"], true);
}

#[test]
fn force_grade_all_runs_every_case() {
    let run = GradeRun::sample(&["--force-grade-all"], &["--sabotage", "appear_once"])
        .expect("grade run");
    assert_eq!(run.exit_code(), Some(1));
    assert!(run.stdout().contains("🔧 Some mistake found, try again"));

    let report = run.report().expect("report");
    assert_eq!(sub_results(&report, "4. Appear Once"), vec!["mistake"; 4]);
}

#[test]
fn omitted_function_is_a_lookup_mistake() {
    let run = GradeRun::sample(&[], &["--omit", "rotate_point"]).expect("grade run");
    assert_eq!(run.exit_code(), Some(1));
    assert!(run
        .stdout()
        .contains(r#"LookupError: namespace "solution" has no attribute "rotate_point""#));

    let report = run.report().expect("report");
    assert_eq!(
        sub_results(&report, "6. Rotate Point"),
        vec!["mistake", "skipped", "skipped", "skipped", "skipped", "skipped", "skipped"]
    );
}

#[test]
fn always_zero_exit_keeps_status_zero_on_mistakes() {
    let run = GradeRun::sample(&["--always-zero-exit"], &["--sabotage", "all_prefixes"])
        .expect("grade run");
    assert_eq!(run.exit_code(), Some(0));
    assert!(run.stdout().contains("Final score: 110/120"));
}

#[test]
fn quiet_prints_only_the_final_score() {
    let run = GradeRun::sample(&["-q"], &[]).expect("grade run");
    assert_eq!(run.exit_code(), Some(0));
    assert_eq!(run.stdout(), "Final score: 120/120\n");
}

#[test]
fn verbose_shows_failure_locations() {
    let run = GradeRun::sample(&["-v"], &["--sabotage", "count_even"]).expect("grade run");
    let stdout = run.stdout();
    assert!(stdout.contains("        at "), "stdout: {stdout}");
    assert!(stdout.contains("exam.rs"));
}

#[test]
fn malformed_reply_is_a_protocol_mistake() {
    let run = GradeRun::sample(&[], &["--garbage", "count_even"]).expect("grade run");
    assert_eq!(run.exit_code(), Some(1));
    assert!(run.stdout().contains("ProtocolError: artifact"));
    assert!(run.stdout().contains("sent a malformed response"));

    let report = run.report().expect("report");
    assert_eq!(
        sub_results(&report, "0. Count Even"),
        vec!["mistake", "skipped", "skipped", "skipped"]
    );
    assert_eq!(report["score_earned"], 110);
}

#[test]
fn artifact_exiting_mid_run_fails_every_later_group() {
    let run = GradeRun::sample(&[], &["--crash-after", "4"]).expect("grade run");
    assert_eq!(run.exit_code(), Some(1));
    assert!(run.stdout().contains("ArtifactExited: artifact"));

    let report = run.report().expect("report");
    assert_eq!(sub_results(&report, "0. Count Even"), vec!["accepted"; 4]);
    assert_eq!(sub_results(&report, "1. Cone Surface Area")[0], "mistake");
    assert_eq!(report["score_earned"], 10);
    assert_eq!(report["total_weight"], TOTAL);
}

#[test]
fn describe_error_fails_the_whole_run() {
    let run = GradeRun::sample(&[], &["--fail-describe"]).expect("grade run");
    assert_eq!(run.exit_code(), Some(1));
    assert!(run.stderr().contains("error when loading the artifact"));
    assert!(run.stderr().contains("artifact failed to load: ImportError"));
    assert!(!run.stdout().contains("Grading the question"));

    let report = run.report().expect("report");
    assert_eq!(report["score_earned"], 0);
    assert_eq!(report["total_weight"], TOTAL);
    for group in report["test_groups"].as_array().expect("groups") {
        assert_eq!(group["is_accepted"], false);
    }
}

#[test]
fn unloadable_artifact_exports_all_skipped_report() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let out = report_path(temp_dir.path());
    let output = Command::new(env!("CARGO_BIN_EXE_grade"))
        .arg("--export-json")
        .arg(&out)
        .arg(temp_dir.path().join("no-such-artifact"))
        .env_remove("RUST_LOG")
        .output()
        .expect("run grade");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error when loading the artifact"));

    let report: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&out).expect("read report")).expect("parse");
    assert_eq!(report["total_weight"], TOTAL);
    assert_eq!(report["score_earned"], 0);
    for group in report["test_groups"].as_array().expect("groups") {
        assert_eq!(group["is_accepted"], false);
        assert!(group["sub_results"]
            .as_array()
            .expect("sub_results")
            .iter()
            .all(|judgement| judgement == "skipped"));
    }
}

#[test]
fn config_file_supplies_artifact_command_and_switches() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let config_path = temp_dir.path().join("grade.json");
    let artifact = sample_artifact();
    let command_line = shell_words::join([
        &*artifact.to_string_lossy(),
        "--sabotage",
        "longest_common_prefix",
    ]);
    let config = serde_json::json!({
        "schema_version": 1,
        "always_zero_exit": true,
        "artifact_command": command_line,
        "export_json": report_path(temp_dir.path()),
    });
    std::fs::write(&config_path, config.to_string()).expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_grade"))
        .arg("--config")
        .arg(&config_path)
        .env_remove("RUST_LOG")
        .output()
        .expect("run grade");
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Final score: 110/120"));
    assert!(report_path(temp_dir.path()).is_file());
}

#[test]
fn missing_artifact_argument_is_an_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_grade"))
        .env_remove("RUST_LOG")
        .output()
        .expect("run grade");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no artifact to grade"));
}
