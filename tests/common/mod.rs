//! Shared helpers for running the `grade` binary against the sample artifact.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// One grading run in its own temp directory.
pub struct GradeRun {
    pub temp_dir: TempDir,
    pub output: Output,
}

impl GradeRun {
    /// Grade the sample artifact, passing `grade_args` before it and
    /// `artifact_args` after `--`. The JSON report is always exported.
    pub fn sample(grade_args: &[&str], artifact_args: &[&str]) -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let mut command = Command::new(env!("CARGO_BIN_EXE_grade"));
        command
            .arg("--export-json")
            .arg(report_path(temp_dir.path()))
            .args(grade_args)
            .arg(sample_artifact());
        if !artifact_args.is_empty() {
            command.arg("--").args(artifact_args);
        }
        let output = command.env_remove("RUST_LOG").output()?;
        Ok(Self { temp_dir, output })
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Parsed JSON report written by `--export-json`.
    pub fn report(&self) -> anyhow::Result<Value> {
        let bytes = std::fs::read(report_path(self.temp_dir.path()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

pub fn sample_artifact() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sample-artifact"))
}

pub fn report_path(dir: &Path) -> PathBuf {
    dir.join("result.json")
}

/// Judgements of the named group in a parsed report.
pub fn sub_results(report: &Value, group_name: &str) -> Vec<String> {
    report["test_groups"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|group| group["group_name"] == group_name)
        .and_then(|group| group["sub_results"].as_array())
        .map(|results| {
            results
                .iter()
                .filter_map(|judgement| judgement.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
