//! Run configuration: an optional JSON config file merged with CLI flags.
use crate::artifact::ArtifactCommand;
use crate::cli::GradeArgs;
use crate::grading::RunContext;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Config file contents (`--config`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GradeConfig {
    pub schema_version: u32,
    #[serde(default)]
    pub force_grade_all: bool,
    #[serde(default)]
    pub always_zero_exit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_deadline_ms: Option<u64>,
    /// Shell-style command line used when no ARTIFACT is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_json: Option<PathBuf>,
}

impl Default for GradeConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            force_grade_all: false,
            always_zero_exit: false,
            case_deadline_ms: None,
            artifact_command: None,
            export_json: None,
        }
    }
}

/// Load and check a config file.
pub fn load_config(path: &Path) -> Result<GradeConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: GradeConfig =
        serde_json::from_slice(&bytes).context("parse grade config JSON")?;
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {} in {} (expected {})",
            config.schema_version,
            path.display(),
            CONFIG_SCHEMA_VERSION
        ));
    }
    if config.case_deadline_ms == Some(0) {
        return Err(anyhow!("case_deadline_ms must be > 0"));
    }
    Ok(config)
}

/// Effective settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub run: RunContext,
    pub always_zero_exit: bool,
    /// Verbose count minus quiet count; presentation only.
    pub verbosity: i32,
    pub export_json: Option<PathBuf>,
    pub artifact: Option<ArtifactCommand>,
}

impl Settings {
    /// Merge CLI flags over the config file. Boolean switches turn on when
    /// either side sets them; explicit CLI values win otherwise.
    pub fn resolve(args: &GradeArgs, config: &GradeConfig) -> Result<Self> {
        let case_deadline = args
            .case_deadline_ms
            .or(config.case_deadline_ms)
            .map(Duration::from_millis);
        let run = RunContext::new(args.force_grade_all || config.force_grade_all)
            .with_case_deadline(case_deadline);

        let artifact = match (&args.artifact, &config.artifact_command) {
            (Some(program), _) => Some(ArtifactCommand::new(
                program.clone(),
                args.artifact_args.clone(),
            )),
            (None, Some(command_line)) => {
                let mut command = ArtifactCommand::parse(command_line)?;
                command.args.extend(args.artifact_args.iter().cloned());
                Some(command)
            }
            (None, None) => None,
        };

        Ok(Self {
            run,
            always_zero_exit: args.always_zero_exit || config.always_zero_exit,
            verbosity: i32::from(args.verbose) - i32::from(args.quiet),
            export_json: args
                .export_json
                .clone()
                .or_else(|| config.export_json.clone()),
            artifact,
        })
    }

    /// Whether failure details include their source location.
    pub fn show_failure_location(&self) -> bool {
        self.verbosity >= 1
    }

    /// Whether the stdout report is suppressed.
    pub fn is_quiet(&self) -> bool {
        self.verbosity < 0
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            v if v < 0 => "warn",
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
