//! CLI argument parsing for the grading driver.
//!
//! The CLI only collects options; policy lives in `config` and the engine.
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Root CLI entrypoint for grading one submission.
#[derive(Parser, Debug)]
#[command(
    name = "grade",
    version,
    about = "Grade an exam submission against the built-in test bank",
    after_help = "The artifact is a program speaking line-delimited JSON on stdin/stdout.\n\nExamples:\n  grade ./solution\n  grade --export-json result.json python3 -- solution.py\n  grade --config grade.json -v"
)]
pub struct GradeArgs {
    /// Artifact program to grade (resolved on PATH when given as a bare name)
    #[arg(value_name = "ARTIFACT")]
    pub artifact: Option<String>,

    /// Extra arguments passed to the artifact program
    #[arg(last = true, value_name = "ARTIFACT_ARGS")]
    pub artifact_args: Vec<String>,

    /// Path to save grading result as a JSON file
    #[arg(long, value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Keep grading even after encountering the first mistake in each test group
    #[arg(long)]
    pub force_grade_all: bool,

    /// Always return exit status 0 even when mistakes were found
    #[arg(long)]
    pub always_zero_exit: bool,

    /// Produce more detailed messages (can be stacked)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Produce less detailed messages (can be stacked)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// JSON config file with run options
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Judge a case as a mistake when it finishes after this many milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub case_deadline_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        GradeArgs::command().debug_assert();
    }

    #[test]
    fn parses_flags_counts_and_trailing_artifact_args() {
        let args = GradeArgs::try_parse_from([
            "grade",
            "-vv",
            "-q",
            "--force-grade-all",
            "--export-json",
            "out.json",
            "python3",
            "--",
            "solution.py",
            "--fast",
        ])
        .expect("parse");
        assert_eq!(args.verbose, 2);
        assert_eq!(args.quiet, 1);
        assert!(args.force_grade_all);
        assert!(!args.always_zero_exit);
        assert_eq!(args.artifact.as_deref(), Some("python3"));
        assert_eq!(args.artifact_args, vec!["solution.py", "--fast"]);
        assert_eq!(args.export_json, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn rejects_zero_case_deadline() {
        assert!(GradeArgs::try_parse_from(["grade", "--case-deadline-ms", "0", "a"]).is_err());
        let args = GradeArgs::try_parse_from(["grade", "--case-deadline-ms", "250", "a"])
            .expect("parse");
        assert_eq!(args.case_deadline_ms, Some(250));
    }
}
