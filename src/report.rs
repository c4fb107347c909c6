//! Plain-text rendering of grading results and the JSON report writer.
use crate::grading::{CaseResult, GroupResult, Judgement, SuiteResult, SuiteSummary};
use crate::util::pluralize;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const INDENT: &str = "    ";

/// Render options for the text report.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub show_location: bool,
}

/// Heading printed before a group's case lines.
pub fn group_heading(name: &str) -> String {
    format!("Grading the question: {name}")
}

/// Case lines for one group, followed by its closing line and a blank line.
pub fn render_group(result: &GroupResult<'_>, options: RenderOptions) -> String {
    let mut out = String::new();
    if result.group().cases().is_empty() {
        push_line(&mut out, 1, "🤷 Empty test cases");
    }
    for (index, case_result) in result.case_results().iter().enumerate() {
        render_case(&mut out, index + 1, case_result, options);
    }
    let closing = if result.is_accepted() {
        "🎉 Congratulations!".to_string()
    } else if result.skipped_testcases() > 0 {
        let skipped = result.skipped_testcases();
        format!(
            "🔧 Skipping {skipped} remaining {}",
            pluralize("test", skipped)
        )
    } else {
        "🔧 Some mistake found, try again".to_string()
    };
    push_line(&mut out, 1, &closing);
    out.push('\n');
    out
}

fn render_case(out: &mut String, number: usize, result: &CaseResult, options: RenderOptions) {
    let label = match result.judgement() {
        Judgement::Accepted => "Correct",
        Judgement::Mistake => "MISTAKE FOUND",
        Judgement::Skipped => "Skipped",
    };
    push_line(out, 1, &format!("Case #{number}: {label}"));
    let Some(failure) = result.failure() else {
        return;
    };
    for line in failure.to_string().lines() {
        push_line(out, 2, line);
    }
    if options.show_location {
        if let Some(location) = &failure.location {
            push_line(out, 2, &format!("at {location}"));
        }
    }
}

fn push_line(out: &mut String, depth: usize, text: &str) {
    let _ = writeln!(out, "{}{text}", INDENT.repeat(depth));
}

/// `Final score: earned/total`.
pub fn render_score(result: &SuiteResult<'_>) -> String {
    format!(
        "Final score: {}/{}",
        result.score_earned(),
        result.total_weight()
    )
}

/// Write the stable JSON report, creating parent directories as needed.
pub fn write_report_json(path: &Path, summary: &SuiteSummary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let json = summary.to_json_pretty()?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
