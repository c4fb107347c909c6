use anyhow::{anyhow, Result};
use clap::Parser;
use exam_grader::artifact::load_namespace;
use exam_grader::cli::GradeArgs;
use exam_grader::config::{load_config, GradeConfig, Settings};
use exam_grader::exam::exam_suite;
use exam_grader::report::{
    group_heading, render_group, render_score, write_report_json, RenderOptions,
};
use exam_grader::util::display_path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Name under which the submission's bindings are looked up.
const NAMESPACE_NAME: &str = "solution";

fn main() -> Result<ExitCode> {
    let args = GradeArgs::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GradeConfig::default(),
    };
    let settings = Settings::resolve(&args, &config)?;
    init_tracing(&settings);
    run(&settings)
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(settings: &Settings) -> Result<ExitCode> {
    let suite = exam_suite()?;
    let command = settings.artifact.clone().ok_or_else(|| {
        anyhow!("no artifact to grade (pass ARTIFACT or set artifact_command in --config)")
    })?;

    let namespace = match load_namespace(NAMESPACE_NAME, &command) {
        Ok(namespace) => namespace,
        Err(err) => {
            tracing::error!("error when loading the artifact: {err:#}");
            if let Some(path) = &settings.export_json {
                write_report_json(path, &suite.skip_all().summary())?;
                report_saved(path);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let options = RenderOptions {
        show_location: settings.show_failure_location(),
    };
    let result = suite.execute_observed(&settings.run, &namespace, |group_result| {
        if !settings.is_quiet() {
            println!("{}", group_heading(group_result.group().name()));
            print!("{}", render_group(group_result, options));
        }
    });
    println!("{}", render_score(&result));

    if let Some(path) = &settings.export_json {
        write_report_json(path, &result.summary())?;
        report_saved(path);
    }

    if result.is_perfect() || settings.always_zero_exit {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn report_saved(path: &std::path::Path) {
    let cwd = std::env::current_dir().ok();
    tracing::info!(path = %display_path(path, cwd.as_deref()), "saved grading result");
}
