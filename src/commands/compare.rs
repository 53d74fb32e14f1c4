use std::path::PathBuf;
use std::process::ExitCode;

use dcc_lib::analysis::{Analyzer, ComparePolicy};
use dcc_lib::output::CompareOutput;
use dcc_lib::report::write_report;
use dcc_lib::{Config, DccError, DccOutput};
use tracing::info;

use crate::cli::CompareArgs;
use crate::formatting::{exit_code_for_compare, render_error, write_output};
use crate::pipeline::{design_source, page_capture, resolve_screenshot_dir, CaptureTarget};
use crate::settings::{log_effective_config, resolve_compare_config, CompareOverrides};

/// Run the compare command.
pub async fn run_compare(config_path: Option<PathBuf>, args: CompareArgs) -> ExitCode {
    let format = args.format;
    let output = args.output.clone();

    let overrides = CompareOverrides {
        viewports: args.viewports.clone(),
        device_pixel_ratio: args.device_pixel_ratio,
        match_policy: args.match_policy.map(Into::into),
        out_dir: args.out_dir.clone(),
        nav_timeout: args.nav_timeout,
        process_timeout: args.process_timeout,
    };
    let config = match resolve_compare_config(config_path.as_deref(), &overrides) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    log_effective_config(&config, config_path.as_deref());

    match execute(&config, &args).await {
        Ok(body) => {
            let passed = body.passed;
            if let Err(err) = write_output(&DccOutput::Compare(body), format, output) {
                eprintln!("Failed to write output: {err}");
                return ExitCode::from(2);
            }
            exit_code_for_compare(passed)
        }
        Err(err) => render_error(err, format, output),
    }
}

async fn execute(config: &Config, args: &CompareArgs) -> Result<CompareOutput, DccError> {
    let source = design_source(&args.design, args.node_id.as_deref(), config)?;
    let target = match (&args.url, &args.snapshots) {
        (Some(url), _) => CaptureTarget::Url(url.clone()),
        (None, Some(dir)) => CaptureTarget::Snapshots(dir.clone()),
        (None, None) => {
            return Err(DccError::Config(
                "Either --url or --snapshots is required".to_string(),
            ))
        }
    };

    // Screenshot links in the HTML report must resolve from the report directory.
    let out_dir = std::env::current_dir()?.join(&config.report.out_dir);
    let screenshots = resolve_screenshot_dir(&out_dir, args.no_screenshots);
    let capture = page_capture(&target, config, screenshots)?;

    let analyzer = Analyzer::new(ComparePolicy::from_config(config));
    let report = analyzer
        .run(source.as_ref(), capture.as_ref(), &config.viewports)
        .await?;
    let files = write_report(&report, &out_dir)?;
    info!(
        json = %files.json.display(),
        html = %files.html.display(),
        critical = report.summary.critical_issues,
        "report written"
    );

    Ok(CompareOutput::from_report(
        args.design.clone(),
        target.describe(),
        config.matching.policy,
        config.viewports.clone(),
        &report,
        config.report.critical_threshold,
    )
    .with_report_files(files))
}
