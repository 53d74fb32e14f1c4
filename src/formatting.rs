use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dcc_lib::output::DCC_OUTPUT_VERSION;
use dcc_lib::{DccError, DccOutput, ErrorOutput};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &DccOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: DccError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let error_payload = err.to_payload();
    let payload = DccOutput::Error(ErrorOutput {
        version: DCC_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Exit code 2 is reserved for errors; critical findings use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &DccOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &DccOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &DccOutput, colorize: bool) -> String {
    match body {
        DccOutput::Compare(out) => {
            let mut buf = String::new();
            let status = if out.passed { "PASS" } else { "FAIL" };
            let status_colored = color(status, if out.passed { "32" } else { "31" }, colorize);
            writeln!(buf, "{} Design conformance check", status_colored).ok();
            writeln!(buf, "Design: {}", out.design).ok();
            writeln!(buf, "Target: {} (policy: {})", out.target, out.policy).ok();

            let summary = &out.summary;
            let critical_code = if summary.critical_issues == 0 { "32" } else { "31" };
            writeln!(
                buf,
                "Comparisons: {}  Differences: {}  Critical: {}",
                summary.total_comparisons,
                summary.total_differences,
                color(&summary.critical_issues.to_string(), critical_code, colorize)
            )
            .ok();

            if !out.viewports.is_empty() {
                writeln!(buf, "Viewports:").ok();
                for viewport in &out.viewports {
                    let covered = summary.viewports_covered.contains(&viewport.name);
                    let critical = out.critical_viewports.contains(&viewport.name);
                    let marker = if critical {
                        color("critical", "31", colorize)
                    } else if covered {
                        color("ok", "32", colorize)
                    } else {
                        color("no matches", "33", colorize)
                    };
                    let unmatched = out
                        .unmatched_elements
                        .get(&viewport.name)
                        .copied()
                        .unwrap_or(0);
                    writeln!(
                        buf,
                        "- {:24} {} (unmatched elements: {})",
                        viewport.to_string(),
                        marker,
                        unmatched
                    )
                    .ok();
                }
            }

            if let Some(files) = &out.report {
                writeln!(buf, "Report:").ok();
                writeln!(buf, "- {:6} {}", "json", files.json.display()).ok();
                writeln!(buf, "- {:6} {}", "html", files.html.display()).ok();
            }
            buf
        }
        DccOutput::Flatten(out) => {
            let mut buf = String::new();
            let header = color("[FLATTEN]", "36", colorize);
            writeln!(
                buf,
                "{} {}: {} comparable of {} nodes",
                header,
                out.design,
                out.nodes.len(),
                out.total_nodes
            )
            .ok();
            for node in &out.nodes {
                let geometry = node
                    .geometry
                    .map(|g| g.to_string())
                    .unwrap_or_else(|| "-".to_string());
                writeln!(buf, "- {:10} {:24} {:10} {}", node.id, node.name, node.kind, geometry).ok();
            }
            buf
        }
        DccOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Determine exit code for compare command.
pub fn exit_code_for_compare(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
