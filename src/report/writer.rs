use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{render_markup, StructuredReport};
use crate::error::DccError;
use crate::Result;

pub const JSON_REPORT_FILE: &str = "report.json";
pub const HTML_REPORT_FILE: &str = "report.html";

/// Paths of the files produced by [`write_report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFiles {
    pub json: PathBuf,
    pub html: PathBuf,
}

/// Writes `report.json` and `report.html` into `out_dir`.
///
/// Both documents are rendered before anything touches the disk, and each
/// file is written to a sibling temp file and renamed into place.
pub fn write_report(report: &StructuredReport, out_dir: &Path) -> Result<ReportFiles> {
    let json = report.to_json_pretty()?;
    let html = render_markup(report);

    fs::create_dir_all(out_dir)?;
    let files = ReportFiles {
        json: out_dir.join(JSON_REPORT_FILE),
        html: out_dir.join(HTML_REPORT_FILE),
    };
    write_atomic(&files.json, json.as_bytes())?;
    write_atomic(&files.html, html.as_bytes())?;
    debug!(json = %files.json.display(), html = %files.html.display(), "report written");
    Ok(files)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DccError::report_build(format!("invalid report path {}", path.display())))?;
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));

    let written = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if let Err(err) = written {
        let _ = fs::remove_file(&tmp);
        return Err(DccError::report_build(format!(
            "failed to write {}: {}",
            path.display(),
            err
        )));
    }
    Ok(())
}
