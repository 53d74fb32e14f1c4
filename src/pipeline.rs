use std::path::{Path, PathBuf};

use dcc_lib::browser::{PageCapture, PlaywrightCapture, SnapshotCapture};
use dcc_lib::figma::FigmaClient;
use dcc_lib::resource::{parse_design_locator, parse_page_url, DesignLocator};
use dcc_lib::source::{DesignSource, FigmaDesignSource, FileDesignSource};
use dcc_lib::{Config, DccError};

use crate::settings::figma_auth;

/// Builds the design source for a `--design` argument.
///
/// `node_id` overrides the node selected by a Figma URL.
pub fn design_source(
    design: &str,
    node_id: Option<&str>,
    config: &Config,
) -> Result<Box<dyn DesignSource>, DccError> {
    match parse_design_locator(design)? {
        DesignLocator::File(path) => {
            let source = FileDesignSource::new(path);
            Ok(Box::new(match node_id {
                Some(id) => source.with_node_id(id),
                None => source,
            }))
        }
        DesignLocator::Figma(mut info) => {
            if let Some(id) = node_id {
                info.node_id = Some(id.to_string());
            }
            let auth = figma_auth(config).ok_or_else(|| {
                DccError::Config(
                    "Missing Figma token; set FIGMA_TOKEN or FIGMA_OAUTH_TOKEN (or [figma] token in config)"
                        .to_string(),
                )
            })?;
            let client = FigmaClient::with_base_url_and_timeout(
                auth,
                &config.figma.base_url,
                config.figma.timeout,
            )?;
            Ok(Box::new(FigmaDesignSource::new(client, info)))
        }
    }
}

/// Where the rendered elements come from.
pub enum CaptureTarget {
    Url(String),
    Snapshots(PathBuf),
}

impl CaptureTarget {
    pub fn describe(&self) -> String {
        match self {
            CaptureTarget::Url(url) => url.clone(),
            CaptureTarget::Snapshots(dir) => dir.display().to_string(),
        }
    }
}

/// Builds the page capture for the target; screenshots only apply to live pages.
pub fn page_capture(
    target: &CaptureTarget,
    config: &Config,
    screenshot_dir: Option<PathBuf>,
) -> Result<Box<dyn PageCapture>, DccError> {
    match target {
        CaptureTarget::Url(raw) => {
            let url = parse_page_url(raw)?;
            Ok(Box::new(PlaywrightCapture::new(
                url,
                config.browser.options(screenshot_dir),
            )))
        }
        CaptureTarget::Snapshots(dir) => Ok(Box::new(SnapshotCapture::new(dir.clone()))),
    }
}

/// Screenshot directory inside the report directory, unless disabled.
pub fn resolve_screenshot_dir(out_dir: &Path, disabled: bool) -> Option<PathBuf> {
    (!disabled).then(|| out_dir.join("screenshots"))
}
