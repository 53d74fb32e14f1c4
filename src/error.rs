use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum DccError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Figma API error (status: {status:?}): {message}")]
    FigmaApi {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed data for {node}: {reason}")]
    DataShape { node: String, reason: String },

    #[error("Report build error: {0}")]
    ReportBuild(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DccError {
    pub fn figma_api(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        DccError::FigmaApi {
            status,
            message: message.into(),
        }
    }

    pub fn data_shape(node: impl Into<String>, reason: impl Into<String>) -> Self {
        DccError::DataShape {
            node: node.into(),
            reason: reason.into(),
        }
    }

    pub fn report_build(message: impl Into<String>) -> Self {
        DccError::ReportBuild(message.into())
    }

    pub fn capture(message: impl Into<String>) -> Self {
        DccError::Capture(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            DccError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            DccError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            DccError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify URL/format (e.g., https://example.com).",
            ),
            DccError::FigmaApi { status, message } => ErrorPayload::new(
                ErrorCategory::Figma,
                format!("Figma API error (status {:?}): {}", status, message),
                "Check FIGMA_TOKEN/URL and rate limits; retry after waiting.",
            ),
            DccError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Data,
                e.to_string(),
                "Check the JSON shape of design/snapshot inputs; run with --verbose for details.",
            ),
            DccError::DataShape { .. } => ErrorPayload::new(
                ErrorCategory::Data,
                self.to_string(),
                "Fix the offending node: geometry values must be finite and width/height non-negative.",
            ),
            DccError::ReportBuild(msg) => ErrorPayload::new(
                ErrorCategory::Report,
                msg.to_string(),
                "Check that the output directory is writable; no partial report was written.",
            ),
            DccError::Capture(msg) => capture_payload(msg),
            DccError::Config(msg) => config_payload(msg),
        }
    }
}

fn capture_payload(msg: &str) -> ErrorPayload {
    let lower = msg.to_ascii_lowercase();
    let remediation = if lower.contains("playwright npm package is missing") {
        "Install Playwright (e.g., `npm install playwright` and `npx playwright install chromium`)."
    } else if lower.contains("chromium executable") {
        "Run `npx playwright install chromium` (or `playwright install chromium`) to download the browser."
    } else if lower.contains("not found on path") || lower.contains("node command") {
        "Install Node.js and ensure the node binary is on PATH; rerun after installing Playwright if needed."
    } else if lower.contains("timeout") || lower.contains("timed out") {
        "Try increasing --nav-timeout/--process-timeout or ensure the page loads without blocking."
    } else if lower.contains("snapshot") {
        "Provide one <viewport-name>.json file per viewport in the --snapshots directory."
    } else {
        "Re-run with --verbose to see the capture log."
    };
    ErrorPayload::new(ErrorCategory::Capture, msg.to_string(), remediation)
}

fn config_payload(msg: &str) -> ErrorPayload {
    let lower = msg.to_ascii_lowercase();
    let remediation = if lower.contains("figma_token") || lower.contains("figma token") {
        "Set FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN) or [figma].token before using Figma designs."
    } else if lower.contains("file key") && lower.contains("figma") {
        "Use a Figma URL with a file key: https://www.figma.com/file/<FILE_KEY>/... with node-id if needed."
    } else if lower.contains("file not found") {
        "Verify the file exists; use an absolute path or run from the working directory."
    } else if lower.contains("viewport") {
        "Use --viewport NAME=WIDTHxHEIGHT (e.g., Desktop=1440x900) or WIDTHxHEIGHT."
    } else {
        "Check flags/paths (e.g., --design, --url/--snapshots) and the config file."
    };
    ErrorPayload::new(ErrorCategory::Config, msg.to_string(), remediation)
}

pub type Result<T> = std::result::Result<T, DccError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Figma,
    Data,
    Capture,
    Report,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_payload_includes_playwright_remediation() {
        let err = DccError::capture(
            "Playwright npm package is missing; install with `npm install playwright`.",
        );
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Capture);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("npm install playwright"),
            "expected remediation to mention npm install playwright, got: {remediation}"
        );
    }

    #[test]
    fn capture_payload_includes_node_install_hint() {
        let err = DccError::capture(
            "Unable to spawn Playwright helper; 'node' was not found on PATH",
        );
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.to_ascii_lowercase().contains("node"),
            "expected node install/path remediation, got: {remediation}"
        );
    }

    #[test]
    fn capture_payload_includes_timeout_hint() {
        let err = DccError::capture("Playwright timed out after 45s capturing Desktop");
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.contains("--process-timeout"));
    }

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = DccError::Config("Some other config issue".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("Check flags/paths"),
            "expected default remediation for generic config errors"
        );
    }

    #[test]
    fn config_payload_includes_figma_token_remediation() {
        let err = DccError::Config("FIGMA_TOKEN environment variable is required".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("FIGMA_TOKEN"),
            "expected FIGMA token remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_includes_file_key_hint() {
        let err = DccError::Config("Figma URL missing file key".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.to_ascii_lowercase().contains("file key"));
    }

    #[test]
    fn data_shape_payload_names_the_node() {
        let err = DccError::data_shape("1:23", "width is negative (-4)");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Data);
        assert!(payload.message.contains("1:23"));
        assert!(payload.message.contains("width is negative"));
    }

    #[test]
    fn report_build_payload_mentions_partial_writes() {
        let payload = DccError::report_build("cannot serialize").to_payload();
        assert_eq!(payload.category, ErrorCategory::Report);
        assert!(payload
            .remediation
            .unwrap_or_default()
            .contains("no partial report"));
    }
}
