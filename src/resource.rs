use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::error::DccError;

/// Where a design tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignLocator {
    File(PathBuf),
    Figma(FigmaInfo),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigmaInfo {
    pub file_key: String,
    pub node_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum ResourceParseError {
    #[error("Invalid URL '{value}': {message}. Hint: include http(s):// and ensure the URL is well-formed.")]
    InvalidUrl { value: String, message: String },
    #[error("Figma URL missing file key in '{url}'. Hint: use https://www.figma.com/file/<FILE_KEY>/... and node-id if needed.")]
    FigmaMissingFileKey { url: String },
    #[error("Unsupported design URL '{url}'. Hint: pass a figma.com URL or a local JSON file.")]
    UnsupportedDesignUrl { url: String },
    #[error("Unsupported page URL scheme '{scheme}' in '{url}'. Supported schemes: http, https, file.")]
    UnsupportedScheme { url: String, scheme: String },
    #[error("Local file not found: {path}. Hint: check the path relative to the current working directory or use an absolute path.")]
    FileNotFound { path: String },
    #[error("Unsupported design file extension '{extension}'. Design files must be .json.")]
    UnsupportedExtension { extension: String },
}

impl From<ResourceParseError> for DccError {
    fn from(err: ResourceParseError) -> Self {
        DccError::Config(err.to_string())
    }
}

/// Parses a `--design` argument: a Figma URL or a local JSON file.
pub fn parse_design_locator(value: &str) -> Result<DesignLocator, ResourceParseError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        let url = parse_url(value)?;
        let host = url.host_str().unwrap_or("");
        if host == "figma.com" || host.ends_with(".figma.com") {
            return parse_figma_url(value).map(DesignLocator::Figma);
        }
        return Err(ResourceParseError::UnsupportedDesignUrl {
            url: value.to_string(),
        });
    }
    parse_local_design(value).map(DesignLocator::File)
}

/// Parses the page under test; only http, https and file URLs are accepted.
pub fn parse_page_url(value: &str) -> Result<Url, ResourceParseError> {
    let url = parse_url(value)?;
    match url.scheme() {
        "http" | "https" | "file" => Ok(url),
        other => Err(ResourceParseError::UnsupportedScheme {
            url: value.to_string(),
            scheme: other.to_string(),
        }),
    }
}

pub fn parse_figma_url(value: &str) -> Result<FigmaInfo, ResourceParseError> {
    let url = parse_url(value)?;

    let path_segments: Vec<&str> = url.path_segments().map(|c| c.collect()).unwrap_or_default();

    let file_key = path_segments
        .iter()
        .position(|&s| s == "file" || s == "design")
        .and_then(|i| path_segments.get(i + 1))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| ResourceParseError::FigmaMissingFileKey {
            url: value.to_string(),
        })?;

    let node_id = url
        .query_pairs()
        .find(|(k, _)| k == "node-id")
        .map(|(_, v)| v.replace('-', ":"))
        .filter(|id| !id.is_empty());

    Ok(FigmaInfo { file_key, node_id })
}

fn parse_url(value: &str) -> Result<Url, ResourceParseError> {
    Url::parse(value).map_err(|e| ResourceParseError::InvalidUrl {
        value: value.to_string(),
        message: e.to_string(),
    })
}

fn parse_local_design(value: &str) -> Result<PathBuf, ResourceParseError> {
    let path = Path::new(value);

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if extension != "json" {
        return Err(ResourceParseError::UnsupportedExtension {
            extension: if extension.is_empty() {
                "no extension".to_string()
            } else {
                extension
            },
        });
    }

    let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
        return Err(ResourceParseError::FileNotFound {
            path: path.to_string_lossy().into_owned(),
        });
    }

    Ok(path.to_path_buf())
}
