use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use thiserror::Error;

/// A named width x height configuration the page is measured under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Desktop, tablet and mobile sizes used when no viewport is configured.
    pub fn presets() -> Vec<Viewport> {
        vec![
            Viewport::new("Desktop", 1440, 900),
            Viewport::new("Tablet", 768, 1024),
            Viewport::new("Mobile", 375, 667),
        ]
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && !self.name.trim().is_empty()
    }

    /// Name reduced to characters safe in a file name.
    ///
    /// Screenshots and snapshot files are keyed by this stem.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        if stem.is_empty() {
            "viewport".to_string()
        } else {
            stem
        }
    }
}

/// Rejects viewport lists whose names or file stems collide.
///
/// Stems are compared case-insensitively.
pub fn check_distinct(viewports: &[Viewport]) -> Result<(), String> {
    let mut names = HashSet::new();
    let mut stems: HashMap<String, &str> = HashMap::new();
    for viewport in viewports {
        if !names.insert(viewport.name.as_str()) {
            return Err(format!("duplicate viewport name '{}'", viewport.name));
        }
        let stem = viewport.file_stem().to_ascii_lowercase();
        if let Some(other) = stems.insert(stem, &viewport.name) {
            return Err(format!(
                "viewports '{}' and '{}' map to the same file name",
                other, viewport.name
            ));
        }
    }
    Ok(())
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new("Desktop", 1440, 900)
    }
}

#[derive(Debug, Error)]
pub enum ViewportParseError {
    #[error("Invalid viewport format: expected NAME=WIDTHxHEIGHT or WIDTHxHEIGHT (e.g., Desktop=1440x900)")]
    InvalidFormat,
    #[error("Invalid viewport name: name must not be empty")]
    EmptyName,
    #[error("Invalid width: {0}")]
    InvalidWidth(String),
    #[error("Invalid height: {0}")]
    InvalidHeight(String),
    #[error("Width must be positive")]
    ZeroWidth,
    #[error("Height must be positive")]
    ZeroHeight,
}

impl FromStr for Viewport {
    type Err = ViewportParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, dims) = match s.split_once('=') {
            Some((name, dims)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(ViewportParseError::EmptyName);
                }
                (Some(name), dims)
            }
            None => (None, s),
        };

        let parts: Vec<&str> = dims.split('x').collect();
        if parts.len() != 2 {
            return Err(ViewportParseError::InvalidFormat);
        }

        let width: u32 = parts[0]
            .trim()
            .parse()
            .map_err(|_| ViewportParseError::InvalidWidth(parts[0].to_string()))?;

        let height: u32 = parts[1]
            .trim()
            .parse()
            .map_err(|_| ViewportParseError::InvalidHeight(parts[1].to_string()))?;

        if width == 0 {
            return Err(ViewportParseError::ZeroWidth);
        }
        if height == 0 {
            return Err(ViewportParseError::ZeroHeight);
        }

        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| format!("{width}x{height}"));
        Ok(Viewport {
            name,
            width,
            height,
        })
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}x{})", self.name, self.width, self.height)
    }
}
