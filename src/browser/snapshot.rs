//! Pre-captured page snapshots stored as JSON files.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::capture::{CaptureSession, CapturedPage, PageCapture};
use crate::error::DccError;
use crate::{Result, Viewport};

/// Reads `<dir>/<viewport file stem>.json` for each requested viewport.
#[derive(Debug, Clone)]
pub struct SnapshotCapture {
    dir: PathBuf,
}

impl SnapshotCapture {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Snapshot file expected for `viewport`, named by its file stem.
    pub fn snapshot_path(dir: &Path, viewport: &Viewport) -> PathBuf {
        dir.join(format!("{}.json", viewport.file_stem()))
    }
}

#[async_trait]
impl PageCapture for SnapshotCapture {
    async fn open(&self) -> Result<Box<dyn CaptureSession>> {
        let is_dir = tokio::fs::metadata(&self.dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(DccError::capture(format!(
                "snapshot directory {} does not exist",
                self.dir.display()
            )));
        }
        Ok(Box::new(SnapshotSession {
            dir: self.dir.clone(),
            closed: false,
        }))
    }
}

struct SnapshotSession {
    dir: PathBuf,
    closed: bool,
}

#[async_trait]
impl CaptureSession for SnapshotSession {
    async fn capture(&mut self, viewport: &Viewport) -> Result<CapturedPage> {
        if self.closed {
            return Err(DccError::capture("snapshot session is already closed"));
        }
        let path = SnapshotCapture::snapshot_path(&self.dir, viewport);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            DccError::capture(format!(
                "cannot read snapshot {} for viewport {}: {}",
                path.display(),
                viewport.name,
                e
            ))
        })?;
        let page: CapturedPage = serde_json::from_str(&raw)?;
        debug!(
            viewport = %viewport.name,
            elements = page.elements.len(),
            "loaded snapshot"
        );
        Ok(page)
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
