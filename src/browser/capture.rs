use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::RenderedElement;
use crate::{Result, Viewport};

/// Elements measured at one viewport plus an optional screenshot reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPage {
    #[serde(default)]
    pub elements: Vec<RenderedElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

/// Opens capture sessions; one session serves a whole analysis run.
#[async_trait]
pub trait PageCapture: Send + Sync {
    async fn open(&self) -> Result<Box<dyn CaptureSession>>;
}

/// A live capture session. Viewports are captured one at a time.
///
/// `close` must be safe to call more than once; callers close the session on
/// every exit path.
#[async_trait]
pub trait CaptureSession: Send {
    async fn capture(&mut self, viewport: &Viewport) -> Result<CapturedPage>;

    async fn close(&mut self) -> Result<()>;
}
