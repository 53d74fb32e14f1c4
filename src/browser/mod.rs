//! Page capture: rendered elements and screenshots per viewport.
//!
//! # Module Structure
//!
//! - [`capture`] - The [`PageCapture`] / [`CaptureSession`] boundary
//! - [`snapshot`] - Pre-captured JSON snapshots on disk
//! - `manager` - Playwright-backed sessions (one helper process per run)
//! - `playwright` - The helper script, error mapping and availability checks
//! - `dom` - Raw element records emitted by the helper
//!
//! # Example
//!
//! ```no_run
//! use dcc_lib::{BrowserOptions, PageCapture, PlaywrightCapture, Viewport};
//!
//! # async fn example() -> dcc_lib::Result<()> {
//! let url = url::Url::parse("https://example.com")?;
//! let capture = PlaywrightCapture::new(url, BrowserOptions::default());
//! let mut session = capture.open().await?;
//! let page = session.capture(&Viewport::default()).await;
//! session.close().await?;
//! println!("{} elements", page?.elements.len());
//! # Ok(())
//! # }
//! ```

pub mod capture;
mod dom;
mod manager;
mod playwright;
pub mod snapshot;

pub use capture::{CaptureSession, CapturedPage, PageCapture};
pub use manager::{
    BrowserOptions, PlaywrightCapture, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_NETWORK_IDLE_TIMEOUT,
    DEFAULT_PROCESS_TIMEOUT,
};
pub use snapshot::SnapshotCapture;
