//! Design Conformance Checker (DCC) Library
//!
//! Compares a hierarchical design specification (Figma-style node tree)
//! against the elements of a rendered page at one or more viewports and
//! reports geometric and style differences.
//!
//! # Module Overview
//!
//! - [`engine`] - Pure comparison core: flatten, score, match, diff, aggregate
//! - [`analysis`] - Runs a design source and a capture session through the engine
//! - [`report`] - Structured report, HTML rendering and atomic file output
//! - [`source`] - Design sources (local JSON, Figma API)
//! - [`browser`] - Page capture (Playwright helper, on-disk snapshots)
//! - [`figma`] - Figma API types, client and node conversion
//! - [`config`] - Configuration file support
//! - [`types`] - Core data types and structures
//! - [`output`] - JSON output schemas for the CLI
//!
//! # Example
//!
//! ```no_run
//! use dcc_lib::{Analyzer, ComparePolicy, FileDesignSource, SnapshotCapture, Viewport};
//!
//! # async fn example() -> dcc_lib::Result<()> {
//! let source = FileDesignSource::new("design.json");
//! let capture = SnapshotCapture::new("snapshots");
//! let analyzer = Analyzer::new(ComparePolicy::default());
//! let report = analyzer
//!     .run(&source, &capture, &Viewport::presets())
//!     .await?;
//! println!("{} critical issues", report.summary.critical_issues);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod browser;
pub mod config;
pub mod engine;
pub mod error;
pub mod figma;
pub mod output;
pub mod report;
pub mod resource;
pub mod source;
pub mod types;
pub mod viewport;

pub use analysis::{compare_viewport, Analyzer, ComparePolicy, ViewportComparison};
pub use browser::{
    BrowserOptions, CaptureSession, CapturedPage, PageCapture, PlaywrightCapture,
    SnapshotCapture,
};
pub use config::Config;
pub use engine::{aggregate, flatten, MatchPolicy, MatchStrategy, UnitScale};
pub use error::{DccError, ErrorCategory, ErrorPayload, Result};
pub use output::{CompareOutput, DccOutput, ErrorOutput, FlattenOutput, DCC_OUTPUT_VERSION};
pub use report::{build_report, write_report, ReportFiles, StructuredReport};
pub use resource::{parse_design_locator, parse_page_url, DesignLocator, FigmaInfo};
pub use source::{DesignSource, FigmaDesignSource, FileDesignSource};
pub use types::{ComparisonResult, DesignNode, Difference, Geometry, RenderedElement, Summary};
pub use viewport::Viewport;
