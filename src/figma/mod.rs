//! Figma integration for fetching design trees.
//!
//! This module provides:
//! - [`FigmaClient`] - HTTP client for the Figma REST API
//! - [`to_design_node`] - Conversion of raw Figma nodes into [`crate::DesignNode`]
//! - API types for parsing Figma JSON responses

pub mod api_types;
pub mod client;
pub mod conversion;

#[cfg(test)]
mod tests;

pub use api_types::{
    FigmaBoundingBox, FigmaColor, FigmaFile, FigmaNodeData, FigmaNodeWrapper, FigmaNodesResponse,
    FigmaPaintData, FigmaTypeStyle,
};
pub use client::{FigmaAuth, FigmaClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use conversion::to_design_node;
