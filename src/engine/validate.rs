//! Ingestion checks run before the engine sees any data.

use tracing::debug;

use crate::error::DccError;
use crate::types::{DesignNode, Geometry, RenderedElement};
use crate::Result;

/// Rejects a design tree containing non-finite or negative-size geometry.
pub fn validate_design_tree(root: &DesignNode) -> Result<()> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(geometry) = &node.geometry {
            check_geometry(geometry).map_err(|reason| {
                DccError::data_shape(format!("design node {} ({})", node.id, node.name), reason)
            })?;
        }
        stack.extend(node.children.iter());
    }
    Ok(())
}

/// Rejects elements with non-finite geometry and drops zero-area elements.
pub fn prepare_elements(elements: Vec<RenderedElement>) -> Result<Vec<RenderedElement>> {
    let total = elements.len();
    let mut kept = Vec::with_capacity(total);
    for element in elements {
        if !element.geometry.is_finite() {
            return Err(DccError::data_shape(
                format!("element {}", element.selector),
                "geometry contains a non-finite value",
            ));
        }
        if element.geometry.has_area() {
            kept.push(element);
        }
    }
    if kept.len() < total {
        debug!(
            dropped = total - kept.len(),
            kept = kept.len(),
            "dropped zero-area elements"
        );
    }
    Ok(kept)
}

fn check_geometry(geometry: &Geometry) -> std::result::Result<(), String> {
    if !geometry.is_finite() {
        return Err("geometry contains a non-finite value".to_string());
    }
    if geometry.width < 0.0 {
        return Err(format!("width is negative ({})", geometry.width));
    }
    if geometry.height < 0.0 {
        return Err(format!("height is negative ({})", geometry.height));
    }
    Ok(())
}
