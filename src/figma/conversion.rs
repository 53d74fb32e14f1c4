//! Mapping of raw Figma nodes onto the design tree.

use crate::types::{DesignNode, Geometry};

use super::api_types::{FigmaBoundingBox, FigmaNodeData, FigmaPaintData, FigmaTypeStyle};

/// Build a [`DesignNode`] tree from raw Figma API data.
///
/// Hidden layers are dropped together with their subtrees; the root is kept
/// as selected.
pub fn to_design_node(node: &FigmaNodeData) -> DesignNode {
    let mut design = DesignNode::new(node.id.clone(), node.name.clone(), node.node_type.clone());
    design.geometry = node.absolute_bounding_box.as_ref().map(map_bounding_box);

    if let Some(text) = &node.characters {
        design.style.insert("text".to_string(), text.clone());
    }
    if let Some(style) = &node.style {
        map_typography(style, &mut design);
    }
    if let Some(fill) = first_solid_fill(&node.fills) {
        design.style.insert("fill".to_string(), fill);
    }

    design.children = node
        .children
        .iter()
        .filter(|child| child.is_visible())
        .map(to_design_node)
        .collect();
    design
}

/// Map Figma bounding box to geometry in design units.
pub fn map_bounding_box(bb: &FigmaBoundingBox) -> Geometry {
    Geometry::new(bb.x, bb.y, bb.width, bb.height)
}

fn map_typography(style: &FigmaTypeStyle, design: &mut DesignNode) {
    if let Some(family) = &style.font_family {
        design.style.insert("fontFamily".to_string(), family.clone());
    }
    if let Some(size) = style.font_size {
        design.style.insert("fontSize".to_string(), format!("{}px", size));
    }
    if let Some(weight) = style.font_weight {
        design.style.insert("fontWeight".to_string(), weight.to_string());
    }
    if let Some(line_height) = style.line_height_px {
        design.style.insert("lineHeight".to_string(), format!("{}px", line_height));
    }
}

/// Hex color of the first visible solid paint.
fn first_solid_fill(fills: &[FigmaPaintData]) -> Option<String> {
    fills
        .iter()
        .filter(|paint| paint.visible != Some(false))
        .find(|paint| paint.paint_type.eq_ignore_ascii_case("solid"))
        .and_then(|paint| paint.color.as_ref())
        .map(|color| color.to_hex())
}
