//! Tests for Figma response parsing and conversion.

#[cfg(test)]
mod tests {
    use crate::engine::flatten;
    use crate::figma::api_types::{
        FigmaBoundingBox, FigmaColor, FigmaFile, FigmaNodeData, FigmaNodesResponse, FigmaPaintData,
        FigmaTypeStyle,
    };
    use crate::analysis::{compare_viewport, ComparePolicy};
    use crate::figma::conversion::to_design_node;
    use crate::types::{Geometry, RenderedElement};
    use crate::viewport::Viewport;

    fn paint(kind: &str, visible: Option<bool>, color: Option<FigmaColor>) -> FigmaPaintData {
        FigmaPaintData {
            paint_type: kind.to_string(),
            visible,
            color,
            opacity: None,
        }
    }

    #[test]
    fn test_figma_color_to_hex() {
        let color = FigmaColor {
            r: 1.0,
            g: 0.5,
            b: 0.0,
            a: 1.0,
        };
        assert_eq!(color.to_hex(), "#ff7f00");
    }

    #[test]
    fn test_figma_color_to_hex_clamps_out_of_range() {
        let color = FigmaColor {
            r: 1.4,
            g: -0.2,
            b: 0.0,
            a: 1.0,
        };
        assert_eq!(color.to_hex(), "#ff0000");
    }

    #[test]
    fn to_design_node_maps_typography_text_and_fills() {
        let child = FigmaNodeData {
            id: "2".to_string(),
            name: "Heading".to_string(),
            node_type: "TEXT".to_string(),
            visible: None,
            children: vec![],
            absolute_bounding_box: Some(FigmaBoundingBox {
                x: 10.0,
                y: 20.0,
                width: 100.0,
                height: 30.0,
            }),
            characters: Some("Welcome".to_string()),
            style: Some(FigmaTypeStyle {
                font_family: Some("Inter".to_string()),
                font_size: Some(24.0),
                font_weight: Some(700.0),
                line_height_px: Some(28.5),
            }),
            fills: vec![
                paint("GRADIENT_LINEAR", None, None),
                paint(
                    "SOLID",
                    Some(false),
                    Some(FigmaColor {
                        r: 1.0,
                        g: 1.0,
                        b: 1.0,
                        a: 1.0,
                    }),
                ),
                paint(
                    "SOLID",
                    None,
                    Some(FigmaColor {
                        r: 0.0,
                        g: 0.0,
                        b: 0.0,
                        a: 1.0,
                    }),
                ),
            ],
        };
        let root = FigmaNodeData {
            id: "1".to_string(),
            name: "Frame".to_string(),
            node_type: "FRAME".to_string(),
            visible: None,
            children: vec![child],
            absolute_bounding_box: None,
            characters: None,
            style: None,
            fills: vec![],
        };

        let design = to_design_node(&root);
        assert_eq!(design.kind, "FRAME");
        assert!(design.geometry.is_none());
        assert_eq!(design.children.len(), 1);

        let heading = &design.children[0];
        assert_eq!(heading.geometry, Some(Geometry::new(10.0, 20.0, 100.0, 30.0)));
        let style = |k: &str| heading.style.get(k).map(String::as_str);
        assert_eq!(style("text"), Some("Welcome"));
        assert_eq!(style("fontFamily"), Some("Inter"));
        assert_eq!(style("fontSize"), Some("24px"));
        assert_eq!(style("fontWeight"), Some("700"));
        assert_eq!(style("lineHeight"), Some("28.5px"));
        assert_eq!(style("fill"), Some("#000000"));
    }

    #[test]
    fn parses_file_response_and_flattens_in_pre_order() {
        let json = r#"{
            "name": "Checkout",
            "lastModified": "2024-04-01T10:00:00Z",
            "document": {
                "id": "0:0", "name": "Document", "type": "DOCUMENT",
                "children": [{
                    "id": "0:1", "name": "Page 1", "type": "CANVAS",
                    "children": [{
                        "id": "1:1", "name": "Form", "type": "FRAME",
                        "absoluteBoundingBox": {"x": 0, "y": 0, "width": 400, "height": 300},
                        "children": [{
                            "id": "1:2", "name": "Submit Button", "type": "INSTANCE",
                            "absoluteBoundingBox": {"x": 20, "y": 240, "width": 120, "height": 40},
                            "fills": [{"type": "SOLID", "color": {"r": 0.1, "g": 0.45, "b": 0.91}}]
                        }]
                    }]
                }]
            }
        }"#;

        let file: FigmaFile = serde_json::from_str(json).expect("parse file");
        let design = to_design_node(&file.document);
        let ids: Vec<&str> = flatten(&design).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1:1", "1:2"]);
        assert_eq!(
            design.children[0].children[0].children[0]
                .style
                .get("fill")
                .map(String::as_str),
            Some("#1972e8")
        );
    }

    #[test]
    fn parses_nodes_response() {
        let json = r#"{
            "nodes": {
                "1:2": {"document": {"id": "1:2", "name": "Card", "type": "FRAME",
                    "absoluteBoundingBox": {"x": 1.5, "y": 2.5, "width": 300, "height": 200}}}
            }
        }"#;
        let response: FigmaNodesResponse = serde_json::from_str(json).expect("parse nodes");
        let wrapper = response.nodes.get("1:2").expect("node present");
        let design = to_design_node(&wrapper.document);
        assert_eq!(design.geometry, Some(Geometry::new(1.5, 2.5, 300.0, 200.0)));
    }

    #[test]
    fn hidden_layers_are_dropped_with_their_subtrees() {
        let json = r#"{
            "id": "0:1", "name": "Form", "type": "FRAME",
            "children": [
                {"id": "1:1", "name": "Submit Button (old)", "type": "INSTANCE", "visible": false,
                 "absoluteBoundingBox": {"x": 40, "y": 300, "width": 200, "height": 60},
                 "children": [{"id": "1:3", "name": "Label", "type": "TEXT",
                     "absoluteBoundingBox": {"x": 50, "y": 310, "width": 80, "height": 20}}]},
                {"id": "1:2", "name": "Submit Button", "type": "INSTANCE", "visible": true,
                 "absoluteBoundingBox": {"x": 40, "y": 300, "width": 120, "height": 40}}
            ]
        }"#;
        let node: FigmaNodeData = serde_json::from_str(json).expect("parse node");
        assert_eq!(node.children[0].visible, Some(false));

        let design = to_design_node(&node);
        let candidates = flatten(&design);
        let ids: Vec<&str> = candidates.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1:2"]);

        let element = RenderedElement::new(
            "form > button",
            "button.submit-btn",
            Geometry::new(40.0, 300.0, 120.0, 40.0),
        );
        let outcome = compare_viewport(
            &candidates,
            &[element],
            &Viewport::new("Desktop", 1440, 900),
            None,
            &ComparePolicy::default(),
        );
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].design_node.id, "1:2");
        assert!(outcome.results[0].differences.is_empty());
    }
}
