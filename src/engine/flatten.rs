use crate::types::DesignNode;

/// Pre-order list of every node that carries geometry.
///
/// Structural nodes (no geometry) are skipped but their subtrees are still
/// visited. Uses an explicit stack so deep trees cannot exhaust the call
/// stack.
pub fn flatten(root: &DesignNode) -> Vec<&DesignNode> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.geometry.is_some() {
            out.push(node);
        }
        stack.extend(node.children.iter().rev());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Geometry;

    fn visible(id: &str) -> DesignNode {
        DesignNode::new(id, id, "RECTANGLE").with_geometry(Geometry::sized(10.0, 10.0))
    }

    fn structural(id: &str) -> DesignNode {
        DesignNode::new(id, id, "GROUP")
    }

    fn ids<'a>(nodes: &[&'a DesignNode]) -> Vec<&'a str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn yields_visible_nodes_in_pre_order() {
        let tree = visible("root")
            .with_child(visible("a").with_child(visible("a1")).with_child(visible("a2")))
            .with_child(visible("b"));

        assert_eq!(ids(&flatten(&tree)), vec!["root", "a", "a1", "a2", "b"]);
    }

    #[test]
    fn descends_through_structural_containers() {
        let tree = structural("doc").with_child(
            structural("group")
                .with_child(visible("button"))
                .with_child(structural("inner").with_child(visible("label"))),
        );

        assert_eq!(ids(&flatten(&tree)), vec!["button", "label"]);
    }

    #[test]
    fn all_structural_tree_is_empty() {
        let tree = structural("doc").with_child(structural("g1").with_child(structural("g2")));
        assert!(flatten(&tree).is_empty());
    }

    #[test]
    fn handles_deep_trees_without_recursion() {
        let mut node = visible("leaf");
        for depth in 0..50_000 {
            node = structural(&format!("g{depth}")).with_child(node);
        }
        let flat = flatten(&node);
        assert_eq!(ids(&flat), vec!["leaf"]);
        // Dropping a 50k-deep tree recurses in Drop; leak it to keep the test stack-safe.
        std::mem::forget(node);
    }
}
