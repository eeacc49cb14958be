//! Structure tree traversal for extracting reading order.
//!
//! Implements pre-order traversal of structure trees to determine correct reading order.

use super::parent_tree::DEFAULT_MAX_DEPTH;
use super::types::{NodeId, StructKid, StructTree, StructType};

/// Represents an ordered content item extracted from structure tree.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedContent {
    /// Page number
    pub page: u32,

    /// Marked Content ID
    pub mcid: u32,

    /// Element that holds the marked content
    pub owner: NodeId,

    /// Structure type (for semantic information)
    pub struct_type: StructType,
}

impl OrderedContent {
    /// Is this a heading?
    pub fn is_heading(&self) -> bool {
        self.struct_type.is_heading()
    }

    /// Is this a block-level element?
    pub fn is_block(&self) -> bool {
        self.struct_type.is_block()
    }
}

/// Traverse the structure tree and extract ordered content for a specific page.
///
/// This performs a pre-order traversal of the structure tree, extracting
/// marked content references in document order. Elements nested deeper than
/// [`DEFAULT_MAX_DEPTH`] levels are not visited.
pub fn traverse_structure_tree(tree: &StructTree, page_num: u32) -> Vec<OrderedContent> {
    let mut result = Vec::new();
    for &root in tree.roots() {
        traverse_element(tree, root, page_num, 0, &mut result);
    }
    result
}

/// Recursively traverse a structure element.
///
/// Performs pre-order traversal:
/// 1. Process current element's marked content (if on target page)
/// 2. Recursively process children in order
fn traverse_element(
    tree: &StructTree,
    id: NodeId,
    target_page: u32,
    depth: u32,
    result: &mut Vec<OrderedContent>,
) {
    if depth > DEFAULT_MAX_DEPTH {
        log::warn!("Structure deeper than {} levels at {}; not descending", DEFAULT_MAX_DEPTH, id);
        return;
    }
    let Some(elem) = tree.node(id) else {
        return;
    };

    for kid in &elem.kids {
        match *kid {
            StructKid::Content(mark) => {
                if mark.page == target_page {
                    result.push(OrderedContent {
                        page: mark.page,
                        mcid: mark.mcid,
                        owner: id,
                        struct_type: elem.struct_type.clone(),
                    });
                }
            },
            StructKid::Node(child) => traverse_element(tree, child, target_page, depth + 1, result),
        }
    }
}

/// Extract all marked content IDs in reading order for a page.
///
/// This is a simpler interface that just returns the MCIDs in order,
/// which can be used to reorder extracted text blocks.
pub fn extract_reading_order(tree: &StructTree, page_num: u32) -> Vec<u32> {
    traverse_structure_tree(tree, page_num)
        .into_iter()
        .map(|c| c.mcid)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::types::{ContentMark, StructNode};

    #[test]
    fn test_simple_traversal() {
        // Document
        //   ├─ P (MCID=0, page=0)
        //   └─ P (MCID=1, page=0)
        let mut tree = StructTree::new();
        let root = tree.push_root(StructNode::new(StructType::Document));
        let p1 = tree.push_child(root, StructNode::new(StructType::P)).unwrap();
        let p2 = tree.push_child(root, StructNode::new(StructType::P)).unwrap();
        tree.append_content(p1, ContentMark::new(0, 0)).unwrap();
        tree.append_content(p2, ContentMark::new(0, 1)).unwrap();

        assert_eq!(extract_reading_order(&tree, 0), vec![0, 1]);
    }

    #[test]
    fn test_page_filtering() {
        let mut tree = StructTree::new();
        let root = tree.push_root(StructNode::new(StructType::Document));
        let p1 = tree.push_child(root, StructNode::new(StructType::P)).unwrap();
        let p2 = tree.push_child(root, StructNode::new(StructType::P)).unwrap();
        tree.append_content(p1, ContentMark::new(0, 0)).unwrap();
        tree.append_content(p2, ContentMark::new(1, 1)).unwrap();

        assert_eq!(extract_reading_order(&tree, 0), vec![0]);
        assert_eq!(extract_reading_order(&tree, 1), vec![1]);
    }

    #[test]
    fn test_nested_structure() {
        // Document
        //   └─ Sect
        //       ├─ H1 (MCID=0)
        //       └─ P (MCID=1)
        let mut tree = StructTree::new();
        let root = tree.push_root(StructNode::new(StructType::Document));
        let sect = tree.push_child(root, StructNode::new(StructType::Sect)).unwrap();
        let h1 = tree.push_child(sect, StructNode::new(StructType::H1)).unwrap();
        let p = tree.push_child(sect, StructNode::new(StructType::P)).unwrap();
        tree.append_content(h1, ContentMark::new(0, 0)).unwrap();
        tree.append_content(p, ContentMark::new(0, 1)).unwrap();

        let ordered = traverse_structure_tree(&tree, 0);
        assert_eq!(ordered.len(), 2);
        assert!(ordered[0].is_heading());
        assert_eq!(ordered[0].owner, h1);
        assert!(!ordered[1].is_heading());
        assert!(ordered[1].is_block());
    }

    #[test]
    fn test_cyclic_tree_terminates() {
        let json = r#"{"nodes": [{"struct_type": "P", "kids": [{"content": {"page": 0, "mcid": 7}}, {"node": 0}]}], "roots": [0]}"#;
        let tree: StructTree = serde_json::from_str(json).unwrap();
        let order = extract_reading_order(&tree, 0);
        assert_eq!(order.len(), DEFAULT_MAX_DEPTH as usize + 1);
        assert!(order.iter().all(|&mcid| mcid == 7));
    }
}
