//! Structure element search.
//!
//! Depth-first, pre-order search by structure type and optional title. The
//! first match in reading order wins: a matching kid is returned before any of
//! its descendants or later siblings are looked at.
//!
//! Walks stop descending past [`DEFAULT_MAX_DEPTH`] levels, so a tree that
//! skipped `check_integrity` (one with a cycle, say) cannot exhaust the stack.

use super::parent_tree::DEFAULT_MAX_DEPTH;
use super::types::{NodeId, StructTree, StructType};

/// Find the first element of `struct_type` (and `title`, when given) in the
/// whole tree. Each root is tested before its descendants, and a root's
/// subtree is exhausted before the next root.
///
/// # Example
///
/// ```
/// use pdf_tagtree::structure::{find, StructNode, StructTree, StructType};
///
/// let mut tree = StructTree::new();
/// let doc = tree.push_root(StructNode::new(StructType::Document));
/// let table = tree.push_child(doc, StructNode::new(StructType::Table)).unwrap();
///
/// assert_eq!(find(&tree, &StructType::Table, None), Some(table));
/// assert_eq!(find(&tree, &StructType::Figure, None), None);
/// ```
pub fn find(tree: &StructTree, struct_type: &StructType, title: Option<&str>) -> Option<NodeId> {
    tree.roots().iter().find_map(|&root| {
        if tree.node(root)?.matches(struct_type, title) {
            return Some(root);
        }
        find_in(tree, root, struct_type, title)
    })
}

/// Find the first element of `struct_type` (and `title`, when given) among the
/// descendants of `node`. The node itself is not considered.
pub fn find_in(
    tree: &StructTree,
    node: NodeId,
    struct_type: &StructType,
    title: Option<&str>,
) -> Option<NodeId> {
    search(tree, node, struct_type, title, 0)
}

fn search(
    tree: &StructTree,
    node: NodeId,
    struct_type: &StructType,
    title: Option<&str>,
    depth: u32,
) -> Option<NodeId> {
    if depth >= DEFAULT_MAX_DEPTH {
        log::warn!("Structure deeper than {} levels at {}; not descending", DEFAULT_MAX_DEPTH, node);
        return None;
    }
    let elem = tree.node(node)?;
    for kid in elem.node_kids() {
        let Some(kid_elem) = tree.node(kid) else {
            log::warn!("Skipping dangling structure element {}", kid);
            continue;
        };
        if kid_elem.matches(struct_type, title) {
            return Some(kid);
        }
        if let Some(found) = search(tree, kid, struct_type, title, depth + 1) {
            return Some(found);
        }
    }
    None
}

/// Every element matching `struct_type` and `title`, in pre-order.
pub fn find_all(tree: &StructTree, struct_type: &StructType, title: Option<&str>) -> Vec<NodeId> {
    let mut found = Vec::new();
    for &root in tree.roots() {
        if tree.node(root).is_some_and(|r| r.matches(struct_type, title)) {
            found.push(root);
        }
        collect(tree, root, struct_type, title, 0, &mut found);
    }
    found
}

fn collect(
    tree: &StructTree,
    node: NodeId,
    struct_type: &StructType,
    title: Option<&str>,
    depth: u32,
    found: &mut Vec<NodeId>,
) {
    if depth >= DEFAULT_MAX_DEPTH {
        log::warn!("Structure deeper than {} levels at {}; not descending", DEFAULT_MAX_DEPTH, node);
        return;
    }
    let Some(elem) = tree.node(node) else {
        return;
    };
    for kid in elem.node_kids() {
        if tree.node(kid).is_some_and(|k| k.matches(struct_type, title)) {
            found.push(kid);
        }
        collect(tree, kid, struct_type, title, depth + 1, found);
    }
}
