//! Integration tests for parent tree reconciliation.

use pdf_tagtree::structure::{
    rebuild_parent_index, rebuild_parent_index_with_limit, ContentMark, NodeId, StructKid,
    StructNode, StructTree, StructType,
};
use pdf_tagtree::Error;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Every marked-content kid in the tree with its holder.
fn marks(tree: &StructTree) -> Vec<(u32, u32, NodeId)> {
    let mut out = Vec::new();
    for i in 0..tree.len() {
        let id = NodeId(i);
        for kid in &tree.node(id).unwrap().kids {
            if let StructKid::Content(mark) = kid {
                out.push((mark.page, mark.mcid, id));
            }
        }
    }
    out
}

fn sample_tree() -> (StructTree, NodeId, NodeId) {
    let mut tree = StructTree::new();
    let doc = tree.push_root(StructNode::new(StructType::Document));
    let p = tree.push_child(doc, StructNode::new(StructType::P)).unwrap();
    tree.append_content(p, ContentMark::new(0, 0)).unwrap();
    tree.append_content(p, ContentMark::new(0, 1)).unwrap();
    let fig = tree.push_child(doc, StructNode::new(StructType::Figure)).unwrap();
    tree.append_content(fig, ContentMark::new(1, 0)).unwrap();
    (tree, p, fig)
}

#[test]
fn test_every_mark_resolves_to_its_holder() {
    let (mut tree, p, fig) = sample_tree();
    rebuild_parent_index(&mut tree, 2).unwrap();

    assert_eq!(tree.owner_of(0, 0).unwrap(), Some(p));
    assert_eq!(tree.owner_of(0, 1).unwrap(), Some(p));
    assert_eq!(tree.owner_of(1, 0).unwrap(), Some(fig));
    assert_eq!(tree.owner_of(1, 1).unwrap(), None);
    assert_eq!(tree.parent_tree().unwrap().len(), 3);
}

#[test]
fn test_mutation_then_rebuild() {
    let (mut tree, p, _fig) = sample_tree();
    rebuild_parent_index(&mut tree, 2).unwrap();

    let root = tree.roots()[0];
    let h1 = tree.push_child(root, StructNode::new(StructType::H1)).unwrap();
    tree.append_content(h1, ContentMark::new(1, 5)).unwrap();
    tree.set_struct_type(p, StructType::H2).unwrap();
    assert!(matches!(tree.owner_of(0, 0), Err(Error::StaleIndex)));

    rebuild_parent_index(&mut tree, 2).unwrap();
    assert_eq!(tree.owner_of(1, 5).unwrap(), Some(h1));
    assert_eq!(tree.owner_of(0, 0).unwrap(), Some(p));
}

#[test]
fn test_page_out_of_range_keeps_previous_index() {
    let (mut tree, p, _fig) = sample_tree();
    rebuild_parent_index(&mut tree, 2).unwrap();
    let before = tree.parent_tree().cloned();

    tree.append_content(p, ContentMark::new(2, 0)).unwrap();
    let err = rebuild_parent_index(&mut tree, 2).unwrap_err();

    assert!(matches!(err, Error::Inconsistent(_)));
    assert!(!err.is_recoverable());
    assert_eq!(tree.parent_tree().cloned(), before);
    assert!(tree.is_parent_tree_stale());
}

#[test]
fn test_duplicate_claim_is_inconsistent() {
    let (mut tree, _p, fig) = sample_tree();
    tree.append_content(fig, ContentMark::new(0, 1)).unwrap();
    assert!(matches!(rebuild_parent_index(&mut tree, 2), Err(Error::Inconsistent(_))));
    assert!(tree.parent_tree().is_none());
}

#[test]
fn test_depth_limit() {
    let mut tree = StructTree::new();
    let mut current = tree.push_root(StructNode::new(StructType::Document));
    for _ in 0..10 {
        current = tree.push_child(current, StructNode::new(StructType::Div)).unwrap();
    }
    tree.append_content(current, ContentMark::new(0, 0)).unwrap();

    assert!(matches!(
        rebuild_parent_index_with_limit(&mut tree, 1, 5),
        Err(Error::RecursionLimitExceeded(5))
    ));
    rebuild_parent_index_with_limit(&mut tree, 1, 10).unwrap();
    assert_eq!(tree.owner_of(0, 0).unwrap(), Some(current));
}

#[test]
fn test_empty_tree() {
    let mut tree = StructTree::new();
    rebuild_parent_index(&mut tree, 0).unwrap();
    assert!(tree.parent_tree().unwrap().is_empty());
    assert_eq!(tree.owner_of(0, 0).unwrap(), None);
}

#[test]
fn proptest_index_matches_marks_exactly() {
    proptest!(|(shape in prop::collection::vec((0usize..32, 0u32..3, 0u32..20), 1..60))| {
        let mut tree = StructTree::new();
        tree.push_root(StructNode::new(StructType::Document));
        let mut used = BTreeSet::new();
        for (i, &(parent, page, mcid)) in shape.iter().enumerate() {
            let parent = NodeId(parent % (i + 1));
            let node = tree.push_child(parent, StructNode::new(StructType::Span)).unwrap();
            if used.insert((page, mcid)) {
                tree.append_content(node, ContentMark::new(page, mcid)).unwrap();
            }
        }

        rebuild_parent_index(&mut tree, 3).unwrap();
        let expected = marks(&tree);
        let index = tree.parent_tree().unwrap();
        prop_assert_eq!(index.len(), expected.len());
        for (page, mcid, holder) in expected {
            prop_assert_eq!(tree.owner_of(page, mcid).unwrap(), Some(holder));
        }
    });
}
