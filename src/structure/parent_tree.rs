//! The parent tree: reverse index from marked content to structure elements.
//!
//! According to PDF spec Section 14.7.4.4, the parent tree is a number tree
//! that maps MCID values on each page to the structure elements that own them.
//! It is derived state: any structural edit leaves it stale until
//! [`rebuild_parent_index`] walks the tree again.

use super::types::{NodeId, StructKid, StructTree};
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashSet};

/// Default depth limit for tree walks.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

/// Parent tree that maps marked content IDs to structure elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParentTree {
    /// Mapping from page number to MCID mappings for that page
    pub page_mappings: BTreeMap<u32, BTreeMap<u32, NodeId>>,
}

impl ParentTree {
    /// Create a new parent tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the structure element that owns the given MCID on the given page
    pub fn get_parent(&self, page: u32, mcid: u32) -> Option<NodeId> {
        self.page_mappings
            .get(&page)
            .and_then(|page_map| page_map.get(&mcid))
            .copied()
    }

    /// Total number of (page, MCID) entries.
    pub fn len(&self) -> usize {
        self.page_mappings.values().map(BTreeMap::len).sum()
    }

    /// Whether the parent tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries ordered by page, then MCID.
    pub fn entries(&self) -> impl Iterator<Item = (u32, u32, NodeId)> + '_ {
        self.page_mappings
            .iter()
            .flat_map(|(&page, map)| map.iter().map(move |(&mcid, &node)| (page, mcid, node)))
    }
}

/// Rebuild the parent tree with the default depth limit.
///
/// See [`rebuild_parent_index_with_limit`].
pub fn rebuild_parent_index(tree: &mut StructTree, page_count: usize) -> Result<()> {
    rebuild_parent_index_with_limit(tree, page_count, DEFAULT_MAX_DEPTH)
}

/// Rebuild the parent tree from the current structure.
///
/// Walks every root in order, pre-order, recording each marked-content kid's
/// `(page, mcid)` against the element that holds it. The new index is built
/// off to the side and only installed when the whole walk succeeds, so a
/// failure leaves the previous index (and its stale flag) untouched.
///
/// # Errors
///
/// * `Error::Inconsistent` - a mark points past `page_count`, a mark is claimed
///   twice, a kid id dangles, or an element is reachable more than once
/// * `Error::RecursionLimitExceeded` - nesting deeper than `max_depth`
pub fn rebuild_parent_index_with_limit(
    tree: &mut StructTree,
    page_count: usize,
    max_depth: u32,
) -> Result<()> {
    let index = {
        let snapshot: &StructTree = tree;
        let mut builder = Builder {
            tree: snapshot,
            page_count,
            max_depth,
            visited: HashSet::new(),
            index: ParentTree::new(),
        };
        for &root in snapshot.roots() {
            builder.visit(root, 0)?;
        }
        builder.index
    };

    log::debug!(
        "Rebuilt parent tree: {} entries over {} pages",
        index.len(),
        index.page_mappings.len()
    );
    tree.install_parent_tree(index);
    Ok(())
}

struct Builder<'a> {
    tree: &'a StructTree,
    page_count: usize,
    max_depth: u32,
    visited: HashSet<NodeId>,
    index: ParentTree,
}

impl Builder<'_> {
    fn visit(&mut self, id: NodeId, depth: u32) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::RecursionLimitExceeded(self.max_depth));
        }
        if !self.visited.insert(id) {
            return Err(Error::Inconsistent(format!("element {} is reachable twice", id)));
        }
        let tree = self.tree;
        for kid in &tree.get(id)?.kids {
            match *kid {
                StructKid::Content(mark) => {
                    if mark.page as usize >= self.page_count {
                        return Err(Error::Inconsistent(format!(
                            "element {} marks MCID {} on page {}, but the document has {} pages",
                            id, mark.mcid, mark.page, self.page_count
                        )));
                    }
                    let page_map = self.index.page_mappings.entry(mark.page).or_default();
                    if let Some(owner) = page_map.insert(mark.mcid, id) {
                        return Err(Error::Inconsistent(format!(
                            "MCID {} on page {} is claimed by both {} and {}",
                            mark.mcid, mark.page, owner, id
                        )));
                    }
                },
                StructKid::Node(child) => self.visit(child, depth + 1)?,
            }
        }
        Ok(())
    }
}
