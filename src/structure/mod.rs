//! PDF Logical Structure (Tagged PDF) support.
//!
//! This module implements the structure tree of a tagged document according to
//! ISO 32000-1:2008 Section 14.7, and the operations that work over it.
//!
//! ## Structure Tree
//!
//! A structure tree consists of:
//! - **StructTreeRoot**: The root of the structure hierarchy ([`StructTree`])
//! - **StructElem**: Structure elements (paragraphs, headings, tables, ...) ([`StructNode`])
//! - **ParentTree**: Maps marked content IDs to structure elements ([`ParentTree`])
//! - **Marked Content**: Tagged content in page streams, referenced by [`ContentMark`]
//!
//! Elements are stored in an arena and addressed by [`NodeId`]. Kids refer to
//! elements by id and the parent tree is a separate map, so there are no
//! ownership cycles.
//!
//! ## Reading Order
//!
//! Reading order is determined by pre-order traversal of the structure tree:
//! 1. Visit structure element
//! 2. Extract associated marked content
//! 3. Recursively visit children in order
//!
//! ## Example
//!
//! ```
//! use pdf_tagtree::structure::{
//!     find, rebuild_parent_index, ContentMark, StructNode, StructTree, StructType,
//! };
//!
//! let mut tree = StructTree::new();
//! let doc = tree.push_root(StructNode::new(StructType::Document));
//! let p = tree.push_child(doc, StructNode::new(StructType::P)).unwrap();
//! tree.append_content(p, ContentMark::new(0, 3)).unwrap();
//!
//! rebuild_parent_index(&mut tree, 1).unwrap();
//! assert_eq!(tree.owner_of(0, 3).unwrap(), Some(p));
//! assert_eq!(find(&tree, &StructType::P, None), Some(p));
//! ```

mod dump;
mod parent_tree;
mod search;
pub mod traversal;
mod types;

pub use dump::dump_tree;
pub use parent_tree::{
    rebuild_parent_index, rebuild_parent_index_with_limit, ParentTree, DEFAULT_MAX_DEPTH,
};
pub use search::{find, find_all, find_in};
pub use traversal::{extract_reading_order, traverse_structure_tree, OrderedContent};
pub use types::{ContentMark, NodeId, StructKid, StructNode, StructTree, StructType};
