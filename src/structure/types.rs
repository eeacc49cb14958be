//! Types for PDF logical structure trees.
//!
//! Implements structure element types according to ISO 32000-1:2008 Section 14.7.2.
//! Elements live in an arena owned by [`StructTree`] and are addressed by
//! [`NodeId`]; kids and the parent tree refer to elements by id, so the tree
//! has no ownership cycles.

use super::parent_tree::ParentTree;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Stable index of a structure element in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to marked content on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentMark {
    /// 0-based page index
    pub page: u32,
    /// Marked Content ID
    pub mcid: u32,
}

impl ContentMark {
    /// Create a marked-content reference.
    pub fn new(page: u32, mcid: u32) -> Self {
        Self { page, mcid }
    }
}

/// Child of a structure element: another element or marked content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructKid {
    /// Nested structure element
    Node(NodeId),
    /// Content drawn directly on a page
    Content(ContentMark),
}

impl StructKid {
    /// The nested element id, if this kid is an element.
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            StructKid::Node(id) => Some(*id),
            StructKid::Content(_) => None,
        }
    }

    /// The content mark, if this kid is marked content.
    pub fn as_content(&self) -> Option<ContentMark> {
        match self {
            StructKid::Node(_) => None,
            StructKid::Content(mark) => Some(*mark),
        }
    }
}

/// A structure element (StructElem) in the structure tree.
///
/// According to PDF spec Section 14.7.2, each StructElem has:
/// - `/S` - Structure type (e.g., /Document, /P, /H1, /Sect)
/// - `/T` - Title (optional)
/// - `/K` - Children (structure elements or marked content references)
/// - `/P` - Parent structure element
/// - `/A`, `/Alt`, `/Lang` - Attributes (optional)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructNode {
    /// Structure type (e.g., "Document", "P", "H1", "Sect")
    pub struct_type: StructType,

    /// Title (/T), used to tell same-type siblings apart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Attributes in insertion order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,

    /// Children in reading order
    #[serde(default)]
    pub kids: Vec<StructKid>,

    /// Parent element (None for roots and detached elements)
    #[serde(default)]
    pub parent: Option<NodeId>,
}

impl StructNode {
    /// Create a new structure element
    pub fn new(struct_type: StructType) -> Self {
        Self {
            struct_type,
            title: None,
            attributes: IndexMap::new(),
            kids: Vec::new(),
            parent: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Ids of nested element kids, in order.
    pub fn node_kids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.kids.iter().filter_map(StructKid::as_node)
    }

    /// Marked-content kids, in order.
    pub fn content_kids(&self) -> impl Iterator<Item = ContentMark> + '_ {
        self.kids.iter().filter_map(StructKid::as_content)
    }

    /// Whether this element's type and title match.
    ///
    /// `title` of `None` matches any title; otherwise titles compare exactly.
    pub fn matches(&self, struct_type: &StructType, title: Option<&str>) -> bool {
        &self.struct_type == struct_type
            && title.map_or(true, |want| self.title.as_deref() == Some(want))
    }
}

/// The root of a PDF structure tree (StructTreeRoot dictionary).
///
/// This is the entry point for accessing a document's logical structure.
/// According to PDF spec Section 14.7.2, the StructTreeRoot contains:
/// - `/K` - The immediate child or children of the structure tree root
/// - `/ParentTree` - Maps marked content to structure elements
/// - `/RoleMap` - Maps non-standard structure types to standard ones
///
/// Every mutation made through this type marks the parent tree stale until
/// [`rebuild_parent_index`](super::rebuild_parent_index) succeeds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructTree {
    nodes: Vec<StructNode>,

    roots: Vec<NodeId>,

    /// Role map for custom structure types
    #[serde(default)]
    pub role_map: HashMap<String, String>,

    #[serde(skip)]
    parent_tree: Option<ParentTree>,

    #[serde(skip)]
    parent_tree_stale: bool,
}

impl StructTree {
    /// Create an empty structure tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements in the arena (attached or not).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level elements in order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Borrow an element.
    pub fn node(&self, id: NodeId) -> Option<&StructNode> {
        self.nodes.get(id.0)
    }

    /// Borrow an element, failing with `Inconsistent` for a dangling id.
    pub fn get(&self, id: NodeId) -> Result<&StructNode> {
        self.node(id)
            .ok_or_else(|| Error::Inconsistent(format!("element {} does not exist", id)))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut StructNode> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| Error::Inconsistent(format!("element {} does not exist", id)))
    }

    /// Create a detached element and return its id.
    pub fn create_node(&mut self, node: StructNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(StructNode { parent: None, ..node });
        self.parent_tree_stale = true;
        id
    }

    /// Append a detached element to the root sequence.
    pub fn add_root(&mut self, id: NodeId) -> Result<()> {
        self.ensure_detached(id)?;
        self.roots.push(id);
        self.parent_tree_stale = true;
        Ok(())
    }

    /// Append a detached element as the last kid of `parent`.
    pub fn append_node(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent)?;
        self.ensure_detached(child)?;
        if self.ancestors(parent).any(|a| a == child) || parent == child {
            return Err(Error::InvalidArgument(format!(
                "attaching {} under {} would create a cycle",
                child, parent
            )));
        }
        self.get_mut(parent)?.kids.push(StructKid::Node(child));
        self.get_mut(child)?.parent = Some(parent);
        self.parent_tree_stale = true;
        Ok(())
    }

    /// Append a marked-content reference as the last kid of `parent`.
    pub fn append_content(&mut self, parent: NodeId, mark: ContentMark) -> Result<()> {
        self.get_mut(parent)?.kids.push(StructKid::Content(mark));
        self.parent_tree_stale = true;
        Ok(())
    }

    /// Create an element and attach it under `parent` in one step.
    pub fn push_child(&mut self, parent: NodeId, node: StructNode) -> Result<NodeId> {
        self.get(parent)?;
        let id = self.create_node(node);
        self.append_node(parent, id)?;
        Ok(id)
    }

    /// Create an element and append it to the roots in one step.
    pub fn push_root(&mut self, node: StructNode) -> NodeId {
        let id = self.create_node(node);
        self.roots.push(id);
        id
    }

    fn ensure_detached(&self, id: NodeId) -> Result<()> {
        let node = self.get(id)?;
        if node.parent.is_some() || self.roots.contains(&id) {
            return Err(Error::InvalidArgument(format!("element {} is already attached", id)));
        }
        Ok(())
    }

    /// Walk parent links upwards from `id` (excluding `id`).
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.node(id).and_then(|n| n.parent);
        let mut seen = HashSet::new();
        std::iter::from_fn(move || {
            let next = current?;
            if !seen.insert(next) {
                return None;
            }
            current = self.node(next).and_then(|n| n.parent);
            Some(next)
        })
    }

    /// Change an element's structure type.
    pub fn set_struct_type(&mut self, id: NodeId, struct_type: StructType) -> Result<()> {
        self.get_mut(id)?.struct_type = struct_type;
        self.parent_tree_stale = true;
        Ok(())
    }

    /// Change an element's title.
    pub fn set_title(&mut self, id: NodeId, title: Option<String>) -> Result<()> {
        self.get_mut(id)?.title = title;
        self.parent_tree_stale = true;
        Ok(())
    }

    /// Insert or overwrite an attribute. Returns the previous value.
    pub fn insert_attribute(
        &mut self,
        id: NodeId,
        key: String,
        value: String,
    ) -> Result<Option<String>> {
        let previous = self.get_mut(id)?.attributes.insert(key, value);
        self.parent_tree_stale = true;
        Ok(previous)
    }

    /// Remove an attribute, keeping the order of the others.
    pub fn remove_attribute(&mut self, id: NodeId, key: &str) -> Result<Option<String>> {
        let previous = self.get_mut(id)?.attributes.shift_remove(key);
        self.parent_tree_stale = true;
        Ok(previous)
    }

    /// Check that every id resolves and every element is reachable at most once,
    /// with parent links agreeing with kid lists.
    pub fn check_integrity(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut stack: Vec<(Option<NodeId>, NodeId)> =
            self.roots.iter().rev().map(|&id| (None, id)).collect();
        while let Some((parent, id)) = stack.pop() {
            let node = self.get(id)?;
            if !seen.insert(id) {
                return Err(Error::Inconsistent(format!("element {} is reachable twice", id)));
            }
            if node.parent != parent {
                return Err(Error::Inconsistent(format!(
                    "element {} has parent {:?} but is a kid of {:?}",
                    id, node.parent, parent
                )));
            }
            stack.extend(node.node_kids().collect::<Vec<_>>().into_iter().rev().map(|k| (Some(id), k)));
        }
        Ok(())
    }

    /// The current parent tree, if one has been built.
    pub fn parent_tree(&self) -> Option<&ParentTree> {
        self.parent_tree.as_ref()
    }

    /// Whether mutations happened since the last successful rebuild.
    pub fn is_parent_tree_stale(&self) -> bool {
        self.parent_tree_stale || self.parent_tree.is_none()
    }

    /// Owner of the marked content `(page, mcid)` according to the parent tree.
    ///
    /// # Errors
    ///
    /// * `Error::StaleIndex` - the tree changed since the last rebuild
    pub fn owner_of(&self, page: u32, mcid: u32) -> Result<Option<NodeId>> {
        if self.is_parent_tree_stale() {
            return Err(Error::StaleIndex);
        }
        Ok(self
            .parent_tree
            .as_ref()
            .and_then(|pt| pt.get_parent(page, mcid)))
    }

    pub(super) fn install_parent_tree(&mut self, parent_tree: ParentTree) {
        self.parent_tree = Some(parent_tree);
        self.parent_tree_stale = false;
    }
}

/// Standard structure types from PDF spec Section 14.8.4.
///
/// These are the standard structure types defined by the PDF specification.
/// Custom types can be mapped to standard types via the RoleMap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StructType {
    // Document-level structure types
    /// Document root
    Document,
    /// Part (major division)
    Part,
    /// Article
    Art,
    /// Section
    Sect,
    /// Division
    Div,
    /// Non-structural grouping element
    NonStruct,

    // Paragraph-level structure types
    /// Paragraph
    P,
    /// Heading level 1-6
    H,
    /// Heading level 1
    H1,
    /// Heading level 2
    H2,
    /// Heading level 3
    H3,
    /// Heading level 4
    H4,
    /// Heading level 5
    H5,
    /// Heading level 6
    H6,

    // List structure types
    /// List
    L,
    /// List item
    LI,
    /// Label (list item marker)
    Lbl,
    /// List body (list item content)
    LBody,

    // Table structure types
    /// Table
    Table,
    /// Table row
    TR,
    /// Table header cell
    TH,
    /// Table data cell
    TD,
    /// Table header group
    THead,
    /// Table body group
    TBody,
    /// Table footer group
    TFoot,

    // Inline structure types
    /// Span (inline generic)
    Span,
    /// Link
    Link,
    /// Annotation
    Annot,

    // Illustration structure types
    /// Figure
    Figure,
    /// Formula
    Formula,
    /// Form (input field)
    Form,

    // Non-standard or custom type
    /// Custom structure type not defined in the PDF specification
    Custom(String),
}

impl StructType {
    /// Parse structure type from string (e.g., "P" -> StructType::P)
    pub fn from_str(s: &str) -> Self {
        match s {
            "Document" => Self::Document,
            "Part" => Self::Part,
            "Art" => Self::Art,
            "Sect" => Self::Sect,
            "Div" => Self::Div,
            "NonStruct" => Self::NonStruct,
            "P" => Self::P,
            "H" => Self::H,
            "H1" => Self::H1,
            "H2" => Self::H2,
            "H3" => Self::H3,
            "H4" => Self::H4,
            "H5" => Self::H5,
            "H6" => Self::H6,
            "L" => Self::L,
            "LI" => Self::LI,
            "Lbl" => Self::Lbl,
            "LBody" => Self::LBody,
            "Table" => Self::Table,
            "TR" => Self::TR,
            "TH" => Self::TH,
            "TD" => Self::TD,
            "THead" => Self::THead,
            "TBody" => Self::TBody,
            "TFoot" => Self::TFoot,
            "Span" => Self::Span,
            "Link" => Self::Link,
            "Annot" => Self::Annot,
            "Figure" => Self::Figure,
            "Formula" => Self::Formula,
            "Form" => Self::Form,
            _ => Self::Custom(s.to_string()),
        }
    }

    /// The PDF name of this type (without the leading slash).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Document => "Document",
            Self::Part => "Part",
            Self::Art => "Art",
            Self::Sect => "Sect",
            Self::Div => "Div",
            Self::NonStruct => "NonStruct",
            Self::P => "P",
            Self::H => "H",
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H3 => "H3",
            Self::H4 => "H4",
            Self::H5 => "H5",
            Self::H6 => "H6",
            Self::L => "L",
            Self::LI => "LI",
            Self::Lbl => "Lbl",
            Self::LBody => "LBody",
            Self::Table => "Table",
            Self::TR => "TR",
            Self::TH => "TH",
            Self::TD => "TD",
            Self::THead => "THead",
            Self::TBody => "TBody",
            Self::TFoot => "TFoot",
            Self::Span => "Span",
            Self::Link => "Link",
            Self::Annot => "Annot",
            Self::Figure => "Figure",
            Self::Formula => "Formula",
            Self::Form => "Form",
            Self::Custom(s) => s,
        }
    }

    /// Check if this is a heading type (H, H1-H6)
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::H | Self::H1 | Self::H2 | Self::H3 | Self::H4 | Self::H5 | Self::H6)
    }

    /// Check if this is a block-level element
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Document
                | Self::Part
                | Self::Art
                | Self::Sect
                | Self::Div
                | Self::P
                | Self::H
                | Self::H1
                | Self::H2
                | Self::H3
                | Self::H4
                | Self::H5
                | Self::H6
                | Self::Table
                | Self::Figure
                | Self::Formula
        )
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for StructType {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<&str> for StructType {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<StructType> for String {
    fn from(t: StructType) -> Self {
        t.as_str().to_string()
    }
}
