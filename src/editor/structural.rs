//! Validated edits to structure elements.
//!
//! Every edit checks its arguments before touching the tree, so a rejected
//! edit leaves the tree and its parent tree exactly as they were.

use crate::error::{Error, Result};
use crate::structure::{find_in, NodeId, StructTree, StructType};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Attribute keys: a letter followed by letters, digits, `_`, `.`, `:` or `-`
    static ref RE_ATTRIBUTE_KEY: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_.:-]*$").unwrap();
}

/// Attribute key used for alternate text.
pub const ALT_TEXT_KEY: &str = "Alt";

/// Turn the data cells of a table's first row into header cells.
///
/// The first `/TR` is located with [`find_in`], so a row nested inside
/// `/THead` or `/TBody` is found as well. Only direct `/TD` kids of that row
/// change; other kids and later rows are untouched. Returns the number of
/// cells converted.
///
/// # Errors
///
/// * `Error::NotFound` - the table has no row
/// * `Error::Inconsistent` - `table` is not in the tree
pub fn relabel_first_row_cells(tree: &mut StructTree, table: NodeId) -> Result<usize> {
    relabel_first_row_cells_as(tree, table, &StructType::TR, &StructType::TD, &StructType::TH)
}

/// [`relabel_first_row_cells`] with caller-chosen row and cell types.
pub fn relabel_first_row_cells_as(
    tree: &mut StructTree,
    table: NodeId,
    row_type: &StructType,
    from: &StructType,
    to: &StructType,
) -> Result<usize> {
    tree.get(table)?;
    let row = find_in(tree, table, row_type, None)
        .ok_or_else(|| Error::NotFound(format!("{} under table {}", row_type, table)))?;

    let cells: Vec<NodeId> = tree
        .get(row)?
        .node_kids()
        .filter(|&kid| tree.node(kid).is_some_and(|n| &n.struct_type == from))
        .collect();

    for &cell in &cells {
        tree.set_struct_type(cell, to.clone())?;
    }
    log::debug!("Relabeled {} cells of row {} as {}", cells.len(), row, to);
    Ok(cells.len())
}

/// Set (or overwrite) an attribute on an element.
///
/// # Errors
///
/// * `Error::InvalidArgument` - malformed key or value
/// * `Error::Inconsistent` - `node` is not in the tree
pub fn set_attribute(tree: &mut StructTree, node: NodeId, key: &str, value: &str) -> Result<()> {
    validate_attribute_key(key)?;
    validate_attribute_value(value)?;
    let previous = tree.insert_attribute(node, key.to_string(), value.to_string())?;
    if let Some(old) = previous {
        log::debug!("Replaced {}={:?} on {} (was {:?})", key, value, node, old);
    }
    Ok(())
}

/// Set an element's alternate text.
pub fn set_alt_text(tree: &mut StructTree, node: NodeId, alt: &str) -> Result<()> {
    set_attribute(tree, node, ALT_TEXT_KEY, alt)
}

/// Remove an attribute. Returns the removed value, if any.
pub fn remove_attribute(tree: &mut StructTree, node: NodeId, key: &str) -> Result<Option<String>> {
    validate_attribute_key(key)?;
    tree.remove_attribute(node, key)
}

/// Change an element's structure type.
///
/// Custom types must be non-empty and free of whitespace and control
/// characters, since they are written out as PDF names.
pub fn set_struct_type(tree: &mut StructTree, node: NodeId, struct_type: StructType) -> Result<()> {
    if let StructType::Custom(name) = &struct_type {
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::InvalidArgument(format!("structure type {:?}", name)));
        }
    }
    tree.set_struct_type(node, struct_type)
}

/// Change an element's title. `None` removes it.
pub fn set_title(tree: &mut StructTree, node: NodeId, title: Option<&str>) -> Result<()> {
    if let Some(title) = title {
        if title.is_empty() {
            return Err(Error::InvalidArgument("empty title".to_string()));
        }
        if title.chars().any(char::is_control) {
            return Err(Error::InvalidArgument(format!("control character in title {:?}", title)));
        }
    }
    tree.set_title(node, title.map(str::to_string))
}

fn validate_attribute_key(key: &str) -> Result<()> {
    if RE_ATTRIBUTE_KEY.is_match(key) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("attribute key {:?}", key)))
    }
}

fn validate_attribute_value(value: &str) -> Result<()> {
    match value.chars().find(|&c| c.is_control() && c != '\t' && c != '\n') {
        Some(c) => Err(Error::InvalidArgument(format!(
            "control character U+{:04X} in attribute value",
            c as u32
        ))),
        None => Ok(()),
    }
}
