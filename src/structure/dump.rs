//! Indented text rendering of a structure tree, for logs and the CLI.

use super::types::{NodeId, StructKid, StructTree};
use std::collections::HashSet;
use std::fmt::Write;

/// Render the tree one element per line, kids indented two spaces.
///
/// ```text
/// Document #0
///   NonStruct "Page 1" #1
///     H1 #2
///       mcid 0 @ page 0
///     Figure #3 Alt="Chart"
/// ```
///
/// An element reached a second time is printed as `-> #id` and not expanded.
pub fn dump_tree(tree: &StructTree) -> String {
    let mut out = String::new();
    let mut seen = HashSet::new();
    for &root in tree.roots() {
        dump_element(tree, root, 0, &mut seen, &mut out);
    }
    out
}

fn dump_element(
    tree: &StructTree,
    id: NodeId,
    depth: usize,
    seen: &mut HashSet<NodeId>,
    out: &mut String,
) {
    let indent = "  ".repeat(depth);
    if !seen.insert(id) {
        let _ = writeln!(out, "{}-> {}", indent, id);
        return;
    }
    let Some(elem) = tree.node(id) else {
        let _ = writeln!(out, "{}<missing {}>", indent, id);
        return;
    };

    let _ = write!(out, "{}{}", indent, elem.struct_type);
    if let Some(title) = &elem.title {
        let _ = write!(out, " {:?}", title);
    }
    let _ = write!(out, " {}", id);
    for (key, value) in &elem.attributes {
        let _ = write!(out, " {}={:?}", key, value);
    }
    out.push('\n');

    for kid in &elem.kids {
        match *kid {
            StructKid::Node(child) => dump_element(tree, child, depth + 1, seen, out),
            StructKid::Content(mark) => {
                let _ = writeln!(out, "{}  mcid {} @ page {}", indent, mark.mcid, mark.page);
            },
        }
    }
}
