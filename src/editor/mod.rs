//! Editing of a document's structure tree.
//!
//! - [`reclassify`]: promote paragraphs to headings from their font
//! - [`structural`]: relabel table header rows, set titles and attributes
//!
//! Edits go through [`StructTree`](crate::structure::StructTree) methods, so
//! every successful edit marks the parent tree stale until the next
//! [`rebuild_parent_index`](crate::structure::rebuild_parent_index).

pub mod reclassify;
pub mod structural;

pub use reclassify::{paragraph_style, reclassify_headings, reclassify_tree, HeadingClassifier};
pub use structural::{
    relabel_first_row_cells, relabel_first_row_cells_as, remove_attribute, set_alt_text,
    set_attribute, set_struct_type, set_title, ALT_TEXT_KEY,
};
