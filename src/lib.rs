// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::should_implement_trait)]

//! # PDF Tagtree
//!
//! Structure tree engine for tagged PDFs: find elements, improve what an
//! auto-tagger produced, and keep the parent tree consistent.
//!
//! ## Core Features
//!
//! - **Tree Search**: pre-order lookup of elements by structure type and title
//! - **Content Locator**: resolve a marked-content reference to the text it marks,
//!   descending into form groups
//! - **Heading Reclassification**: promote `/P` elements to `/H1`/`/H2` from font
//!   name and size
//! - **Structural Editing**: table header rows, titles, alternate text and
//!   attributes, validated before anything changes
//! - **Parent Tree Reconciliation**: rebuild the (page, MCID) → element index
//!   atomically, rejecting inconsistent trees (ISO 32000-1:2008 §14.7.4.4)
//! - **Retagging Sessions**: open, auto-tag, edit, rebuild, save
//!
//! ## Architecture
//! - **Arena tree**: elements addressed by [`NodeId`](structure::NodeId), no
//!   ownership cycles
//! - **Scoped page access**: [`PageLease`](content::PageLease) guards are
//!   released on every exit path
//! - **Pluggable collaborators**: [`AutoTagger`](session::AutoTagger),
//!   [`DocumentStore`](session::DocumentStore) and
//!   [`PageContentObserver`](events::PageContentObserver) traits
//!
//! ## Quick Start
//!
//! ```
//! use pdf_tagtree::content::{ContentObject, Page, TextRun};
//! use pdf_tagtree::session::{AutoTagger, MarkedContentTagger};
//! use pdf_tagtree::editor::HeadingClassifier;
//! use pdf_tagtree::structure::{find, rebuild_parent_index, StructType};
//! use pdf_tagtree::Document;
//!
//! # fn main() -> pdf_tagtree::Result<()> {
//! let mut doc = Document::new(vec![Page::new(vec![
//!     ContentObject::Text(TextRun::new("Results", "Arial-Bold", 18.0)),
//!     ContentObject::Text(TextRun::new("We measured...", "Arial", 11.0)),
//! ])]);
//!
//! let tree = MarkedContentTagger::new().auto_tag(&mut doc)?;
//! doc.set_struct_tree(tree);
//!
//! let page_count = doc.page_count();
//! let (tree, pages) = doc.tree_and_pages_mut()?;
//! HeadingClassifier::default().reclassify_tree(tree, pages);
//! rebuild_parent_index(tree, page_count)?;
//!
//! let heading = find(tree, &StructType::H2, None).unwrap();
//! assert_eq!(tree.owner_of(0, 0)?, Some(heading));
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Document model
pub mod content;
pub mod document;
/// PDF logical structure (Tagged PDFs)
pub mod structure;

// Structure editing
pub mod editor;

// Change notification
pub mod events;

// Configuration
pub mod config;

// Retagging sessions
pub mod session;

// Re-exports
pub use config::{HeadingRule, RetagConfig};
pub use document::{Document, DocumentInfo};
pub use error::{Error, Result};
pub use session::{Session, SessionReport};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
