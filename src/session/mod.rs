//! Retagging sessions.
//!
//! A [`Session`] opens a document from a [`DocumentStore`], replaces its tags
//! with a fresh tree from an [`AutoTagger`], improves that tree (headings,
//! table header row, figure alternate text), rebuilds the parent tree and
//! saves the result.
//!
//! Edits after auto-tagging are best-effort: a missing table or figure is
//! recorded in [`SessionReport::skipped`] and the session carries on. A failed
//! parent tree rebuild is fatal and nothing is saved.
//!
//! ## Example
//!
//! ```
//! use pdf_tagtree::content::{ContentObject, Page, TextRun};
//! use pdf_tagtree::session::{MarkedContentTagger, MemoryStore, Session};
//! use pdf_tagtree::Document;
//!
//! let mut store = MemoryStore::new();
//! store.insert(
//!     "in.pdf",
//!     Document::new(vec![Page::new(vec![ContentObject::Text(TextRun::new(
//!         "Annual Report",
//!         "Arial-Black",
//!         30.0,
//!     ))])]),
//! );
//!
//! let mut session = Session::new(store, MarkedContentTagger::new());
//! let report = session.run("in.pdf", "out.pdf").unwrap();
//! assert_eq!(report.headings_promoted, 1);
//! assert!(session.store().contains("out.pdf"));
//! ```

mod store;
mod tagger;

pub use store::{JsonDocumentStore, MemoryStore};
pub use tagger::MarkedContentTagger;

use crate::config::RetagConfig;
use crate::document::Document;
use crate::editor::{relabel_first_row_cells_as, set_alt_text, HeadingClassifier};
use crate::error::{Error, Result};
use crate::events::{LoggingObserver, PageContentObserver};
use crate::structure::{find, rebuild_parent_index_with_limit, NodeId, StructTree};
use std::path::Path;
use std::rc::Rc;

/// Produces the initial structure tree of a document.
pub trait AutoTagger {
    /// Tag `doc`, which has no structure tree. The tagger may mark page
    /// content through [`Document::edit_page`].
    fn auto_tag(&self, doc: &mut Document) -> Result<StructTree>;
}

/// Opens, saves and closes documents.
pub trait DocumentStore {
    /// Open the document at `path`.
    fn open(&mut self, path: &Path) -> Result<Document>;

    /// Persist `doc` at `path`.
    fn save(&mut self, doc: &Document, path: &Path) -> Result<()>;

    /// Release a document obtained from [`open`](DocumentStore::open).
    fn close(&mut self, doc: Document) {
        drop(doc);
    }
}

/// Result of a labeled lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatch {
    /// Structure type searched for
    pub struct_type: String,
    /// Title searched for
    pub title: String,
    /// The first match, if any
    pub node: Option<NodeId>,
}

/// What a session did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionReport {
    /// Pages whose content carried marks before tagging
    pub pages_cleared: usize,
    /// Elements in the auto-tagged tree
    pub elements: usize,
    /// Paragraphs promoted to headings
    pub headings_promoted: usize,
    /// Table cells relabeled as header cells
    pub header_cells: usize,
    /// Element that received alternate text
    pub figure_with_alt: Option<NodeId>,
    /// Labeled lookups, in configuration order
    pub labeled: Vec<LabeledMatch>,
    /// Entries in the rebuilt parent tree
    pub parent_tree_entries: usize,
    /// Optional edits skipped because their target was missing
    pub skipped: Vec<String>,
}

/// One retagging session over a store.
pub struct Session<S: DocumentStore, T: AutoTagger> {
    store: S,
    tagger: T,
    config: RetagConfig,
    observer: Rc<dyn PageContentObserver>,
}

impl<S: DocumentStore, T: AutoTagger> Session<S, T> {
    /// Session with default configuration and a [`LoggingObserver`].
    pub fn new(store: S, tagger: T) -> Self {
        Self {
            store,
            tagger,
            config: RetagConfig::default(),
            observer: Rc::new(LoggingObserver),
        }
    }

    /// Use `config`.
    pub fn with_config(mut self, config: RetagConfig) -> Self {
        self.config = config;
        self
    }

    /// Observe page content changes with `observer`.
    pub fn with_observer(mut self, observer: Rc<dyn PageContentObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The configuration.
    pub fn config(&self) -> &RetagConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the session, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Retag the document at `open_path` and save it to `save_path`.
    ///
    /// The observer is subscribed for the whole session and removed before
    /// the document is closed, whether or not the session succeeded.
    ///
    /// # Errors
    ///
    /// Fails when the document cannot be opened, tagging fails, the parent
    /// tree rebuild finds an inconsistency, or the save fails. Missing
    /// optional targets are not errors.
    pub fn run(&mut self, open_path: impl AsRef<Path>, save_path: impl AsRef<Path>) -> Result<SessionReport> {
        self.config.validate()?;
        let open_path = open_path.as_ref();
        let save_path = save_path.as_ref();

        log::info!("Opening {}", open_path.display());
        let mut doc = self.store.open(open_path)?;
        let subscription = doc.events_mut().subscribe(self.observer.clone());

        let result = self.retag(&mut doc).and_then(|report| {
            log::info!("Saving {}", save_path.display());
            self.store.save(&doc, save_path)?;
            Ok(report)
        });

        doc.events_mut().unsubscribe(subscription);
        self.store.close(doc);
        result
    }

    /// Run every step between open and save on an already open document.
    pub fn retag(&self, doc: &mut Document) -> Result<SessionReport> {
        let mut report = SessionReport {
            pages_cleared: doc.clear_tags()?,
            ..SessionReport::default()
        };

        let tree = self.tagger.auto_tag(doc)?;
        report.elements = tree.len();
        doc.set_struct_tree(tree);

        if let Some(title) = &self.config.document_title {
            doc.info.title = Some(title.clone());
        }

        let config = &self.config;
        let page_count = doc.page_count();
        let (tree, pages) = doc.tree_and_pages_mut()?;

        report.headings_promoted = HeadingClassifier::from_config(config).reclassify_tree(tree, pages);
        log::info!("Promoted {} paragraphs to headings", report.headings_promoted);

        match find(tree, &config.table_type, None) {
            Some(table) => match relabel_first_row_cells_as(
                tree,
                table,
                &config.row_type,
                &config.data_cell_type,
                &config.header_cell_type,
            ) {
                Ok(count) => report.header_cells = count,
                Err(e) if e.is_recoverable() => report.skip(format!("header row: {}", e)),
                Err(e) => return Err(e),
            },
            None => report.skip(format!("header row: no {} element", config.table_type)),
        }

        if let Some(alt) = &config.figure_alt_text {
            match find(tree, &config.figure_type, None) {
                Some(figure) => match set_alt_text(tree, figure, alt) {
                    Ok(()) => report.figure_with_alt = Some(figure),
                    Err(e) => report.skip(format!("alternate text: {}", e)),
                },
                None => report.skip(format!("alternate text: no {} element", config.figure_type)),
            }
        }

        for lookup in &config.labeled_lookups {
            let node = find(tree, &lookup.struct_type, Some(&lookup.title));
            match node {
                Some(id) => log::info!("Found {} {:?} at {}", lookup.struct_type, lookup.title, id),
                None => log::info!("No {} titled {:?}", lookup.struct_type, lookup.title),
            }
            report.labeled.push(LabeledMatch {
                struct_type: lookup.struct_type.to_string(),
                title: lookup.title.clone(),
                node,
            });
        }

        rebuild_parent_index_with_limit(tree, page_count, config.max_depth).map_err(|e| {
            log::warn!("Parent tree rebuild failed; document will not be saved: {}", e);
            e
        })?;
        report.parent_tree_entries = tree.parent_tree().map_or(0, |pt| pt.len());

        if pages.outstanding() != 0 {
            return Err(Error::Inconsistent(format!("{} page leases still held", pages.outstanding())));
        }

        doc.info.stamp_modified(&chrono::Local::now());
        Ok(report)
    }
}

impl SessionReport {
    fn skip(&mut self, reason: String) {
        log::warn!("Skipping {}", reason);
        self.skipped.push(reason);
    }
}
