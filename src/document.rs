//! The tagged document: pages, structure tree, and document info.
//!
//! A [`Document`] exclusively owns its pages and its structure tree. Page
//! content is only changed through [`Document::edit_page`], which notifies the
//! document's observers after each edit.

use crate::content::{Page, PageStore};
use crate::error::{Error, Result};
use crate::events::EventHub;
use crate::structure::StructTree;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Document metadata (Info dictionary).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentInfo {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords (comma-separated)
    pub keywords: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// PDF producer
    pub producer: Option<String>,
    /// Creation date (PDF date format)
    pub creation_date: Option<String>,
    /// Modification date (PDF date format)
    pub mod_date: Option<String>,
}

impl DocumentInfo {
    /// Create a new empty DocumentInfo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the subject.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the producer.
    pub fn producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    /// Record `when` as the modification date, in PDF date format
    /// (`D:YYYYMMDDHHmmSS`).
    pub fn stamp_modified<Tz: TimeZone>(&mut self, when: &DateTime<Tz>)
    where
        Tz::Offset: std::fmt::Display,
    {
        self.mod_date = Some(when.format("D:%Y%m%d%H%M%S").to_string());
    }
}

/// A tagged document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Document {
    /// Info dictionary
    #[serde(default)]
    pub info: DocumentInfo,

    pages: PageStore,

    #[serde(default)]
    struct_tree: Option<StructTree>,

    #[serde(skip)]
    events: EventHub,
}

impl Clone for Document {
    /// Clones content and tags. Observers stay with the original.
    fn clone(&self) -> Self {
        Self {
            info: self.info.clone(),
            pages: self.pages.clone(),
            struct_tree: self.struct_tree.clone(),
            events: EventHub::new(),
        }
    }
}

impl Document {
    /// Create an untagged document from pages.
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            info: DocumentInfo::default(),
            pages: PageStore::new(pages),
            struct_tree: None,
            events: EventHub::new(),
        }
    }

    /// The page store.
    pub fn pages(&self) -> &PageStore {
        &self.pages
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The structure tree, if the document is tagged.
    pub fn struct_tree(&self) -> Option<&StructTree> {
        self.struct_tree.as_ref()
    }

    /// Mutable structure tree, if the document is tagged.
    pub fn struct_tree_mut(&mut self) -> Option<&mut StructTree> {
        self.struct_tree.as_mut()
    }

    /// Whether the document has a structure tree.
    pub fn is_tagged(&self) -> bool {
        self.struct_tree.is_some()
    }

    /// Install a structure tree, replacing any existing one.
    pub fn set_struct_tree(&mut self, tree: StructTree) {
        self.struct_tree = Some(tree);
    }

    /// Split the document into its mutable tree and read-only pages, so a
    /// traversal can edit elements while leasing pages.
    pub fn tree_and_pages_mut(&mut self) -> Result<(&mut StructTree, &PageStore)> {
        let tree = self
            .struct_tree
            .as_mut()
            .ok_or_else(|| Error::NotFound("structure tree".to_string()))?;
        Ok((tree, &self.pages))
    }

    /// The observer registry.
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    /// Mutable observer registry.
    pub fn events_mut(&mut self) -> &mut EventHub {
        &mut self.events
    }

    /// Edit one page's content and notify observers afterwards.
    pub fn edit_page<R>(&mut self, index: u32, edit: impl FnOnce(&mut Page) -> R) -> Result<R> {
        let page = self
            .pages
            .page_mut(index)
            .ok_or_else(|| Error::NotFound(format!("page {}", index)))?;
        let result = edit(page);
        self.events.page_content_changed(index);
        Ok(result)
    }

    /// Remove the structure tree and strip marked-content ids from every page.
    ///
    /// Observers are notified for each page whose content carried marks.
    /// Returns the number of pages touched.
    pub fn clear_tags(&mut self) -> Result<usize> {
        if self.struct_tree.take().is_some() {
            log::debug!("Removed existing structure tree");
        }
        let marked: Vec<u32> = self
            .pages
            .iter()
            .enumerate()
            .filter(|(_, page)| !page.mcids().is_empty())
            .map(|(i, _)| i as u32)
            .collect();
        for &index in &marked {
            self.edit_page(index, |page| {
                for obj in &mut page.objects {
                    obj.walk_mut(&mut |o| o.set_mcid(None));
                }
            })?;
        }
        Ok(marked.len())
    }
}
