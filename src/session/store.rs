//! Document stores.

use super::DocumentStore;
use crate::document::Document;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores documents as JSON files.
///
/// Loaded structure trees are checked for dangling ids, shared elements and
/// wrong parent links before the document is handed out. Saves go through a
/// temporary file next to the target, so a failed save never truncates an
/// existing document.
#[derive(Debug, Clone, Default)]
pub struct JsonDocumentStore {
    pretty: bool,
}

impl JsonDocumentStore {
    /// Store writing compact JSON.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write indented JSON.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Parse a document from JSON text.
    pub fn load_str(data: &str) -> Result<Document> {
        let doc: Document = serde_json::from_str(data)?;
        if let Some(tree) = doc.struct_tree() {
            tree.check_integrity()?;
        }
        Ok(doc)
    }
}

impl DocumentStore for JsonDocumentStore {
    fn open(&mut self, path: &Path) -> Result<Document> {
        let data = fs::read_to_string(path)?;
        let doc = Self::load_str(&data)?;
        log::debug!(
            "Loaded {} ({} pages, tagged: {})",
            path.display(),
            doc.page_count(),
            doc.is_tagged()
        );
        Ok(doc)
    }

    fn save(&mut self, doc: &Document, path: &Path) -> Result<()> {
        let data = if self.pretty {
            serde_json::to_string_pretty(doc)?
        } else {
            serde_json::to_string(doc)?
        };
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data)?;
        fs::rename(&tmp, path)?;
        log::debug!("Saved {}", path.display());
        Ok(())
    }
}

/// Keeps documents in memory, keyed by path.
///
/// `open` hands out a copy; the stored document is only replaced by `save`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<PathBuf, Document>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a document at `path`, replacing any previous one.
    pub fn insert(&mut self, path: impl AsRef<Path>, doc: Document) {
        self.documents.insert(path.as_ref().to_path_buf(), doc);
    }

    /// The document at `path`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Document> {
        self.documents.get(path.as_ref())
    }

    /// Whether a document is stored at `path`.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.documents.contains_key(path.as_ref())
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn open(&mut self, path: &Path) -> Result<Document> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Store(format!("no document at {}", path.display())))
    }

    fn save(&mut self, doc: &Document, path: &Path) -> Result<()> {
        self.documents.insert(path.to_path_buf(), doc.clone());
        Ok(())
    }
}
