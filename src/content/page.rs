//! Pages and scope-bound page leases.
//!
//! Pages are owned by the [`PageStore`]. Code that needs a page acquires a
//! [`PageLease`], which is released when it goes out of scope, on every exit
//! path. The store counts outstanding leases so callers can assert that a
//! traversal left nothing acquired.

use super::objects::{ContentObject, TextRun};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::ops::Deref;

/// A single page: an ordered list of content objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Page rotation in degrees (0, 90, 180, 270)
    #[serde(default)]
    pub rotation: i32,
    /// Content objects in drawing order
    pub objects: Vec<ContentObject>,
}

impl Page {
    /// Create a page from its content objects.
    pub fn new(objects: Vec<ContentObject>) -> Self {
        Self {
            rotation: 0,
            objects,
        }
    }

    /// Content objects in drawing order.
    pub fn objects(&self) -> &[ContentObject] {
        &self.objects
    }

    /// Find the first text run carrying `mcid`, searching form groups depth-first.
    pub fn find_text_run(&self, mcid: u32) -> Option<&TextRun> {
        self.objects.iter().find_map(|obj| {
            obj.walk(&mut |candidate| match candidate {
                ContentObject::Text(run) if run.mcid == Some(mcid) => Some(run),
                _ => None,
            })
        })
    }

    /// Every marked-content identifier used on this page, in drawing order.
    pub fn mcids(&self) -> Vec<u32> {
        let mut out = Vec::new();
        for obj in &self.objects {
            obj.walk(&mut |candidate| {
                if let Some(mcid) = candidate.mcid() {
                    out.push(mcid);
                }
                None::<()>
            });
        }
        out
    }
}

/// Owner of a document's pages.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageStore {
    pages: Vec<Page>,
    #[serde(skip)]
    leases: Cell<usize>,
}

impl Clone for PageStore {
    fn clone(&self) -> Self {
        Self {
            pages: self.pages.clone(),
            leases: Cell::new(0),
        }
    }
}

impl PageStore {
    /// Create a store from pages.
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            pages,
            leases: Cell::new(0),
        }
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the store holds no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Acquire a page for reading. The lease is released when dropped.
    pub fn acquire(&self, index: u32) -> Result<PageLease<'_>> {
        let page = self
            .pages
            .get(index as usize)
            .ok_or_else(|| Error::NotFound(format!("page {}", index)))?;
        self.leases.set(self.leases.get() + 1);
        Ok(PageLease {
            page,
            index,
            leases: &self.leases,
        })
    }

    /// Number of leases currently held.
    pub fn outstanding(&self) -> usize {
        self.leases.get()
    }

    /// Mutable access to a page. Requires exclusive access to the store, so no
    /// lease can be alive at the same time.
    pub fn page_mut(&mut self, index: u32) -> Option<&mut Page> {
        self.pages.get_mut(index as usize)
    }

    /// Iterate pages in order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}

/// A scope-bound read handle on one page.
#[derive(Debug)]
pub struct PageLease<'a> {
    page: &'a Page,
    index: u32,
    leases: &'a Cell<usize>,
}

impl PageLease<'_> {
    /// Index of the leased page.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl Deref for PageLease<'_> {
    type Target = Page;

    fn deref(&self) -> &Page {
        self.page
    }
}

impl Drop for PageLease<'_> {
    fn drop(&mut self) {
        self.leases.set(self.leases.get().saturating_sub(1));
    }
}
