//! Baseline auto-tagger.

use super::AutoTagger;
use crate::content::{ContentObject, Page};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::structure::{ContentMark, StructNode, StructTree, StructType};

/// Tags content in drawing order without any layout analysis.
///
/// Unmarked text runs and images get fresh MCIDs (numbered after the highest
/// MCID already on the page). The tree has a `/Document` root with one
/// element per page titled `Page N`, holding a `/P` per text run and a
/// `/Figure` per image.
#[derive(Debug, Clone)]
pub struct MarkedContentTagger {
    page_type: StructType,
}

impl Default for MarkedContentTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkedContentTagger {
    /// Tagger grouping each page in a `/NonStruct`.
    pub fn new() -> Self {
        Self {
            page_type: StructType::NonStruct,
        }
    }

    /// Group each page's elements under `page_type` instead.
    pub fn with_page_type(mut self, page_type: StructType) -> Self {
        self.page_type = page_type;
        self
    }
}

fn is_taggable(obj: &ContentObject) -> bool {
    matches!(obj, ContentObject::Text(_) | ContentObject::Image(_))
}

fn unmarked_count(page: &Page) -> u64 {
    let mut count = 0;
    for obj in page.objects() {
        obj.walk(&mut |o| {
            if is_taggable(o) && o.mcid().is_none() {
                count += 1;
            }
            None::<()>
        });
    }
    count
}

/// First MCID to hand out on `page`, or `None` when nothing needs a mark.
///
/// # Errors
///
/// Returns [`Error::AutoTag`] when the fresh ids would not fit in a `u32`.
fn first_free_mcid(page: &Page, index: u32) -> Result<Option<u32>> {
    let needed = unmarked_count(page);
    if needed == 0 {
        return Ok(None);
    }
    let start = page.mcids().into_iter().max().map_or(0, |m| u64::from(m) + 1);
    if start + needed - 1 > u64::from(u32::MAX) {
        return Err(Error::AutoTag(format!(
            "page {} has no room for {} more marked-content ids",
            index, needed
        )));
    }
    Ok(Some(start as u32))
}

fn mark_page(page: &mut Page, start: u32) -> usize {
    let mut next = start;
    let mut marked = 0;
    for obj in &mut page.objects {
        obj.walk_mut(&mut |o| {
            if is_taggable(o) && o.mcid().is_none() {
                o.set_mcid(Some(next));
                next = next.saturating_add(1);
                marked += 1;
            }
        });
    }
    marked
}

impl AutoTagger for MarkedContentTagger {
    fn auto_tag(&self, doc: &mut Document) -> Result<StructTree> {
        for index in 0..doc.page_count() as u32 {
            let start = first_free_mcid(&*doc.pages().acquire(index)?, index)?;
            if let Some(start) = start {
                let marked = doc.edit_page(index, |page| mark_page(page, start))?;
                log::debug!("Marked {} objects on page {}", marked, index);
            }
        }

        let mut tree = StructTree::new();
        let root = tree.push_root(StructNode::new(StructType::Document));
        for index in 0..doc.page_count() as u32 {
            let page = doc.pages().acquire(index)?;
            let part = tree.push_child(
                root,
                StructNode::new(self.page_type.clone()).with_title(format!("Page {}", index + 1)),
            )?;

            let mut elements = Vec::new();
            for obj in page.objects() {
                obj.walk(&mut |o| {
                    let struct_type = match o {
                        ContentObject::Text(_) => StructType::P,
                        ContentObject::Image(_) => StructType::Figure,
                        ContentObject::Form(_) | ContentObject::Path(_) => return None,
                    };
                    if let Some(mcid) = o.mcid() {
                        elements.push((struct_type, mcid));
                    }
                    None::<()>
                });
            }

            for (struct_type, mcid) in elements {
                let elem = tree.push_child(part, StructNode::new(struct_type))?;
                tree.append_content(elem, ContentMark::new(index, mcid))?;
            }
        }

        log::info!("Auto-tagged {} pages into {} elements", doc.page_count(), tree.len());
        Ok(tree)
    }
}
