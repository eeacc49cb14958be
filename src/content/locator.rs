//! Locating the content run behind a marked-content reference.

use super::page::PageStore;
use super::style::StyleInfo;
use crate::error::{Error, Result};

/// Find the style of the text run marked with `mcid` on page `page`.
///
/// The page is leased for the duration of the lookup and released on every
/// exit path. Objects are walked depth-first, descending into form groups, and
/// the first text run whose MCID matches wins.
///
/// # Errors
///
/// * `Error::NotFound` - the page does not exist or no text run carries the mark.
///   This is recoverable: callers treat the owning element as having no
///   derivable style.
pub fn locate_style_for_mark(pages: &PageStore, page: u32, mcid: u32) -> Result<StyleInfo> {
    let lease = pages.acquire(page)?;
    match lease.find_text_run(mcid) {
        Some(run) => Ok(StyleInfo::from_text_run(run)),
        None => {
            log::debug!("No text run with MCID {} on page {}", mcid, page);
            Err(Error::NotFound(format!("MCID {} on page {}", mcid, page)))
        },
    }
}
