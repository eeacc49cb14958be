//! Page content: objects, pages, and style lookup.
//!
//! Structure elements point into page content through marked-content
//! references (page + MCID). This module models the content side of that
//! link and resolves a reference to the style of the text it marks.

mod locator;
mod objects;
mod page;
mod style;

pub use locator::locate_style_for_mark;
pub use objects::{ContentObject, FormGroup, ImageObject, PathObject, TextRun};
pub use page::{Page, PageLease, PageStore};
pub use style::StyleInfo;
