//! Style-driven promotion of paragraphs to headings.
//!
//! Autotagging tends to tag every block of text as `/P`. The classifier looks
//! at the font of the first marked text inside each paragraph and re-tags it
//! as a heading when a [`HeadingRule`] matches.

use crate::config::{HeadingRule, RetagConfig};
use crate::content::{locate_style_for_mark, PageStore, StyleInfo};
use crate::structure::{NodeId, StructKid, StructTree, StructType, DEFAULT_MAX_DEPTH};

/// Applies heading rules to paragraphs.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    rules: Vec<HeadingRule>,
    paragraph_type: StructType,
    max_depth: u32,
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self::new(HeadingRule::defaults())
    }
}

impl HeadingClassifier {
    /// Classifier for `/P` elements with the given rules.
    pub fn new(rules: Vec<HeadingRule>) -> Self {
        Self {
            rules,
            paragraph_type: StructType::P,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Classifier configured from a session configuration.
    pub fn from_config(config: &RetagConfig) -> Self {
        Self {
            rules: config.heading_rules.clone(),
            paragraph_type: config.paragraph_type.clone(),
            max_depth: config.max_depth,
        }
    }

    /// The type a paragraph with `style` should become, if any.
    ///
    /// Rules are tried in order and the first match wins.
    pub fn classify(&self, style: &StyleInfo) -> Option<&StructType> {
        self.rules
            .iter()
            .find(|rule| style.contains_typeface(&rule.typeface_contains) && style.size >= rule.min_size)
            .map(|rule| &rule.promote_to)
    }

    /// Reclassify every root and its descendants. Returns the number of
    /// elements promoted.
    pub fn reclassify_tree(&self, tree: &mut StructTree, pages: &PageStore) -> usize {
        let roots = tree.roots().to_vec();
        roots
            .into_iter()
            .map(|root| self.reclassify_headings(tree, pages, root))
            .sum()
    }

    /// Reclassify `node` and its descendants, depth-first.
    ///
    /// A paragraph is promoted when its style matches a rule and is never
    /// descended into, promoted or not. Other elements are walked through
    /// their element kids in order. Paragraphs whose style cannot be
    /// resolved stay paragraphs.
    pub fn reclassify_headings(&self, tree: &mut StructTree, pages: &PageStore, node: NodeId) -> usize {
        self.visit(tree, pages, node, 0)
    }

    fn visit(&self, tree: &mut StructTree, pages: &PageStore, node: NodeId, depth: u32) -> usize {
        if depth > self.max_depth {
            log::warn!("Structure deeper than {} levels at {}; not descending", self.max_depth, node);
            return 0;
        }
        let Some(elem) = tree.node(node) else {
            return 0;
        };

        if elem.struct_type == self.paragraph_type {
            let Some(style) = first_style(tree, pages, node, 0, self.max_depth) else {
                return 0;
            };
            let Some(promote_to) = self.classify(&style).cloned() else {
                return 0;
            };
            log::debug!(
                "Promoting {} to {} ({} {}pt)",
                node,
                promote_to,
                style.typeface_name,
                style.size
            );
            return match tree.set_struct_type(node, promote_to) {
                Ok(()) => 1,
                Err(e) => {
                    log::warn!("Failed to retag {}: {}", node, e);
                    0
                },
            };
        }

        let kids: Vec<NodeId> = elem.node_kids().collect();
        kids.into_iter()
            .map(|kid| self.visit(tree, pages, kid, depth + 1))
            .sum()
    }
}

/// Style of the first marked text reachable from `node`, depth-first in kid
/// order (the same order as structure search).
///
/// Marks that do not resolve to a text run are skipped. Returns `None` when
/// nothing under the element resolves.
pub fn paragraph_style(tree: &StructTree, pages: &PageStore, node: NodeId) -> Option<StyleInfo> {
    first_style(tree, pages, node, 0, DEFAULT_MAX_DEPTH)
}

fn first_style(
    tree: &StructTree,
    pages: &PageStore,
    node: NodeId,
    depth: u32,
    max_depth: u32,
) -> Option<StyleInfo> {
    if depth > max_depth {
        return None;
    }
    for kid in &tree.node(node)?.kids {
        let style = match *kid {
            StructKid::Content(mark) => match locate_style_for_mark(pages, mark.page, mark.mcid) {
                Ok(style) => Some(style),
                Err(e) => {
                    log::debug!("No style for {}: {}", node, e);
                    None
                },
            },
            StructKid::Node(child) => first_style(tree, pages, child, depth + 1, max_depth),
        };
        if style.is_some() {
            return style;
        }
    }
    None
}

/// Reclassify `node` and its descendants with `rules` applied to `/P`
/// elements. See [`HeadingClassifier::reclassify_headings`].
pub fn reclassify_headings(
    tree: &mut StructTree,
    pages: &PageStore,
    node: NodeId,
    rules: &[HeadingRule],
) -> usize {
    HeadingClassifier::new(rules.to_vec()).reclassify_headings(tree, pages, node)
}

/// Reclassify every root of the tree with `rules`.
pub fn reclassify_tree(tree: &mut StructTree, pages: &PageStore, rules: &[HeadingRule]) -> usize {
    HeadingClassifier::new(rules.to_vec()).reclassify_tree(tree, pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentObject, ImageObject, Page, TextRun};
    use crate::structure::{ContentMark, StructNode};

    fn pages() -> PageStore {
        PageStore::new(vec![Page::new(vec![
            ContentObject::Text(TextRun::new("Title", "Arial-Black", 30.0).with_mcid(0)),
            ContentObject::Text(TextRun::new("Section", "Arial-Bold", 18.0).with_mcid(1)),
            ContentObject::Text(TextRun::new("Small bold", "Arial-Bold", 10.0).with_mcid(2)),
            ContentObject::Text(TextRun::new("Body", "Arial", 11.0).with_mcid(3)),
            ContentObject::Image(ImageObject {
                width: 4,
                height: 4,
                mcid: Some(4),
            }),
        ])])
    }

    fn paragraph(tree: &mut StructTree, parent: NodeId, mcid: u32) -> NodeId {
        let p = tree.push_child(parent, StructNode::new(StructType::P)).unwrap();
        tree.append_content(p, ContentMark::new(0, mcid)).unwrap();
        p
    }

    #[test]
    fn test_heuristic_tie_break() {
        let pages = pages();
        let mut tree = StructTree::new();
        let doc = tree.push_root(StructNode::new(StructType::Document));
        let black = paragraph(&mut tree, doc, 0);
        let bold = paragraph(&mut tree, doc, 1);
        let small = paragraph(&mut tree, doc, 2);
        let body = paragraph(&mut tree, doc, 3);

        let promoted = reclassify_headings(&mut tree, &pages, doc, &HeadingRule::defaults());
        assert_eq!(promoted, 2);
        assert_eq!(tree.node(black).unwrap().struct_type, StructType::H1);
        assert_eq!(tree.node(bold).unwrap().struct_type, StructType::H2);
        assert_eq!(tree.node(small).unwrap().struct_type, StructType::P);
        assert_eq!(tree.node(body).unwrap().struct_type, StructType::P);
        assert_eq!(pages.outstanding(), 0);
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let pages = pages();
        let mut tree = StructTree::new();
        let doc = tree.push_root(StructNode::new(StructType::Document));
        paragraph(&mut tree, doc, 0);
        paragraph(&mut tree, doc, 1);

        let classifier = HeadingClassifier::default();
        assert_eq!(classifier.reclassify_tree(&mut tree, &pages), 2);
        assert_eq!(classifier.reclassify_tree(&mut tree, &pages), 0);
    }

    #[test]
    fn test_paragraph_is_not_descended_into() {
        let pages = pages();
        let mut tree = StructTree::new();
        let doc = tree.push_root(StructNode::new(StructType::Document));
        let outer = paragraph(&mut tree, doc, 3);
        let inner = paragraph(&mut tree, outer, 0);

        assert_eq!(reclassify_headings(&mut tree, &pages, doc, &HeadingRule::defaults()), 0);
        assert_eq!(tree.node(inner).unwrap().struct_type, StructType::P);
    }

    #[test]
    fn test_style_skips_unresolved_marks() {
        let pages = pages();
        let mut tree = StructTree::new();
        let doc = tree.push_root(StructNode::new(StructType::Document));
        let p = tree.push_child(doc, StructNode::new(StructType::P)).unwrap();
        tree.append_content(p, ContentMark::new(0, 4)).unwrap(); // image
        tree.append_content(p, ContentMark::new(5, 0)).unwrap(); // no such page
        let span = tree.push_child(p, StructNode::new(StructType::Span)).unwrap();
        tree.append_content(span, ContentMark::new(0, 0)).unwrap();

        let style = paragraph_style(&tree, &pages, p).unwrap();
        assert_eq!(style.typeface_name, "Arial-Black");
        assert_eq!(reclassify_headings(&mut tree, &pages, doc, &HeadingRule::defaults()), 1);
        assert_eq!(tree.node(p).unwrap().struct_type, StructType::H1);
        assert_eq!(pages.outstanding(), 0);
    }

    #[test]
    fn test_unresolvable_paragraph_stays() {
        let pages = pages();
        let mut tree = StructTree::new();
        let doc = tree.push_root(StructNode::new(StructType::Document));
        let p = paragraph(&mut tree, doc, 42);
        assert_eq!(reclassify_headings(&mut tree, &pages, doc, &HeadingRule::defaults()), 0);
        assert_eq!(tree.node(p).unwrap().struct_type, StructType::P);
    }

    #[test]
    fn test_custom_rules() {
        let classifier = HeadingClassifier::new(vec![HeadingRule::new("Arial", 11.0, StructType::H3)]);
        let style = StyleInfo::from_text_run(&TextRun::new("x", "Arial", 11.0));
        assert_eq!(classifier.classify(&style), Some(&StructType::H3));
        let style = StyleInfo::from_text_run(&TextRun::new("x", "Arial", 10.5));
        assert_eq!(classifier.classify(&style), None);
    }

    #[test]
    fn test_style_search_honors_depth_limit() {
        let pages = pages();
        let mut tree = StructTree::new();
        let doc = tree.push_root(StructNode::new(StructType::Document));
        let p = tree.push_child(doc, StructNode::new(StructType::P)).unwrap();
        let outer = tree.push_child(p, StructNode::new(StructType::Span)).unwrap();
        let inner = tree.push_child(outer, StructNode::new(StructType::Span)).unwrap();
        tree.append_content(inner, ContentMark::new(0, 0)).unwrap();

        let shallow = HeadingClassifier::from_config(&RetagConfig::new().with_max_depth(1));
        assert_eq!(shallow.reclassify_tree(&mut tree, &pages), 0);
        assert_eq!(tree.node(p).unwrap().struct_type, StructType::P);

        assert_eq!(HeadingClassifier::default().reclassify_tree(&mut tree, &pages), 1);
        assert_eq!(tree.node(p).unwrap().struct_type, StructType::H1);
    }
}
