//! Page content objects.
//!
//! A page's content is an ordered list of [`ContentObject`]s. Each object may
//! carry a marked-content identifier (MCID) that links it back to the structure
//! element owning it. Form groups nest further objects, so every walk over page
//! content has to descend into them.

use serde::{Deserialize, Serialize};

/// A leaf or container object in a page's content stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentObject {
    /// A run of text drawn with a single font and size
    Text(TextRun),
    /// A form group (Form XObject) holding nested objects
    Form(FormGroup),
    /// An image placement
    Image(ImageObject),
    /// A vector path
    Path(PathObject),
}

impl ContentObject {
    /// Marked-content identifier of this object, if any.
    pub fn mcid(&self) -> Option<u32> {
        match self {
            ContentObject::Text(t) => t.mcid,
            ContentObject::Form(f) => f.mcid,
            ContentObject::Image(i) => i.mcid,
            ContentObject::Path(p) => p.mcid,
        }
    }

    /// Replace the marked-content identifier of this object.
    pub fn set_mcid(&mut self, mcid: Option<u32>) {
        match self {
            ContentObject::Text(t) => t.mcid = mcid,
            ContentObject::Form(f) => f.mcid = mcid,
            ContentObject::Image(i) => i.mcid = mcid,
            ContentObject::Path(p) => p.mcid = mcid,
        }
    }

    /// Short name of the object kind, used in logs and dumps.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ContentObject::Text(_) => "text",
            ContentObject::Form(_) => "form",
            ContentObject::Image(_) => "image",
            ContentObject::Path(_) => "path",
        }
    }

    /// Check if this is a text-bearing object.
    pub fn is_text(&self) -> bool {
        matches!(self, ContentObject::Text(_))
    }

    /// Get as a text run if this is a text object.
    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            ContentObject::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Visit this object and, for form groups, every nested object in
    /// depth-first order. Stops as soon as the visitor returns `Some`.
    pub fn walk<'a, T>(&'a self, visit: &mut impl FnMut(&'a ContentObject) -> Option<T>) -> Option<T> {
        if let Some(found) = visit(self) {
            return Some(found);
        }
        match self {
            ContentObject::Form(form) => form.objects.iter().find_map(|obj| obj.walk(visit)),
            ContentObject::Text(_) | ContentObject::Image(_) | ContentObject::Path(_) => None,
        }
    }

    /// Mutable depth-first visit over this object and nested form content.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut ContentObject)) {
        visit(self);
        match self {
            ContentObject::Form(form) => {
                for obj in &mut form.objects {
                    obj.walk_mut(visit);
                }
            },
            ContentObject::Text(_) | ContentObject::Image(_) | ContentObject::Path(_) => {},
        }
    }
}

/// A run of text with uniform font properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The decoded text
    pub text: String,
    /// Base font name (e.g. "Arial-BoldMT")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Font weight on the CSS scale (400 = normal, 700 = bold)
    #[serde(default = "default_weight")]
    pub weight: u16,
    /// Italic or oblique face
    #[serde(default)]
    pub italic: bool,
    /// Marked-content identifier
    #[serde(default)]
    pub mcid: Option<u32>,
}

fn default_weight() -> u16 {
    400
}

impl TextRun {
    /// Create an unmarked text run with normal weight.
    pub fn new(text: impl Into<String>, font_name: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_name: font_name.into(),
            font_size,
            weight: default_weight(),
            italic: false,
            mcid: None,
        }
    }

    /// Set the marked-content identifier.
    pub fn with_mcid(mut self, mcid: u32) -> Self {
        self.mcid = Some(mcid);
        self
    }

    /// Set the font weight.
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }
}

/// A group of nested content objects (Form XObject).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormGroup {
    /// Nested objects in drawing order
    pub objects: Vec<ContentObject>,
    /// Marked-content identifier of the whole group
    #[serde(default)]
    pub mcid: Option<u32>,
}

impl FormGroup {
    /// Create a form group from nested objects.
    pub fn new(objects: Vec<ContentObject>) -> Self {
        Self { objects, mcid: None }
    }
}

/// An image placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    /// Marked-content identifier
    #[serde(default)]
    pub mcid: Option<u32>,
}

/// A vector path (rules, table borders, decorations).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathObject {
    /// Number of path segments
    pub segments: usize,
    /// Marked-content identifier
    #[serde(default)]
    pub mcid: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_descends_into_forms() {
        let form = ContentObject::Form(FormGroup::new(vec![
            ContentObject::Path(PathObject::default()),
            ContentObject::Text(TextRun::new("nested", "Helvetica", 12.0).with_mcid(7)),
        ]));

        let found = form.walk(&mut |obj| obj.as_text().filter(|t| t.mcid == Some(7)));
        assert_eq!(found.map(|t| t.text.as_str()), Some("nested"));
    }

    #[test]
    fn test_walk_stops_at_first_match() {
        let form = ContentObject::Form(FormGroup::new(vec![
            ContentObject::Text(TextRun::new("first", "Helvetica", 12.0)),
            ContentObject::Text(TextRun::new("second", "Helvetica", 12.0)),
        ]));

        let mut visited = 0;
        let found = form.walk(&mut |obj| {
            visited += 1;
            obj.as_text().map(|t| t.text.clone())
        });
        assert_eq!(found.as_deref(), Some("first"));
        assert_eq!(visited, 2); // the form itself, then "first"
    }

    #[test]
    fn test_set_mcid_on_every_kind() {
        let mut objects = vec![
            ContentObject::Text(TextRun::new("a", "Helvetica", 10.0)),
            ContentObject::Form(FormGroup::default()),
            ContentObject::Image(ImageObject {
                width: 10,
                height: 10,
                mcid: None,
            }),
            ContentObject::Path(PathObject::default()),
        ];
        for (i, obj) in objects.iter_mut().enumerate() {
            obj.set_mcid(Some(i as u32));
        }
        let mcids: Vec<_> = objects.iter().map(|o| o.mcid()).collect();
        assert_eq!(mcids, vec![Some(0), Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_text_run_deserializes_with_defaults() {
        let json = r#"{"kind":"text","text":"Hi","font_name":"Arial","font_size":11.0}"#;
        let obj: ContentObject = serde_json::from_str(json).unwrap();
        let run = obj.as_text().unwrap();
        assert_eq!(run.weight, 400);
        assert!(!run.italic);
        assert_eq!(run.mcid, None);
    }
}
