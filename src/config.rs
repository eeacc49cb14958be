//! Configuration for retagging sessions.

use crate::error::{Error, Result};
use crate::structure::{StructType, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One paragraph-to-heading promotion rule.
///
/// A rule matches when the paragraph's typeface name contains
/// `typeface_contains` (case-sensitive) and its size is at least `min_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingRule {
    /// Substring the typeface name must contain (e.g. "Black")
    pub typeface_contains: String,
    /// Minimum font size in points
    pub min_size: f32,
    /// Structure type to assign
    pub promote_to: StructType,
}

impl HeadingRule {
    /// Create a rule.
    pub fn new(typeface_contains: impl Into<String>, min_size: f32, promote_to: StructType) -> Self {
        Self {
            typeface_contains: typeface_contains.into(),
            min_size,
            promote_to,
        }
    }

    /// The default rule set: Black ≥ 25pt → H1, Bold ≥ 16pt → H2.
    pub fn defaults() -> Vec<HeadingRule> {
        vec![
            HeadingRule::new("Black", 25.0, StructType::H1),
            HeadingRule::new("Bold", 16.0, StructType::H2),
        ]
    }
}

/// An element looked up by type and title during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledLookup {
    /// Structure type to search for
    pub struct_type: StructType,
    /// Exact title to match
    pub title: String,
}

/// Retagging session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetagConfig {
    /// Heading rules, evaluated in order; first match wins
    pub heading_rules: Vec<HeadingRule>,

    /// Type of paragraphs considered for promotion
    pub paragraph_type: StructType,

    /// Type of the table whose first row gets header cells
    pub table_type: StructType,

    /// Table row type
    pub row_type: StructType,

    /// Data cell type (relabeled)
    pub data_cell_type: StructType,

    /// Header cell type (assigned)
    pub header_cell_type: StructType,

    /// Type of the element that receives alternate text
    pub figure_type: StructType,

    /// Alternate text for the first figure (None skips the edit)
    pub figure_alt_text: Option<String>,

    /// Elements located by type and title for reporting
    pub labeled_lookups: Vec<LabeledLookup>,

    /// New document title (None leaves the title alone)
    pub document_title: Option<String>,

    /// Maximum structure nesting depth accepted by tree walks
    pub max_depth: u32,
}

impl Default for RetagConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetagConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            heading_rules: HeadingRule::defaults(),
            paragraph_type: StructType::P,
            table_type: StructType::Table,
            row_type: StructType::TR,
            data_cell_type: StructType::TD,
            header_cell_type: StructType::TH,
            figure_type: StructType::Figure,
            figure_alt_text: Some("This is new image alternate text".to_string()),
            labeled_lookups: vec![
                LabeledLookup {
                    struct_type: StructType::NonStruct,
                    title: "Page 2".to_string(),
                },
                LabeledLookup {
                    struct_type: StructType::NonStruct,
                    title: "Page 3".to_string(),
                },
            ],
            document_title: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the heading rules.
    pub fn with_heading_rules(mut self, rules: Vec<HeadingRule>) -> Self {
        self.heading_rules = rules;
        self
    }

    /// Set the figure alternate text.
    pub fn with_figure_alt_text(mut self, alt: Option<String>) -> Self {
        self.figure_alt_text = alt;
        self
    }

    /// Set the document title to apply.
    pub fn with_document_title(mut self, title: impl Into<String>) -> Self {
        self.document_title = Some(title.into());
        self
    }

    /// Set the recursion depth limit.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: RetagConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot drive a session.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::Config("max_depth must be at least 1".to_string()));
        }
        for rule in &self.heading_rules {
            if rule.typeface_contains.is_empty() {
                return Err(Error::Config("heading rule with empty typeface_contains".to_string()));
            }
            if !rule.min_size.is_finite() || rule.min_size < 0.0 {
                return Err(Error::Config(format!(
                    "heading rule for {:?} has invalid min_size {}",
                    rule.typeface_contains, rule.min_size
                )));
            }
        }
        if let Some(alt) = &self.figure_alt_text {
            if let Some(c) = alt.chars().find(|&c| c.is_control() && c != '\t' && c != '\n') {
                return Err(Error::Config(format!(
                    "figure_alt_text contains control character U+{:04X}",
                    c as u32
                )));
            }
        }
        if let Some(title) = &self.document_title {
            if title.chars().any(char::is_control) {
                return Err(Error::Config(format!("document_title {:?} contains a control character", title)));
            }
        }
        Ok(())
    }
}
