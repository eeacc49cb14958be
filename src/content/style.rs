//! Style facts derived from text runs.

use super::objects::TextRun;
use serde::{Deserialize, Serialize};

/// Weight at and above which a face is considered bold.
const BOLD_WEIGHT: u16 = 600;

/// Visual style of a marked span, as read from its first text run.
///
/// Style is assumed uniform within one marked-content span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleInfo {
    /// Font (typeface) name, e.g. "Arial-Black"
    pub typeface_name: String,
    /// Font size in points
    pub size: f32,
    /// Font weight (CSS scale)
    pub weight: u16,
    /// Italic face
    pub italic: bool,
}

impl StyleInfo {
    /// Extract style from a text run.
    pub fn from_text_run(run: &TextRun) -> Self {
        Self {
            typeface_name: run.font_name.clone(),
            size: run.font_size,
            weight: run.weight,
            italic: run.italic,
        }
    }

    /// Case-sensitive substring test on the typeface name.
    pub fn contains_typeface(&self, needle: &str) -> bool {
        self.typeface_name.contains(needle)
    }

    /// Bold by weight or by a "Bold"/"Black"/"Heavy" marker in the name.
    pub fn is_bold(&self) -> bool {
        self.weight >= BOLD_WEIGHT
            || ["Bold", "Black", "Heavy"]
                .iter()
                .any(|marker| self.typeface_name.contains(marker))
    }
}

impl From<&TextRun> for StyleInfo {
    fn from(run: &TextRun) -> Self {
        Self::from_text_run(run)
    }
}
