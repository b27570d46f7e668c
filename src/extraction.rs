//! Wire-format types for delivered extraction results.
//!
//! Field names and declaration order are the serialization contract with
//! existing consumers and must not change.

use serde::{Deserialize, Serialize};

use crate::model::Segment;

/// One paragraph in the delivered payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphBox {
    /// Distance from the left page edge
    pub left: i32,

    /// Distance from the top page edge
    pub top: i32,

    /// Paragraph width
    pub width: i32,

    /// Paragraph height
    pub height: i32,

    /// Page the paragraph appears on (1-based)
    pub page_number: u32,

    /// Paragraph text
    pub text: String,
}

impl From<&Segment> for ParagraphBox {
    fn from(segment: &Segment) -> Self {
        Self {
            left: segment.bounding_box.left,
            top: segment.bounding_box.top,
            width: segment.bounding_box.width,
            height: segment.bounding_box.height,
            page_number: segment.page_number,
            text: segment.text_content.clone(),
        }
    }
}

/// The persisted result of one completed extraction, keyed by
/// `(tenant, file_name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Namespace key isolating the owning client
    pub tenant: String,

    /// Name of the uploaded document
    pub file_name: String,

    /// First page width in points
    pub page_width: u32,

    /// First page height in points
    pub page_height: u32,

    /// Extracted paragraphs in reading order
    pub paragraphs: Vec<ParagraphBox>,
}

impl ExtractionRecord {
    /// Build a record from aggregated segments.
    pub fn new(
        tenant: impl Into<String>,
        file_name: impl Into<String>,
        page_width: u32,
        page_height: u32,
        segments: &[Segment],
    ) -> Self {
        Self {
            tenant: tenant.into(),
            file_name: file_name.into(),
            page_width,
            page_height,
            paragraphs: segments.iter().map(ParagraphBox::from).collect(),
        }
    }
}
