//! Line-level token type.

use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use super::{Font, Rectangle};

/// Semantic type assigned to a token by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Mathematical formula
    Formula,
    /// Footnote text
    Footnote,
    /// List item
    List,
    /// Table content
    Table,
    /// Figure content
    Figure,
    /// Document title
    Title,
    /// Body text
    Text,
    /// Running page header
    PageHeader,
    /// Running page footer
    PageFooter,
    /// Section heading
    SectionHeader,
    /// Figure or table caption
    Caption,
}

/// One line-level unit of text with position, page, and resolved font.
///
/// A token with empty content or without a font is not constructible; raw
/// converter lines that would produce one are dropped during page
/// construction instead. The semantic type is absent until the classifier
/// runs and is immutable once assigned.
#[derive(Debug, Clone)]
pub struct Token {
    /// Physical page number (1-based)
    pub page_number: u32,

    /// Line bounding box in page coordinates
    pub bounding_box: Rectangle,

    /// Normalized line text, never empty
    pub content: String,

    /// Resolved font, shared with other tokens of the same style
    pub font: Arc<Font>,

    token_type: Option<TokenType>,
}

impl Token {
    /// Build a token from a raw converter line.
    ///
    /// The content is NFC-normalized and trimmed; returns `None` when
    /// nothing remains, so an empty line never becomes a token.
    pub fn new(
        page_number: u32,
        bounding_box: Rectangle,
        content: &str,
        font: Arc<Font>,
    ) -> Option<Self> {
        let content: String = content.trim().nfc().collect();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            page_number,
            bounding_box,
            content,
            font,
            token_type: None,
        })
    }

    /// The assigned semantic type, if the classifier has run.
    pub fn token_type(&self) -> Option<TokenType> {
        self.token_type
    }

    /// Assign the semantic type. A type that is already set is kept; once
    /// assigned it never changes.
    pub fn with_type(mut self, token_type: TokenType) -> Self {
        self.token_type.get_or_insert(token_type);
        self
    }

    /// Whether the classifier has assigned a type.
    pub fn is_classified(&self) -> bool {
        self.token_type.is_some()
    }
}
