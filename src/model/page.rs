//! Physical page type.

use super::Token;

/// One physical page: dimensions plus its ordered tokens.
///
/// The token list is fixed at build time and already filtered; a page never
/// contains empty or fontless lines. Dimensions come from the converter's
/// floating-point values, truncated to integers.
#[derive(Debug, Clone)]
pub struct Page {
    /// Converter's physical image index (1-based)
    pub page_number: u32,

    /// Page width in points
    pub width: u32,

    /// Page height in points
    pub height: u32,

    /// Line tokens in reading order
    pub tokens: Vec<Token>,
}

impl Page {
    /// Create a page with a pre-filtered token list.
    pub fn new(page_number: u32, width: u32, height: u32, tokens: Vec<Token>) -> Self {
        Self {
            page_number,
            width,
            height,
            tokens,
        }
    }

    /// Whether the page carries no text lines.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of line tokens on the page.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page() {
        let page = Page::new(1, 612, 792, Vec::new());
        assert!(page.is_empty());
        assert_eq!(page.token_count(), 0);
    }
}
