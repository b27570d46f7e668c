//! Whole-document extraction: converter output to an extraction record.
//!
//! Parse the XML, classify the token stream, split it into paragraph
//! candidates, and aggregate each group into a segment. Aggregation runs on
//! rayon since the groups are independent; their order is preserved.

use rayon::prelude::*;

use crate::alto;
use crate::classify::TokenClassifier;
use crate::error::{Error, Result};
use crate::extraction::ExtractionRecord;
use crate::model::{Segment, Token};
use crate::store::DEFAULT_TENANT;

/// Run the full segmentation pipeline over converter output.
///
/// The record's page geometry is taken from the first page. A document with
/// no pages cannot be modeled and is rejected.
pub fn extract_record<C: TokenClassifier>(
    tenant: Option<&str>,
    file_name: &str,
    xml: &str,
    classifier: &C,
) -> Result<ExtractionRecord> {
    let document = alto::parse(xml)?;
    let first_page = document.pages.first().ok_or(Error::EmptyDocument)?;
    let (page_width, page_height) = (first_page.width, first_page.height);

    let tokens = classifier.classify(document.into_tokens());
    let segments = segment_tokens(tokens)?;

    log::debug!(
        "extracted {} segments from {file_name:?} ({page_width}x{page_height})",
        segments.len()
    );

    Ok(ExtractionRecord::new(
        tenant.unwrap_or(DEFAULT_TENANT),
        file_name,
        page_width,
        page_height,
        &segments,
    ))
}

/// Group a classified token stream and aggregate every group.
pub fn segment_tokens(tokens: Vec<Token>) -> Result<Vec<Segment>> {
    group_tokens(tokens)
        .into_par_iter()
        .map(|group| Segment::from_tokens(&group))
        .collect()
}

/// Split tokens into paragraph candidates.
///
/// The stream is already in reading order; a new group starts at a page
/// boundary or where the vertical gap to the previous line exceeds that
/// line's height (roughly a blank line). Every token lands in exactly one
/// group and relative order is kept.
pub fn group_tokens(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut groups: Vec<Vec<Token>> = Vec::new();
    let mut current: Vec<Token> = Vec::new();

    for token in tokens {
        if let Some(prev) = current.last() {
            let gap = token.bounding_box.top - prev.bounding_box.bottom();
            if token.page_number != prev.page_number || gap > prev.bounding_box.height {
                groups.push(std::mem::take(&mut current));
            }
        }
        current.push(token);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::classify::FontSizeClassifier;
    use crate::model::{Font, Rectangle, TokenType};

    fn token(page: u32, top: i32, content: &str) -> Token {
        let font = Arc::new(Font::new("Times", 10.0, false, false));
        Token::new(page, Rectangle::new(50, top, 400, 12), content, font)
            .unwrap()
            .with_type(TokenType::Text)
    }

    #[test]
    fn test_adjacent_lines_group_together() {
        let tokens = vec![
            token(1, 100, "one"),
            token(1, 114, "two"),
            token(1, 128, "three"),
        ];
        let groups = group_tokens(tokens);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
    }

    #[test]
    fn test_large_gap_starts_a_new_group() {
        let tokens = vec![token(1, 100, "one"), token(1, 200, "two")];
        let groups = group_tokens(tokens);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_page_boundary_starts_a_new_group() {
        let tokens = vec![token(1, 700, "end of page"), token(2, 72, "top of next")];
        let groups = group_tokens(tokens);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_grouping_loses_no_token() {
        let tokens = vec![
            token(1, 100, "a"),
            token(1, 300, "b"),
            token(2, 72, "c"),
            token(2, 86, "d"),
        ];
        let total: usize = group_tokens(tokens).iter().map(Vec::len).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_segment_tokens_preserves_reading_order() {
        let tokens = vec![
            token(1, 100, "first paragraph"),
            token(1, 300, "second"),
            token(1, 314, "paragraph"),
        ];
        let segments = segment_tokens(tokens).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text_content, "first paragraph");
        assert_eq!(segments[1].text_content, "second paragraph");
    }

    #[test]
    fn test_extract_record_requires_a_page() {
        let result = extract_record(None, "empty.pdf", "<alto/>", &FontSizeClassifier);
        assert!(matches!(result, Err(Error::EmptyDocument)));
    }
}
