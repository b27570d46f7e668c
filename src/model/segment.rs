//! Paragraph-level segment aggregation.

use crate::error::{Error, Result};

use super::{Rectangle, Token, TokenType};

/// One paragraph-level unit aggregated from one or more tokens.
///
/// Derived, never mutated after creation. All constituents of one segment
/// are assumed same-page; the page number is taken from the first token.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Page the segment belongs to
    pub page_number: u32,

    /// Minimal rectangle enclosing all constituent token boxes
    pub bounding_box: Rectangle,

    /// Space-joined token contents, in input order
    pub text_content: String,

    /// Dominant semantic type of the constituents
    pub segment_type: TokenType,
}

impl Segment {
    /// Aggregate a non-empty group of classified tokens into a segment.
    ///
    /// Token order is significant: it is the reading order established
    /// upstream and is not re-sorted here. The segment type is the
    /// statistical mode of the constituent types; when several types tie on
    /// frequency, the one encountered first in input order wins. That
    /// tie-break is a fixed contract relied on by existing consumers.
    ///
    /// An empty group or an unclassified token is a caller error; no
    /// placeholder segment is ever produced.
    pub fn from_tokens(tokens: &[Token]) -> Result<Segment> {
        let first = tokens.first().ok_or(Error::EmptyTokenGroup)?;

        let text_content = tokens
            .iter()
            .map(|token| token.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let bounding_box = Rectangle::merge(tokens.iter().map(|token| &token.bounding_box))
            .ok_or(Error::EmptyTokenGroup)?;

        Ok(Segment {
            page_number: first.page_number,
            bounding_box,
            text_content,
            segment_type: dominant_type(tokens)?,
        })
    }
}

/// Statistical mode over the token types, first-encountered value winning
/// frequency ties.
fn dominant_type(tokens: &[Token]) -> Result<TokenType> {
    // Counts keyed in encounter order so the tie-break falls out of a
    // strictly-greater comparison.
    let mut counts: Vec<(TokenType, usize)> = Vec::new();
    for token in tokens {
        let token_type = token
            .token_type()
            .ok_or_else(|| Error::UnclassifiedToken(token.content.clone()))?;
        match counts.iter_mut().find(|(t, _)| *t == token_type) {
            Some((_, n)) => *n += 1,
            None => counts.push((token_type, 1)),
        }
    }

    let mut best = counts.first().copied().ok_or(Error::EmptyTokenGroup)?;
    for &(token_type, n) in counts.iter().skip(1) {
        if n > best.1 {
            best = (token_type, n);
        }
    }
    Ok(best.0)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::Font;

    fn token(content: &str, token_type: TokenType, bbox: Rectangle) -> Token {
        let font = Arc::new(Font::new("Times", 10.0, false, false));
        Token::new(1, bbox, content, font)
            .unwrap()
            .with_type(token_type)
    }

    fn line(content: &str, token_type: TokenType) -> Token {
        token(content, token_type, Rectangle::new(0, 0, 100, 12))
    }

    #[test]
    fn test_text_is_space_joined_in_input_order() {
        let tokens = vec![
            line("The quick", TokenType::Text),
            line("brown fox", TokenType::Text),
            line("jumps.", TokenType::Text),
        ];
        let segment = Segment::from_tokens(&tokens).unwrap();
        assert_eq!(segment.text_content, "The quick brown fox jumps.");
        assert_eq!(segment.page_number, 1);
    }

    #[test]
    fn test_bounding_box_encloses_all_tokens() {
        let tokens = vec![
            token("a", TokenType::Text, Rectangle::new(10, 10, 50, 12)),
            token("b", TokenType::Text, Rectangle::new(10, 26, 80, 12)),
        ];
        let segment = Segment::from_tokens(&tokens).unwrap();
        assert_eq!(segment.bounding_box, Rectangle::new(10, 10, 80, 28));
    }

    #[test]
    fn test_majority_type_wins() {
        let tokens = vec![
            line("a", TokenType::Text),
            line("b", TokenType::Text),
            line("c", TokenType::Title),
        ];
        let segment = Segment::from_tokens(&tokens).unwrap();
        assert_eq!(segment.segment_type, TokenType::Text);
    }

    #[test]
    fn test_tie_resolves_to_first_encountered() {
        let tokens = vec![line("a", TokenType::Title), line("b", TokenType::Text)];
        let segment = Segment::from_tokens(&tokens).unwrap();
        assert_eq!(segment.segment_type, TokenType::Title);

        // Same frequencies, opposite encounter order
        let tokens = vec![line("a", TokenType::Text), line("b", TokenType::Title)];
        let segment = Segment::from_tokens(&tokens).unwrap();
        assert_eq!(segment.segment_type, TokenType::Text);
    }

    #[test]
    fn test_tie_among_three_types() {
        let tokens = vec![
            line("a", TokenType::Caption),
            line("b", TokenType::Text),
            line("c", TokenType::Title),
            line("d", TokenType::Text),
            line("e", TokenType::Caption),
        ];
        // Caption and Text both appear twice; Caption was seen first.
        let segment = Segment::from_tokens(&tokens).unwrap();
        assert_eq!(segment.segment_type, TokenType::Caption);
    }

    #[test]
    fn test_empty_group_is_an_error() {
        let result = Segment::from_tokens(&[]);
        assert!(matches!(result, Err(Error::EmptyTokenGroup)));
    }

    #[test]
    fn test_unclassified_token_is_an_error() {
        let font = Arc::new(Font::new("Times", 10.0, false, false));
        let unclassified = Token::new(1, Rectangle::new(0, 0, 10, 10), "raw", font).unwrap();
        let result = Segment::from_tokens(&[unclassified]);
        assert!(matches!(result, Err(Error::UnclassifiedToken(_))));
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let tokens = vec![line("x", TokenType::Text), line("y", TokenType::Title)];
        let a = Segment::from_tokens(&tokens).unwrap();
        let b = Segment::from_tokens(&tokens).unwrap();
        assert_eq!(a.text_content, b.text_content);
        assert_eq!(a.segment_type, b.segment_type);
        assert_eq!(a.bounding_box, b.bounding_box);
    }
}
