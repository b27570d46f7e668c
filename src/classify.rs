//! Classifier boundary.
//!
//! The trained token-type classifier is an external collaborator; the
//! pipeline only depends on the [`TokenClassifier`] trait. The rule-based
//! [`FontSizeClassifier`] here is a local stand-in good enough for the CLI
//! and tests, not a replacement for the trained model.

use crate::model::{Token, TokenType};

/// Assigns a semantic type to every token of a document.
///
/// Implementations must return the tokens in the order they were given and
/// must classify every token; the aggregator rejects unclassified tokens.
pub trait TokenClassifier {
    /// Classify the full token stream of one document.
    fn classify(&self, tokens: Vec<Token>) -> Vec<Token>;
}

/// Baseline classifier driven by font statistics.
///
/// Lines set in the document's largest font size become titles, other bold
/// lines become section headers, everything else is body text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontSizeClassifier;

impl TokenClassifier for FontSizeClassifier {
    fn classify(&self, tokens: Vec<Token>) -> Vec<Token> {
        let max_size = tokens
            .iter()
            .map(|token| token.font.size)
            .fold(0.0_f32, f32::max);
        let body_size = dominant_size(&tokens);

        tokens
            .into_iter()
            .map(|token| {
                let size = token.font.size;
                let token_type = if size >= max_size && max_size > body_size {
                    TokenType::Title
                } else if token.font.is_bold {
                    TokenType::SectionHeader
                } else {
                    TokenType::Text
                };
                token.with_type(token_type)
            })
            .collect()
    }
}

/// Most frequent font size in the document, in tenths of a point.
fn dominant_size(tokens: &[Token]) -> f32 {
    let mut counts: Vec<(i32, usize)> = Vec::new();
    for token in tokens {
        let key = (token.font.size * 10.0).round() as i32;
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
        .into_iter()
        .max_by_key(|&(_, n)| n)
        .map(|(key, _)| key as f32 / 10.0)
        .unwrap_or(0.0)
}
