//! Font style type.

/// One distinct text style seen in a document.
///
/// Identity is value-based: two fonts with the same family, size, and style
/// flags are the same font. Tokens share one instance per style via
/// `Arc<Font>`; a font is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Font family name as reported by the converter
    pub family: String,

    /// Font size in points
    pub size: f32,

    /// Bold style flag
    pub is_bold: bool,

    /// Italic style flag
    pub is_italic: bool,
}

impl Font {
    /// Create a new font.
    pub fn new(family: impl Into<String>, size: f32, is_bold: bool, is_italic: bool) -> Self {
        Self {
            family: family.into(),
            size,
            is_bold,
            is_italic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_identity() {
        let a = Font::new("Helvetica", 11.0, false, false);
        let b = Font::new("Helvetica", 11.0, false, false);
        let c = Font::new("Helvetica", 11.0, true, false);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
