//! Converter output (ALTO XML) parsing.
//!
//! The PDF-to-XML converter is an external tool; this module turns its
//! page/line/font schema into the document model. Parsing is pure: input is
//! an XML string, output is fonts plus pages, no I/O.
//!
//! Page elements must carry `PHYSICAL_IMG_NR`, `WIDTH`, and `HEIGHT`;
//! missing or unparseable page attributes are fatal for the document.
//! Individual lines are more forgiving: a line with broken geometry, empty
//! content, or an unresolvable style reference is dropped and never becomes
//! a token.

use std::sync::Arc;

use roxmltree::{Document as XmlDocument, Node};

use crate::error::{Error, Result};
use crate::model::{Font, Page, Rectangle, Token};

/// A parsed converter document: the resolved font list and the pages.
#[derive(Debug, Clone)]
pub struct AltoDocument {
    /// Distinct text styles declared by the converter
    pub fonts: Vec<Arc<Font>>,

    /// Physical pages in document order
    pub pages: Vec<Page>,
}

impl AltoDocument {
    /// Total number of tokens across all pages.
    pub fn token_count(&self) -> usize {
        self.pages.iter().map(Page::token_count).sum()
    }

    /// All tokens in document reading order, consuming the document.
    pub fn into_tokens(self) -> Vec<Token> {
        self.pages
            .into_iter()
            .flat_map(|page| page.tokens)
            .collect()
    }
}

/// A declared text style with its converter-assigned identifier, used to
/// resolve `STYLEREFS` on lines.
#[derive(Debug, Clone)]
struct TextStyle {
    id: String,
    font: Arc<Font>,
}

/// Parse converter XML output into the document model.
pub fn parse(xml: &str) -> Result<AltoDocument> {
    let doc = XmlDocument::parse(xml)?;
    let styles = parse_styles(&doc);

    let pages = doc
        .root()
        .descendants()
        .filter(|node| node.has_tag_name("Page"))
        .map(|node| parse_page(node, &styles))
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "parsed converter output: {} styles, {} pages",
        styles.len(),
        pages.len()
    );

    Ok(AltoDocument {
        fonts: styles.into_iter().map(|style| style.font).collect(),
        pages,
    })
}

/// Collect `<TextStyle>` declarations. A malformed style is skipped; lines
/// referencing it fail font resolution and are dropped with the line.
fn parse_styles(doc: &XmlDocument) -> Vec<TextStyle> {
    doc.root()
        .descendants()
        .filter(|node| node.has_tag_name("TextStyle"))
        .filter_map(|node| {
            let id = node.attribute("ID")?;
            let family = node.attribute("FONTFAMILY")?;
            let size: f32 = node.attribute("FONTSIZE")?.parse().ok()?;
            let style = node.attribute("FONTSTYLE").unwrap_or("");
            Some(TextStyle {
                id: id.to_string(),
                font: Arc::new(Font::new(
                    family,
                    size,
                    style.contains("bold"),
                    style.contains("italic"),
                )),
            })
        })
        .collect()
}

/// Build one page from a `<Page>` element and the document's style list.
fn parse_page(node: Node, styles: &[TextStyle]) -> Result<Page> {
    let page_number = required_attr(node, "Page", "PHYSICAL_IMG_NR")?;
    let page_number: u32 = parse_attr("Page", "PHYSICAL_IMG_NR", page_number)?;

    // Dimensions arrive as floats and are truncated, matching the converter
    // contract.
    let width = parse_float_attr(node, "Page", "WIDTH")? as u32;
    let height = parse_float_attr(node, "Page", "HEIGHT")? as u32;

    let tokens = node
        .descendants()
        .filter(|line| line.has_tag_name("TextLine"))
        .filter_map(|line| parse_line(page_number, line, styles))
        .collect();

    Ok(Page::new(page_number, width, height, tokens))
}

/// Build one token from a `<TextLine>` element, or `None` when the line is
/// unusable.
fn parse_line(page_number: u32, line: Node, styles: &[TextStyle]) -> Option<Token> {
    let left = float_attr(line, "HPOS")?;
    let top = float_attr(line, "VPOS")?;
    let width = float_attr(line, "WIDTH")?;
    let height = float_attr(line, "HEIGHT")?;
    let bounding_box = Rectangle::new(left as i32, top as i32, width as i32, height as i32);

    let mut parts: Vec<&str> = Vec::new();
    let mut style_refs = None;
    for string in line.children().filter(|n| n.has_tag_name("String")) {
        if let Some(content) = string.attribute("CONTENT") {
            let content = content.trim();
            if !content.is_empty() {
                parts.push(content);
            }
        }
        if style_refs.is_none() {
            style_refs = string.attribute("STYLEREFS");
        }
    }

    let style_refs = style_refs?;
    let font = match resolve_font(style_refs, styles) {
        Some(font) => font,
        None => {
            log::warn!(
                "dropping line on page {page_number}: unresolved style reference {style_refs:?}"
            );
            return None;
        }
    };

    Token::new(page_number, bounding_box, &parts.join(" "), font)
}

/// Resolve a `STYLEREFS` attribute (possibly several space-separated ids)
/// against the declared styles; the first id that matches wins.
fn resolve_font(style_refs: &str, styles: &[TextStyle]) -> Option<Arc<Font>> {
    style_refs.split_whitespace().find_map(|id| {
        styles
            .iter()
            .find(|style| style.id == id)
            .map(|style| style.font.clone())
    })
}

fn required_attr<'a>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str> {
    node.attribute(attribute)
        .ok_or(Error::MissingAttribute { element, attribute })
}

fn parse_attr<T: std::str::FromStr>(
    element: &'static str,
    attribute: &'static str,
    value: &str,
) -> Result<T> {
    value.parse().map_err(|_| Error::InvalidAttribute {
        element,
        attribute,
        value: value.to_string(),
    })
}

fn parse_float_attr(node: Node, element: &'static str, attribute: &'static str) -> Result<f32> {
    let value = required_attr(node, element, attribute)?;
    parse_attr(element, attribute, value)
}

fn float_attr(node: Node, attribute: &str) -> Option<f32> {
    node.attribute(attribute)?.parse().ok()
}
