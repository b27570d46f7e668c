//! # pdfseg
//!
//! Paragraph segment extraction for PDF converter output, with
//! tenant-scoped staging queues and consume-once delivery.
//!
//! The crate covers the middle of a document pipeline: an external
//! converter turns uploaded PDFs into page/line/font XML, an external
//! classifier assigns semantic types to text lines, and this library
//! models the document, aggregates classified lines into paragraph
//! segments, stages files between pipeline actors on the filesystem, and
//! delivers each finished result to exactly one caller.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfseg::{extract_record, FontSizeClassifier, ResultStore};
//! use std::path::Path;
//!
//! fn main() -> pdfseg::Result<()> {
//!     let xml = std::fs::read_to_string("report.xml")?;
//!     let record = extract_record(Some("tenant_a"), "report.pdf", &xml, &FontSizeClassifier)?;
//!
//!     let store = ResultStore::open(Path::new("data/extractions.db"), "data/xml")?;
//!     store.put(&record)?;
//!
//!     // Delivery is destructive: a second take returns NotFound.
//!     let delivered = store.take(Some("tenant_a"), "report.pdf")?;
//!     println!("{} paragraphs", delivered.paragraphs.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline shape
//!
//! Upload bytes land in the `to_extract` staging directory; the converter's
//! XML comes back through the `xml` artifact directory; parsing, the
//! classifier boundary, and segment aggregation produce an
//! [`ExtractionRecord`] that the [`ResultStore`] hands out once. Actors
//! communicate only through the filesystem and the store, never through
//! shared memory.

pub mod alto;
pub mod classify;
pub mod error;
pub mod extraction;
pub mod model;
pub mod pipeline;
pub mod staging;
pub mod store;

// Re-export commonly used types
pub use alto::AltoDocument;
pub use classify::{FontSizeClassifier, TokenClassifier};
pub use error::{Error, Result};
pub use extraction::{ExtractionRecord, ParagraphBox};
pub use model::{Font, Page, Rectangle, Segment, Token, TokenType};
pub use pipeline::{extract_record, group_tokens, segment_tokens};
pub use staging::{Stage, StagingQueue};
pub use store::{ResultStore, DEFAULT_TENANT};

/// Parse converter XML and aggregate it into segments in one call.
///
/// Convenience wrapper for callers that want segments without building an
/// [`ExtractionRecord`].
pub fn segment_xml<C: TokenClassifier>(xml: &str, classifier: &C) -> Result<Vec<Segment>> {
    let document = alto::parse(xml)?;
    let tokens = classifier.classify(document.into_tokens());
    pipeline::segment_tokens(tokens)
}
