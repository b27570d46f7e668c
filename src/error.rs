//! Error types for the pdfseg library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfseg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while staging, extracting, or delivering
/// paragraph segments.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing staged files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The converter output is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A required attribute is missing from a converter output element.
    /// Fatal for the document when the element is a page.
    #[error("missing required attribute {attribute} on <{element}>")]
    MissingAttribute {
        /// Element tag name
        element: &'static str,
        /// Attribute name
        attribute: &'static str,
    },

    /// An attribute of a converter output element could not be parsed.
    #[error("invalid value {value:?} for attribute {attribute} on <{element}>")]
    InvalidAttribute {
        /// Element tag name
        element: &'static str,
        /// Attribute name
        attribute: &'static str,
        /// The raw attribute value
        value: String,
    },

    /// The converter output contains no pages.
    #[error("converter output contains no pages")]
    EmptyDocument,

    /// A segment was requested from an empty token group.
    #[error("cannot aggregate an empty token group")]
    EmptyTokenGroup,

    /// A token reached the aggregator without an assigned type.
    #[error("token {0:?} has no assigned type")]
    UnclassifiedToken(String),

    /// A tenant or file name is empty or would escape its directory.
    #[error("invalid tenant or file name: {0:?}")]
    InvalidName(String),

    /// The requested record or artifact does not exist (or was already
    /// consumed). A normal outcome, not a system fault.
    #[error("not found: {0}")]
    NotFound(String),

    /// Result store error.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Paragraph payload serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error maps to a missing-resource response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
