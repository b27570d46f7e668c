//! Document model types for paragraph extraction.
//!
//! This module defines the intermediate representation between converter
//! output parsing and paragraph delivery: fonts, line-level tokens, physical
//! pages, and aggregated segments.

mod font;
mod page;
mod rectangle;
mod segment;
mod token;

pub use font::Font;
pub use page::Page;
pub use rectangle::Rectangle;
pub use segment::Segment;
pub use token::{Token, TokenType};
