//! Model types for parsed TeX content.

mod document;
mod element;
mod iter;
mod paragraph;

pub use document::TexDocument;
pub use element::{Command, Element, Group, OptGroup, Span, Text};
pub use iter::ElementIter;
pub use paragraph::TexParagraph;
