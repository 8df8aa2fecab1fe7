//! # gbn-markup
//!
//! Lenient markup handling for builder surfaces: a logos-based lexer, a
//! recovering tree builder that reports problems to a [`DiagnosticSink`],
//! an arena [`Document`] addressed by [`NodeId`], and a byte-stable
//! [`Serializer`].

pub mod error;
pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod tree;

#[cfg(test)]
mod tests_malformed;

pub use error::{DiagnosticSink, DiscardDiagnostics, ParseError, ParseResult, SourceSpan};
#[cfg(feature = "pretty-errors")]
pub use error::format_diagnostics;
pub use parser::{parse, parse_with, ParseMode, ParseOptions, Parser};
pub use serializer::{serialize, serialize_children, Serializer};
pub use tree::{Attribute, Document, Element, NodeData, NodeId};
