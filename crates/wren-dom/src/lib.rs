//! DOM tree implementation for the wren parser.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), together with the
//! pieces that only need the tree: the named character reference tables, the
//! tag registry, text extraction and HTML/XML serialization.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. A node
//! owns its children by holding their ids and refers to its parent with a
//! plain index, so there are no reference cycles.
//!
//! The tree *is* the document: node 0 ([`NodeId::ROOT`]) carries the
//! document's output settings, quirks mode and base URI.

pub mod attributes;
mod document;
mod element;
pub mod entities;
mod entities_data;
mod error;
mod node;
mod serialize;
mod settings;
pub mod tag;
mod text;
mod traverse;
mod tree;

pub use attributes::{Attribute, Attributes};
pub use entities::EscapeMode;
pub use error::DomError;
pub use node::{
    DocumentData, DocumentTypeData, ElementData, Node, NodeData, NodeId, QuirksMode,
    XmlDeclarationData,
};
pub use settings::{CoreCharset, OutputSettings, ParseSettings, Syntax};
pub use tag::Tag;
pub use traverse::{Descendants, NodeVisitor};
pub use tree::{AncestorIterator, DomTree};
