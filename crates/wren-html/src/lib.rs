//! HTML tokenizer and tree builder for the wren parser.
//!
//! # Scope
//!
//! This crate implements:
//! - **Input stream** ([WHATWG § 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream))
//!   - A windowed character cursor with mark/rewind and interned tag names
//!
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Every tokenizer state, including script data escapes and CDATA
//!   - Named and numeric character references, with the attribute rules
//!
//! - **HTML Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All insertion modes outside foreign content and templates
//!   - Adoption agency, foster parenting and the Noah's Ark clause
//!   - Fragment parsing against a context element
//!
//! - **XML Tree Builder**: the same tokenizer, with elements nesting as written
//!
//! # Not Implemented
//!
//! - Foreign content: `<svg>` and `<math>` subtrees are built as plain
//!   elements, with a one-time warning
//! - `<template>` contents and scripting
//! - Byte-stream encoding sniffing; input is already a `&str`
//!
//! # Example
//!
//! ```
//! use wren_html::parse;
//!
//! let mut tree = parse("<title>Hi</title><p>One<p>Two", "https://example.com/");
//! assert_eq!(tree.title(), "Hi");
//! let body = tree.body();
//! assert_eq!(tree.element_children(body).len(), 2);
//! ```

mod dump;
/// Character reference decoding for free-standing text.
pub mod entities;
mod mutate;
/// Parser configuration and entry points.
pub mod parser;
/// Input cursor used by the tokenizer.
pub mod reader;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;
/// HTML tree construction.
pub mod tree_builder;
/// XML tree construction.
pub mod xml;

pub use dump::dump_tree;
pub use entities::{unescape, unescape_strict};
pub use mutate::HtmlMutation;
pub use parser::{
    Parser, parse, parse_body_fragment, parse_fragment, parse_fragment_in, parse_with_errors,
    parse_xml,
};
pub use reader::CharacterReader;
pub use tokenizer::{Token, Tokenizer, TokenizerState};
pub use tree_builder::{HtmlTreeBuilder, InsertionMode};
pub use xml::XmlTreeBuilder;
