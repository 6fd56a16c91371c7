//! HTML tree construction.
//!
//! Implements [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//! of the WHATWG HTML Living Standard, without foreign content and templates.
//!
//! - `core`: builder state, the dispatcher, node insertion, the stack of open
//!   elements and the list of active formatting elements
//! - `modes`: the document-level insertion modes
//! - `in_body`: the "in body" mode and the adoption agency algorithm
//! - `in_table`: the table and select modes

mod core;
mod in_body;
mod in_table;
mod modes;
mod tag_sets;

pub use self::core::{HtmlTreeBuilder, InsertionMode, MAX_SCOPE_SEARCH_DEPTH};
