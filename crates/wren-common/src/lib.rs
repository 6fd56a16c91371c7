//! Common utilities for the wren parser crates.
//!
//! This crate provides shared infrastructure used by all components:
//! - **Parse errors** - bounded collection of recoverable parse errors
//! - **Warning System** - de-duplicated warnings routed through `log`
//! - **URL resolution** - resolving relative references against a base URI

pub mod error;
pub mod url;
pub mod warning;

pub use error::{ParseError, ParseErrorList};
