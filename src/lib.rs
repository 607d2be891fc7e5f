#![forbid(unsafe_code)]
//! Flix syntax tools
//!
//! Command-line and library surface over the Flix syntax frontend: lexing, parsing to a concrete syntax tree,
//! human-readable diagnostics, JSON export of the tree and a token-level pretty printer.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a bug (logic error), use `.expect("INVARIANT: reason")` with a clear
//!   explanation.

pub mod cli;
pub mod export;
pub mod format;

pub use flix_syntax::cst;
pub use flix_syntax::diagnostics;
pub use flix_syntax::lexer;
pub use flix_syntax::parser;

pub use format::{FormatConfig, FormatError, check_formatted, format_source, format_source_with_config};
