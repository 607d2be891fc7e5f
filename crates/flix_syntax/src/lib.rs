//! Syntax frontend for the Flix language: layout-aware lexer, token stream, grammar engine and CST.
//!
//! Data flows text → [`lexer`] → [`stream::TokenStream`] → [`parser`] (reading the
//! [`flix_core::lang::precedence::PrecedenceTable`]) → [`cst`] tree, with [`diagnostics`] collected alongside.
//!
//! ## Notes
//! - This crate is intentionally "syntax-only": no name resolution, no type checking, no evaluation.
//! - Neither the lexer nor the parser aborts on malformed input. Lexing always yields a token stream (with error
//!   tokens) and parsing always yields a tree (with error nodes), plus diagnostics.
//! - Vocabulary identity (keywords/punctuation) comes from `flix_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use flix_syntax::parser;
//!
//! let parse = parser::parse("def answer(): Int32 = 42\n");
//! assert!(parse.diagnostics.is_empty());
//! assert_eq!(parse.root.named_children().count(), 1);
//! ```
//!
//! ## See also
//! - `flix_core::lang` for registry-backed language vocabulary.

pub mod config;
pub mod cst;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod stream;
pub mod token_helpers;

pub use config::{LexerConfig, ParseOptions};
pub use span::Span;
