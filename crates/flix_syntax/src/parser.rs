//! Grammar engine for the Flix language.
//!
//! Converts a token stream into a concrete syntax tree. The engine is a recursive-descent driver with one production
//! function per non-terminal; infix, postfix, ascription, assignment and colon-call chains are handled by a
//! precedence-climbing loop that reads the immutable [`PrecedenceTable`] it was constructed with. Every ambiguity the
//! grammar declares is settled by a named [`Conflict`] policy over bounded lookahead.
//!
//! ## Examples
//!
//! ```rust
//! use flix_syntax::parser;
//!
//! let parse = parser::parse("def add(a: Int32, b: Int32): Int32 = a + b\n");
//! assert!(parse.diagnostics.is_empty());
//! assert_eq!(
//!     parse.root.to_sexp(),
//!     "(compilation_unit (function_definition name: (identifier) \
//!      parameters: (parameters (parameter name: (identifier) type: (type_identifier)) \
//!      (parameter name: (identifier) type: (type_identifier))) return_type: (type_identifier) \
//!      body: (expression (infix_expression left: (identifier) operator: (operator_identifier) right: (identifier)))))"
//! );
//! ```

use crate::config::ParseOptions;
use crate::cst::{FieldName, Node, NodeBuilder, NodeKind};
use crate::diagnostics::{Diagnostic, ExpectedSet, ParseError};
use crate::lexer::{self, Token, TokenKind};
use crate::span::Span;
use crate::stream::TokenStream;
use crate::token_helpers::is_definition_keyword;
use flix_core::lang::keywords::{self, KeywordId};
use flix_core::lang::precedence::{self, PrecedenceId, PrecedenceTable};
use flix_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/conflicts.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/patterns.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
