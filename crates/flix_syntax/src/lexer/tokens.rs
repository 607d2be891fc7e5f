//! Token types for the Flix lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Punctuation(PunctuationId)` for delimiters, separators, arrows and reserved symbols
//!
//! Everything else carries its source spelling: identifiers, operator identifiers, literals and string fragments.
//!
//! ## Notes
//! - `Indent`, `Outdent` and `AutoSemicolon` are synthetic: they are produced by the layout rules, have zero-width
//!   spans and never carry trivia.
//! - Trivia (whitespace, newlines, comments) is attached to the *following* real token; trailing trivia ends up on
//!   `Eof`.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::span::Span;
use flix_core::lang::keywords::{self, KeywordId};
use flix_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // ========== Keyword / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Punctuation(PunctuationId),

    // ========== Identifiers ==========
    /// Alpha identifier (`foo`, `Int32`, `unary_-`) or backquoted identifier (`` `a b` ``).
    Ident(String),
    /// Run of operator-symbol characters that is not a reserved spelling (`+`, `==`, `::`, `⊕`).
    OperatorIdent(String),

    // ========== Literals (raw spelling) ==========
    Int(String),
    Float(String),
    Char(String),
    /// A string without splices, quotes included.
    String(String),

    // ========== Interpolated strings ==========
    StringStart { multiline: bool },
    StringMiddle(String),
    StringEnd { multiline: bool },

    // ========== Layout ==========
    Indent,
    Outdent,
    AutoSemicolon,

    // ========== Special ==========
    /// Unlexable input; the matching diagnostic is reported by the lexer.
    Error(String),
    Eof,
}

/// Kind of trivia attached to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriviaKind {
    Whitespace,
    Newline,
    LineComment,
    BlockComment,
}

/// A run of source text that carries no syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub span: Span,
}

/// A token with its kind, source span and leading trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub leading_trivia: Vec<Trivia>,
}

impl Token {
    /// Construct a new token without trivia.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            leading_trivia: Vec::new(),
        }
    }

    pub fn with_trivia(mut self, trivia: Vec<Trivia>) -> Self {
        self.leading_trivia = trivia;
        self
    }

    /// Whether a line break separates this token from the previous one.
    pub fn has_newline_before(&self) -> bool {
        self.leading_trivia.iter().any(|t| t.kind == TriviaKind::Newline)
    }

    /// Whether any trivia at all separates this token from the previous one.
    pub fn has_trivia_before(&self) -> bool {
        !self.leading_trivia.is_empty()
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
