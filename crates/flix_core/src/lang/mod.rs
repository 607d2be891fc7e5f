//! Flix language vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: reserved keywords, punctuation, and the
//! precedence levels that the grammar assigns to expression forms.
//!
//! The design goal is to avoid stringly-typed checks scattered across the lexer/parser/tooling. Callers work with
//! **stable IDs** (e.g. `KeywordId`, `PunctuationId`, `PrecedenceId`) and look up spellings/metadata via registry
//! tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no CST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata for shared use (diagnostics,
//!   highlighting, layout decisions).
//!
//! ## Examples
//! ```rust
//! use flix_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("eff"), Some(KeywordId::Eff));
//! assert_eq!(keywords::as_str(KeywordId::Eff), "eff");
//! ```

pub mod keywords;
pub mod precedence;
pub mod punctuation;
pub mod registry;
