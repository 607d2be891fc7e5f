//! Punctuation vocabulary.
//!
//! This module defines the canonical set of punctuation tokens used by the lexer/parser: delimiters, separators,
//! arrows, and the reserved symbol spellings that the grammar gives structural meaning (`:`, `=`, `@`, `\`, ...).
//!
//! ## Notes
//! - Lookup via [`from_str`] is exact.
//! - A run of operator-symbol characters is punctuation only when the *whole* run equals a [`PunctuationCategory::Symbol`]
//!   or [`PunctuationCategory::Arrow`] spelling; `==` or `:::` stay operator identifiers.
//! - This module is vocabulary only (spellings + metadata). It does not tokenize source text.
//!
//! ## Examples
//! ```rust
//! use flix_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("=>"), Some(PunctuationId::FatArrow));
//! assert_eq!(punctuation::as_str(PunctuationId::HashBrace), "#{");
//! assert_eq!(punctuation::from_str("=="), None);
//! ```

use super::registry::{GRAMMAR_0_1, LayoutRole, SinceVersion, Stability};

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets and braces.
    Delimiter,
    /// Separators like `,` and `;`.
    Separator,
    /// Access/path markers like `.`.
    Access,
    /// Arrow markers like `->`, `=>` and `<-`.
    Arrow,
    /// Reserved operator-symbol spellings like `:`, `=`, `@`, `\`.
    Symbol,
    /// Markers that are neither symbols nor delimiters: `_` and the string splice `$`.
    Marker,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    HashBrace,

    // Separators / access
    Comma,
    Semicolon,
    Dot,

    // Arrows
    Arrow,
    FatArrow,
    LeftArrow,

    // Reserved symbols
    Colon,
    Eq,
    ColonEq,
    At,
    Hash,
    HashHash,
    Backslash,
    Pipe,
    ColonMinus,

    // Markers
    Underscore,
    Dollar,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
    pub layout: &'static [LayoutRole],
    pub since: SinceVersion,
    pub stability: Stability,
}

use LayoutRole::{ContinuesLine, EndsStatement, OpensBlock};
use PunctuationCategory as C;

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    // Delimiters
    info(PunctuationId::LParen, "(", C::Delimiter, &[]),
    info(PunctuationId::RParen, ")", C::Delimiter, &[ContinuesLine, EndsStatement]),
    info(PunctuationId::LBracket, "[", C::Delimiter, &[]),
    info(PunctuationId::RBracket, "]", C::Delimiter, &[ContinuesLine, EndsStatement]),
    info(PunctuationId::LBrace, "{", C::Delimiter, &[]),
    info(PunctuationId::RBrace, "}", C::Delimiter, &[ContinuesLine, EndsStatement]),
    info(PunctuationId::HashBrace, "#{", C::Delimiter, &[]),
    // Separators / access
    info(PunctuationId::Comma, ",", C::Separator, &[ContinuesLine]),
    info(PunctuationId::Semicolon, ";", C::Separator, &[ContinuesLine]),
    info(PunctuationId::Dot, ".", C::Access, &[ContinuesLine]),
    // Arrows
    info(PunctuationId::Arrow, "->", C::Arrow, &[OpensBlock, ContinuesLine]),
    info(PunctuationId::FatArrow, "=>", C::Arrow, &[OpensBlock, ContinuesLine]),
    info(PunctuationId::LeftArrow, "<-", C::Arrow, &[ContinuesLine]),
    // Reserved symbols
    info(PunctuationId::Colon, ":", C::Symbol, &[OpensBlock, ContinuesLine]),
    info(PunctuationId::Eq, "=", C::Symbol, &[OpensBlock, ContinuesLine]),
    info(PunctuationId::ColonEq, ":=", C::Symbol, &[ContinuesLine]),
    info(PunctuationId::At, "@", C::Symbol, &[]),
    info(PunctuationId::Hash, "#", C::Symbol, &[]),
    info(PunctuationId::HashHash, "##", C::Symbol, &[]),
    info(PunctuationId::Backslash, "\\", C::Symbol, &[ContinuesLine]),
    info(PunctuationId::Pipe, "|", C::Symbol, &[ContinuesLine]),
    info(PunctuationId::ColonMinus, ":-", C::Symbol, &[ContinuesLine]),
    // Markers
    info(PunctuationId::Underscore, "_", C::Marker, &[EndsStatement]),
    info(PunctuationId::Dollar, "$", C::Marker, &[]),
];

/// Canonical spelling.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: PunctuationId) -> PunctuationCategory {
    info_for(id).category
}

/// Whether the punctuation carries the given layout role.
pub fn has_layout_role(id: PunctuationId, role: LayoutRole) -> bool {
    info_for(id).layout.contains(&role)
}

/// Resolve a complete operator-symbol run to a reserved spelling.
///
/// ## Returns
/// - `Some(id)` only for symbol and arrow spellings; delimiters and markers are never produced from operator runs.
///
/// ## Examples
/// ```rust
/// use flix_core::lang::punctuation::{self, PunctuationId};
///
/// assert_eq!(punctuation::reserved_symbol(":-"), Some(PunctuationId::ColonMinus));
/// assert_eq!(punctuation::reserved_symbol("::"), None);
/// ```
pub fn reserved_symbol(run: &str) -> Option<PunctuationId> {
    PUNCTUATION
        .iter()
        .find(|p| p.canonical == run && matches!(p.category, C::Symbol | C::Arrow))
        .map(|p| p.id)
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("punctuation info missing")
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: PunctuationId,
    canonical: &'static str,
    category: PunctuationCategory,
    layout: &'static [LayoutRole],
) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        category,
        layout,
        since: GRAMMAR_0_1,
        stability: Stability::Stable,
    }
}
