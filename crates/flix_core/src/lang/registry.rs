//! Shareable metadata for `flix_core::lang` registries.
//!
//! The `flix_core::lang` module is a set of **registry-first** vocabularies: keywords, punctuation and precedence
//! levels. This submodule provides the small, dependency-free metadata types reused across all of them.
//!
//! ## Notes
//! - These types are intentionally lightweight and `Copy`-friendly so registries can live in `const` tables.
//! - Metadata is meant for tooling/docs/diagnostics and layout decisions; enforcement of syntax rules still lives
//!   in the lexer/parser.
//!
//! ## See also
//! - [`crate::lang::keywords`]
//! - [`crate::lang::punctuation`]
//! - [`crate::lang::precedence`]

/// Identify the grammar revision a vocabulary item is available since.
///
/// ## Notes
/// - Free-form string (e.g. `"0.1"`). Only the Flix grammar revision with `eff`/`rel`/`query` is implemented.
///
/// ## Examples
/// ```rust
/// use flix_core::lang::registry::SinceVersion;
///
/// let since: SinceVersion = "0.1";
/// assert!(!since.is_empty());
/// ```
pub type SinceVersion = &'static str;

/// Grammar revision every current item belongs to.
pub const GRAMMAR_0_1: SinceVersion = "0.1";

/// Describe the lifecycle status of a vocabulary item.
///
/// ## Notes
/// - Reserved-but-unused words (e.g. `for`) are `Reserved`: the lexer keeps them out of the identifier space but no
///   production consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Reserved,
    Deprecated,
}

/// How a token participates in layout (indentation) decisions.
///
/// ## Notes
/// - `OpensBlock`: when the token ends a line and the next line is indented deeper, an indented block opens.
/// - `ContinuesLine`: the token never starts a statement, so a line beginning with it continues the previous one.
/// - `EndsStatement`: the token may be the last token of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutRole {
    OpensBlock,
    ContinuesLine,
    EndsStatement,
}

/// Represent a small example snippet for documentation.
///
/// ## Examples
/// ```rust
/// use flix_core::lang::registry::Example;
///
/// let ex = Example {
///     code: "def main(): Unit = ()",
///     note: Some("Minimal function."),
/// };
/// assert!(ex.code.contains("def"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}
