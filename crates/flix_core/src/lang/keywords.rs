//! Define the reserved keyword vocabulary for the Flix language.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings, aliases, categories, layout roles and examples.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** (`forM` and `forA` are camel-cased keywords).
//! - `namespace` is an alias spelling of `mod`.
//! - This registry is intentionally **pure** (no CST/IO/side effects).
//!
//! ## Examples
//! ```rust
//! use flix_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("match"), Some(KeywordId::Match));
//! assert_eq!(keywords::from_str("namespace"), Some(KeywordId::Mod));
//! assert_eq!(keywords::as_str(KeywordId::ForM), "forM");
//! ```
//!
//! ## See also
//! - [`crate::lang::punctuation`] for structural symbols.

use super::registry::{Example, GRAMMAR_0_1, LayoutRole, SinceVersion, Stability};

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Modules / imports
    Mod,
    Use,
    Import,
    Static,

    // Definitions
    Enum,
    Case,
    Class,
    Instance,
    Eff,
    Rel,
    Def,
    Let,
    Type,
    Alias,
    With,
    Derives,

    // Modifiers
    Lazy,
    Lawful,
    Sealed,
    Override,
    Pub,

    // Expressions / control flow
    New,
    If,
    Else,
    Match,
    Do,
    Region,
    Try,
    Catch,
    Finally,
    Return,
    Throw,
    While,
    For,
    Foreach,
    ForA,
    ForM,
    Par,
    Yield,

    // Relational
    Query,
    Select,
    From,
    Not,
    Fix,

    // Literals
    True,
    False,
    Null,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Module,
    Definition,
    Modifier,
    ControlFlow,
    Relational,
    Literal,
}

/// Metadata for a keyword.
///
/// ## Notes
/// - `layout` drives automatic semicolon and indentation decisions in the lexer.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub category: KeywordCategory,
    pub layout: &'static [LayoutRole],
    pub since: SinceVersion,
    pub stability: Stability,
    pub examples: &'static [Example],
}

use KeywordCategory as C;
use LayoutRole::{ContinuesLine, EndsStatement, OpensBlock};

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Modules / imports
    info_with_aliases(KeywordId::Mod, "mod", &["namespace"], C::Module, &[]),
    info(KeywordId::Use, "use", C::Module, &[]),
    info(KeywordId::Import, "import", C::Module, &[]),
    info(KeywordId::Static, "static", C::Module, &[]),
    // Definitions
    info(KeywordId::Enum, "enum", C::Definition, &[]),
    info(KeywordId::Case, "case", C::Definition, &[]),
    info(KeywordId::Class, "class", C::Definition, &[]),
    info(KeywordId::Instance, "instance", C::Definition, &[]),
    info(KeywordId::Eff, "eff", C::Definition, &[]),
    info(KeywordId::Rel, "rel", C::Definition, &[]),
    info(KeywordId::Def, "def", C::Definition, &[]),
    info(KeywordId::Let, "let", C::Definition, &[]),
    info(KeywordId::Type, "type", C::Definition, &[EndsStatement]),
    info(KeywordId::Alias, "alias", C::Definition, &[]),
    info(KeywordId::With, "with", C::Definition, &[ContinuesLine]),
    info(KeywordId::Derives, "derives", C::Definition, &[ContinuesLine]),
    // Modifiers
    info(KeywordId::Lazy, "lazy", C::Modifier, &[]),
    info(KeywordId::Lawful, "lawful", C::Modifier, &[]),
    info(KeywordId::Sealed, "sealed", C::Modifier, &[]),
    info(KeywordId::Override, "override", C::Modifier, &[]),
    info(KeywordId::Pub, "pub", C::Modifier, &[]),
    // Expressions / control flow
    info(KeywordId::New, "new", C::ControlFlow, &[]),
    info(KeywordId::If, "if", C::ControlFlow, &[]),
    info(KeywordId::Else, "else", C::ControlFlow, &[OpensBlock, ContinuesLine]),
    info(KeywordId::Match, "match", C::ControlFlow, &[]),
    info(KeywordId::Do, "do", C::ControlFlow, &[OpensBlock, ContinuesLine]),
    info(KeywordId::Region, "region", C::ControlFlow, &[]),
    info(KeywordId::Try, "try", C::ControlFlow, &[OpensBlock]),
    info(KeywordId::Catch, "catch", C::ControlFlow, &[OpensBlock, ContinuesLine]),
    info(KeywordId::Finally, "finally", C::ControlFlow, &[OpensBlock, ContinuesLine]),
    info(KeywordId::Return, "return", C::ControlFlow, &[EndsStatement]),
    info(KeywordId::Throw, "throw", C::ControlFlow, &[]),
    info(KeywordId::While, "while", C::ControlFlow, &[]),
    reserved(KeywordId::For, "for", C::ControlFlow),
    info(KeywordId::Foreach, "foreach", C::ControlFlow, &[OpensBlock]),
    info(KeywordId::ForA, "forA", C::ControlFlow, &[OpensBlock]),
    info(KeywordId::ForM, "forM", C::ControlFlow, &[OpensBlock]),
    info(KeywordId::Par, "par", C::ControlFlow, &[OpensBlock]),
    info(KeywordId::Yield, "yield", C::ControlFlow, &[OpensBlock, ContinuesLine]),
    // Relational
    info(KeywordId::Query, "query", C::Relational, &[]),
    info(KeywordId::Select, "select", C::Relational, &[ContinuesLine]),
    info(KeywordId::From, "from", C::Relational, &[ContinuesLine]),
    info(KeywordId::Not, "not", C::Relational, &[]),
    info(KeywordId::Fix, "fix", C::Relational, &[]),
    // Literals
    info(KeywordId::True, "true", C::Literal, &[EndsStatement]),
    info(KeywordId::False, "false", C::Literal, &[EndsStatement]),
    info(KeywordId::Null, "null", C::Literal, &[EndsStatement]),
];

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The canonical spelling (e.g. `"forM"`).
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Whether the keyword carries the given layout role.
///
/// ## Examples
/// ```rust
/// use flix_core::lang::keywords::{self, KeywordId};
/// use flix_core::lang::registry::LayoutRole;
///
/// assert!(keywords::has_layout_role(KeywordId::Else, LayoutRole::ContinuesLine));
/// assert!(!keywords::has_layout_role(KeywordId::Def, LayoutRole::OpensBlock));
/// ```
pub fn has_layout_role(id: KeywordId, role: LayoutRole) -> bool {
    info_for(id).layout.contains(&role)
}

/// Whether the keyword may prefix a definition as a modifier.
pub fn is_modifier(id: KeywordId) -> bool {
    category(id) == KeywordCategory::Modifier
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling (canonical or alias).
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling matches this registry, `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    if let Some(k) = KEYWORDS.iter().find(|k| k.canonical == s) {
        return Some(k.id);
    }
    KEYWORDS.iter().find(|k| k.aliases.contains(&s)).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    layout: &'static [LayoutRole],
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        aliases: &[],
        category,
        layout,
        since: GRAMMAR_0_1,
        stability: Stability::Stable,
        examples: &[],
    }
}

const fn info_with_aliases(
    id: KeywordId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    category: KeywordCategory,
    layout: &'static [LayoutRole],
) -> KeywordInfo {
    KeywordInfo {
        aliases,
        ..info(id, canonical, category, layout)
    }
}

const fn reserved(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        stability: Stability::Reserved,
        ..info(id, canonical, category, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_keywords_are_case_sensitive() {
        assert_eq!(from_str("forM"), Some(KeywordId::ForM));
        assert_eq!(from_str("forA"), Some(KeywordId::ForA));
        assert_eq!(from_str("form"), None);
        assert_eq!(from_str("Def"), None);
    }

    #[test]
    fn namespace_is_an_alias_of_mod() {
        assert_eq!(from_str("namespace"), Some(KeywordId::Mod));
        assert_eq!(as_str(KeywordId::Mod), "mod");
    }

    #[test]
    fn for_is_reserved_only() {
        assert_eq!(info_for(KeywordId::For).stability, Stability::Reserved);
    }

    #[test]
    fn continuation_keywords_never_start_statements() {
        for id in [KeywordId::Else, KeywordId::Catch, KeywordId::Finally, KeywordId::With, KeywordId::Yield] {
            assert!(has_layout_role(id, ContinuesLine), "{id:?}");
        }
    }
}
