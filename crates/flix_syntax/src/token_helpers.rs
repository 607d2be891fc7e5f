//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites, to make it easy to work with ID-based
//! tokens, and to answer the layout questions (can this token end a statement? open a block?) from the registry
//! metadata instead of hard-coded lists.

use crate::lexer::{Token, TokenKind};
use flix_core::chars;
use flix_core::lang::keywords::{self, KeywordId};
use flix_core::lang::punctuation::{self, PunctuationId};
use flix_core::lang::registry::LayoutRole;

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` for the synthetic layout tokens.
    pub fn is_layout(&self) -> bool {
        matches!(self, TokenKind::Indent | TokenKind::Outdent | TokenKind::AutoSemicolon)
    }

    /// Return `true` for tokens that end an operand (`x -1` is then infix, not a negative literal).
    pub fn ends_operand(&self) -> bool {
        match self {
            TokenKind::Ident(_)
            | TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Char(_)
            | TokenKind::String(_)
            | TokenKind::StringEnd { .. } => true,
            TokenKind::Keyword(id) => matches!(id, KeywordId::True | KeywordId::False | KeywordId::Null),
            TokenKind::Punctuation(id) => matches!(
                id,
                PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace | PunctuationId::Underscore
            ),
            _ => false,
        }
    }

    /// Return `true` if a statement may end right after this token.
    pub fn can_end_statement(&self) -> bool {
        match self {
            TokenKind::Outdent => true,
            TokenKind::Keyword(id) => keywords::has_layout_role(*id, LayoutRole::EndsStatement),
            TokenKind::Punctuation(id) => punctuation::has_layout_role(*id, LayoutRole::EndsStatement),
            other => other.ends_operand(),
        }
    }

    /// Return `true` if a statement may start with this token.
    ///
    /// ## Parameters
    /// - `next`: the source character right after the token; a prefix operator only starts a statement when it is
    ///   glued to its operand (`-x`, not `- x`).
    pub fn can_start_statement(&self, next: Option<char>) -> bool {
        match self {
            TokenKind::Keyword(id) => !keywords::has_layout_role(*id, LayoutRole::ContinuesLine),
            TokenKind::Punctuation(id) => !punctuation::has_layout_role(*id, LayoutRole::ContinuesLine),
            TokenKind::OperatorIdent(op) => {
                let mut it = op.chars();
                matches!((it.next(), it.next()), (Some(c), None) if chars::is_prefix_operator(c))
                    && next.is_some_and(|n| !n.is_whitespace())
            }
            TokenKind::Indent | TokenKind::Outdent | TokenKind::AutoSemicolon | TokenKind::Eof => false,
            TokenKind::StringMiddle(_) | TokenKind::StringEnd { .. } => false,
            _ => true,
        }
    }

    /// Return `true` for a definition keyword or a modifier, which can only begin a definition.
    ///
    /// `lazy` is excluded: it also prefixes expressions.
    pub fn starts_definition(&self) -> bool {
        matches!(
            self,
            TokenKind::Keyword(id)
                if is_definition_keyword(*id) || (keywords::is_modifier(*id) && *id != KeywordId::Lazy)
        )
    }

    /// Return `true` if an indented line after this token opens a layout block.
    pub fn opens_block(&self) -> bool {
        match self {
            TokenKind::Keyword(id) => keywords::has_layout_role(*id, LayoutRole::OpensBlock),
            TokenKind::Punctuation(id) => punctuation::has_layout_role(*id, LayoutRole::OpensBlock),
            _ => false,
        }
    }

    /// Short, stable kind name (used by `flix lex` and tests).
    pub fn kind_name(&self) -> &'static str {
        match self {
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Punctuation(_) => "punctuation",
            TokenKind::Ident(_) => "identifier",
            TokenKind::OperatorIdent(_) => "operator_identifier",
            TokenKind::Int(_) => "integer_literal",
            TokenKind::Float(_) => "floating_point_literal",
            TokenKind::Char(_) => "character_literal",
            TokenKind::String(_) => "string",
            TokenKind::StringStart { .. } => "string_start",
            TokenKind::StringMiddle(_) => "string_middle",
            TokenKind::StringEnd { .. } => "string_end",
            TokenKind::Indent => "INDENT",
            TokenKind::Outdent => "OUTDENT",
            TokenKind::AutoSemicolon => "AUTOMATIC_SEMICOLON",
            TokenKind::Error(_) => "ERROR",
            TokenKind::Eof => "EOF",
        }
    }

    /// Source spelling of the token, empty for synthetic tokens.
    pub fn text(&self) -> &str {
        match self {
            TokenKind::Keyword(id) => keywords::as_str(*id),
            TokenKind::Punctuation(id) => punctuation::as_str(*id),
            TokenKind::Ident(s)
            | TokenKind::OperatorIdent(s)
            | TokenKind::Int(s)
            | TokenKind::Float(s)
            | TokenKind::Char(s)
            | TokenKind::String(s)
            | TokenKind::StringMiddle(s)
            | TokenKind::Error(s) => s,
            TokenKind::StringStart { multiline } | TokenKind::StringEnd { multiline } => {
                if *multiline {
                    "\"\"\""
                } else {
                    "\""
                }
            }
            TokenKind::Indent | TokenKind::Outdent | TokenKind::AutoSemicolon | TokenKind::Eof => "",
        }
    }

    /// Human description for diagnostics (`` `def` ``, `identifier \`x\``, `end of file`).
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(_) | TokenKind::Punctuation(_) => format!("`{}`", self.text()),
            TokenKind::Ident(s) => format!("identifier `{s}`"),
            TokenKind::OperatorIdent(s) => format!("operator `{s}`"),
            TokenKind::Int(s) | TokenKind::Float(s) => format!("number `{s}`"),
            TokenKind::Char(s) => format!("character `{s}`"),
            TokenKind::String(_) | TokenKind::StringStart { .. } => "string literal".to_string(),
            TokenKind::StringMiddle(_) | TokenKind::StringEnd { .. } => "string fragment".to_string(),
            TokenKind::Indent => "indented block".to_string(),
            TokenKind::Outdent => "end of indented block".to_string(),
            TokenKind::AutoSemicolon => "end of line".to_string(),
            TokenKind::Error(s) => format!("invalid input `{s}`"),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// Definition keywords other than `let`/`forM`.
pub fn is_definition_keyword(id: KeywordId) -> bool {
    matches!(
        id,
        KeywordId::Def
            | KeywordId::Enum
            | KeywordId::Class
            | KeywordId::Instance
            | KeywordId::Eff
            | KeywordId::Rel
            | KeywordId::Type
            | KeywordId::Mod
            | KeywordId::Use
            | KeywordId::Import
    )
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }

    /// Convenience wrapper for `self.kind.text()`.
    pub fn text(&self) -> &str {
        self.kind.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_enders_come_from_the_registries() {
        assert!(TokenKind::Keyword(KeywordId::Return).can_end_statement());
        assert!(TokenKind::Punctuation(PunctuationId::RParen).can_end_statement());
        assert!(TokenKind::Outdent.can_end_statement());
        assert!(!TokenKind::Punctuation(PunctuationId::Eq).can_end_statement());
        assert!(!TokenKind::Keyword(KeywordId::Return).ends_operand());
    }

    #[test]
    fn prefix_operators_start_statements_only_when_glued() {
        let minus = TokenKind::OperatorIdent("-".to_string());
        assert!(minus.can_start_statement(Some('x')));
        assert!(!minus.can_start_statement(Some(' ')));
        assert!(!TokenKind::OperatorIdent("++".to_string()).can_start_statement(Some('x')));
        assert!(!TokenKind::Keyword(KeywordId::Else).can_start_statement(None));
        assert!(TokenKind::Punctuation(PunctuationId::At).can_start_statement(None));
    }

    #[test]
    fn openers() {
        assert!(TokenKind::Punctuation(PunctuationId::Colon).opens_block());
        assert!(TokenKind::Keyword(KeywordId::Yield).opens_block());
        assert!(!TokenKind::Punctuation(PunctuationId::LBrace).opens_block());
    }
}
