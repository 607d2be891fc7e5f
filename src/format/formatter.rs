//! Token-level pretty printer for Flix CSTs.
//!
//! The printer walks the tree's tokens in order and re-creates the layout from the synthetic layout tokens rather
//! than from the original whitespace:
//!
//! | token                  | printed as                                          |
//! |------------------------|-----------------------------------------------------|
//! | INDENT                 | line break, one level deeper                        |
//! | OUTDENT                | line break, one level shallower                     |
//! | AUTOMATIC_SEMICOLON    | line break (a blank line between definitions)       |
//! | `{` followed by a line | line break, one level deeper until the matching `}` |
//! | anything else          | its spelling, after a space if it had trivia        |
//!
//! Comments are dropped. Line breaks that the lexer did not turn into layout tokens are joined, except directly
//! inside a brace block and after an explicit `;`.

use std::collections::HashSet;

use flix_core::lang::punctuation::PunctuationId;
use flix_syntax::cst::Node;
use flix_syntax::lexer::{Token, TokenKind};

use super::config::FormatConfig;
use super::writer::FormatWriter;

/// Pretty printer over a parsed tree.
pub struct Formatter {
    config: FormatConfig,
}

/// What encloses the token being printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// An indentation block opened by INDENT.
    Layout,
    /// `{ }` or `#{ }`; `multiline` when its contents started on a new line.
    Brace { multiline: bool },
    /// `( )`, `[ ]` or a string splice `${ }`; line breaks inside are joined.
    Group,
}

/// Line break requested by layout tokens, applied before the next real token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Break {
    None,
    Line,
}

struct Printer<'a> {
    writer: FormatWriter,
    contexts: Vec<Context>,
    pending: Break,
    previous: Option<&'a TokenKind>,
    /// Start offsets of the top-level items after the first.
    item_starts: HashSet<usize>,
}

impl Formatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    /// Print the tokens of `root`.
    pub fn format(&self, root: &Node) -> String {
        let item_starts = root.named_children().skip(1).map(|n| n.span().start).collect();
        let mut printer = Printer {
            writer: FormatWriter::new(self.config.clone()),
            contexts: Vec::new(),
            pending: Break::None,
            previous: None,
            item_starts,
        };
        let tokens = root.tokens();
        for (index, &token) in tokens.iter().enumerate() {
            let next = tokens.get(index + 1).copied();
            printer.token(token, next);
        }
        printer.writer.finish()
    }
}

impl<'a> Printer<'a> {
    fn token(&mut self, token: &'a Token, next: Option<&Token>) {
        match &token.kind {
            TokenKind::Indent => {
                self.contexts.push(Context::Layout);
                self.writer.indent();
                self.request(Break::Line);
            }
            TokenKind::Outdent => {
                if self.contexts.last() == Some(&Context::Layout) {
                    self.contexts.pop();
                }
                self.writer.dedent();
                self.request(Break::Line);
            }
            TokenKind::AutoSemicolon => self.request(Break::Line),
            TokenKind::Eof => {}
            kind => self.real(token, kind, next),
        }
    }

    fn request(&mut self, brk: Break) {
        if brk == Break::Line {
            self.pending = Break::Line;
        }
    }

    fn real(&mut self, token: &'a Token, kind: &'a TokenKind, next: Option<&Token>) {
        let closer = matches!(
            kind,
            TokenKind::Punctuation(PunctuationId::RBrace | PunctuationId::RParen | PunctuationId::RBracket)
        );
        let mut closes_multiline = false;
        if closer {
            if let Some(Context::Brace { multiline: true }) = self.contexts.pop() {
                self.writer.dedent();
                closes_multiline = true;
            }
        }

        self.separate(token, closes_multiline);
        self.writer.write(kind.text());

        match kind {
            TokenKind::Punctuation(PunctuationId::LBrace | PunctuationId::HashBrace) => {
                let splice = matches!(self.previous, Some(TokenKind::Punctuation(PunctuationId::Dollar)));
                if splice {
                    self.contexts.push(Context::Group);
                } else {
                    let multiline = next.is_some_and(Token::has_newline_before);
                    if multiline {
                        self.writer.indent();
                    }
                    self.contexts.push(Context::Brace { multiline });
                }
            }
            TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket) => {
                self.contexts.push(Context::Group);
            }
            _ => {}
        }
        self.previous = Some(kind);
    }

    /// Emit whatever separates `token` from the previous one.
    fn separate(&mut self, token: &Token, closes_multiline: bool) {
        let pending = std::mem::replace(&mut self.pending, Break::None);
        let top_level = self.contexts.is_empty();
        match pending {
            Break::Line if top_level && self.starts_item(token) => self.writer.blank_line(),
            Break::Line => self.writer.newline(),
            Break::None => {
                let after_opener = self.previous.is_some_and(TokenKind::opens_block);
                let in_brace = matches!(self.contexts.last(), Some(Context::Brace { .. }));
                let after_semicolon = matches!(self.previous, Some(TokenKind::Punctuation(PunctuationId::Semicolon)))
                    && self.contexts.last() != Some(&Context::Group);
                if closes_multiline && !after_opener {
                    self.writer.newline();
                } else if (in_brace || after_semicolon) && token.has_newline_before() && !after_opener {
                    self.writer.newline();
                } else if token.has_trivia_before() && self.previous.is_some() {
                    self.writer.space();
                }
            }
        }
    }

    fn starts_item(&self, token: &Token) -> bool {
        self.writer.config().blank_line_between_definitions && self.item_starts.contains(&token.span.start)
    }
}
