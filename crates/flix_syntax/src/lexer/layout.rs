//! Layout rules: indentation blocks, automatic semicolons and delimiter frames.
//!
//! Every real token goes through [`Lexer::emit`]. When it is the first token of a line and layout is active (the
//! innermost frame is an indentation block, a brace block or the file itself), its column is compared against the
//! enclosing indentation level:
//!
//! | column vs. level                  | emitted                                          |
//! |-----------------------------------|--------------------------------------------------|
//! | shallower                         | one OUTDENT per closed `Indent` frame            |
//! | equal                             | AUTOMATIC_SEMICOLON if the statement can end here |
//! | deeper, previous token opens      | INDENT, push `Indent(column)`                    |
//! | deeper otherwise                  | nothing (continuation line)                      |
//!
//! Closing delimiters first close every indentation block opened inside them.

use super::{Lexer, TokenKind};
use crate::diagnostics::LexError;
use crate::span::Span;
use flix_core::lang::punctuation::PunctuationId;

/// One entry of the lexer's context stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Frame {
    /// Layout block opened at this column.
    Indent(usize),
    /// `{` or `#{`; automatic semicolons are suppressed directly inside.
    Brace { open: usize },
    /// `(`; newlines are ignored inside.
    Paren { open: usize },
    /// `[`; newlines are ignored inside.
    Bracket { open: usize },
    /// `${ ... }` inside an interpolated string.
    Splice { open: usize },
    /// Inside the text of an interpolated string.
    String { multiline: bool, open: usize },
}

impl Frame {
    fn closed_by(&self, closer: PunctuationId) -> bool {
        matches!(
            (self, closer),
            (Frame::Brace { .. } | Frame::Splice { .. }, PunctuationId::RBrace)
                | (Frame::Paren { .. }, PunctuationId::RParen)
                | (Frame::Bracket { .. }, PunctuationId::RBracket)
        )
    }
}

fn closer_char(id: PunctuationId) -> char {
    match id {
        PunctuationId::RParen => ')',
        PunctuationId::RBracket => ']',
        _ => '}',
    }
}

impl<'a> Lexer<'a> {
    /// Emit a real token, applying the layout rules and delimiter tracking first.
    pub(super) fn emit(&mut self, kind: TokenKind, span: Span) {
        if self.line_start {
            self.line_start = false;
            let column = self.column_of(span.start);
            if !self.layout_active() && kind.starts_definition() && column <= self.line_indent {
                self.abandon_groups();
            }
            if self.layout_active() {
                let next = self.source[span.end..].chars().next();
                self.layout_line(column, &kind, next, span.start);
            }
        }

        match kind {
            TokenKind::Punctuation(
                closer @ (PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace),
            ) => self.close_delimiter(closer, span),
            TokenKind::Punctuation(
                opener @ (PunctuationId::LParen
                | PunctuationId::LBracket
                | PunctuationId::LBrace
                | PunctuationId::HashBrace),
            ) => {
                let frame = match opener {
                    PunctuationId::LParen => Frame::Paren { open: span.start },
                    PunctuationId::LBracket => Frame::Bracket { open: span.start },
                    _ => Frame::Brace { open: span.start },
                };
                self.frames.push(frame);
                self.push_raw(kind, span);
            }
            _ => self.push_raw(kind, span),
        }
    }

    /// Layout applies unless the innermost frame ignores newlines.
    fn layout_active(&self) -> bool {
        matches!(self.frames.last(), None | Some(Frame::Indent(_) | Frame::Brace { .. }))
    }

    /// Visual column of `offset`, expanding tabs to the configured tab stops.
    pub(super) fn column_of(&self, offset: usize) -> usize {
        let line_begin = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        self.source[line_begin..offset].chars().fold(0, |col, c| {
            if c == '\t' {
                (col / self.tab_width + 1) * self.tab_width
            } else {
                col + 1
            }
        })
    }

    fn layout_line(&mut self, column: usize, next: &TokenKind, next_char: Option<char>, next_start: usize) {
        let opener_line_indent = self.line_indent;
        self.line_indent = column;

        let mut popped = 0;
        while let Some(Frame::Indent(level)) = self.frames.last() {
            if *level <= column {
                break;
            }
            self.frames.pop();
            self.push_synthetic(TokenKind::Outdent, self.last_real_end);
            popped += 1;
        }

        let level = match self.frames.last() {
            Some(Frame::Indent(level)) => Some(*level),
            None => Some(0),
            _ => None,
        };

        match level {
            Some(level) if column == level => {
                let can_end = self.last_kind().is_some_and(TokenKind::can_end_statement);
                if can_end && next.can_start_statement(next_char) {
                    self.push_synthetic(TokenKind::AutoSemicolon, self.last_real_end);
                }
            }
            Some(_) if popped > 0 => {
                tracing::trace!(column, "dedent lands between indentation levels");
                self.error(LexError::InconsistentIndentation { column }, Span::empty(next_start));
                self.push_synthetic(TokenKind::Error(String::new()), next_start);
            }
            _ => {
                let opens = self.last_kind().is_some_and(TokenKind::opens_block);
                if popped == 0 && opens && column > opener_line_indent {
                    self.frames.push(Frame::Indent(column));
                    self.push_synthetic(TokenKind::Indent, next_start);
                }
            }
        }
    }

    /// Close the unterminated `(`/`[` groups a definition keyword has walked out of.
    ///
    /// A definition cannot appear inside parentheses, so a line that starts one at or left of the indentation of the
    /// line that opened the group ends the group. Each closed group leaves a zero-width error token behind so the
    /// parser's recovery treats it as closed.
    fn abandon_groups(&mut self) {
        while let Some(Frame::Paren { open } | Frame::Bracket { open }) = self.frames.last().copied() {
            self.frames.pop();
            let ch = self.source[open..].chars().next().unwrap_or('(');
            tracing::trace!(open, "definition closes unterminated group");
            self.error(LexError::UnterminatedBlock(ch), Span::new(open, open + 1));
            self.push_synthetic(TokenKind::Error(String::new()), self.last_real_end);
        }
    }

    fn close_delimiter(&mut self, closer: PunctuationId, span: Span) {
        // Never look through an enclosing string: its frames belong to the string scanner.
        let floor = self
            .frames
            .iter()
            .rposition(|f| matches!(f, Frame::String { .. }))
            .map_or(0, |i| i + 1);
        let target = self.frames[floor..].iter().rposition(|f| f.closed_by(closer)).map(|i| i + floor);

        let Some(target) = target else {
            self.error(LexError::UnmatchedDelimiter(closer_char(closer)), span);
            let text = closer_char(closer).to_string();
            self.push_raw(TokenKind::Error(text), span);
            return;
        };

        while self.frames.len() > target + 1 {
            match self.frames.pop() {
                Some(Frame::Indent(_)) => self.push_synthetic(TokenKind::Outdent, self.last_real_end),
                Some(Frame::Brace { open } | Frame::Paren { open } | Frame::Bracket { open } | Frame::Splice { open }) => {
                    let ch = self.source[open..].chars().next().unwrap_or('(');
                    self.error(LexError::UnterminatedBlock(ch), Span::new(open, open + 1));
                }
                Some(Frame::String { .. }) | None => {}
            }
        }
        self.frames.pop();
        self.push_raw(TokenKind::Punctuation(closer), span);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::LexerConfig;
    use crate::lexer::{TokenKind, lex, lex_with_config};

    /// Render the token stream compactly: layout tokens as `>`, `<`, `;;`, others by text.
    fn layout(source: &str) -> String {
        lex(source)
            .tokens
            .iter()
            .map(|t| match &t.kind {
                TokenKind::Indent => ">".to_string(),
                TokenKind::Outdent => "<".to_string(),
                TokenKind::AutoSemicolon => ";;".to_string(),
                TokenKind::Eof => "$".to_string(),
                other => other.text().to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn indented_body_after_equals() {
        assert_eq!(layout("def f(): Int32 =\n    1\n"), "def f ( ) : Int32 = > 1 < $");
    }

    #[test]
    fn sibling_lines_get_automatic_semicolons() {
        assert_eq!(
            layout("def f(): Int32 =\n    let x = 1;\n    x\ndef g(): Int32 = 2\n"),
            "def f ( ) : Int32 = > let x = 1 ; x < ;; def g ( ) : Int32 = 2 $"
        );
        assert_eq!(layout("a\nb\n"), "a ;; b $");
    }

    #[test]
    fn continuation_keywords_suppress_semicolons() {
        assert_eq!(layout("if (c) a\nelse b\n"), "if ( c ) a else b $");
        assert_eq!(layout("x\n.y\n"), "x . y $");
    }

    #[test]
    fn deeper_line_without_opener_is_a_continuation() {
        assert_eq!(layout("a +\n    b\n"), "a + b $");
    }

    #[test]
    fn prefix_operator_starts_a_statement_only_when_glued() {
        assert_eq!(layout("a\n-b\n"), "a ;; - b $");
        assert_eq!(layout("a\n- b\n"), "a - b $");
    }

    #[test]
    fn newlines_inside_parens_are_ignored() {
        assert_eq!(layout("f(a,\n  b)\n"), "f ( a , b ) $");
    }

    #[test]
    fn braces_suppress_semicolons_but_not_nested_blocks() {
        assert_eq!(layout("{\n  a\n  b\n}\n"), "{ a b } $");
        assert_eq!(
            layout("{\n  let x =\n      1\n      2\n  x\n}\n"),
            "{ let x = > 1 ;; 2 < x } $"
        );
    }

    #[test]
    fn closer_closes_open_indentation_blocks() {
        assert_eq!(layout("{ x =\n    1 }"), "{ x = > 1 < } $");
    }

    #[test]
    fn inconsistent_dedent_is_reported() {
        let lexed = lex("def f(): Int32 =\n    a +\n        b\n  c\n");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert_eq!(lexed.diagnostics[0].code(), "flix::lex::inconsistent_indentation");
        let indents = lexed.tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let outdents = lexed.tokens.iter().filter(|t| t.kind == TokenKind::Outdent).count();
        assert_eq!(indents, outdents);
    }

    #[test]
    fn unmatched_and_unterminated_delimiters() {
        let lexed = lex("a)\n");
        assert_eq!(lexed.diagnostics[0].code(), "flix::lex::unmatched_delimiter");
        assert!(matches!(lexed.tokens[1].kind, TokenKind::Error(_)));

        let lexed = lex("f(a\n");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert_eq!(lexed.diagnostics[0].code(), "flix::lex::unterminated_block");
        assert_eq!(lexed.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }

    #[test]
    fn definition_keyword_closes_unterminated_group() {
        let lexed = lex("def b(: Int32 = 2\ndef c(): Int32 = 3\n");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert_eq!(lexed.diagnostics[0].code(), "flix::lex::unterminated_block");
        assert_eq!(lexed.diagnostics[0].span.start, 5);
        assert_eq!(layout("def b(: Int32 = 2\ndef c(): Int32 = 3\n"), "def b ( : Int32 = 2  def c ( ) : Int32 = 3 $");

        // Continuation lines and deeper lines stay inside the group.
        assert!(lex("f(a,\n  def)\n").diagnostics.is_empty());
        assert!(lex("f(a,\nlazy b)\n").diagnostics.is_empty());
        assert!(lex("def f(): Int32 = g(a,\nb)\n").diagnostics.is_empty());
    }

    #[test]
    fn tabs_expand_to_tab_stops() {
        let config = LexerConfig { tab_width: 4 };
        let lexed = lex_with_config("def f(): Int32 =\n\tx\n    y\n", &config);
        let kinds: Vec<_> = lexed.tokens.iter().map(|t| t.kind.kind_name()).collect();
        assert!(kinds.contains(&"AUTOMATIC_SEMICOLON"), "{kinds:?}");
        assert!(lexed.diagnostics.is_empty());
    }

    #[test]
    fn synthetic_tokens_are_zero_width() {
        let source = "def f(): Int32 =\n    1\ndef g(): Int32 = 2";
        let lexed = lex(source);
        for token in &lexed.tokens {
            if token.kind.is_layout() {
                assert!(token.span.is_empty());
                assert!(token.leading_trivia.is_empty());
            }
        }
        let indent = lexed.tokens.iter().find(|t| t.kind == TokenKind::Indent).map(|t| t.span.start);
        assert_eq!(indent, source.find('1'));
        let semi = lexed.tokens.iter().find(|t| t.kind == TokenKind::AutoSemicolon).map(|t| t.span.start);
        assert_eq!(semi, source.find('1').map(|i| i + 1));
    }
}
