//! String literal scanning.
//!
//! A string is pre-scanned once at its opening quote:
//! - no splice before the closing quote: the whole literal becomes one `String` token;
//! - otherwise the lexer emits `StringStart`, pushes a string frame, and [`Lexer::scan_string_piece`] produces
//!   `StringMiddle` fragments, `$` + identifier interpolations, and `${` which hands control back to normal lexing
//!   under a splice frame until the matching `}`.

use super::layout::Frame;
use super::{Lexer, TokenKind};
use crate::diagnostics::LexError;
use crate::span::Span;
use flix_core::chars;
use flix_core::lang::punctuation::PunctuationId;

/// Whether the text at the start of `rest` begins an interpolation splice.
fn splice_at(rest: &str) -> bool {
    let mut it = rest.chars();
    match (it.next(), it.next()) {
        (Some('$'), Some('{')) => true,
        (Some('$'), Some(c)) => c != '$' && chars::is_ident_start(c),
        _ => false,
    }
}

fn closing_quote(rest: &str, multiline: bool) -> bool {
    if multiline {
        rest.starts_with("\"\"\"")
    } else {
        rest.starts_with('"')
    }
}

impl<'a> Lexer<'a> {
    pub(super) fn scan_string(&mut self, start: usize) {
        let multiline = self.starts_with("\"\"\"");
        self.pos += if multiline { 3 } else { 1 };

        if self.has_splice(multiline) {
            self.emit(TokenKind::StringStart { multiline }, Span::new(start, self.pos));
            self.frames.push(Frame::String { multiline, open: start });
            return;
        }

        if self.eat_string_text(multiline) {
            self.pos += if multiline { 3 } else { 1 };
            let text = self.text(start).to_string();
            self.emit(TokenKind::String(text), Span::new(start, self.pos));
        } else {
            self.error_token(LexError::UnterminatedString, start);
        }
    }

    /// Pre-scan from the current position to the closing quote looking for a splice.
    fn has_splice(&self, multiline: bool) -> bool {
        let mut rest = self.rest();
        loop {
            let mut it = rest.chars();
            let Some(c) = it.next() else {
                return false;
            };
            if closing_quote(rest, multiline) || (c == '\n' && !multiline) {
                return false;
            }
            if splice_at(rest) {
                return true;
            }
            let skip = if c == '\\' {
                c.len_utf8() + it.next().map_or(0, char::len_utf8)
            } else {
                c.len_utf8()
            };
            rest = &rest[skip..];
        }
    }

    /// Consume string text up to (not including) the closing quote, a splice, or the end of the literal.
    ///
    /// ## Returns
    /// - `true` when stopped at the closing quote, `false` at a newline (single-line strings) or end of input.
    fn eat_string_text(&mut self, multiline: bool) -> bool {
        loop {
            let rest = self.rest();
            match self.peek() {
                None => return false,
                Some('\n') if !multiline => return false,
                Some(_) if closing_quote(rest, multiline) => return true,
                Some('$') if splice_at(rest) => return true,
                Some('\\') => {
                    self.bump();
                    if self.peek() != Some('\n') || multiline {
                        self.bump();
                    }
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Scan the next piece of an interpolated string: a fragment, an interpolation, or the closing quote.
    pub(super) fn scan_string_piece(&mut self, multiline: bool) {
        let start = self.pos;
        let rest = self.rest();

        if closing_quote(rest, multiline) {
            self.pos += if multiline { 3 } else { 1 };
            self.frames.pop();
            self.push_raw(TokenKind::StringEnd { multiline }, Span::new(start, self.pos));
            return;
        }

        if splice_at(rest) {
            self.bump();
            self.push_raw(TokenKind::Punctuation(PunctuationId::Dollar), Span::new(start, self.pos));
            let inner = self.pos;
            if self.peek() == Some('{') {
                self.bump();
                self.frames.push(Frame::Splice { open: start });
                self.push_raw(TokenKind::Punctuation(PunctuationId::LBrace), Span::new(inner, self.pos));
            } else {
                self.eat_while(chars::is_ident_continue);
                let name = self.text(inner).to_string();
                self.push_raw(TokenKind::Ident(name), Span::new(inner, self.pos));
            }
            return;
        }

        let terminated = self.eat_string_text(multiline);
        if self.pos > start {
            let text = self.text(start).to_string();
            self.push_raw(TokenKind::StringMiddle(text), Span::new(start, self.pos));
        }
        if !terminated {
            let open = match self.frames.pop() {
                Some(Frame::String { open, .. }) => open,
                _ => start,
            };
            self.error(LexError::UnterminatedString, Span::new(open, self.pos));
            self.push_synthetic(TokenKind::Error(String::new()), self.pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};
    use flix_core::lang::keywords::KeywordId;
    use flix_core::lang::punctuation::PunctuationId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).tokens.into_iter().map(|t| t.kind).collect()
    }

    fn middle(s: &str) -> TokenKind {
        TokenKind::StringMiddle(s.to_string())
    }

    const START: TokenKind = TokenKind::StringStart { multiline: false };
    const END: TokenKind = TokenKind::StringEnd { multiline: false };
    const DOLLAR: TokenKind = TokenKind::Punctuation(PunctuationId::Dollar);

    #[test]
    fn test_simple_strings_are_single_tokens() {
        assert_eq!(kinds(r#""hello \"x\" $ 5""#), vec![TokenKind::String(r#""hello \"x\" $ 5""#.into()), TokenKind::Eof]);
        assert_eq!(kinds("\"\"\"a\nb\"\"\""), vec![TokenKind::String("\"\"\"a\nb\"\"\"".into()), TokenKind::Eof]);
    }

    #[test]
    fn test_identifier_interpolation() {
        assert_eq!(
            kinds(r#""hi $name!""#),
            vec![START, middle("hi "), DOLLAR, TokenKind::Ident("name".into()), middle("!"), END, TokenKind::Eof]
        );
    }

    #[test]
    fn test_block_interpolation_tracks_nested_braces() {
        let toks = kinds(r#""a${ if (b) {1} else 2 }c""#);
        assert_eq!(toks[0], START);
        assert_eq!(toks[1], middle("a"));
        assert_eq!(toks[2], DOLLAR);
        assert_eq!(toks[3], TokenKind::Punctuation(PunctuationId::LBrace));
        assert_eq!(toks[4], TokenKind::Keyword(KeywordId::If));
        let n = toks.len();
        assert_eq!(toks[n - 4], TokenKind::Punctuation(PunctuationId::RBrace));
        assert_eq!(toks[n - 3], middle("c"));
        assert_eq!(toks[n - 2], END);
    }

    #[test]
    fn test_nested_strings_inside_splices() {
        let lexed = lex(r#""x${ f("}") }y""#);
        assert!(lexed.diagnostics.is_empty(), "{:?}", lexed.diagnostics);
        assert!(lexed.tokens.iter().any(|t| t.kind == TokenKind::String("\"}\"".into())));
    }

    #[test]
    fn test_unterminated_strings() {
        let lexed = lex("\"abc\nx");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert_eq!(lexed.diagnostics[0].code(), "flix::lex::unterminated_string");
        assert!(matches!(lexed.tokens[0].kind, TokenKind::Error(_)));

        let lexed = lex("\"a $b");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert_eq!(lexed.diagnostics[0].code(), "flix::lex::unterminated_string");
    }

    #[test]
    fn test_unterminated_splice_reports_once() {
        let lexed = lex("x = \"a${ y");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert_eq!(lexed.diagnostics[0].code(), "flix::lex::unterminated_string");
        assert_eq!(lexed.diagnostics[0].span.start, 4);
        assert_eq!(lexed.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }
}
