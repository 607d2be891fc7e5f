//! Rewindable token stream consumed by the parser.
//!
//! The stream owns the lexer's tokens and a cursor. Lookahead is random access (`nth`), and [`TokenStream::mark`] /
//! [`TokenStream::reset`] give the bounded local backtracking the conflict policies need. The token vector itself is
//! never mutated.

use crate::lexer::{Token, TokenKind};
use crate::span::Span;
use flix_core::lang::punctuation::PunctuationId;

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Token sequence plus cursor.
///
/// ## Notes
/// - The last token is always `Eof`; peeking past the end keeps returning it.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    /// Wrap a token vector, appending `Eof` if the producer did not.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::new(TokenKind::Eof, Span::empty(end)));
        }
        Self { tokens, pos: 0 }
    }

    /// Current token.
    pub fn peek(&self) -> &Token {
        self.nth(0)
    }

    /// Token `n` positions ahead of the cursor (`nth(0)` is the current token).
    pub fn nth(&self, n: usize) -> &Token {
        self.at(self.pos + n)
    }

    /// Token at an absolute index, clamped to `Eof`.
    pub fn at(&self, index: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    /// Absolute index of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Consume and return the current token. At `Eof` the cursor stays put.
    pub fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.at_eof() {
            self.pos += 1;
        }
        token
    }

    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    /// Number of tokens consumed since `mark`.
    pub fn consumed_since(&self, mark: Mark) -> usize {
        self.pos.saturating_sub(mark.0)
    }

    /// End offset of the last consumed token (0 before the first).
    pub fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    /// Index just past the delimiter that closes the opener at `open_index`.
    ///
    /// ## Returns
    /// - `None` if the token at `open_index` is not an opener, or the stream ends before it is closed.
    pub fn matching_close(&self, open_index: usize) -> Option<usize> {
        if delimiter_delta(&self.at(open_index).kind) != 1 {
            return None;
        }
        let mut depth = 0i32;
        let mut index = open_index;
        loop {
            let kind = &self.at(index).kind;
            if matches!(kind, TokenKind::Eof) {
                return None;
            }
            depth += delimiter_delta(kind);
            index += 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

fn delimiter_delta(kind: &TokenKind) -> i32 {
    match kind {
        TokenKind::Punctuation(
            PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace | PunctuationId::HashBrace,
        ) => 1,
        TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => -1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    #[test]
    fn peek_and_bump_stop_at_eof() {
        let mut stream = TokenStream::new(lex("a b").tokens);
        assert_eq!(stream.bump().kind, TokenKind::Ident("a".into()));
        assert_eq!(stream.bump().kind, TokenKind::Ident("b".into()));
        assert!(stream.at_eof());
        assert_eq!(stream.bump().kind, TokenKind::Eof);
        assert_eq!(stream.nth(10).kind, TokenKind::Eof);
    }

    #[test]
    fn mark_and_reset() {
        let mut stream = TokenStream::new(lex("a b c").tokens);
        let mark = stream.mark();
        stream.bump();
        stream.bump();
        assert_eq!(stream.consumed_since(mark), 2);
        stream.reset(mark);
        assert_eq!(stream.peek().kind, TokenKind::Ident("a".into()));
    }

    #[test]
    fn matching_close_skips_nested_delimiters() {
        let stream = TokenStream::new(lex("(a, [b], {c}) -> d").tokens);
        let after = stream.matching_close(0).unwrap();
        assert_eq!(stream.at(after).kind, TokenKind::Punctuation(PunctuationId::Arrow));
        assert_eq!(stream.matching_close(1), None);
    }

    #[test]
    fn new_appends_missing_eof() {
        let stream = TokenStream::new(Vec::new());
        assert!(stream.at_eof());
    }
}
