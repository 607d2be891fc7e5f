//! Lexer for the Flix language
//!
//! Handles tokenization including:
//! - Keywords, alpha identifiers, backquoted identifiers and operator identifiers
//! - Numeric and character literals
//! - Simple and interpolated strings (`"a $x ${ e } b"`, `"""..."""`)
//! - Layout: synthetic INDENT / OUTDENT / AUTOMATIC_SEMICOLON tokens
//! - Trivia (whitespace, newlines, comments) attached to the following token
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, Trivia)
//! - `layout` - Indentation frames, automatic semicolons and delimiter matching
//! - `strings` - String and interpolation scanning
//! - `numbers` - Numeric literal scanning
//!
//! ## Notes
//! - The lexer is total: every byte of the input ends up in a token or in trivia, and malformed input produces an
//!   `Error` token plus a diagnostic instead of aborting.

mod layout;
mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind, Trivia, TriviaKind, keyword_id};

use crate::config::LexerConfig;
use crate::diagnostics::{Diagnostic, LexError};
use crate::span::Span;
use flix_core::chars;
use flix_core::lang::punctuation::{self, PunctuationId};

use layout::Frame;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Lexer state diagram (simplified):
//
// [line start] → first real token → layout decision (INDENT / OUTDENT / ;)
//                                       ↓
//                  see '(' or '['  → [Paren/Bracket frame: newlines ignored]
//                  see '{' or '#{' → [Brace frame: no automatic semicolons]
//                  see '"' + splice → [String frame] → '${' → [Splice frame]
//                                       ↓
//                  matching closer → pop frames (OUTDENT per Indent frame)
// ============================================================================

/// Output of one lexing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed {
    /// The token stream; always ends with exactly one `Eof` token.
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lexer for Flix source code.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    tab_width: usize,
    /// Open layout, delimiter and string frames, innermost last.
    frames: Vec<Frame>,
    /// Trivia waiting for the next real token.
    trivia: Vec<Trivia>,
    /// A line break was seen since the last real token.
    line_start: bool,
    /// Indentation column of the last line that went through the layout rules.
    line_indent: usize,
    /// End of the last real (non-synthetic) token.
    last_real_end: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str, config: &LexerConfig) -> Self {
        Self {
            source,
            pos: 0,
            tab_width: config.tab_width.max(1),
            frames: Vec::new(),
            trivia: Vec::new(),
            line_start: true,
            line_indent: 0,
            last_real_end: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// The token stream always ends with an `Eof` token, and every open indentation block is closed before it.
    pub fn tokenize(mut self) -> Lexed {
        while self.pos < self.source.len() {
            match self.frames.last() {
                Some(Frame::String { multiline, .. }) => {
                    let multiline = *multiline;
                    self.scan_string_piece(multiline);
                }
                _ => self.scan_token(),
            }
        }
        self.finish()
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume characters while `pred` holds.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn text(&self, start: usize) -> &'a str {
        &self.source[start..self.pos]
    }

    /// The kind of the last token pushed, real or synthetic.
    fn last_kind(&self) -> Option<&TokenKind> {
        self.tokens.last().map(|t| &t.kind)
    }

    // ========================================================================
    // Token output
    // ========================================================================

    /// Push a token verbatim, attaching the pending trivia. No layout rules apply.
    fn push_raw(&mut self, kind: TokenKind, span: Span) {
        let trivia = std::mem::take(&mut self.trivia);
        self.last_real_end = span.end;
        self.tokens.push(Token::new(kind, span).with_trivia(trivia));
    }

    /// Push a zero-width synthetic token.
    fn push_synthetic(&mut self, kind: TokenKind, at: usize) {
        tracing::trace!(kind = kind.kind_name(), at, "layout token");
        self.tokens.push(Token::new(kind, Span::empty(at)));
    }

    fn error(&mut self, error: LexError, span: Span) {
        self.diagnostics.push(Diagnostic::new(error, span));
    }

    /// Emit an error token covering `start..pos` along with its diagnostic.
    fn error_token(&mut self, error: LexError, start: usize) {
        let span = Span::new(start, self.pos);
        self.error(error, span);
        let text = self.text(start).to_string();
        self.emit(TokenKind::Error(text), span);
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return;
        };

        match c {
            '\n' => {
                self.bump();
                self.push_trivia(TriviaKind::Newline, start);
                self.line_start = true;
            }
            c if c.is_whitespace() => {
                self.eat_while(|c| c != '\n' && c.is_whitespace());
                self.push_trivia(TriviaKind::Whitespace, start);
            }
            '/' if self.starts_with("//") => {
                self.eat_while(|c| c != '\n');
                self.push_trivia(TriviaKind::LineComment, start);
            }
            '/' if self.starts_with("/*") => self.block_comment(start),

            '"' => self.scan_string(start),
            '\'' => self.scan_char(start),
            '`' => self.scan_backquoted(start),

            c if chars::is_digit(c) => self.scan_number(start),
            '-' | '.' if self.negative_or_fraction_follows() => self.scan_number(start),

            '(' => self.punct(PunctuationId::LParen, 1),
            ')' => self.punct(PunctuationId::RParen, 1),
            '[' => self.punct(PunctuationId::LBracket, 1),
            ']' => self.punct(PunctuationId::RBracket, 1),
            '{' => self.punct(PunctuationId::LBrace, 1),
            '}' => self.punct(PunctuationId::RBrace, 1),
            ',' => self.punct(PunctuationId::Comma, 1),
            ';' => self.punct(PunctuationId::Semicolon, 1),
            '.' => self.punct(PunctuationId::Dot, 1),

            c if chars::is_ident_start(c) => self.scan_identifier(start),
            c if chars::is_operator_symbol(c) => self.scan_operator(start),

            other => {
                self.bump();
                self.error_token(LexError::IllegalCharacter(other), start);
            }
        }
    }

    fn push_trivia(&mut self, kind: TriviaKind, start: usize) {
        self.trivia.push(Trivia {
            kind,
            span: Span::new(start, self.pos),
        });
    }

    fn punct(&mut self, id: PunctuationId, len: usize) {
        let start = self.pos;
        self.pos += len;
        self.emit(TokenKind::Punctuation(id), Span::new(start, self.pos));
    }

    fn block_comment(&mut self, start: usize) {
        self.pos += 2;
        match self.rest().find("*/") {
            Some(offset) => {
                self.pos += offset + 2;
                if self.text(start).contains('\n') {
                    self.line_start = true;
                }
                self.push_trivia(TriviaKind::BlockComment, start);
            }
            None => {
                self.pos = self.source.len();
                self.error_token(LexError::UnterminatedComment, start);
            }
        }
    }

    /// `-1` / `.5` are literals only where an operand may start.
    fn negative_or_fraction_follows(&self) -> bool {
        let digit_next = self.peek_nth(1).is_some_and(chars::is_digit);
        digit_next && !self.last_kind().is_some_and(TokenKind::ends_operand)
    }

    fn scan_identifier(&mut self, start: usize) {
        self.eat_while(chars::is_ident_continue);
        // `unary_-`: an identifier ending in `_` absorbs an operator suffix.
        if self.text(start).ends_with('_') && self.peek().is_some_and(chars::is_operator_symbol) {
            self.eat_operator_run();
        }
        let text = self.text(start);
        let kind = if text == "_" {
            TokenKind::Punctuation(PunctuationId::Underscore)
        } else if let Some(id) = keyword_id(text) {
            TokenKind::Keyword(id)
        } else {
            TokenKind::Ident(text.to_string())
        };
        self.emit(kind, Span::new(start, self.pos));
    }

    fn scan_backquoted(&mut self, start: usize) {
        self.bump();
        let body_len = self.rest().find(['`', '\n']);
        match body_len {
            Some(len) if len > 0 && self.rest()[len..].starts_with('`') => {
                self.pos += len + 1;
                let text = self.text(start).to_string();
                self.emit(TokenKind::Ident(text), Span::new(start, self.pos));
            }
            _ => self.error_token(LexError::IllegalCharacter('`'), start),
        }
    }

    /// Consume a maximal operator-symbol run, stopping before `//` and `/*`.
    fn eat_operator_run(&mut self) {
        while let Some(c) = self.peek() {
            if !chars::is_operator_symbol(c) || self.starts_with("//") || self.starts_with("/*") {
                break;
            }
            self.bump();
        }
    }

    fn scan_operator(&mut self, start: usize) {
        self.eat_operator_run();
        if self.pos == start {
            // Only reachable for a lone `/` starting a comment-like sequence, which is handled earlier.
            self.bump();
        }
        let text = self.text(start);
        if text == "#" && self.peek() == Some('{') {
            self.bump();
            self.emit(TokenKind::Punctuation(PunctuationId::HashBrace), Span::new(start, self.pos));
            return;
        }
        let kind = match punctuation::reserved_symbol(text) {
            Some(id) => TokenKind::Punctuation(id),
            None => TokenKind::OperatorIdent(text.to_string()),
        };
        self.emit(kind, Span::new(start, self.pos));
    }

    fn scan_char(&mut self, start: usize) {
        self.bump();
        let ok = match self.peek() {
            Some('\'') => true,
            Some('\\') => {
                self.bump();
                self.char_escape()
            }
            Some('\n') | None => false,
            Some(_) => {
                self.bump();
                true
            }
        };
        if ok && self.peek() == Some('\'') {
            self.bump();
            let text = self.text(start).to_string();
            self.emit(TokenKind::Char(text), Span::new(start, self.pos));
            return;
        }
        // Resynchronise at the closing quote on the same line, if there is one.
        if let Some(len) = self.rest().find(['\'', '\n']) {
            if self.rest()[len..].starts_with('\'') {
                self.pos += len + 1;
            }
        }
        self.error_token(LexError::MalformedLiteral { kind: "character" }, start);
    }

    /// Consume the part of a character escape after `\`.
    fn char_escape(&mut self) -> bool {
        match self.peek() {
            Some('x') => {
                self.bump();
                let digits = self.rest().chars().take(2).take_while(|c| chars::is_hex_digit(*c)).count();
                self.pos += digits;
                digits == 2
            }
            Some('u') => {
                self.bump();
                if self.peek() == Some('{') {
                    self.bump();
                    let before = self.pos;
                    self.eat_while(chars::is_hex_digit);
                    let any = self.pos > before;
                    any && self.bump() == Some('}')
                } else {
                    let digits = self.rest().chars().take(4).take_while(|c| chars::is_hex_digit(*c)).count();
                    self.pos += digits;
                    digits == 4
                }
            }
            Some('\n') | None => false,
            Some(_) => {
                self.bump();
                true
            }
        }
    }

    fn finish(mut self) -> Lexed {
        let end = self.source.len();
        while let Some(frame) = self.frames.pop() {
            match frame {
                Frame::Indent(_) => self.push_synthetic(TokenKind::Outdent, self.last_real_end),
                // Reported once, by the string the splice sits in.
                Frame::Splice { .. } => {}
                Frame::String { open, .. } => {
                    self.error(LexError::UnterminatedString, Span::new(open, end));
                    self.push_synthetic(TokenKind::Error(String::new()), end);
                }
                Frame::Brace { open } | Frame::Paren { open } | Frame::Bracket { open } => {
                    let ch = self.source[open..].chars().next().unwrap_or('{');
                    let ch = if ch == '#' { '{' } else { ch };
                    self.error(LexError::UnterminatedBlock(ch), Span::new(open, open + 1));
                    self.push_synthetic(TokenKind::Error(String::new()), end);
                }
            }
        }
        let trivia = std::mem::take(&mut self.trivia);
        self.tokens.push(Token::new(TokenKind::Eof, Span::empty(end)).with_trivia(trivia));
        Lexed {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Lex source code into tokens with the default configuration.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Lexed {
    Lexer::new(source, &LexerConfig::default()).tokenize()
}

/// Lex source code into tokens.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex_with_config(source: &str, config: &LexerConfig) -> Lexed {
    Lexer::new(source, config).tokenize()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SyntaxError;
    use flix_core::lang::keywords::KeywordId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).tokens.into_iter().map(|t| t.kind).collect()
    }

    fn ident(s: &str) -> TokenKind {
        TokenKind::Ident(s.to_string())
    }

    fn op(s: &str) -> TokenKind {
        TokenKind::OperatorIdent(s.to_string())
    }

    fn p(id: PunctuationId) -> TokenKind {
        TokenKind::Punctuation(id)
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("def forM namespace x_1 $tmp"),
            vec![
                TokenKind::Keyword(KeywordId::Def),
                TokenKind::Keyword(KeywordId::ForM),
                TokenKind::Keyword(KeywordId::Mod),
                ident("x_1"),
                ident("$tmp"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_underscore_and_operator_suffix() {
        assert_eq!(kinds("_ unary_- _x"), vec![p(PunctuationId::Underscore), ident("unary_-"), ident("_x"), TokenKind::Eof]);
    }

    #[test]
    fn test_backquoted_identifier() {
        assert_eq!(kinds("`a b`"), vec![ident("`a b`"), TokenKind::Eof]);
        let lexed = lex("`oops\n");
        assert_eq!(lexed.diagnostics.len(), 1);
    }

    #[test]
    fn test_operators_and_reserved_symbols() {
        assert_eq!(
            kinds("a :: b := c :- d ==> e"),
            vec![
                ident("a"),
                op("::"),
                ident("b"),
                p(PunctuationId::ColonEq),
                ident("c"),
                p(PunctuationId::ColonMinus),
                ident("d"),
                op("==>"),
                ident("e"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operator_run_stops_before_comment() {
        let lexed = lex("a +// note\n");
        assert_eq!(lexed.tokens[1].kind, op("+"));
        assert_eq!(lexed.tokens[2].kind, TokenKind::Eof);
        assert_eq!(lexed.tokens[2].leading_trivia[0].kind, TriviaKind::LineComment);
    }

    #[test]
    fn test_hash_brace_and_unicode_operator() {
        assert_eq!(
            kinds("#{ } a ⊕ b ## c"),
            vec![
                p(PunctuationId::HashBrace),
                p(PunctuationId::RBrace),
                ident("a"),
                op("⊕"),
                ident("b"),
                p(PunctuationId::HashHash),
                ident("c"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_negative_literal_depends_on_previous_token() {
        assert_eq!(
            kinds("f(-1)"),
            vec![ident("f"), p(PunctuationId::LParen), TokenKind::Int("-1".into()), p(PunctuationId::RParen), TokenKind::Eof]
        );
        assert_eq!(kinds("a -1"), vec![ident("a"), op("-"), TokenKind::Int("1".into()), TokenKind::Eof]);
    }

    #[test]
    fn test_character_literals() {
        for src in ["'x'", "'\\n'", "'\\u{1F600}'", "'\\x41'", "'\\u0041'", "''"] {
            let lexed = lex(src);
            assert!(lexed.diagnostics.is_empty(), "{src}: {:?}", lexed.diagnostics);
            assert_eq!(lexed.tokens[0].kind, TokenKind::Char(src.to_string()));
        }
        let lexed = lex("'ab'");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert!(matches!(lexed.tokens[0].kind, TokenKind::Error(_)));
        assert_eq!(lexed.tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_comments_are_trivia_on_next_token() {
        let lexed = lex("/* a */ x // b\ny");
        assert_eq!(lexed.tokens[0].kind, ident("x"));
        assert_eq!(lexed.tokens[0].leading_trivia[0].kind, TriviaKind::BlockComment);
        let y = lexed.tokens.iter().find(|t| t.kind == ident("y")).unwrap();
        assert!(y.has_newline_before());
    }

    #[test]
    fn test_unterminated_block_comment() {
        let lexed = lex("x /* never closed");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert_eq!(lexed.diagnostics[0].code(), "flix::lex::unterminated_comment");
        assert!(matches!(lexed.tokens[1].kind, TokenKind::Error(_)));
    }

    #[test]
    fn test_illegal_character() {
        let lexed = lex("a ¿ b");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert_eq!(lexed.diagnostics[0].error, SyntaxError::Lex(LexError::IllegalCharacter('¿')));
        assert_eq!(lexed.tokens.len(), 4);
    }

    #[test]
    fn test_tokens_and_trivia_reassemble_source() {
        let source = "def f(x: Int32): Int32 =\n    // twice\n    x * 2\n\ndef g(): String = \"a${f(1)}b\"\n";
        let lexed = lex(source);
        let mut rebuilt = String::new();
        for token in &lexed.tokens {
            for trivia in &token.leading_trivia {
                rebuilt.push_str(trivia.span.text(source));
            }
            rebuilt.push_str(token.span.text(source));
        }
        assert_eq!(rebuilt, source);
        assert!(lexed.diagnostics.is_empty());
    }
}
