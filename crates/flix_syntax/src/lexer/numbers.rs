//! Numeric literal scanning.
//!
//! Shapes (each optionally preceded by `-`):
//! - integers: `d(_?d)*` or `0x h(_?h)*`, optional `l`/`L`;
//! - floats: `d.d`, `.d`, `d` + exponent, `d` + `[dfDF]`, each with optional exponent and suffix.
//!
//! A literal directly followed by identifier characters (`12abc`, `1e`, `0x`) is reported as malformed and lexed as a
//! single error token.

use super::{Lexer, TokenKind};
use crate::diagnostics::LexError;
use crate::span::Span;
use flix_core::chars;

impl<'a> Lexer<'a> {
    pub(super) fn scan_number(&mut self, start: usize) {
        if self.peek() == Some('-') {
            self.bump();
        }

        let mut is_float = false;
        let mut well_formed = true;

        if self.peek() == Some('.') {
            self.bump();
            self.eat_digits(chars::is_digit);
            is_float = true;
            self.eat_exponent();
            self.eat_float_suffix();
        } else if self.starts_with("0x") || self.starts_with("0X") {
            self.pos += 2;
            well_formed = self.eat_digits(chars::is_hex_digit);
            self.eat_long_suffix();
        } else {
            self.eat_digits(chars::is_digit);
            if self.peek() == Some('.') && self.peek_nth(1).is_some_and(chars::is_digit) {
                self.bump();
                self.eat_digits(chars::is_digit);
                is_float = true;
            }
            is_float |= self.eat_exponent();
            is_float |= self.eat_float_suffix();
            if !is_float {
                self.eat_long_suffix();
            }
        }

        if self.peek().is_some_and(chars::is_ident_continue) {
            self.eat_while(chars::is_ident_continue);
            well_formed = false;
        }

        let kind = if is_float { "float" } else { "integer" };
        if !well_formed {
            self.error_token(LexError::MalformedLiteral { kind }, start);
            return;
        }
        let text = self.text(start).to_string();
        let token = if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Int(text)
        };
        self.emit(token, Span::new(start, self.pos));
    }

    /// Consume `d(_?d)*`; returns whether at least one digit was consumed.
    fn eat_digits(&mut self, digit: fn(char) -> bool) -> bool {
        if !self.peek().is_some_and(digit) {
            return false;
        }
        self.bump();
        loop {
            match (self.peek(), self.peek_nth(1)) {
                (Some(c), _) if digit(c) => {
                    self.bump();
                }
                (Some('_'), Some(c)) if digit(c) => {
                    self.pos += 1 + c.len_utf8();
                }
                _ => return true,
            }
        }
    }

    fn eat_exponent(&mut self) -> bool {
        if !matches!(self.peek(), Some('e' | 'E')) {
            return false;
        }
        let sign = usize::from(matches!(self.peek_nth(1), Some('+' | '-')));
        if !self.peek_nth(1 + sign).is_some_and(chars::is_digit) {
            return false;
        }
        self.pos += 1 + sign;
        self.eat_while(chars::is_digit);
        true
    }

    fn eat_float_suffix(&mut self) -> bool {
        if matches!(self.peek(), Some('d' | 'f' | 'D' | 'F')) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_long_suffix(&mut self) {
        if matches!(self.peek(), Some('l' | 'L')) {
            self.bump();
        }
    }
}
