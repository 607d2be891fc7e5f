/// Token-stream helpers, conflict dispatch and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `bump`) and building leaf nodes
/// - Matching / expecting keywords and punctuation
/// - The nesting guard (`nested`)
/// - Conflict dispatch (`decide`)
/// - Error recovery (`recovering`, `error_node`)
///
/// Most functions in this file are internal (`fn`) and are documented primarily
/// to aid maintenance and onboarding.
impl<'t> Parser<'t> {
    // ========================================================================
    // Helpers
    // ========================================================================

    fn peek(&self) -> &TokenKind {
        &self.stream.peek().kind
    }

    fn nth(&self, n: usize) -> &TokenKind {
        &self.stream.nth(n).kind
    }

    fn bump(&mut self) -> Token {
        self.stream.bump()
    }

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().is_keyword(id)
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().is_punctuation(id)
    }

    fn at_separator(&self) -> bool {
        is_separator(self.peek())
    }

    /// Consume the keyword into `b` if present.
    fn eat_keyword(&mut self, b: &mut NodeBuilder, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            b.token(self.bump());
            true
        } else {
            false
        }
    }

    /// Consume the punctuation into `b` if present.
    fn eat_punct(&mut self, b: &mut NodeBuilder, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            b.token(self.bump());
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, b: &mut NodeBuilder, id: KeywordId) -> PResult<()> {
        if self.eat_keyword(b, id) {
            Ok(())
        } else {
            Err(self.unexpected(ExpectedSet::one(format!("`{}`", keywords::as_str(id)))))
        }
    }

    fn expect_punct(&mut self, b: &mut NodeBuilder, id: PunctuationId) -> PResult<()> {
        if self.eat_punct(b, id) {
            Ok(())
        } else {
            Err(self.unexpected(ExpectedSet::one(format!("`{}`", TokenKind::Punctuation(id).text()))))
        }
    }

    fn expect_layout(&mut self, b: &mut NodeBuilder, kind: TokenKind) -> PResult<()> {
        if *self.peek() == kind {
            b.token(self.bump());
            Ok(())
        } else {
            let what = match kind {
                TokenKind::Indent => "indented block",
                _ => "end of indented block",
            };
            Err(self.unexpected(ExpectedSet::one(what)))
        }
    }

    /// Wrap the current token in a leaf node of `kind`.
    fn leaf(&mut self, kind: NodeKind) -> Node {
        let mut b = NodeBuilder::new(kind);
        b.token(self.bump());
        b.finish()
    }

    // ========================================================================
    // Failures
    // ========================================================================

    fn unexpected(&self, expected: ExpectedSet) -> Failure {
        let token = self.stream.peek();
        Failure {
            error: ParseError::unexpected(expected, token.kind.describe()),
            span: token.span,
            reported: matches!(token.kind, TokenKind::Error(_)),
        }
    }

    fn missing(&self, kind: NodeKind, field: FieldName) -> Failure {
        let token = self.stream.peek();
        Failure {
            error: ParseError::MissingRequiredField { kind, field },
            span: Span::empty(self.stream.prev_end()),
            reported: matches!(token.kind, TokenKind::Error(_)),
        }
    }

    fn push_failure(&mut self, failure: Failure) {
        if !failure.reported {
            self.diagnostics.push(Diagnostic::new(failure.error, failure.span));
        }
    }

    fn report_unexpected(&mut self, expected: ExpectedSet) {
        let failure = self.unexpected(expected);
        self.push_failure(failure);
    }

    // ========================================================================
    // Nesting guard
    // ========================================================================

    /// Run `f` one nesting level deeper.
    ///
    /// ## Errors
    /// - `NestingTooDeep` (fatal) once the configured depth is exceeded.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = self.depth;
        self.link()?;
        let result = f(self);
        self.depth = saved;
        result
    }

    /// Run a loop that folds each step into a left-nested node, releasing the levels it [`link`](Self::link)ed.
    fn chain<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = self.depth;
        let result = f(self);
        self.depth = saved;
        result
    }

    /// Charge one tree level against the nesting guard until the enclosing `nested` or `chain` returns.
    ///
    /// Every step of `a.b.c`, `a + b + c` or `p | q | r` wraps the previous node once more, so long chains are as deep
    /// as long bracket nests even though the loop building them does not recurse.
    ///
    /// ## Errors
    /// - `NestingTooDeep` (fatal) once the configured depth is exceeded.
    fn link(&mut self) -> PResult<()> {
        if self.depth >= self.max_depth {
            return Err(Failure {
                error: ParseError::NestingTooDeep { limit: self.max_depth },
                span: self.stream.peek().span,
                reported: false,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `f` with the brace-call restriction set to `restricted`, restoring it afterwards.
    fn restricted<T>(&mut self, restricted: bool, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = std::mem::replace(&mut self.no_brace_call, restricted);
        let result = f(self);
        self.no_brace_call = saved;
        result
    }

    // ========================================================================
    // Conflicts
    // ========================================================================

    fn decide(&mut self, conflict: Conflict) -> bool {
        self.decide_after(conflict, None)
    }

    fn decide_after(&mut self, conflict: Conflict, previous: Option<NodeKind>) -> bool {
        match conflict.resolve(&self.stream, previous) {
            Some(choice) => {
                tracing::trace!(%conflict, choice, "conflict resolved");
                choice
            }
            None => {
                if !self.lexer_errors {
                    let span = self.stream.peek().span;
                    self.diagnostics.push(Diagnostic::new(ParseError::UnresolvedAmbiguity(conflict), span));
                }
                conflict.fallback()
            }
        }
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    /// Parse one item; on a recoverable failure, report it and wrap the item's tokens in an `ERROR` node.
    ///
    /// ## Returns
    /// - `Ok(None)` only when the failure happened at end of input with nothing left to wrap.
    ///
    /// ## Errors
    /// - Fatal failures (`NestingTooDeep`) propagate.
    fn recovering(&mut self, parse: impl FnOnce(&mut Self) -> PResult<Node>) -> PResult<Option<Node>> {
        let mark = self.stream.mark();
        match parse(self) {
            Ok(node) => Ok(Some(node)),
            Err(failure) if failure.error.is_fatal() => Err(failure),
            Err(failure) => {
                self.push_failure(failure);
                self.stream.reset(mark);
                Ok(self.error_node())
            }
        }
    }

    /// Consume tokens up to the next recovery point (at least one token) into an `ERROR` node.
    ///
    /// Recovery points, outside any bracket or indented block opened after the start: a separator, an OUTDENT or
    /// `}` closing the enclosing block, a `case`, the start of a definition, or end of input. A zero-width lexer
    /// error token counts as a closer.
    fn error_node(&mut self) -> Option<Node> {
        let mut b = NodeBuilder::new(NodeKind::Error);
        let mut depth = 0usize;
        loop {
            let kind = self.peek();
            if matches!(kind, TokenKind::Eof) {
                break;
            }
            if depth == 0 && !b.is_empty() {
                let closes = matches!(
                    kind,
                    TokenKind::Outdent
                        | TokenKind::Punctuation(PunctuationId::RBrace | PunctuationId::RParen | PunctuationId::RBracket)
                );
                let case = kind.is_keyword(KeywordId::Case);
                if closes || case || is_separator(kind) || self.at_definition_start() {
                    break;
                }
            }
            match self.peek() {
                TokenKind::Indent
                | TokenKind::Punctuation(
                    PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace | PunctuationId::HashBrace,
                ) => depth += 1,
                TokenKind::Outdent
                | TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    depth = depth.saturating_sub(1)
                }
                // Left where the lexer gave up on an unclosed group.
                TokenKind::Error(text) if text.is_empty() => depth = depth.saturating_sub(1),
                _ => {}
            }
            b.token(self.bump());
        }
        if b.is_empty() {
            return None;
        }
        let node = b.finish();
        tracing::debug!(span = ?node.span(), "recovered with error node");
        Some(node)
    }

    /// Consume separators (and stray closers of nothing) into `b`.
    fn skip_separators(&mut self, b: &mut NodeBuilder) {
        while self.at_separator() {
            b.token(self.bump());
        }
    }
}
