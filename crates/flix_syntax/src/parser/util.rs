/// Leaves, separated lists, argument lists and interpolated strings.
impl<'t> Parser<'t> {
    // ========================================================================
    // Leaves
    // ========================================================================

    /// `_identifier`: an `identifier` or an `operator_identifier`.
    fn identifier_like(&mut self, what: &str) -> PResult<Node> {
        match self.peek() {
            TokenKind::Ident(_) => Ok(self.leaf(NodeKind::Identifier)),
            TokenKind::OperatorIdent(_) => Ok(self.leaf(NodeKind::OperatorIdentifier)),
            _ => Err(self.unexpected(ExpectedSet::one(what))),
        }
    }

    fn identifier(&mut self) -> PResult<Node> {
        match self.peek() {
            TokenKind::Ident(_) => Ok(self.leaf(NodeKind::Identifier)),
            _ => Err(self.unexpected(ExpectedSet::one("identifier"))),
        }
    }

    /// A name being bound: `_identifier` or `_`.
    fn binder_name(&mut self) -> PResult<Node> {
        if self.check_punct(PunctuationId::Underscore) {
            return Ok(self.leaf(NodeKind::Wildcard));
        }
        self.identifier_like("name")
    }

    /// The literal at the cursor. Callers check the token first.
    fn literal_leaf(&mut self) -> Node {
        let kind = match self.peek() {
            TokenKind::Int(_) => NodeKind::IntegerLiteral,
            TokenKind::Float(_) => NodeKind::FloatingPointLiteral,
            TokenKind::Char(_) => NodeKind::CharacterLiteral,
            TokenKind::String(_) => NodeKind::String,
            TokenKind::Keyword(KeywordId::True | KeywordId::False) => NodeKind::BooleanLiteral,
            TokenKind::Keyword(KeywordId::Null) => NodeKind::NullLiteral,
            _ => NodeKind::Error,
        };
        self.leaf(kind)
    }

    /// `()`
    fn unit(&mut self) -> Node {
        let mut b = NodeBuilder::new(NodeKind::Unit);
        b.token(self.bump());
        b.token(self.bump());
        b.finish()
    }

    // ========================================================================
    // Lists
    // ========================================================================

    /// Zero or more `item`s separated by commas (trailing comma allowed), stopping before `closer`.
    fn comma_separated(
        &mut self,
        b: &mut NodeBuilder,
        closer: PunctuationId,
        mut item: impl FnMut(&mut Self) -> PResult<Node>,
    ) -> PResult<()> {
        while !self.check_punct(closer) && !self.stream.at_eof() {
            b.node(item(self)?);
            if !self.eat_punct(b, PunctuationId::Comma) {
                break;
            }
        }
        Ok(())
    }

    /// Like [`Parser::comma_separated`], but at least one item.
    fn comma_separated_1(
        &mut self,
        b: &mut NodeBuilder,
        closer: PunctuationId,
        mut item: impl FnMut(&mut Self) -> PResult<Node>,
    ) -> PResult<()> {
        b.node(item(self)?);
        while self.eat_punct(b, PunctuationId::Comma) && !self.check_punct(closer) {
            b.node(item(self)?);
        }
        Ok(())
    }

    /// `(e, f,)`
    fn arguments(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::Arguments);
            p.expect_punct(&mut b, PunctuationId::LParen)?;
            p.restricted(false, |p| p.comma_separated(&mut b, PunctuationId::RParen, Self::expression))?;
            p.expect_punct(&mut b, PunctuationId::RParen)?;
            Ok(b.finish())
        })
    }

    // ========================================================================
    // Interpolated strings
    // ========================================================================

    /// An identifier glued to a following string: `regex"a+"`, `s"${x}"`.
    fn at_interpolator(&self) -> bool {
        let next = self.stream.nth(1);
        matches!(self.peek(), TokenKind::Ident(_))
            && matches!(next.kind, TokenKind::String(_) | TokenKind::StringStart { .. })
            && !next.has_trivia_before()
    }

    fn interpolated_string_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::InterpolatedStringExpression);
        b.field(FieldName::Interpolator, self.identifier()?);
        b.node(self.interpolated_string()?);
        Ok(b.finish())
    }

    /// A string with `$name` / `${ expr }` splices. A plain string here is an interpolated string without splices.
    fn interpolated_string(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::InterpolatedString);
        match self.peek() {
            TokenKind::String(_) => {
                b.token(self.bump());
                return Ok(b.finish());
            }
            TokenKind::StringStart { .. } => b.token(self.bump()),
            _ => return Err(self.unexpected(ExpectedSet::one("string"))),
        }
        loop {
            match self.peek() {
                TokenKind::StringMiddle(_) => b.token(self.bump()),
                TokenKind::Punctuation(PunctuationId::Dollar) => b.node(self.interpolation()?),
                TokenKind::StringEnd { .. } => {
                    b.token(self.bump());
                    return Ok(b.finish());
                }
                _ => return Err(self.unexpected(ExpectedSet::one("end of string"))),
            }
        }
    }

    /// `$name` or `${ expr }`
    fn interpolation(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::Interpolation);
            p.expect_punct(&mut b, PunctuationId::Dollar)?;
            if p.check_punct(PunctuationId::LBrace) {
                b.node(p.block()?);
            } else {
                b.node(p.identifier()?);
            }
            Ok(b.finish())
        })
    }
}

fn is_identifier_like(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Ident(_) | TokenKind::OperatorIdent(_))
}
