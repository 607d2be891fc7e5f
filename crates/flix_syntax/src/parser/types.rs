/// Type parsing methods.
///
/// Types are parsed in layers, loosest first:
/// - effect types (`T \ ef`, left-associative)
/// - function types (`A -> B`, right-associative through the return type)
/// - infix types (`a + b`, left-associative over annotated types)
/// - annotated simple types (`T @Ann`)
/// - simple types: identifiers, qualified paths, singleton types, tuples, generic applications, `_`
///
/// Native (`##java.lang.Object`), literal, record, relational record and structural types only appear as a
/// whole type, never as an operand of an infix type.
impl<'t> Parser<'t> {
    // ========================================================================
    // Types
    // ========================================================================

    /// `_type`
    fn ty(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut lhs = p.ty_arrow()?;
            while p.check_punct(PunctuationId::Backslash) {
                p.link()?;
                let mut b = NodeBuilder::new(NodeKind::EffectType);
                b.field(FieldName::Left, lhs);
                b.token(p.bump());
                b.field(FieldName::Right, p.ty_arrow()?);
                lhs = b.finish();
            }
            Ok(lhs)
        })
    }

    /// `_param_type`: a type, or `=> T` for a lazy parameter.
    fn param_type(&mut self) -> PResult<Node> {
        if self.check_punct(PunctuationId::FatArrow) {
            let mut b = NodeBuilder::new(NodeKind::LazyParameterType);
            b.token(self.bump());
            b.field(FieldName::Type, self.ty()?);
            return Ok(b.finish());
        }
        self.ty()
    }

    /// Everything but effect types.
    fn ty_arrow(&mut self) -> PResult<Node> {
        if self.check_punct(PunctuationId::LParen) && !self.decide(Conflict::TupleTypeVsParameterTypes) {
            let parameters = self.parenthesized_parameter_types()?;
            return self.function_type(parameters);
        }
        let leading = match self.peek() {
            TokenKind::Punctuation(PunctuationId::HashHash) => Some(self.native_type()?),
            TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Char(_) | TokenKind::String(_) => {
                Some(self.literal_type())
            }
            TokenKind::Keyword(KeywordId::True | KeywordId::False) => Some(self.literal_type()),
            TokenKind::Punctuation(PunctuationId::LBrace) => {
                let record = matches!(self.nth(1), TokenKind::Ident(_)) && self.nth(2).is_punctuation(PunctuationId::Eq);
                if record {
                    Some(self.record_type()?)
                } else {
                    Some(self.template_body()?.alias(NodeKind::StructuralType))
                }
            }
            TokenKind::Punctuation(PunctuationId::Colon) if *self.nth(1) == TokenKind::Indent => {
                Some(self.template_body()?.alias(NodeKind::StructuralType))
            }
            TokenKind::Punctuation(PunctuationId::HashBrace) => Some(self.rel_record_type()?),
            _ => None,
        };
        if let Some(node) = leading {
            return Ok(node);
        }

        let lhs = self.annotated_type_chain()?;
        if self.check_punct(PunctuationId::Arrow) {
            let mut parameters = NodeBuilder::new(NodeKind::ParameterTypes);
            parameters.node(lhs);
            return self.function_type(parameters.finish());
        }
        Ok(lhs)
    }

    /// `parameter_types -> return_type`
    fn function_type(&mut self, parameters: Node) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::FunctionType);
        b.field(FieldName::ParameterTypes, parameters);
        self.expect_punct(&mut b, PunctuationId::Arrow)?;
        b.field(FieldName::ReturnType, self.ty()?);
        Ok(b.finish())
    }

    /// `(A, => B)` in front of an arrow.
    fn parenthesized_parameter_types(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::ParameterTypes);
        self.expect_punct(&mut b, PunctuationId::LParen)?;
        self.comma_separated(&mut b, PunctuationId::RParen, Self::param_type)?;
        self.expect_punct(&mut b, PunctuationId::RParen)?;
        Ok(b.finish())
    }

    /// Left-associative chain of annotated types joined by identifier or operator names.
    fn annotated_type_chain(&mut self) -> PResult<Node> {
        self.chain(|p| {
            let mut lhs = p.annotated_type()?;
            while p.at_type_operator() {
                p.link()?;
                let mut b = NodeBuilder::new(NodeKind::InfixType);
                b.field(FieldName::Left, lhs);
                b.field(FieldName::Operator, p.identifier_like("type operator")?);
                b.field(FieldName::Right, p.annotated_type()?);
                lhs = b.finish();
            }
            Ok(lhs)
        })
    }

    /// An operator name between two types. Alphabetic operators must stay on the line of their left operand.
    fn at_type_operator(&self) -> bool {
        let token = self.stream.peek();
        let operator = match &token.kind {
            TokenKind::Ident(_) => !token.has_newline_before(),
            TokenKind::OperatorIdent(_) => true,
            _ => false,
        };
        operator && starts_simple_type(self.nth(1))
    }

    /// `_annotated_type`: a simple type followed by annotations on the same line.
    fn annotated_type(&mut self) -> PResult<Node> {
        let simple = self.simple_type()?;
        if !(self.check_punct(PunctuationId::At) && !self.stream.peek().has_newline_before()) {
            return Ok(simple);
        }
        let mut b = NodeBuilder::new(NodeKind::AnnotatedType);
        b.node(simple);
        while self.check_punct(PunctuationId::At) && !self.stream.peek().has_newline_before() {
            b.node(self.annotation()?);
        }
        Ok(b.finish())
    }

    /// `_simple_type`
    fn simple_type(&mut self) -> PResult<Node> {
        self.chain(|p| {
            let mut ty = match p.peek() {
                TokenKind::Punctuation(PunctuationId::Underscore) => p.leaf(NodeKind::Wildcard),
                TokenKind::Punctuation(PunctuationId::LParen) => p.tuple_type()?,
                TokenKind::Ident(_) | TokenKind::OperatorIdent(_) => p.type_path()?,
                _ => return Err(p.unexpected(ExpectedSet::one("type"))),
            };
            while p.check_punct(PunctuationId::LBracket) {
                p.link()?;
                let mut b = NodeBuilder::new(NodeKind::GenericType);
                b.field(FieldName::Type, ty);
                b.field(FieldName::TypeArguments, p.type_arguments()?);
                ty = b.finish();
            }
            Ok(ty)
        })
    }

    /// `Int32`, `List.Nil`, `a.b.C` or `x.type`.
    fn type_path(&mut self) -> PResult<Node> {
        let qualified = self.decide(Conflict::TypeIdentifierVsIdentifier);
        let first = self.identifier_like("type")?;
        let dotted = self.check_punct(PunctuationId::Dot)
            && (matches!(self.nth(1), TokenKind::Ident(_)) || self.nth(1).is_keyword(KeywordId::Type));
        if !dotted {
            return Ok(first.alias(NodeKind::TypeIdentifier));
        }

        let mut prefix = first;
        loop {
            self.link()?;
            let dot = self.bump();
            if self.check_keyword(KeywordId::Type) && !qualified {
                let mut b = NodeBuilder::new(NodeKind::SingletonType);
                b.node(prefix);
                b.token(dot);
                b.token(self.bump());
                return Ok(b.finish());
            }
            let segment = self.identifier()?;
            let more = self.check_punct(PunctuationId::Dot)
                && (matches!(self.nth(1), TokenKind::Ident(_)) || self.nth(1).is_keyword(KeywordId::Type));
            if !more {
                let mut b = NodeBuilder::new(NodeKind::QualTypeIdentifier);
                b.node(prefix);
                b.token(dot);
                b.node(segment.alias(NodeKind::TypeIdentifier));
                return Ok(b.finish());
            }
            let mut b = NodeBuilder::new(NodeKind::QualIdentifier);
            b.node(prefix);
            b.token(dot);
            b.node(segment);
            prefix = b.finish();
        }
    }

    /// `(A, B)`
    fn tuple_type(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::TupleType);
            p.expect_punct(&mut b, PunctuationId::LParen)?;
            p.comma_separated_1(&mut b, PunctuationId::RParen, Self::ty)?;
            p.expect_punct(&mut b, PunctuationId::RParen)?;
            Ok(b.finish())
        })
    }

    /// `[A, B]`
    fn type_arguments(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::TypeArguments);
        self.expect_punct(&mut b, PunctuationId::LBracket)?;
        self.comma_separated_1(&mut b, PunctuationId::RBracket, Self::ty)?;
        self.expect_punct(&mut b, PunctuationId::RBracket)?;
        Ok(b.finish())
    }

    /// `##java.lang.Object`
    fn native_type(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::NativeType);
        self.expect_punct(&mut b, PunctuationId::HashHash)?;
        b.node(self.identifier()?);
        while self.check_punct(PunctuationId::Dot) && matches!(self.nth(1), TokenKind::Ident(_)) {
            b.token(self.bump());
            b.node(self.identifier()?);
        }
        Ok(b.finish())
    }

    fn literal_type(&mut self) -> Node {
        let mut b = NodeBuilder::new(NodeKind::LiteralType);
        b.node(self.literal_leaf());
        b.finish()
    }

    /// `{ x = Int32, y = Int32 | r }`
    fn record_type(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::RecordType);
            p.expect_punct(&mut b, PunctuationId::LBrace)?;
            loop {
                b.node(p.identifier()?);
                p.expect_punct(&mut b, PunctuationId::Eq)?;
                b.node(p.ty()?);
                if !p.eat_punct(&mut b, PunctuationId::Comma) || !matches!(p.peek(), TokenKind::Ident(_)) {
                    break;
                }
            }
            p.row_tail(&mut b)?;
            p.expect_punct(&mut b, PunctuationId::RBrace)?;
            Ok(b.finish())
        })
    }

    /// `#{ Edge(Int32, Int32), Path | r }`
    fn rel_record_type(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::RelRecordType);
            p.expect_punct(&mut b, PunctuationId::HashBrace)?;
            while !p.check_punct(PunctuationId::RBrace) && !p.check_punct(PunctuationId::Pipe) && !p.stream.at_eof() {
                b.node(p.ty()?);
                if !p.eat_punct(&mut b, PunctuationId::Comma) {
                    break;
                }
            }
            p.row_tail(&mut b)?;
            p.expect_punct(&mut b, PunctuationId::RBrace)?;
            Ok(b.finish())
        })
    }

    /// Optional `| r` row variable.
    fn row_tail(&mut self, b: &mut NodeBuilder) -> PResult<()> {
        if self.eat_punct(b, PunctuationId::Pipe) {
            b.node(self.identifier()?);
        }
        Ok(())
    }
}

/// Tokens a `_simple_type` can start with.
fn starts_simple_type(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::OperatorIdent(_)
            | TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::Underscore)
    )
}
