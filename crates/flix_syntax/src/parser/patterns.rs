/// Pattern parsing methods.
///
/// Binding strength, loosest first: alternatives (`p | q`), typed patterns (`p: T`), infix patterns (`x :: xs`),
/// then primaries (identifiers, captures, enum patterns, tuples, records, literals, `_`, `()`).
impl<'t> Parser<'t> {
    // ========================================================================
    // Patterns
    // ========================================================================

    /// A full pattern, as in `case` clauses and enumerators.
    fn pattern(&mut self) -> PResult<Node> {
        self.nested(|p| p.alternative_pattern(PatternMode::Full))
    }

    /// The pattern of a `let`: a top-level `: T` belongs to the definition, not the pattern.
    fn let_pattern(&mut self) -> PResult<Node> {
        self.nested(|p| p.alternative_pattern(PatternMode::Let))
    }

    /// The name of an enum case: constructor arguments are types.
    fn enum_case_pattern(&mut self) -> PResult<Node> {
        self.nested(|p| p.alternative_pattern(PatternMode::EnumCase))
    }

    fn alternative_pattern(&mut self, mode: PatternMode) -> PResult<Node> {
        self.chain(|p| {
            let mut lhs = p.typed_pattern(mode)?;
            while p.check_punct(PunctuationId::Pipe) {
                p.link()?;
                let mut b = NodeBuilder::new(NodeKind::AlternativePattern);
                b.node(lhs);
                b.token(p.bump());
                b.node(p.typed_pattern(mode)?);
                lhs = b.finish();
            }
            Ok(lhs)
        })
    }

    fn typed_pattern(&mut self, mode: PatternMode) -> PResult<Node> {
        let pattern = self.infix_pattern(mode)?;
        if mode == PatternMode::Full && self.check_punct(PunctuationId::Colon) {
            let mut b = NodeBuilder::new(NodeKind::TypedPattern);
            b.field(FieldName::Pattern, pattern);
            b.token(self.bump());
            b.field(FieldName::Type, self.ty()?);
            return Ok(b.finish());
        }
        Ok(pattern)
    }

    fn infix_pattern(&mut self, mode: PatternMode) -> PResult<Node> {
        self.chain(|p| {
            let mut lhs = p.primary_pattern(mode)?;
            while p.at_pattern_operator() {
                p.link()?;
                let mut b = NodeBuilder::new(NodeKind::InfixPattern);
                b.field(FieldName::Left, lhs);
                b.field(FieldName::Operator, p.identifier_like("pattern operator")?);
                b.field(FieldName::Right, p.primary_pattern(mode)?);
                lhs = b.finish();
            }
            Ok(lhs)
        })
    }

    fn at_pattern_operator(&self) -> bool {
        let token = self.stream.peek();
        let operator = match &token.kind {
            TokenKind::Ident(_) => !token.has_newline_before(),
            TokenKind::OperatorIdent(_) => true,
            _ => false,
        };
        operator && starts_pattern(self.nth(1))
    }

    fn primary_pattern(&mut self, mode: PatternMode) -> PResult<Node> {
        match self.peek() {
            TokenKind::Ident(_) => self.identifier_pattern(mode),
            TokenKind::OperatorIdent(_) => Ok(self.leaf(NodeKind::OperatorIdentifier)),
            TokenKind::Punctuation(PunctuationId::Underscore) => Ok(self.leaf(NodeKind::Wildcard)),
            TokenKind::Punctuation(PunctuationId::LParen) => self.tuple_pattern(mode),
            TokenKind::Punctuation(PunctuationId::LBrace) => self.record_pattern(),
            TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Char(_)
            | TokenKind::String(_)
            | TokenKind::Keyword(KeywordId::True | KeywordId::False | KeywordId::Null) => Ok(self.literal_leaf()),
            _ => Err(self.unexpected(ExpectedSet::one("pattern"))),
        }
    }

    /// Patterns that start with an identifier: `x`, `x @ p`, `A.b`, `Some(p)`, `A.B(p)`, `regex"..."`.
    fn identifier_pattern(&mut self, mode: PatternMode) -> PResult<Node> {
        if self.at_interpolator() {
            return self.interpolated_string_expression();
        }
        if self.nth(1).is_punctuation(PunctuationId::At) {
            let mut b = NodeBuilder::new(NodeKind::CapturePattern);
            b.field(FieldName::Name, self.identifier()?);
            b.token(self.bump());
            b.field(FieldName::Pattern, self.nested(|p| p.primary_pattern(mode))?);
            return Ok(b.finish());
        }

        self.chain(|p| {
            let mut segments = vec![p.identifier()?];
            let mut dots = Vec::new();
            while p.check_punct(PunctuationId::Dot) && matches!(p.nth(1), TokenKind::Ident(_)) {
                p.link()?;
                dots.push(p.bump());
                segments.push(p.identifier()?);
            }

            if p.check_punct(PunctuationId::LParen) {
                let name = qualified_path(segments, dots, NodeKind::QualTypeIdentifier);
                return p.enum_pattern(name, mode);
            }
            Ok(qualified_path(segments, dots, NodeKind::QualIdentifier))
        })
    }

    /// `Name(args)`; arguments are types inside enum case definitions and patterns everywhere else.
    fn enum_pattern(&mut self, name: Node, mode: PatternMode) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::EnumPattern);
        b.field(FieldName::Type, name);
        self.expect_punct(&mut b, PunctuationId::LParen)?;
        let argument: fn(&mut Self) -> PResult<Node> = match mode {
            PatternMode::EnumCase => Self::ty,
            PatternMode::Full | PatternMode::Let => Self::pattern,
        };
        let mut first = true;
        while !self.check_punct(PunctuationId::RParen) && !self.stream.at_eof() {
            let node = self.restricted(false, argument)?;
            if first {
                b.field(FieldName::Pattern, node);
                first = false;
            } else {
                b.node(node);
            }
            if !self.eat_punct(&mut b, PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(&mut b, PunctuationId::RParen)?;
        Ok(b.finish())
    }

    /// `()` or `(p, q)`; a single parenthesised pattern is a one-element tuple pattern.
    fn tuple_pattern(&mut self, mode: PatternMode) -> PResult<Node> {
        if self.nth(1).is_punctuation(PunctuationId::RParen) {
            return Ok(self.unit());
        }
        let inner = match mode {
            PatternMode::EnumCase => PatternMode::EnumCase,
            PatternMode::Full | PatternMode::Let => PatternMode::Full,
        };
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::TuplePattern);
            p.expect_punct(&mut b, PunctuationId::LParen)?;
            loop {
                b.node(p.alternative_pattern(inner)?);
                if !p.eat_punct(&mut b, PunctuationId::Comma) || p.check_punct(PunctuationId::RParen) {
                    break;
                }
            }
            p.expect_punct(&mut b, PunctuationId::RParen)?;
            Ok(b.finish())
        })
    }

    /// `{ x = e, y = f }`
    fn record_pattern(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::RecordPattern);
            p.expect_punct(&mut b, PunctuationId::LBrace)?;
            loop {
                b.node(p.identifier()?);
                p.expect_punct(&mut b, PunctuationId::Eq)?;
                b.node(p.restricted(false, Self::expression)?);
                if !p.eat_punct(&mut b, PunctuationId::Comma) || p.check_punct(PunctuationId::RBrace) {
                    break;
                }
            }
            p.expect_punct(&mut b, PunctuationId::RBrace)?;
            Ok(b.finish())
        })
    }
}

/// Where a pattern appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternMode {
    Full,
    /// No top-level typed pattern.
    Let,
    /// Constructor arguments are types.
    EnumCase,
}

fn starts_pattern(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::OperatorIdent(_)
            | TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Char(_)
            | TokenKind::String(_)
            | TokenKind::Keyword(KeywordId::True | KeywordId::False | KeywordId::Null)
            | TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBrace | PunctuationId::Underscore)
    )
}

/// Fold `a . b . c` into `qual_identifier` nodes, surfacing the last segment as `last_kind` when qualified.
///
/// ## Notes
/// - A single segment stays an `identifier`, except under `qual_type_identifier` where it becomes a
///   `type_identifier`.
fn qualified_path(segments: Vec<Node>, dots: Vec<Token>, last_kind: NodeKind) -> Node {
    let mut segments = segments.into_iter();
    let mut dots = dots.into_iter();
    let Some(mut path) = segments.next() else {
        return NodeBuilder::new(NodeKind::Error).finish();
    };
    let mut rest: Vec<Node> = segments.collect();
    let last = rest.pop();
    if last.is_none() && last_kind == NodeKind::QualTypeIdentifier {
        return path.alias(NodeKind::TypeIdentifier);
    }
    for segment in rest {
        let mut b = NodeBuilder::new(NodeKind::QualIdentifier);
        b.node(path);
        if let Some(dot) = dots.next() {
            b.token(dot);
        }
        b.node(segment);
        path = b.finish();
    }
    let Some(last) = last else {
        return path;
    };
    let mut b = NodeBuilder::new(last_kind);
    b.node(path);
    if let Some(dot) = dots.next() {
        b.token(dot);
    }
    if last_kind == NodeKind::QualTypeIdentifier {
        b.node(last.alias(NodeKind::TypeIdentifier));
    } else {
        b.node(last);
    }
    b.finish()
}
