/// Expression parsing methods.
///
/// [`Parser::expr_bp`] is the precedence-climbing loop. It parses a starting form (a control form, a block, a lambda,
/// a prefix expression or a simple expression) and then extends it while the next token continues it at a level the
/// current minimum admits:
///
/// | continuation            | level            | applies to                     |
/// |-------------------------|------------------|--------------------------------|
/// | `= e`, `:= e`           | assignment (3)   | simple or prefix expressions   |
/// | `: Type`, `: @Ann`      | ascription (4)   | postfix chains                 |
/// | `: { ... }`             | colon call (5)   | postfix chains                 |
/// | `op`                    | postfix (5)      | infix, prefix or simple        |
/// | `op operand`            | infix (6)        | infix, prefix or simple        |
///
/// Field access, type application and call arguments bind tightest and are handled inside
/// [`Parser::simple_expression`].
impl<'t> Parser<'t> {
    // ========================================================================
    // Entry points
    // ========================================================================

    /// `expression`: wraps whatever the grammar's `expression` choice matched.
    fn expression(&mut self) -> PResult<Node> {
        let inner = self.expr_bp(0)?;
        let mut b = NodeBuilder::new(NodeKind::Expression);
        b.node(inner);
        Ok(b.finish())
    }

    /// Parse an expression whose continuations must bind at least as tightly as `min`.
    fn expr_bp(&mut self, min: u8) -> PResult<Node> {
        self.nested(|p| {
            let (mut lhs, mut category) = p.expression_start(min)?;
            loop {
                match p.continue_expression(lhs, category, min)? {
                    Continued::Yes(node, next) => {
                        p.link()?;
                        lhs = node;
                        category = next;
                    }
                    Continued::No(node) => return Ok(node),
                }
            }
        })
    }

    fn expression_start(&mut self, min: u8) -> PResult<(Node, Category)> {
        let control = self.table.admits(PrecedenceId::Control, min);
        if let TokenKind::Keyword(id) = *self.peek() {
            let node = match id {
                KeywordId::If if control => Some(self.if_expression()?),
                KeywordId::Match if control => Some(self.match_expression()?),
                KeywordId::Do if control => Some(self.do_expression()?),
                KeywordId::Region if control => Some(self.region_expression()?),
                KeywordId::Query if control => Some(self.query_expression()?),
                KeywordId::Try if control => Some(self.try_expression()?),
                KeywordId::While if control => Some(self.while_expression()?),
                KeywordId::Foreach | KeywordId::ForA | KeywordId::ForM | KeywordId::Par if control => {
                    Some(self.for_expression()?)
                }
                KeywordId::Return => Some(self.return_expression()?),
                KeywordId::Throw => Some(self.throw_expression()?),
                _ => None,
            };
            if let Some(node) = node {
                return Ok((node, Category::Closed));
            }
        }

        match self.peek() {
            TokenKind::Punctuation(PunctuationId::LBrace) => {
                let node = if self.decide(Conflict::CaseBlockVsBlock) {
                    self.case_block()?
                } else {
                    self.block()?
                };
                return Ok((node, Category::Closed));
            }
            TokenKind::Punctuation(PunctuationId::HashBrace) => return Ok((self.rel_block()?, Category::Closed)),
            TokenKind::Indent => return Ok((self.indented_block()?, Category::Closed)),
            _ => {}
        }

        let lambda_start = matches!(
            self.peek(),
            TokenKind::Ident(_)
                | TokenKind::OperatorIdent(_)
                | TokenKind::Punctuation(PunctuationId::Underscore | PunctuationId::LParen)
        );
        if lambda_start
            && self.table.admits(PrecedenceId::Lambda, min)
            && self.decide(Conflict::BindingVsSimpleExpression)
        {
            return Ok((self.lambda_expression()?, Category::Closed));
        }

        if self.at_prefix_operator(0) {
            return Ok((self.prefix_expression()?, Category::Prefix));
        }
        Ok((self.simple_expression()?, Category::Simple))
    }

    /// Try to extend `lhs` by one assignment, ascription, colon call, postfix or infix step.
    fn continue_expression(&mut self, lhs: Node, category: Category, min: u8) -> PResult<Continued> {
        if category == Category::Closed {
            return Ok(Continued::No(lhs));
        }
        match self.peek() {
            TokenKind::Punctuation(PunctuationId::Eq | PunctuationId::ColonEq)
                if matches!(category, Category::Simple | Category::Prefix)
                    && self.table.admits(PrecedenceId::Assignment, min) =>
            {
                let mut b = NodeBuilder::new(NodeKind::AssignmentExpression);
                b.field(FieldName::Left, lhs);
                b.token(self.bump());
                b.field(FieldName::Right, self.expression()?);
                Ok(Continued::Yes(b.finish(), Category::Closed))
            }
            TokenKind::Punctuation(PunctuationId::Colon)
                if self.table.admits(PrecedenceId::TypeAscription, min)
                    || self.table.admits(PrecedenceId::ColonCall, min) =>
            {
                if self.decide(Conflict::ColonCallVsAscription) {
                    if !self.table.admits(PrecedenceId::ColonCall, min) {
                        return Ok(Continued::No(lhs));
                    }
                    let mut b = NodeBuilder::new(NodeKind::CallExpression);
                    b.field(FieldName::Function, lhs);
                    b.token(self.bump());
                    b.field(FieldName::Arguments, self.colon_argument()?);
                    Ok(Continued::Yes(b.finish(), Category::Simple))
                } else {
                    if !self.table.admits(PrecedenceId::TypeAscription, min) {
                        return Ok(Continued::No(lhs));
                    }
                    let mut b = NodeBuilder::new(NodeKind::AscriptionExpression);
                    b.node(lhs);
                    b.token(self.bump());
                    if self.check_punct(PunctuationId::At) {
                        b.node(self.annotation()?);
                    } else {
                        b.node(self.param_type()?);
                    }
                    Ok(Continued::Yes(b.finish(), Category::Closed))
                }
            }
            _ if self.at_expression_operator() && category != Category::Postfix => {
                if self.operand_follows(1) {
                    if !self.table.admits(PrecedenceId::Infix, min) {
                        return Ok(Continued::No(lhs));
                    }
                    let right_min = self.table.right_operand_min(PrecedenceId::Infix);
                    self.infix_expression(lhs, right_min).map(|node| Continued::Yes(node, Category::Infix))
                } else {
                    if !self.table.admits(PrecedenceId::Postfix, min) {
                        return Ok(Continued::No(lhs));
                    }
                    let mut b = NodeBuilder::new(NodeKind::PostfixExpression);
                    b.node(lhs);
                    b.node(self.identifier_like("operator")?);
                    Ok(Continued::Yes(b.finish(), Category::Postfix))
                }
            }
            _ => Ok(Continued::No(lhs)),
        }
    }

    /// `left op right`; the right operand is `: colon_argument` or an expression binding at least `right_min`.
    ///
    /// With infix operators left-associative, `right_min` only admits prefix and simple expressions, so the loop in
    /// [`Parser::expr_bp`] is what grows the chain.
    fn infix_expression(&mut self, lhs: Node, right_min: u8) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::InfixExpression);
        b.field(FieldName::Left, lhs);
        b.field(FieldName::Operator, self.identifier_like("operator")?);
        if self.check_punct(PunctuationId::Colon) {
            b.token(self.bump());
            b.field(FieldName::Right, self.colon_argument()?);
        } else {
            b.field(FieldName::Right, self.expr_bp(right_min)?);
        }
        Ok(b.finish())
    }

    /// An operator name continuing an expression. Alphabetic operators must stay on the line of their left operand.
    fn at_expression_operator(&self) -> bool {
        let token = self.stream.peek();
        match &token.kind {
            TokenKind::Ident(_) => !token.has_newline_before() && !self.at_interpolator(),
            TokenKind::OperatorIdent(_) => true,
            _ => false,
        }
    }

    /// Whether the token `offset` ahead starts an infix right operand.
    fn operand_follows(&self, offset: usize) -> bool {
        let kind = self.nth(offset);
        if kind.is_punctuation(PunctuationId::Colon) {
            return colon_argument_at(&self.stream, offset);
        }
        starts_simple_expression(kind) || self.at_prefix_operator(offset)
    }

    /// `+ - ! ~` directly followed by a simple expression.
    fn at_prefix_operator(&self, offset: usize) -> bool {
        let prefix = matches!(self.nth(offset), TokenKind::OperatorIdent(op) if is_prefix_operator(op));
        prefix && starts_simple_expression(self.nth(offset + 1))
    }

    fn prefix_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::PrefixExpression);
        b.token(self.bump());
        b.node(self.simple_expression()?);
        Ok(b.finish())
    }

    // ========================================================================
    // Simple expressions
    // ========================================================================

    /// `_simple_expression`: a primary followed by field accesses, type applications and call arguments.
    ///
    /// ## Notes
    /// - `(`, `[` and `{` only continue the expression on the same line.
    /// - A `{` argument is not taken while parsing a `match` subject.
    fn simple_expression(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut node = p.primary_expression()?;
            loop {
                let token = p.stream.peek();
                let same_line = !token.has_newline_before();
                node = match &token.kind {
                    TokenKind::Punctuation(PunctuationId::Dot) if is_identifier_like(p.nth(1)) => {
                        let mut b = NodeBuilder::new(NodeKind::FieldExpression);
                        b.field(FieldName::Value, node);
                        b.token(p.bump());
                        b.field(FieldName::Field, p.identifier_like("field name")?);
                        b.finish()
                    }
                    TokenKind::Punctuation(PunctuationId::LBracket) if same_line => {
                        let mut function = NodeBuilder::new(NodeKind::Expression);
                        function.node(node);
                        let mut b = NodeBuilder::new(NodeKind::GenericFunction);
                        b.field(FieldName::Function, function.finish());
                        b.field(FieldName::TypeArguments, p.type_arguments()?);
                        b.finish()
                    }
                    TokenKind::Punctuation(PunctuationId::LParen) if same_line => {
                        let mut b = NodeBuilder::new(NodeKind::CallExpression);
                        b.field(FieldName::Function, node);
                        b.field(FieldName::Arguments, p.arguments()?);
                        b.finish()
                    }
                    TokenKind::Punctuation(PunctuationId::LBrace) if same_line && !p.no_brace_call => {
                        let arguments = if p.decide(Conflict::CaseBlockVsBlock) {
                            p.case_block()?
                        } else {
                            p.block()?
                        };
                        let mut b = NodeBuilder::new(NodeKind::CallExpression);
                        b.field(FieldName::Function, node);
                        b.field(FieldName::Arguments, arguments);
                        b.finish()
                    }
                    _ => return Ok(node),
                };
                p.link()?;
            }
        })
    }

    fn primary_expression(&mut self) -> PResult<Node> {
        match self.peek() {
            TokenKind::Ident(_) if self.at_interpolator() => self.interpolated_string_expression(),
            TokenKind::Ident(_) => Ok(self.leaf(NodeKind::Identifier)),
            TokenKind::OperatorIdent(_) => Ok(self.leaf(NodeKind::OperatorIdentifier)),
            TokenKind::Punctuation(PunctuationId::Underscore) => Ok(self.leaf(NodeKind::Wildcard)),
            TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Char(_)
            | TokenKind::String(_)
            | TokenKind::Keyword(KeywordId::True | KeywordId::False | KeywordId::Null) => Ok(self.literal_leaf()),
            TokenKind::StringStart { .. } => self.interpolated_string(),
            TokenKind::Punctuation(PunctuationId::LParen) => self.parenthesized_or_tuple(),
            TokenKind::Keyword(KeywordId::New) => self.instance_expression(),
            TokenKind::Keyword(KeywordId::Lazy) => {
                let mut b = NodeBuilder::new(NodeKind::LazyExpression);
                b.token(self.bump());
                b.field(FieldName::Value, self.simple_expression()?);
                Ok(b.finish())
            }
            _ => Err(self.unexpected(ExpectedSet::one("expression"))),
        }
    }

    /// `()`, `(e)` or `(e, f, ...)`.
    fn parenthesized_or_tuple(&mut self) -> PResult<Node> {
        if self.nth(1).is_punctuation(PunctuationId::RParen) {
            return Ok(self.unit());
        }
        self.restricted(false, |p| {
            let mut b = NodeBuilder::new(NodeKind::ParenthesizedExpression);
            p.expect_punct(&mut b, PunctuationId::LParen)?;
            b.node(p.expression()?);
            while p.eat_punct(&mut b, PunctuationId::Comma) {
                b.set_kind(NodeKind::TupleExpression);
                if p.check_punct(PunctuationId::RParen) {
                    break;
                }
                b.node(p.expression()?);
            }
            p.expect_punct(&mut b, PunctuationId::RParen)?;
            Ok(b.finish())
        })
    }

    /// `(expression)`, as required by `if` and `while`.
    fn parenthesized_expression(&mut self) -> PResult<Node> {
        self.restricted(false, |p| {
            let mut b = NodeBuilder::new(NodeKind::ParenthesizedExpression);
            p.expect_punct(&mut b, PunctuationId::LParen)?;
            b.node(p.expression()?);
            p.expect_punct(&mut b, PunctuationId::RParen)?;
            Ok(b.finish())
        })
    }

    /// `new Type(args) { ... }`, `new Type(args)` or `new { ... }`.
    fn instance_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::InstanceExpression);
        self.expect_keyword(&mut b, KeywordId::New)?;
        if self.at_template_body() {
            b.node(self.template_body()?);
            return Ok(b.finish());
        }
        b.node(self.constructor_application()?);
        if self.decide(Conflict::InstanceTemplateBody) {
            b.node(self.template_body()?);
        }
        Ok(b.finish())
    }

    // ========================================================================
    // Lambdas
    // ========================================================================

    /// `x -> body`, `(x: Int32, y) -> body` or `_ -> body`.
    fn lambda_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::LambdaExpression);
        b.field(FieldName::Parameters, self.lambda_parameters()?);
        self.expect_punct(&mut b, PunctuationId::Arrow)?;
        b.node(self.block_items(ItemsMode::Body)?);
        Ok(b.finish())
    }

    fn lambda_parameters(&mut self) -> PResult<Node> {
        if self.check_punct(PunctuationId::LParen) {
            self.bindings()
        } else {
            self.binder_name()
        }
    }

    /// `(x, y: Int32,)`
    fn bindings(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::Bindings);
        self.expect_punct(&mut b, PunctuationId::LParen)?;
        self.restricted(false, |p| p.comma_separated(&mut b, PunctuationId::RParen, Self::binding))?;
        self.expect_punct(&mut b, PunctuationId::RParen)?;
        Ok(b.finish())
    }

    fn binding(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::Binding);
        b.field(FieldName::Name, self.binder_name()?);
        if self.eat_punct(&mut b, PunctuationId::Colon) {
            b.field(FieldName::Type, self.param_type()?);
        }
        Ok(b.finish())
    }

    /// `[lambda_start =>] { ... }` after a trailing `:`.
    fn colon_argument(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::ColonArgument);
        if !self.check_punct(PunctuationId::LBrace) {
            b.field(FieldName::LambdaStart, self.lambda_parameters()?);
            self.expect_punct(&mut b, PunctuationId::FatArrow)?;
        }
        b.node(self.block()?);
        Ok(b.finish())
    }

    // ========================================================================
    // Control forms
    // ========================================================================

    fn if_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::IfExpression);
        self.expect_keyword(&mut b, KeywordId::If)?;
        b.field(FieldName::Condition, self.parenthesized_expression()?);
        b.field(FieldName::Consequence, self.body()?);
        if self.eat_keyword(&mut b, KeywordId::Else) {
            b.field(FieldName::Alternative, self.body()?);
        }
        Ok(b.finish())
    }

    fn match_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::MatchExpression);
        self.expect_keyword(&mut b, KeywordId::Match)?;
        b.field(FieldName::Value, self.restricted(true, Self::expression)?);
        b.field(FieldName::Body, self.body()?);
        Ok(b.finish())
    }

    fn do_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::DoExpression);
        self.expect_keyword(&mut b, KeywordId::Do)?;
        b.field(FieldName::Body, self.body()?);
        Ok(b.finish())
    }

    fn region_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::RegionExpression);
        self.expect_keyword(&mut b, KeywordId::Region)?;
        b.field(FieldName::Value, self.identifier()?);
        b.field(FieldName::Body, self.body()?);
        Ok(b.finish())
    }

    /// `query e, f select e from e`
    fn query_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::QueryExpression);
        self.expect_keyword(&mut b, KeywordId::Query)?;
        if !self.check_keyword(KeywordId::Select) {
            b.node(self.expression()?);
            while self.eat_punct(&mut b, PunctuationId::Comma) {
                b.node(self.expression()?);
            }
        }
        self.expect_keyword(&mut b, KeywordId::Select)?;
        b.node(self.expression()?);
        self.expect_keyword(&mut b, KeywordId::From)?;
        b.node(self.expression()?);
        Ok(b.finish())
    }

    fn try_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::TryExpression);
        self.expect_keyword(&mut b, KeywordId::Try)?;
        b.field(FieldName::Body, self.body()?);
        if self.check_keyword(KeywordId::Catch) {
            let mut clause = NodeBuilder::new(NodeKind::CatchClause);
            clause.token(self.bump());
            clause.node(self.body()?);
            b.node(clause.finish());
        }
        if self.check_keyword(KeywordId::Finally) {
            let mut clause = NodeBuilder::new(NodeKind::FinallyClause);
            clause.token(self.bump());
            clause.node(self.body()?);
            b.node(clause.finish());
        }
        Ok(b.finish())
    }

    /// `while (c) e` or `while c do body`.
    fn while_expression(&mut self) -> PResult<Node> {
        let parenthesized = self.decide(Conflict::WhileVsSimpleExpression);
        let mut b = NodeBuilder::new(NodeKind::WhileExpression);
        self.expect_keyword(&mut b, KeywordId::While)?;
        if parenthesized {
            b.field(FieldName::Condition, self.parenthesized_expression()?);
            b.field(FieldName::Body, self.expression()?);
        } else {
            b.field(FieldName::Condition, self.body()?);
            self.expect_keyword(&mut b, KeywordId::Do)?;
            b.field(FieldName::Body, self.body()?);
        }
        Ok(b.finish())
    }

    /// `foreach (x <- xs) body`, or `foreach|forA|forM|par (enumerators) yield body`.
    fn for_expression(&mut self) -> PResult<Node> {
        let keyword = self.peek().keyword_id();
        let mut b = NodeBuilder::new(NodeKind::ForeachExpression);
        b.token(self.bump());
        b.field(FieldName::Enumerators, self.enumerators()?);
        if self.eat_keyword(&mut b, KeywordId::Yield) {
            b.set_kind(NodeKind::ForeachYieldExpression);
        } else if keyword != Some(KeywordId::Foreach) {
            return Err(self.unexpected(ExpectedSet::one("`yield`")));
        }
        b.field(FieldName::Body, self.body()?);

        let mut wrapper = NodeBuilder::new(NodeKind::ForExpression);
        wrapper.node(b.finish());
        Ok(wrapper.finish())
    }

    /// `(e; e; ...)` or INDENT e ;; e OUTDENT.
    fn enumerators(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::Enumerators);
            let close = if p.eat_punct(&mut b, PunctuationId::LParen) {
                TokenKind::Punctuation(PunctuationId::RParen)
            } else {
                p.expect_layout(&mut b, TokenKind::Indent)?;
                TokenKind::Outdent
            };
            p.restricted(false, |p| {
                loop {
                    b.node(p.enumerator()?);
                    if !p.at_separator() {
                        break;
                    }
                    p.skip_separators(&mut b);
                    if *p.peek() == close {
                        break;
                    }
                }
                Ok(())
            })?;
            if *p.peek() == close {
                b.token(p.bump());
                Ok(b.finish())
            } else if close == TokenKind::Outdent {
                Err(p.unexpected(ExpectedSet::one("end of indented block").with("`;`")))
            } else {
                Err(p.unexpected(ExpectedSet::one("`)`").with("`;`")))
            }
        })
    }

    /// `[case] pattern <- e [if c]`, `pattern = e`, or a run of guards.
    fn enumerator(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::Enumerator);
        if self.check_keyword(KeywordId::If) {
            while self.check_keyword(KeywordId::If) {
                b.node(self.guard()?);
            }
            return Ok(b.finish());
        }
        self.eat_keyword(&mut b, KeywordId::Case);
        b.node(self.pattern()?);
        if !(self.eat_punct(&mut b, PunctuationId::LeftArrow) || self.eat_punct(&mut b, PunctuationId::Eq)) {
            return Err(self.unexpected(ExpectedSet::one("`<-`").with("`=`")));
        }
        b.node(self.expression()?);
        if self.check_keyword(KeywordId::If) {
            b.node(self.guard()?);
        }
        Ok(b.finish())
    }

    fn return_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::ReturnExpression);
        self.expect_keyword(&mut b, KeywordId::Return)?;
        if starts_expression(self.peek()) {
            b.node(self.expression()?);
        }
        Ok(b.finish())
    }

    fn throw_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::ThrowExpression);
        self.expect_keyword(&mut b, KeywordId::Throw)?;
        b.node(self.expression()?);
        Ok(b.finish())
    }
}

/// Outcome of one continuation step.
enum Continued {
    Yes(Node, Category),
    No(Node),
}

fn is_prefix_operator(op: &str) -> bool {
    matches!(op, "+" | "-" | "!" | "~")
}

/// Tokens a `_simple_expression` can start with.
fn starts_simple_expression(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Char(_)
            | TokenKind::String(_)
            | TokenKind::StringStart { .. }
            | TokenKind::Keyword(KeywordId::True | KeywordId::False | KeywordId::Null | KeywordId::New | KeywordId::Lazy)
            | TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::Underscore)
    )
}

/// Tokens an `expression` can start with.
fn starts_expression(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Keyword(id) => starts_item(kind) && !is_definition_keyword(*id),
        _ => starts_item(kind),
    }
}

/// `: {`, `: x =>` or `: (x, y) =>` with the colon `offset` tokens ahead.
fn colon_argument_at(stream: &TokenStream, offset: usize) -> bool {
    let next = stream.nth(offset + 1);
    match &next.kind {
        TokenKind::Punctuation(PunctuationId::LBrace) => true,
        TokenKind::Ident(_) | TokenKind::OperatorIdent(_) | TokenKind::Punctuation(PunctuationId::Underscore) => {
            is_punct(stream.nth(offset + 2), PunctuationId::FatArrow)
        }
        TokenKind::Punctuation(PunctuationId::LParen) => {
            after_group(stream, offset + 1).is_some_and(|after| is_punct(after, PunctuationId::FatArrow))
        }
        _ => false,
    }
}
