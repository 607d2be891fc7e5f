/// Blocks, bodies, case clauses and relational blocks.
///
/// A "body" is what follows `=` in a definition or a control keyword: a braced `block`, or an unbraced run of items
/// (the grammar's hidden `_block`). Item runs are parsed by [`Parser::block_items`] in one of several modes that
/// decide where the run ends and how items are separated.
impl<'t> Parser<'t> {
    // ========================================================================
    // Bodies and item runs
    // ========================================================================

    /// `_body_expression`
    fn body(&mut self) -> PResult<Node> {
        self.nested(|p| {
            if p.check_punct(PunctuationId::LBrace) && !p.nth(1).is_keyword(KeywordId::Case) {
                p.block()
            } else {
                p.block_items(ItemsMode::Body)
            }
        })
    }

    /// A hidden run of items separated by `;` or automatic semicolons.
    fn block_items(&mut self, mode: ItemsMode) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::BlockItems);
            if mode == ItemsMode::Body {
                p.body_items(&mut b)?;
            } else {
                p.delimited_items(&mut b, mode)?;
            }
            Ok(b.finish())
        })
    }

    /// One item, extended past a separator only while [`Conflict::BodySequence`] says so.
    fn body_items(&mut self, b: &mut NodeBuilder) -> PResult<()> {
        let item = self.block_item(ItemsMode::Body)?;
        let mut previous = item.kind();
        b.node(item);
        while self.at_separator() && self.decide_after(Conflict::BodySequence, Some(previous)) {
            b.token(self.bump());
            let item = self.block_item(ItemsMode::Body)?;
            previous = item.kind();
            b.node(item);
        }
        Ok(())
    }

    /// Items up to the enclosing closer, with per-item recovery.
    ///
    /// ## Notes
    /// - Brace blocks carry no automatic semicolons, so a line break before a token that can start an item also
    ///   separates items. So does the end of an indented block, and the start of a definition.
    fn delimited_items(&mut self, b: &mut NodeBuilder, mode: ItemsMode) -> PResult<()> {
        let mut separated = true;
        loop {
            if self.at_separator() {
                self.skip_separators(b);
                separated = true;
            }
            if self.at_items_end(mode) {
                return Ok(());
            }

            let next = self.stream.peek();
            let enum_case = mode == ItemsMode::Enum && next.kind.is_keyword(KeywordId::Case);
            let adjacent = next.has_newline_before() && (starts_item(&next.kind) || enum_case);
            if !(separated || adjacent || self.at_definition_start()) {
                self.report_unexpected(ExpectedSet::one("`;`").with(mode.closer()));
                if let Some(junk) = self.error_node() {
                    b.node(junk);
                }
                continue;
            }

            match self.recovering(|p| p.block_item(mode))? {
                Some(item) => {
                    separated = item.tokens().last().is_some_and(|t| t.kind == TokenKind::Outdent);
                    b.node(item);
                }
                None => return Ok(()),
            }
        }
    }

    fn at_items_end(&self, mode: ItemsMode) -> bool {
        match self.peek() {
            TokenKind::Eof | TokenKind::Outdent => true,
            TokenKind::Punctuation(PunctuationId::RBrace | PunctuationId::RParen | PunctuationId::RBracket) => true,
            TokenKind::Keyword(KeywordId::Case) => mode == ItemsMode::Case,
            _ => false,
        }
    }

    /// An expression or a definition (or, in an enum body, a run of enum cases).
    fn block_item(&mut self, mode: ItemsMode) -> PResult<Node> {
        if self.check_keyword(KeywordId::ForM) {
            return if self.decide(Conflict::ForMLetVsComprehension) {
                self.definition()
            } else {
                self.expression()
            };
        }
        if self.at_definition_start() {
            return self.definition();
        }
        if mode == ItemsMode::Enum && self.check_keyword(KeywordId::Case) {
            return self.enum_case_definitions();
        }
        self.expression()
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// `{ items }`
    fn block(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::Block);
            p.expect_punct(&mut b, PunctuationId::LBrace)?;
            b.node(p.restricted(false, |p| p.block_items(ItemsMode::Delimited))?);
            p.expect_punct(&mut b, PunctuationId::RBrace)?;
            Ok(b.finish())
        })
    }

    /// INDENT items OUTDENT
    fn indented_block(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::IndentedBlock);
            p.expect_layout(&mut b, TokenKind::Indent)?;
            b.node(p.restricted(false, |p| p.block_items(ItemsMode::Delimited))?);
            p.expect_layout(&mut b, TokenKind::Outdent)?;
            Ok(b.finish())
        })
    }

    // ========================================================================
    // Case blocks
    // ========================================================================

    /// `{ case p => e ... }`; `{}` is an empty case block.
    fn case_block(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::CaseBlock);
            p.expect_punct(&mut b, PunctuationId::LBrace)?;
            p.restricted(false, |p| {
                loop {
                    p.skip_separators(&mut b);
                    if p.check_punct(PunctuationId::RBrace) || p.stream.at_eof() {
                        break;
                    }
                    if !p.check_keyword(KeywordId::Case) {
                        p.report_unexpected(ExpectedSet::one("`case`").with("`}`"));
                        match p.error_node() {
                            Some(junk) => b.node(junk),
                            None => break,
                        }
                        continue;
                    }
                    match p.recovering(Self::case_clause)? {
                        Some(clause) => b.node(clause),
                        None => break,
                    }
                }
                Ok(())
            })?;
            p.expect_punct(&mut b, PunctuationId::RBrace)?;
            Ok(b.finish())
        })
    }

    /// `case pattern [if guard] => [body]`
    fn case_clause(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::CaseClause);
        self.expect_keyword(&mut b, KeywordId::Case)?;

        let mut head = NodeBuilder::new(NodeKind::CasePattern);
        head.field(FieldName::Pattern, self.pattern()?);
        if self.check_keyword(KeywordId::If) {
            head.node(self.guard()?);
        }
        self.expect_punct(&mut head, PunctuationId::FatArrow)?;
        b.node(head.finish());

        if !self.at_items_end(ItemsMode::Case) {
            b.field(FieldName::Body, self.block_items(ItemsMode::Case)?);
        }
        Ok(b.finish())
    }

    /// `if condition`, where the condition stops short of ascriptions, assignments and control forms.
    fn guard(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::Guard);
        self.expect_keyword(&mut b, KeywordId::If)?;
        let min = self.table.level(PrecedenceId::Postfix);
        b.field(FieldName::Condition, self.expr_bp(min)?);
        Ok(b.finish())
    }

    // ========================================================================
    // Relational blocks
    // ========================================================================

    /// `#{ Edge(1, 2). Path(x, y) :- Edge(x, y). }`
    fn rel_block(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::RelBlock);
            p.expect_punct(&mut b, PunctuationId::HashBrace)?;
            loop {
                p.skip_separators(&mut b);
                if p.check_punct(PunctuationId::RBrace) || p.stream.at_eof() {
                    break;
                }
                match p.recovering(Self::rel_clause)? {
                    Some(clause) => b.node(clause),
                    None => break,
                }
            }
            p.expect_punct(&mut b, PunctuationId::RBrace)?;
            Ok(b.finish())
        })
    }

    fn rel_clause(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::RelClause);
        b.field(FieldName::Head, self.rel_fact()?);
        if self.check_punct(PunctuationId::ColonMinus) {
            b.field(FieldName::Body, self.rel_body()?);
        }
        if !self.check_punct(PunctuationId::Dot) {
            return Err(self.unexpected(ExpectedSet::one("`.`").with("`:-`")));
        }
        b.node(self.leaf(NodeKind::Dot));
        Ok(b.finish())
    }

    /// `[not | fix] Name(atom, ...)`
    fn rel_fact(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::RelFact);
        if !self.eat_keyword(&mut b, KeywordId::Not) {
            self.eat_keyword(&mut b, KeywordId::Fix);
        }
        b.field(FieldName::Functor, self.identifier()?);
        self.expect_punct(&mut b, PunctuationId::LParen)?;
        while !self.check_punct(PunctuationId::RParen) && !self.stream.at_eof() {
            b.node(self.atom()?);
            if !(self.eat_punct(&mut b, PunctuationId::Comma) || self.eat_punct(&mut b, PunctuationId::Semicolon)) {
                break;
            }
        }
        self.expect_punct(&mut b, PunctuationId::RParen)?;
        Ok(b.finish())
    }

    /// `:- fact, fact`
    fn rel_body(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::RelBody);
        self.expect_punct(&mut b, PunctuationId::ColonMinus)?;
        loop {
            b.node(self.rel_fact()?);
            if !self.eat_punct(&mut b, PunctuationId::Comma) || self.check_punct(PunctuationId::Dot) {
                break;
            }
        }
        Ok(b.finish())
    }

    fn atom(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::Atom);
        match self.peek() {
            TokenKind::Ident(_) => b.node(self.leaf(NodeKind::Identifier)),
            TokenKind::StringStart { .. } => b.node(self.interpolated_string()?),
            TokenKind::Punctuation(PunctuationId::Underscore) => b.node(self.leaf(NodeKind::Wildcard)),
            TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Char(_)
            | TokenKind::String(_)
            | TokenKind::Keyword(KeywordId::True | KeywordId::False | KeywordId::Null) => b.node(self.literal_leaf()),
            _ => return Err(self.unexpected(ExpectedSet::one("identifier").with("literal"))),
        }
        Ok(b.finish())
    }
}

/// How a run of items is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemsMode {
    /// Inside `{ }` or an indented block.
    Delimited,
    /// Inside an enum body: also accepts `case` definitions.
    Enum,
    /// A case clause body: also ends at the next `case`.
    Case,
    /// An unbraced body: one item, longer only after a `let`.
    Body,
}

impl ItemsMode {
    fn closer(self) -> &'static str {
        match self {
            ItemsMode::Case => "`case`",
            _ => "`}`",
        }
    }
}
