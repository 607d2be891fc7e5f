/// Definition parsing methods.
///
/// This chunk parses everything the grammar calls a `_definition`: modules, `use`/`import`, enums, classes,
/// instances, effects, relations, type definitions, `let` bindings and functions, together with their shared
/// pieces (annotations, modifiers, `with` clauses, type parameters, parameters, template bodies).
///
/// ## Notes
/// - Annotations and modifiers are parsed once, up front, and become the first children of whichever definition
///   follows. Modules, `use` and `import` take neither.
/// - Every production takes the partially built node and sets its final kind; no production allocates a wrapper
///   that is later discarded.
impl<'t> Parser<'t> {
    // ========================================================================
    // Definitions
    // ========================================================================

    fn at_definition_start(&self) -> bool {
        self.definition_start_at(0)
    }

    /// Whether a definition starts `offset` tokens ahead.
    ///
    /// ## Notes
    /// - `lazy` is both a modifier and an expression keyword; it only starts a definition when a definition keyword
    ///   follows the modifier run.
    /// - A bare `forM` starts a definition when it reads as `forM pattern = value`.
    fn definition_start_at(&self, offset: usize) -> bool {
        let mut index = offset;
        if self.nth(index).is_punctuation(PunctuationId::At) {
            return true;
        }
        while matches!(self.nth(index), TokenKind::Keyword(id) if keywords::is_modifier(*id)) {
            index += 1;
        }
        match self.nth(index) {
            TokenKind::Keyword(KeywordId::ForM) if index == 0 => {
                Conflict::ForMLetVsComprehension.resolve(&self.stream, None) != Some(false)
            }
            TokenKind::Keyword(KeywordId::ForM | KeywordId::Let) => true,
            TokenKind::Keyword(id) => is_definition_keyword(*id),
            _ => false,
        }
    }

    fn definition(&mut self) -> PResult<Node> {
        self.nested(Self::definition_inner)
    }

    fn definition_inner(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::FunctionDefinition);
        let mut prefixed = false;

        while self.check_punct(PunctuationId::At) {
            b.node(self.annotation()?);
            prefixed = true;
            // `@Test` on its own line: the line break between annotation and definition is not a separator.
            if self.at_separator() && self.definition_start_at(1) {
                b.token(self.bump());
            }
        }
        if matches!(self.peek(), TokenKind::Keyword(id) if keywords::is_modifier(*id)) {
            b.node(self.modifiers());
            prefixed = true;
        }

        let Some(keyword) = self.peek().keyword_id() else {
            return Err(self.unexpected(definition_keywords()));
        };
        match keyword {
            KeywordId::Mod | KeywordId::Use | KeywordId::Import if prefixed => {
                Err(self.unexpected(definition_keywords()))
            }
            KeywordId::Mod => self.mod_definition(b),
            KeywordId::Use => self.use_declaration(b),
            KeywordId::Import => self.import_declaration(b),
            KeywordId::Enum => self.enum_definition(b),
            KeywordId::Class => self.class_definition(b),
            KeywordId::Instance => self.instance_definition(b),
            KeywordId::Eff => self.eff_definition(b),
            KeywordId::Rel => self.rel_definition(b),
            KeywordId::Type => self.type_definition(b),
            KeywordId::Let | KeywordId::ForM => self.let_definition(b),
            KeywordId::Def => self.function_definition(b),
            _ => Err(self.unexpected(definition_keywords())),
        }
    }

    fn modifiers(&mut self) -> Node {
        let mut b = NodeBuilder::new(NodeKind::Modifiers);
        while matches!(self.peek(), TokenKind::Keyword(id) if keywords::is_modifier(*id)) {
            b.token(self.bump());
        }
        b.finish()
    }

    /// `@Name(args)...`
    fn annotation(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::Annotation);
        self.expect_punct(&mut b, PunctuationId::At)?;
        b.field(FieldName::Name, self.simple_type()?);
        while self.check_punct(PunctuationId::LParen) {
            b.field(FieldName::Arguments, self.arguments()?);
        }
        Ok(b.finish())
    }

    // ========================================================================
    // Modules
    // ========================================================================

    fn mod_definition(&mut self, mut b: NodeBuilder) -> PResult<Node> {
        b.set_kind(NodeKind::ModDefinition);
        self.expect_keyword(&mut b, KeywordId::Mod)?;

        let mut name = NodeBuilder::new(NodeKind::ModIdentifier);
        name.node(self.identifier_like("module name")?);
        while self.check_punct(PunctuationId::Dot) && is_identifier_like(self.nth(1)) {
            name.token(self.bump());
            name.node(self.identifier_like("module name")?);
        }
        b.field(FieldName::Name, name.finish());

        if self.decide(Conflict::ModDefinitionBody) {
            if self.at_separator() {
                b.token(self.bump());
            }
            b.field(FieldName::Body, self.template_body()?);
        }
        Ok(b.finish())
    }

    fn use_declaration(&mut self, mut b: NodeBuilder) -> PResult<Node> {
        b.set_kind(NodeKind::UseDeclaration);
        self.expect_keyword(&mut b, KeywordId::Use)?;
        b.node(self.namespace_expression()?);
        while self.eat_punct(&mut b, PunctuationId::Comma) {
            b.node(self.namespace_expression()?);
        }
        Ok(b.finish())
    }

    /// `A.B/C` optionally followed by `.*`, `._` or `.{x, y}`.
    fn namespace_expression(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::NamespaceExpression);
        b.field(FieldName::Path, self.identifier()?);
        loop {
            let dot = self.check_punct(PunctuationId::Dot);
            let slash = matches!(self.peek(), TokenKind::OperatorIdent(op) if op == "/");
            if !(dot || slash) {
                break;
            }
            match self.nth(1) {
                TokenKind::Ident(_) => {
                    b.token(self.bump());
                    b.field(FieldName::Path, self.identifier()?);
                }
                TokenKind::Punctuation(PunctuationId::LBrace) if dot => {
                    b.token(self.bump());
                    b.node(self.namespace_selectors()?);
                    break;
                }
                next if dot && is_namespace_wildcard(next) => {
                    b.token(self.bump());
                    b.node(self.leaf(NodeKind::NamespaceWildcard));
                    break;
                }
                _ => break,
            }
        }
        Ok(b.finish())
    }

    fn namespace_selectors(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::NamespaceSelectors);
        self.expect_punct(&mut b, PunctuationId::LBrace)?;
        loop {
            if is_namespace_wildcard(self.peek()) {
                b.node(self.leaf(NodeKind::NamespaceWildcard));
            } else {
                b.node(self.identifier()?);
            }
            if !self.eat_punct(&mut b, PunctuationId::Comma) || self.check_punct(PunctuationId::RBrace) {
                break;
            }
        }
        self.expect_punct(&mut b, PunctuationId::RBrace)?;
        Ok(b.finish())
    }

    /// `import [static] Type [(Types)] [: Type]`
    fn import_declaration(&mut self, mut b: NodeBuilder) -> PResult<Node> {
        b.set_kind(NodeKind::ImportDeclaration);
        self.expect_keyword(&mut b, KeywordId::Import)?;
        self.eat_keyword(&mut b, KeywordId::Static);
        b.node(self.ty()?);
        if self.check_punct(PunctuationId::LParen) {
            b.token(self.bump());
            self.comma_separated(&mut b, PunctuationId::RParen, Self::ty)?;
            self.expect_punct(&mut b, PunctuationId::RParen)?;
        }
        if self.eat_punct(&mut b, PunctuationId::Colon) {
            b.node(self.ty()?);
        }
        Ok(b.finish())
    }

    // ========================================================================
    // Enums, classes, instances, effects, relations
    // ========================================================================

    fn enum_definition(&mut self, mut b: NodeBuilder) -> PResult<Node> {
        b.set_kind(NodeKind::EnumDefinition);
        self.expect_keyword(&mut b, KeywordId::Enum)?;
        b.node(self.constructor_application()?);
        if self.check_keyword(KeywordId::With) {
            b.field(FieldName::With, self.with_clause()?);
        }
        if self.at_template_body() {
            b.field(FieldName::Body, self.enum_body()?);
        }
        Ok(b.finish())
    }

    fn enum_body(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::EnumBody);
        if self.eat_punct(&mut b, PunctuationId::LBrace) {
            b.node(self.block_items(ItemsMode::Enum)?);
            self.expect_punct(&mut b, PunctuationId::RBrace)?;
        } else {
            self.expect_punct(&mut b, PunctuationId::Colon)?;
            self.expect_layout(&mut b, TokenKind::Indent)?;
            b.node(self.block_items(ItemsMode::Enum)?);
            self.expect_layout(&mut b, TokenKind::Outdent)?;
        }
        Ok(b.finish())
    }

    /// `case A, B(Int32), case C`
    fn enum_case_definitions(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::EnumCaseDefinitions);
        b.node(self.simple_enum_case()?);
        while self.check_punct(PunctuationId::Comma) {
            b.token(self.bump());
            b.node(self.simple_enum_case()?);
        }
        Ok(b.finish())
    }

    fn simple_enum_case(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::SimpleEnumCase);
        self.eat_keyword(&mut b, KeywordId::Case);
        b.field(FieldName::Name, self.enum_case_pattern()?);
        Ok(b.finish())
    }

    fn class_definition(&mut self, mut b: NodeBuilder) -> PResult<Node> {
        b.set_kind(NodeKind::ClassDefinition);
        self.expect_keyword(&mut b, KeywordId::Class)?;
        b.node(self.class_constructor()?);
        if self.check_keyword(KeywordId::With) {
            b.field(FieldName::With, self.with_clause()?);
        }
        if self.at_template_body() {
            b.field(FieldName::Body, self.template_body()?);
        }
        Ok(b.finish())
    }

    fn instance_definition(&mut self, mut b: NodeBuilder) -> PResult<Node> {
        b.set_kind(NodeKind::InstanceDefinition);
        self.expect_keyword(&mut b, KeywordId::Instance)?;
        b.node(self.class_constructor()?);
        if self.check_keyword(KeywordId::With) {
            b.field(FieldName::With, self.with_clause()?);
        }
        if !self.at_template_body() {
            return Err(self.missing(NodeKind::InstanceDefinition, FieldName::Body));
        }
        b.field(FieldName::Body, self.template_body()?);
        Ok(b.finish())
    }

    /// `Name[params] [@annotation]`
    fn class_constructor(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::ClassConstructor);
        b.field(FieldName::Name, self.identifier_like("class name")?);
        if self.check_punct(PunctuationId::LBracket) {
            b.field(FieldName::TypeParameters, self.type_parameters()?);
        }
        if self.check_punct(PunctuationId::At) {
            b.node(self.annotation()?);
        }
        Ok(b.finish())
    }

    /// `eff Console [{ def print(s: String): Unit }]`
    fn eff_definition(&mut self, mut b: NodeBuilder) -> PResult<Node> {
        b.set_kind(NodeKind::EffDefinition);
        self.expect_keyword(&mut b, KeywordId::Eff)?;
        b.node(self.ty()?);
        if self.at_template_body() {
            b.field(FieldName::Body, self.template_body()?);
        }
        Ok(b.finish())
    }

    fn rel_definition(&mut self, mut b: NodeBuilder) -> PResult<Node> {
        b.set_kind(NodeKind::RelDefinition);
        self.expect_keyword(&mut b, KeywordId::Rel)?;
        b.node(self.predicate_type()?);
        Ok(b.finish())
    }

    /// `Edge(x: Int32, y: Int32)`; arguments may also be separated by `;`.
    fn predicate_type(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::PredicateType);
        b.field(FieldName::Functor, self.type_constructor()?);
        self.expect_punct(&mut b, PunctuationId::LParen)?;
        if !self.check_punct(PunctuationId::RParen) {
            loop {
                b.node(self.identifier()?);
                self.expect_punct(&mut b, PunctuationId::Colon)?;
                b.node(self.ty()?);
                if !(self.eat_punct(&mut b, PunctuationId::Comma) || self.eat_punct(&mut b, PunctuationId::Semicolon)) {
                    break;
                }
            }
        }
        self.expect_punct(&mut b, PunctuationId::RParen)?;
        Ok(b.finish())
    }

    // ========================================================================
    // Types, lets, functions
    // ========================================================================

    fn type_definition(&mut self, mut b: NodeBuilder) -> PResult<Node> {
        b.set_kind(NodeKind::TypeDefinition);
        self.expect_keyword(&mut b, KeywordId::Type)?;
        if self.check_keyword(KeywordId::Alias) {
            b.node(self.leaf(NodeKind::AliasModifier));
        }
        b.node(self.type_constructor()?);
        if self.eat_punct(&mut b, PunctuationId::Eq) {
            b.field(FieldName::Type, self.ty()?);
        }
        Ok(b.finish())
    }

    /// `Name[params]` with the name surfaced as a `type_identifier`.
    fn type_constructor(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::TypeConstructor);
        let name = self.identifier_like("type name")?;
        b.field(FieldName::Name, name.alias(NodeKind::TypeIdentifier));
        if self.check_punct(PunctuationId::LBracket) {
            b.field(FieldName::TypeParameters, self.type_parameters()?);
        }
        Ok(b.finish())
    }

    /// `let pattern [: Type] = value`, also spelled `forM`.
    fn let_definition(&mut self, mut b: NodeBuilder) -> PResult<Node> {
        b.set_kind(NodeKind::LetDefinition);
        if !(self.eat_keyword(&mut b, KeywordId::Let) || self.eat_keyword(&mut b, KeywordId::ForM)) {
            return Err(self.unexpected(ExpectedSet::one("`let`").with("`forM`")));
        }
        b.field(FieldName::Pattern, self.let_pattern()?);
        if self.eat_punct(&mut b, PunctuationId::Colon) {
            b.field(FieldName::Type, self.ty()?);
        }
        if !self.check_punct(PunctuationId::Eq) {
            return Err(self.unexpected(ExpectedSet::one("`=`").with("`:`")));
        }
        b.token(self.bump());
        b.field(FieldName::Value, self.body()?);
        Ok(b.finish())
    }

    /// A function definition (`def f(...): T = body`) or, without `=`, a declaration.
    fn function_definition(&mut self, mut b: NodeBuilder) -> PResult<Node> {
        self.expect_keyword(&mut b, KeywordId::Def)?;
        b.node(self.function_constructor()?);
        if self.eat_punct(&mut b, PunctuationId::Eq) {
            b.set_kind(NodeKind::FunctionDefinition);
            b.field(FieldName::Body, self.body()?);
        } else {
            b.set_kind(NodeKind::FunctionDeclaration);
        }
        Ok(b.finish())
    }

    fn function_constructor(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::FunctionConstructor);
        b.field(FieldName::Name, self.identifier_like("function name")?);
        if self.check_punct(PunctuationId::LBracket) {
            b.field(FieldName::TypeParameters, self.type_parameters()?);
        }
        while self.check_punct(PunctuationId::LParen) {
            b.field(FieldName::Parameters, self.parameters()?);
        }
        if self.eat_punct(&mut b, PunctuationId::Colon) {
            b.field(FieldName::ReturnType, self.ty()?);
        }
        if self.check_keyword(KeywordId::With) {
            b.field(FieldName::With, self.with_clause()?);
        }
        Ok(b.finish())
    }

    fn parameters(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::Parameters);
        self.expect_punct(&mut b, PunctuationId::LParen)?;
        self.restricted(false, |p| p.comma_separated(&mut b, PunctuationId::RParen, Self::parameter))?;
        self.expect_punct(&mut b, PunctuationId::RParen)?;
        Ok(b.finish())
    }

    /// `[@ann] name [: Type] [= default]`; `_` is accepted as a name.
    fn parameter(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::Parameter);
        while self.check_punct(PunctuationId::At) {
            b.node(self.annotation()?);
        }
        b.field(FieldName::Name, self.binder_name()?);
        if self.eat_punct(&mut b, PunctuationId::Colon) {
            b.field(FieldName::Type, self.param_type()?);
        }
        if self.eat_punct(&mut b, PunctuationId::Eq) {
            b.field(FieldName::DefaultValue, self.expression()?);
        }
        Ok(b.finish())
    }

    /// `[a, b[c], @Ann d: Kind]`
    fn type_parameters(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::TypeParameters);
            p.expect_punct(&mut b, PunctuationId::LBracket)?;
            p.comma_separated_1(&mut b, PunctuationId::RBracket, Self::type_parameter)?;
            p.expect_punct(&mut b, PunctuationId::RBracket)?;
            Ok(b.finish())
        })
    }

    fn type_parameter(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::TypeParameter);
        while self.check_punct(PunctuationId::At) {
            b.node(self.annotation()?);
        }
        b.field(FieldName::Name, self.binder_name()?);
        if self.check_punct(PunctuationId::LBracket) {
            b.field(FieldName::TypeParameters, self.type_parameters()?);
        }
        if self.eat_punct(&mut b, PunctuationId::Colon) {
            b.field(FieldName::Type, self.ty()?);
        }
        Ok(b.finish())
    }

    /// `with A, B[c] [(args)]`
    fn with_clause(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::WithClause);
        self.expect_keyword(&mut b, KeywordId::With)?;
        b.field(FieldName::Type, self.constructor_application()?);
        while self.eat_punct(&mut b, PunctuationId::Comma) {
            b.field(FieldName::Type, self.constructor_application()?);
        }
        if self.check_punct(PunctuationId::LParen) {
            b.node(self.arguments()?);
        }
        Ok(b.finish())
    }

    /// An annotated simple type, optionally applied to value arguments.
    fn constructor_application(&mut self) -> PResult<Node> {
        let mut b = NodeBuilder::new(NodeKind::ConstructorApplication);
        b.node(self.annotated_type()?);
        if self.check_punct(PunctuationId::LParen) {
            b.field(FieldName::Arguments, self.arguments()?);
        }
        Ok(b.finish())
    }

    fn at_template_body(&self) -> bool {
        starts_template_body(&self.stream, 0)
    }

    /// `{ items }` or `:` INDENT items OUTDENT.
    fn template_body(&mut self) -> PResult<Node> {
        self.nested(|p| {
            let mut b = NodeBuilder::new(NodeKind::TemplateBody);
            if p.eat_punct(&mut b, PunctuationId::LBrace) {
                b.node(p.block_items(ItemsMode::Delimited)?);
                p.expect_punct(&mut b, PunctuationId::RBrace)?;
            } else {
                p.expect_punct(&mut b, PunctuationId::Colon)?;
                p.expect_layout(&mut b, TokenKind::Indent)?;
                b.node(p.block_items(ItemsMode::Delimited)?);
                p.expect_layout(&mut b, TokenKind::Outdent)?;
            }
            Ok(b.finish())
        })
    }
}

/// What the parser accepts where a definition must start.
fn definition_keywords() -> ExpectedSet {
    ["`def`", "`let`", "`enum`", "`class`", "`instance`", "`eff`", "`rel`", "`type`"]
        .into_iter()
        .fold(ExpectedSet::new(), |set, item| set.with(item))
}

fn is_namespace_wildcard(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::OperatorIdent(op) => op == "*",
        TokenKind::Punctuation(PunctuationId::Underscore) => true,
        _ => false,
    }
}
