/// Conflict registry.
///
/// The grammar declares several rule pairs that a generalized parser would explore in parallel. Here each one is a
/// named [`Conflict`] with a pure policy over bounded lookahead (a few tokens, or a scan to the matching closer). The
/// policy answers `Some(true)` to pick the first alternative in the conflict's name, `Some(false)` for the second,
/// and `None` when the scan ran into the end of input without deciding.
///
/// ## Notes
/// - `None` can only happen on an unbalanced stream. When the lexer produced that stream it has already reported the
///   imbalance and the parser silently takes [`Conflict::fallback`]; otherwise it records an `UnresolvedAmbiguity`.

/// A named grammar ambiguity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conflict {
    /// `(x: Int32) -> x` (lambda bindings) vs `(x)` (parenthesised expression).
    BindingVsSimpleExpression,
    /// `(Int32, Bool)` (tuple type) vs `(Int32, Bool) -> Int32` (parameter types).
    TupleTypeVsParameterTypes,
    /// `while (c) body` vs `while cond do body` whose condition starts with a parenthesis.
    WhileVsSimpleExpression,
    /// `A.B.C` (qualified type identifier) vs `a.b.type` (singleton type over a value path).
    TypeIdentifierVsIdentifier,
    /// `new C { ... }` (template body attached to the instance) vs `new C` followed by a separate block.
    InstanceTemplateBody,
    /// `mod M; { ... }` (separator before the body) vs `mod M; def f ...` (separator ends the module).
    ModDefinitionBody,
    /// `f: { ... }` (colon-trailing call) vs `e: Type` (ascription).
    ColonCallVsAscription,
    /// `{ case ... }` (case block) vs `{ ... }` (block).
    CaseBlockVsBlock,
    /// `forM x = e` (let definition) vs `forM (x <- xs) yield e` (comprehension).
    ForMLetVsComprehension,
    /// Whether an unbraced body continues past a separator (it does after a `let`, which needs a scope).
    BodySequence,
}

impl Conflict {
    pub const ALL: &'static [Conflict] = &[
        Conflict::BindingVsSimpleExpression,
        Conflict::TupleTypeVsParameterTypes,
        Conflict::WhileVsSimpleExpression,
        Conflict::TypeIdentifierVsIdentifier,
        Conflict::InstanceTemplateBody,
        Conflict::ModDefinitionBody,
        Conflict::ColonCallVsAscription,
        Conflict::CaseBlockVsBlock,
        Conflict::ForMLetVsComprehension,
        Conflict::BodySequence,
    ];

    /// The two alternatives, first one first.
    pub fn alternatives(self) -> (&'static str, &'static str) {
        match self {
            Conflict::BindingVsSimpleExpression => ("binding", "simple_expression"),
            Conflict::TupleTypeVsParameterTypes => ("tuple_type", "parameter_types"),
            Conflict::WhileVsSimpleExpression => ("while (condition) body", "while condition do body"),
            Conflict::TypeIdentifierVsIdentifier => ("type_identifier", "identifier"),
            Conflict::InstanceTemplateBody => ("instance_expression with template_body", "instance_expression"),
            Conflict::ModDefinitionBody => ("mod_definition with body", "mod_definition"),
            Conflict::ColonCallVsAscription => ("call_expression", "ascription_expression"),
            Conflict::CaseBlockVsBlock => ("case_block", "block"),
            Conflict::ForMLetVsComprehension => ("let_definition", "foreach_yield_expression"),
            Conflict::BodySequence => ("longer body", "shorter body"),
        }
    }

    /// The choice taken when lookahead is inconclusive.
    pub fn fallback(self) -> bool {
        !matches!(
            self,
            Conflict::BindingVsSimpleExpression | Conflict::InstanceTemplateBody | Conflict::ColonCallVsAscription
        )
    }

    /// Run the policy at the stream's cursor.
    ///
    /// ## Parameters
    /// - `previous`: kind of the item just parsed; only [`Conflict::BodySequence`] reads it.
    pub fn resolve(self, stream: &TokenStream, previous: Option<NodeKind>) -> Option<bool> {
        match self {
            Conflict::BindingVsSimpleExpression => binding_vs_simple_expression(stream),
            Conflict::TupleTypeVsParameterTypes => tuple_type_vs_parameter_types(stream),
            Conflict::WhileVsSimpleExpression => while_vs_simple_expression(stream),
            Conflict::TypeIdentifierVsIdentifier => Some(type_identifier_vs_identifier(stream)),
            Conflict::InstanceTemplateBody => Some(starts_template_body(stream, 0)),
            Conflict::ModDefinitionBody => Some(mod_definition_body(stream)),
            Conflict::ColonCallVsAscription => colon_call_vs_ascription(stream),
            Conflict::CaseBlockVsBlock => Some(stream.nth(1).kind.is_keyword(KeywordId::Case)),
            Conflict::ForMLetVsComprehension => for_m_let_vs_comprehension(stream),
            Conflict::BodySequence => Some(body_sequence(stream, previous)),
        }
    }
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (first, second) = self.alternatives();
        write!(f, "`{first}` vs `{second}`")
    }
}

// ============================================================================
// Policies
// ============================================================================

fn is_punct(token: &Token, id: PunctuationId) -> bool {
    token.kind.is_punctuation(id)
}

/// Token following the group opened `offset` tokens ahead of the cursor, if the group closes.
fn after_group(stream: &TokenStream, offset: usize) -> Option<&Token> {
    stream.matching_close(stream.position() + offset).map(|index| stream.at(index))
}

fn binding_vs_simple_expression(stream: &TokenStream) -> Option<bool> {
    let first = stream.peek();
    match &first.kind {
        TokenKind::Ident(_) | TokenKind::OperatorIdent(_) | TokenKind::Punctuation(PunctuationId::Underscore) => {
            Some(is_punct(stream.nth(1), PunctuationId::Arrow))
        }
        TokenKind::Punctuation(PunctuationId::LParen) => {
            after_group(stream, 0).map(|next| is_punct(next, PunctuationId::Arrow))
        }
        _ => Some(false),
    }
}

fn tuple_type_vs_parameter_types(stream: &TokenStream) -> Option<bool> {
    after_group(stream, 0).map(|next| !is_punct(next, PunctuationId::Arrow))
}

fn while_vs_simple_expression(stream: &TokenStream) -> Option<bool> {
    if !is_punct(stream.nth(1), PunctuationId::LParen) {
        return Some(false);
    }
    after_group(stream, 1).map(|next| !next.kind.is_keyword(KeywordId::Do))
}

/// `true` unless the dotted path at the cursor ends in `.type`.
fn type_identifier_vs_identifier(stream: &TokenStream) -> bool {
    let mut offset = 1;
    while is_punct(stream.nth(offset), PunctuationId::Dot) {
        match &stream.nth(offset + 1).kind {
            TokenKind::Keyword(KeywordId::Type) => return false,
            TokenKind::Ident(_) => offset += 2,
            _ => break,
        }
    }
    true
}

/// `{` or `:` + INDENT, `offset` tokens ahead.
fn starts_template_body(stream: &TokenStream, offset: usize) -> bool {
    let token = stream.nth(offset);
    is_punct(token, PunctuationId::LBrace)
        || (is_punct(token, PunctuationId::Colon) && stream.nth(offset + 1).kind == TokenKind::Indent)
}

fn mod_definition_body(stream: &TokenStream) -> bool {
    if is_separator(&stream.peek().kind) {
        starts_template_body(stream, 1)
    } else {
        starts_template_body(stream, 0)
    }
}

fn colon_call_vs_ascription(stream: &TokenStream) -> Option<bool> {
    let next = stream.nth(1);
    match &next.kind {
        TokenKind::Punctuation(PunctuationId::LBrace) => Some(true),
        TokenKind::Ident(_) | TokenKind::OperatorIdent(_) | TokenKind::Punctuation(PunctuationId::Underscore) => {
            Some(is_punct(stream.nth(2), PunctuationId::FatArrow))
        }
        TokenKind::Punctuation(PunctuationId::LParen) => {
            after_group(stream, 1).map(|after| is_punct(after, PunctuationId::FatArrow))
        }
        _ => Some(false),
    }
}

fn for_m_let_vs_comprehension(stream: &TokenStream) -> Option<bool> {
    let next = stream.nth(1);
    match &next.kind {
        TokenKind::Indent => Some(false),
        TokenKind::Punctuation(PunctuationId::LParen) => after_group(stream, 1)
            .map(|after| is_punct(after, PunctuationId::Eq) || is_punct(after, PunctuationId::Colon)),
        _ => Some(true),
    }
}

/// At a separator after a body item: continue only after a `let`, and only into something that can be an item.
///
/// A sibling definition other than another `let` ends the body, so `def f() = let x = 1\ndef g() = 2` stays two
/// definitions.
fn body_sequence(stream: &TokenStream, previous: Option<NodeKind>) -> bool {
    let next = &stream.nth(1).kind;
    let sibling = next.starts_definition() || next.is_punctuation(PunctuationId::At);
    previous == Some(NodeKind::LetDefinition) && starts_item(next) && !sibling
}

fn is_separator(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::AutoSemicolon | TokenKind::Punctuation(PunctuationId::Semicolon))
}

/// Whether a block item (expression or definition) can start with this token.
fn starts_item(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Keyword(id) => !matches!(
            id,
            KeywordId::Else
                | KeywordId::Catch
                | KeywordId::Finally
                | KeywordId::With
                | KeywordId::Derives
                | KeywordId::Yield
                | KeywordId::Select
                | KeywordId::From
                | KeywordId::Case
                | KeywordId::Static
                | KeywordId::For
        ),
        TokenKind::Punctuation(id) => matches!(
            id,
            PunctuationId::LParen
                | PunctuationId::LBrace
                | PunctuationId::HashBrace
                | PunctuationId::At
                | PunctuationId::Underscore
        ),
        TokenKind::Ident(_)
        | TokenKind::OperatorIdent(_)
        | TokenKind::Int(_)
        | TokenKind::Float(_)
        | TokenKind::Char(_)
        | TokenKind::String(_)
        | TokenKind::StringStart { .. }
        | TokenKind::Indent => true,
        _ => false,
    }
}
