//! Concrete syntax tree for Flix.
//!
//! A [`Node`] has a [`NodeKind`], an ordered list of children (nodes and tokens, synthetic layout tokens included),
//! a field table mapping [`FieldName`]s to child indices, and a span covering its children.
//!
//! Nodes are produced through a [`NodeBuilder`]. Pushing a child whose kind is *hidden* (the grammar's
//! underscore-prefixed helper rules such as `_block` or `_class_constructor`) splices its children into the parent
//! and lifts its fields, so hidden rules never appear in a finished tree. Choice rules the grammar inlines (`_pattern`,
//! `_definition`, `literal`, ...) never build a node in the first place.
//!
//! ## Notes
//! - A field refers to exactly one child. When the grammar declares a field over a repetition (parameter lists,
//!   annotation arguments), the field refers to the first matching child.
//! - Aliasing (an `identifier` surfaced as `type_identifier` in type position) is an explicit [`Node::alias`] step
//!   taken by the parser, not a property of the lexical shape.

use std::fmt;

use crate::lexer::Token;
use crate::span::Span;

// ============================================================================
// Kinds and fields
// ============================================================================

/// Whether a node kind appears in finished trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    /// Spliced into its parent by the builder.
    Hidden,
}

/// Syntactic kind of a CST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    Error,

    // Definitions
    ModDefinition,
    ModIdentifier,
    UseDeclaration,
    ImportDeclaration,
    NamespaceWildcard,
    NamespaceSelectors,
    EnumDefinition,
    EnumBody,
    EnumCaseDefinitions,
    SimpleEnumCase,
    ClassDefinition,
    InstanceDefinition,
    EffDefinition,
    RelDefinition,
    PredicateType,
    TypeParameters,
    TypeParameter,
    TemplateBody,
    Annotation,
    LetDefinition,
    TypeDefinition,
    FunctionDefinition,
    FunctionDeclaration,
    AliasModifier,
    Modifiers,
    WithClause,
    Parameters,
    Parameter,

    // Blocks
    Block,
    IndentedBlock,
    RelBlock,
    RelClause,
    RelFact,
    RelBody,
    Atom,
    Dot,

    // Types
    NativeType,
    FunctionType,
    ParameterTypes,
    LazyParameterType,
    InfixType,
    EffectType,
    LiteralType,
    RecordType,
    RelRecordType,
    StructuralType,
    TupleType,
    SingletonType,
    QualTypeIdentifier,
    QualIdentifier,
    GenericType,
    TypeIdentifier,
    TypeArguments,

    // Patterns
    EnumPattern,
    InfixPattern,
    CapturePattern,
    TypedPattern,
    AlternativePattern,
    TuplePattern,
    RecordPattern,

    // Expressions
    Expression,
    LambdaExpression,
    IfExpression,
    MatchExpression,
    DoExpression,
    RegionExpression,
    QueryExpression,
    TryExpression,
    CatchClause,
    FinallyClause,
    Binding,
    Bindings,
    CaseBlock,
    CaseClause,
    Guard,
    AssignmentExpression,
    GenericFunction,
    CallExpression,
    ColonArgument,
    FieldExpression,
    LazyExpression,
    InstanceExpression,
    AscriptionExpression,
    InfixExpression,
    PostfixExpression,
    PrefixExpression,
    TupleExpression,
    ParenthesizedExpression,
    Arguments,
    ReturnExpression,
    ThrowExpression,
    WhileExpression,
    ForExpression,
    ForeachExpression,
    ForeachYieldExpression,
    Enumerators,
    Enumerator,
    InterpolatedStringExpression,
    InterpolatedString,
    Interpolation,

    // Leaves
    Identifier,
    OperatorIdentifier,
    Wildcard,
    Unit,
    IntegerLiteral,
    FloatingPointLiteral,
    BooleanLiteral,
    CharacterLiteral,
    String,
    NullLiteral,

    // Hidden helper rules
    AnnotatedType,
    BlockItems,
    ClassConstructor,
    TypeConstructor,
    FunctionConstructor,
    ConstructorApplication,
    NamespaceExpression,
    CasePattern,
}

impl NodeKind {
    /// External (tree-sitter style) kind name.
    pub fn as_str(self) -> &'static str {
        use NodeKind::*;
        match self {
            CompilationUnit => "compilation_unit",
            Error => "ERROR",
            ModDefinition => "mod_definition",
            ModIdentifier => "mod_identifier",
            UseDeclaration => "use_declaration",
            ImportDeclaration => "import_declaration",
            NamespaceWildcard => "namespace_wildcard",
            NamespaceSelectors => "namespace_selectors",
            EnumDefinition => "enum_definition",
            EnumBody => "enum_body",
            EnumCaseDefinitions => "enum_case_definitions",
            SimpleEnumCase => "simple_enum_case",
            ClassDefinition => "class_definition",
            InstanceDefinition => "instance_definition",
            EffDefinition => "eff_definition",
            RelDefinition => "rel_definition",
            PredicateType => "predicate_type",
            TypeParameters => "type_parameters",
            TypeParameter => "type_parameter",
            TemplateBody => "template_body",
            Annotation => "annotation",
            LetDefinition => "let_definition",
            TypeDefinition => "type_definition",
            FunctionDefinition => "function_definition",
            FunctionDeclaration => "function_declaration",
            AliasModifier => "alias_modifier",
            Modifiers => "modifiers",
            WithClause => "with_clause",
            Parameters => "parameters",
            Parameter => "parameter",
            Block => "block",
            IndentedBlock => "indented_block",
            RelBlock => "rel_block",
            RelClause => "rel_clause",
            RelFact => "rel_fact",
            RelBody => "rel_body",
            Atom => "atom",
            Dot => "dot",
            NativeType => "native_type",
            FunctionType => "function_type",
            ParameterTypes => "parameter_types",
            LazyParameterType => "lazy_parameter_type",
            InfixType => "infix_type",
            EffectType => "effect_type",
            LiteralType => "literal_type",
            RecordType => "record_type",
            RelRecordType => "rel_record_type",
            StructuralType => "structural_type",
            TupleType => "tuple_type",
            SingletonType => "singleton_type",
            QualTypeIdentifier => "qual_type_identifier",
            QualIdentifier => "qual_identifier",
            GenericType => "generic_type",
            TypeIdentifier => "type_identifier",
            TypeArguments => "type_arguments",
            EnumPattern => "enum_pattern",
            InfixPattern => "infix_pattern",
            CapturePattern => "capture_pattern",
            TypedPattern => "typed_pattern",
            AlternativePattern => "alternative_pattern",
            TuplePattern => "tuple_pattern",
            RecordPattern => "record_pattern",
            Expression => "expression",
            LambdaExpression => "lambda_expression",
            IfExpression => "if_expression",
            MatchExpression => "match_expression",
            DoExpression => "do_expression",
            RegionExpression => "region_expression",
            QueryExpression => "query_expression",
            TryExpression => "try_expression",
            CatchClause => "catch_clause",
            FinallyClause => "finally_clause",
            Binding => "binding",
            Bindings => "bindings",
            CaseBlock => "case_block",
            CaseClause => "case_clause",
            Guard => "guard",
            AssignmentExpression => "assignment_expression",
            GenericFunction => "generic_function",
            CallExpression => "call_expression",
            ColonArgument => "colon_argument",
            FieldExpression => "field_expression",
            LazyExpression => "lazy_expression",
            InstanceExpression => "instance_expression",
            AscriptionExpression => "ascription_expression",
            InfixExpression => "infix_expression",
            PostfixExpression => "postfix_expression",
            PrefixExpression => "prefix_expression",
            TupleExpression => "tuple_expression",
            ParenthesizedExpression => "parenthesized_expression",
            Arguments => "arguments",
            ReturnExpression => "return_expression",
            ThrowExpression => "throw_expression",
            WhileExpression => "while_expression",
            ForExpression => "for_expression",
            ForeachExpression => "foreach_expression",
            ForeachYieldExpression => "foreach_yield_expression",
            Enumerators => "enumerators",
            Enumerator => "enumerator",
            InterpolatedStringExpression => "interpolated_string_expression",
            InterpolatedString => "interpolated_string",
            Interpolation => "interpolation",
            Identifier => "identifier",
            OperatorIdentifier => "operator_identifier",
            Wildcard => "wildcard",
            Unit => "unit",
            IntegerLiteral => "integer_literal",
            FloatingPointLiteral => "floating_point_literal",
            BooleanLiteral => "boolean_literal",
            CharacterLiteral => "character_literal",
            String => "string",
            NullLiteral => "null_literal",
            AnnotatedType => "_annotated_type",
            BlockItems => "_block",
            ClassConstructor => "_class_constructor",
            TypeConstructor => "_type_constructor",
            FunctionConstructor => "_function_constructor",
            ConstructorApplication => "_constructor_application",
            NamespaceExpression => "_namespace_expression",
            CasePattern => "_case_pattern",
        }
    }

    pub fn visibility(self) -> Visibility {
        use NodeKind::*;
        match self {
            AnnotatedType | BlockItems | ClassConstructor | TypeConstructor | FunctionConstructor | ConstructorApplication
            | NamespaceExpression | CasePattern => Visibility::Hidden,
            _ => Visibility::Visible,
        }
    }

    pub fn is_hidden(self) -> bool {
        self.visibility() == Visibility::Hidden
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named field of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Alternative,
    Arguments,
    Body,
    Condition,
    Consequence,
    DefaultValue,
    Enumerators,
    Field,
    Function,
    Functor,
    Head,
    Interpolator,
    LambdaStart,
    Left,
    Name,
    Operator,
    ParameterTypes,
    Parameters,
    Path,
    Pattern,
    ReturnType,
    Right,
    Type,
    TypeArguments,
    TypeParameters,
    Value,
    With,
}

impl FieldName {
    pub fn as_str(self) -> &'static str {
        use FieldName::*;
        match self {
            Alternative => "alternative",
            Arguments => "arguments",
            Body => "body",
            Condition => "condition",
            Consequence => "consequence",
            DefaultValue => "default_value",
            Enumerators => "enumerators",
            Field => "field",
            Function => "function",
            Functor => "functor",
            Head => "head",
            Interpolator => "interpolator",
            LambdaStart => "lambda_start",
            Left => "left",
            Name => "name",
            Operator => "operator",
            ParameterTypes => "parameter_types",
            Parameters => "parameters",
            Path => "path",
            Pattern => "pattern",
            ReturnType => "return_type",
            Right => "right",
            Type => "type",
            TypeArguments => "type_arguments",
            TypeParameters => "type_parameters",
            Value => "value",
            With => "with",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tree
// ============================================================================

/// A child of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Node(Node),
    Token(Token),
}

impl Element {
    pub fn span(&self) -> Span {
        match self {
            Element::Node(n) => n.span,
            Element::Token(t) => t.span,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Element::Node(n) => Some(n),
            Element::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Element::Token(t) => Some(t),
            Element::Node(_) => None,
        }
    }
}

/// An immutable CST node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    span: Span,
    children: Vec<Element>,
    fields: Vec<(FieldName, usize)>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Field table as `(name, child index)` pairs, in the order the fields were attached.
    pub fn fields(&self) -> &[(FieldName, usize)] {
        &self.fields
    }

    /// The child a field refers to.
    pub fn field(&self, name: FieldName) -> Option<&Element> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, i)| self.children.get(*i))
    }

    /// The node a field refers to, if the field is present and refers to a node.
    pub fn field_node(&self, name: FieldName) -> Option<&Node> {
        self.field(name).and_then(Element::as_node)
    }

    /// Field name attached to child `index`, if any.
    pub fn field_name_of(&self, index: usize) -> Option<FieldName> {
        self.fields.iter().find(|(_, i)| *i == index).map(|(n, _)| *n)
    }

    /// Direct children that are nodes.
    pub fn named_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(Element::as_node)
    }

    /// Every token under this node, in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for child in &self.children {
            match child {
                Element::Node(n) => n.collect_tokens(out),
                Element::Token(t) => out.push(t),
            }
        }
    }

    /// The source text the node spans.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.text(source)
    }

    /// Depth-first, pre-order traversal starting with `self`.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Whether this node or any descendant is an `ERROR` node.
    pub fn has_error(&self) -> bool {
        self.walk().any(|n| n.kind == NodeKind::Error)
    }

    /// Rename this node's kind (grammar aliasing, e.g. `identifier` → `type_identifier`).
    pub fn alias(mut self, kind: NodeKind) -> Node {
        self.kind = kind;
        self
    }

    /// Tree-sitter style S-expression of the named nodes, with field labels.
    ///
    /// ## Examples
    /// ```rust
    /// use flix_syntax::parser;
    ///
    /// let parse = parser::parse("def one(): Int32 = 1\n");
    /// assert_eq!(
    ///     parse.root.to_sexp(),
    ///     "(compilation_unit (function_definition name: (identifier) parameters: (parameters) \
    ///      return_type: (type_identifier) body: (expression (integer_literal))))"
    /// );
    /// ```
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(self.kind.as_str());
        for (index, child) in self.children.iter().enumerate() {
            if let Element::Node(node) = child {
                out.push(' ');
                if let Some(name) = self.field_name_of(index) {
                    out.push_str(name.as_str());
                    out.push_str(": ");
                }
                node.write_sexp(out);
            }
        }
        out.push(')');
    }
}

/// Pre-order iterator returned by [`Node::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.named_children().collect::<Vec<_>>().into_iter().rev());
        Some(node)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates the children and fields of one production.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    kind: NodeKind,
    children: Vec<Element>,
    fields: Vec<(FieldName, usize)>,
}

impl NodeBuilder {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Change the kind being built (used once a production's shape is decided, e.g. declaration vs definition).
    pub fn set_kind(&mut self, kind: NodeKind) {
        self.kind = kind;
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_field(&self, name: FieldName) -> bool {
        self.fields.iter().any(|(n, _)| *n == name)
    }

    pub fn token(&mut self, token: Token) {
        self.children.push(Element::Token(token));
    }

    /// Push a child node; hidden nodes are spliced and their fields lifted.
    pub fn node(&mut self, node: Node) {
        if node.kind.is_hidden() {
            let offset = self.children.len();
            for (name, index) in node.fields {
                self.attach(name, offset + index);
            }
            self.children.extend(node.children);
        } else {
            self.children.push(Element::Node(node));
        }
    }

    /// Push a child node under a field name.
    ///
    /// ## Notes
    /// - A hidden node labels its first spliced child; the first child pushed under a name keeps the field.
    /// - The outer name is attached before the hidden node's own fields are lifted.
    pub fn field(&mut self, name: FieldName, node: Node) {
        let index = self.children.len();
        if !node.children.is_empty() || !node.kind.is_hidden() {
            self.attach(name, index);
        }
        self.node(node);
    }

    pub fn field_token(&mut self, name: FieldName, token: Token) {
        let index = self.children.len();
        self.token(token);
        self.attach(name, index);
    }

    fn attach(&mut self, name: FieldName, index: usize) {
        if !self.has_field(name) {
            self.fields.push((name, index));
        }
    }

    pub fn finish(self) -> Node {
        let span = self
            .children
            .iter()
            .map(Element::span)
            .reduce(Span::merge)
            .unwrap_or_default();
        Node {
            kind: self.kind,
            span,
            children: self.children,
            fields: self.fields,
        }
    }
}
