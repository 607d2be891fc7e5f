/// Parser core types.
///
/// This chunk defines the [`Parser`] type, the internal failure type that unwinds to the nearest recovery point,
/// and the top-level `compilation_unit` loop.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// A production failed; unwinds to the nearest item-level recovery point.
#[derive(Debug)]
struct Failure {
    error: ParseError,
    span: Span,
    /// The offending token is a lexer error token whose diagnostic already exists.
    reported: bool,
}

type PResult<T> = Result<T, Failure>;

/// Syntactic category of the expression built so far in a precedence chain.
///
/// The grammar restricts operands by category rather than by level alone (an assignment target must be simple or
/// prefix, an infix operand must not be a postfix expression).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Simple,
    Prefix,
    Infix,
    Postfix,
    /// Ascriptions, assignments, lambdas and control forms: nothing continues them.
    Closed,
}

/// Parser state.
///
/// ## Notes
/// - The precedence table is borrowed for the whole session and never mutated.
/// - `no_brace_call` is set while parsing a `match` subject so that `match x { ... }` does not read `x { ... }` as a
///   call with a block argument. Parenthesised and bracketed sub-expressions clear it.
pub struct Parser<'t> {
    stream: TokenStream,
    table: &'t PrecedenceTable,
    max_depth: usize,
    depth: usize,
    no_brace_call: bool,
    /// The lexer already reported problems in this stream; inconclusive lookahead is then expected.
    lexer_errors: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> Parser<'t> {
    /// Create a parser over a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `flix_syntax::lexer` (an `Eof` token is appended if missing).
    /// - `table`: Precedence table consulted by the expression loop.
    /// - `options`: Session options; only the nesting guard is read here.
    pub fn new(tokens: Vec<Token>, table: &'t PrecedenceTable, options: &ParseOptions) -> Self {
        let lexer_errors = tokens.iter().any(|t| matches!(t.kind, TokenKind::Error(_)));
        Self {
            stream: TokenStream::new(tokens),
            table,
            max_depth: options.max_nesting_depth,
            depth: 0,
            no_brace_call: false,
            lexer_errors,
            diagnostics: Vec::new(),
        }
    }

    /// Mark the stream as already diagnosed by the lexer (an unclosed `(` at end of input leaves no error token).
    pub fn lexer_reported(mut self, reported: bool) -> Self {
        self.lexer_errors |= reported;
        self
    }

    /// Parse the whole stream into a `compilation_unit`.
    ///
    /// Never fails: malformed definitions become `ERROR` nodes, and exhausting the nesting guard ends the parse with
    /// the remaining input wrapped in one `ERROR` node.
    pub fn parse(mut self) -> Parse {
        let mut unit = NodeBuilder::new(NodeKind::CompilationUnit);

        loop {
            self.skip_separators(&mut unit);
            if self.stream.at_eof() {
                break;
            }
            let mark = self.stream.mark();
            let item = if self.at_definition_start() {
                self.recovering(Self::definition)
            } else {
                self.report_unexpected(ExpectedSet::one("definition"));
                Ok(self.error_node())
            };
            match item {
                Ok(Some(node)) => unit.node(node),
                Ok(None) => {}
                Err(failure) => {
                    tracing::warn!(span = ?failure.span, "nesting guard tripped; abandoning the rest of the file");
                    self.stream.reset(mark);
                    self.push_failure(failure);
                    let mut rest = NodeBuilder::new(NodeKind::Error);
                    while !self.stream.at_eof() {
                        rest.token(self.stream.bump());
                    }
                    if !rest.is_empty() {
                        unit.node(rest.finish());
                    }
                    break;
                }
            }
        }

        unit.token(self.stream.bump());
        Parse {
            root: unit.finish(),
            diagnostics: self.diagnostics,
        }
    }
}
