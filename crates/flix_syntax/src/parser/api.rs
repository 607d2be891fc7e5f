// ============================================================================
// Public API
// ============================================================================

/// Output of one parse session: the tree and every lexer and parser diagnostic, ordered by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub root: Node,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parse {
    /// Whether any diagnostic was reported.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Whether the parse stopped early (`NestingTooDeep`).
    pub fn is_partial(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == crate::diagnostics::Severity::Fatal)
    }
}

/// Parse source text with default options.
pub fn parse(source: &str) -> Parse {
    parse_with_options(source, &ParseOptions::default())
}

/// Lex and parse source text.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse_with_options(source: &str, options: &ParseOptions) -> Parse {
    let lexed = lexer::lex_with_config(source, &options.lexer);
    let reported = !lexed.diagnostics.is_empty();
    let mut parse = Parser::new(lexed.tokens, &precedence::FLIX, options)
        .lexer_reported(reported)
        .parse();

    let mut diagnostics = lexed.diagnostics;
    diagnostics.append(&mut parse.diagnostics);
    diagnostics.sort_by_key(|d| d.span.start);
    parse.diagnostics = diagnostics;
    parse
}

/// Parse an already lexed token stream.
///
/// ## Notes
/// - Only parser diagnostics are returned; the caller owns the lexer's.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse_tokens(tokens: Vec<Token>, options: &ParseOptions) -> Parse {
    Parser::new(tokens, &precedence::FLIX, options).parse()
}
