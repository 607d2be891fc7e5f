//! Diagnostic collection and reporting for the Flix syntax frontend.
//!
//! Lexing and parsing never abort on the first problem. Both phases push a [`Diagnostic`] and keep going, so a
//! caller always receives a (possibly partial) tree together with every problem found along the way.
//!
//! ## Notes
//! - The two error classes are [`LexError`] and [`ParseError`]; [`SyntaxError`] unifies them.
//! - [`Diagnostic`] implements [`miette::Diagnostic`], so it renders with source context through any miette handler.
//!   [`format_diagnostic`] is the plain-text renderer used by the CLI and tests.

use std::fmt;

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, Report};
use thiserror::Error;

use crate::cst::{FieldName, NodeKind};
use crate::parser::Conflict;
use crate::span::Span;

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Recoverable lexical or syntactic error.
    Error,
    /// Parsing of the file stopped early; the tree is partial.
    Fatal,
    /// An internal invariant was violated; not the user's fault.
    Bug,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
            Severity::Bug => write!(f, "internal error"),
        }
    }
}

/// Lexical errors. Each one is paired with an error token in the stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("inconsistent indentation: column {column} does not match any enclosing block")]
    InconsistentIndentation { column: usize },
    #[error("illegal character {0:?}")]
    IllegalCharacter(char),
    #[error("malformed {kind} literal")]
    MalformedLiteral { kind: &'static str },
    #[error("unmatched closing delimiter `{0}`")]
    UnmatchedDelimiter(char),
    #[error("`{0}` is never closed")]
    UnterminatedBlock(char),
}

/// The set of things the parser would have accepted at a failure point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpectedSet {
    items: Vec<String>,
}

impl ExpectedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn one(item: impl Into<String>) -> Self {
        Self::new().with(item)
    }

    pub fn with(mut self, item: impl Into<String>) -> Self {
        let item = item.into();
        if !self.items.contains(&item) {
            self.items.push(item);
        }
        self
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl fmt::Display for ExpectedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.items.as_slice() {
            [] => write!(f, "something else"),
            [one] => write!(f, "{one}"),
            [a, b] => write!(f, "{a} or {b}"),
            many => write!(f, "one of {}", many.join(", ")),
        }
    }
}

/// Syntactic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: ExpectedSet, found: String },
    #[error("{kind} is missing its `{field}`")]
    MissingRequiredField { kind: NodeKind, field: FieldName },
    #[error("no disambiguation policy decided {0}")]
    UnresolvedAmbiguity(Conflict),
    #[error("input nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl ParseError {
    pub fn unexpected(expected: ExpectedSet, found: impl Into<String>) -> Self {
        ParseError::UnexpectedToken {
            expected,
            found: found.into(),
        }
    }

    /// Fatal errors end the parse of the file instead of being recovered locally.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::NestingTooDeep { .. })
    }
}

/// Either class of syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn severity(&self) -> Severity {
        match self {
            SyntaxError::Parse(ParseError::NestingTooDeep { .. }) => Severity::Fatal,
            SyntaxError::Parse(ParseError::UnresolvedAmbiguity(_)) => Severity::Bug,
            _ => Severity::Error,
        }
    }

    /// Stable message-kind code.
    pub fn code(&self) -> &'static str {
        match self {
            SyntaxError::Lex(e) => match e {
                LexError::UnterminatedString => "flix::lex::unterminated_string",
                LexError::UnterminatedComment => "flix::lex::unterminated_comment",
                LexError::InconsistentIndentation { .. } => "flix::lex::inconsistent_indentation",
                LexError::IllegalCharacter(_) => "flix::lex::illegal_character",
                LexError::MalformedLiteral { .. } => "flix::lex::malformed_literal",
                LexError::UnmatchedDelimiter(_) => "flix::lex::unmatched_delimiter",
                LexError::UnterminatedBlock(_) => "flix::lex::unterminated_block",
            },
            SyntaxError::Parse(e) => match e {
                ParseError::UnexpectedToken { .. } => "flix::parse::unexpected_token",
                ParseError::MissingRequiredField { .. } => "flix::parse::missing_field",
                ParseError::UnresolvedAmbiguity(_) => "flix::parse::unresolved_ambiguity",
                ParseError::NestingTooDeep { .. } => "flix::parse::nesting_too_deep",
            },
        }
    }
}

/// A collected diagnostic: `{severity, message-kind, span}` plus optional hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub error: SyntaxError,
    pub span: Span,
    pub hints: Vec<String>,
}

impl Diagnostic {
    pub fn new(error: impl Into<SyntaxError>, span: Span) -> Self {
        let error = error.into();
        Self {
            severity: error.severity(),
            error,
            span,
            hints: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn code(&self) -> &'static str {
        self.error.code()
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn is_lex(&self) -> bool {
        matches!(self.error, SyntaxError::Lex(_))
    }

    fn label(&self) -> String {
        match &self.error {
            SyntaxError::Parse(ParseError::UnexpectedToken { found, .. }) => format!("unexpected {found}"),
            SyntaxError::Parse(ParseError::MissingRequiredField { field, .. }) => format!("`{field}` expected here"),
            SyntaxError::Lex(LexError::InconsistentIndentation { .. }) => "dedent lands here".to_string(),
            _ => "here".to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for Diagnostic {}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.error.code()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() {
            None
        } else {
            Some(Box::new(self.hints.join("\n")))
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::at(self.span, self.label()))))
    }
}

/// Render one diagnostic with source context as plain text (no colours).
///
/// ## Parameters
/// - `file_path`: name shown in the report header.
/// - `source`: full source text the diagnostic's span points into.
pub fn format_diagnostic(file_path: &str, source: &str, diagnostic: &Diagnostic) -> String {
    let report = Report::new(diagnostic.clone()).with_source_code(NamedSource::new(file_path, source.to_string()));
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    if handler.render_report(&mut out, report.as_ref()).is_err() {
        // Fall back to the one-line form if rendering fails (e.g. a span past the end of the source).
        out = format!("{}: {} [{}]\n", diagnostic.severity, diagnostic.error, diagnostic.code());
    }
    out
}

/// Render every diagnostic in order.
pub fn format_diagnostics(file_path: &str, source: &str, diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format_diagnostic(file_path, source, d))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_set_display() {
        assert_eq!(ExpectedSet::one("`)`").to_string(), "`)`");
        assert_eq!(ExpectedSet::one("`)`").with("`,`").to_string(), "`)` or `,`");
        assert_eq!(
            ExpectedSet::one("a").with("b").with("c").with("a").to_string(),
            "one of a, b, c"
        );
    }

    #[test]
    fn severities_follow_error_class() {
        let lex = Diagnostic::new(LexError::UnterminatedString, Span::new(0, 1));
        assert_eq!(lex.severity, Severity::Error);
        assert!(lex.is_lex());

        let deep = Diagnostic::new(ParseError::NestingTooDeep { limit: 8 }, Span::new(0, 1));
        assert_eq!(deep.severity, Severity::Fatal);
        assert_eq!(deep.code(), "flix::parse::nesting_too_deep");
    }

    #[test]
    fn rendering_includes_message_and_code() {
        let source = "def f(): String = \"abc\n";
        let diag = Diagnostic::new(LexError::UnterminatedString, Span::new(18, 22)).with_hint("close the string");
        let out = format_diagnostic("main.flix", source, &diag);
        assert!(out.contains("unterminated string literal"), "{out}");
        assert!(out.contains("flix::lex::unterminated_string"), "{out}");
        assert!(out.contains("close the string"), "{out}");
    }
}
