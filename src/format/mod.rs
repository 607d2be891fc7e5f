//! Flix Code Formatter
//!
//! Re-prints a parsed compilation unit from its tokens:
//! - indentation is rebuilt from the layout tokens (default 4 spaces per level)
//! - runs of whitespace collapse to a single space
//! - top-level definitions are separated by one blank line
//! - comments are not preserved
//!
//! Sources with syntax errors are refused rather than printed from a partial tree.

mod config;
mod formatter;
mod writer;

pub use config::FormatConfig;
pub use formatter::Formatter;

use flix_syntax::diagnostics::Diagnostic;
use flix_syntax::parser;

/// Why a source could not be formatted.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("cannot format source with {} syntax error(s)", .0.len())]
    Syntax(Vec<Diagnostic>),
}

impl FormatError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            FormatError::Syntax(diagnostics) => diagnostics,
        }
    }
}

/// Format Flix source code with default settings
pub fn format_source(source: &str) -> Result<String, FormatError> {
    format_source_with_config(source, FormatConfig::default())
}

/// Format Flix source code with custom configuration
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn format_source_with_config(source: &str, config: FormatConfig) -> Result<String, FormatError> {
    let parse = parser::parse(source);
    if parse.has_errors() {
        return Err(FormatError::Syntax(parse.diagnostics));
    }
    Ok(Formatter::new(config).format(&parse.root))
}

/// Check if source code is already formatted
pub fn check_formatted(source: &str) -> Result<bool, FormatError> {
    let formatted = format_source(source)?;
    Ok(source == formatted)
}
