//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;

use flix_syntax::ParseOptions;
use flix_syntax::diagnostics::{Diagnostic, format_diagnostics};
use flix_syntax::{lexer, parser};
use miette::NamedSource;

use super::{CliError, CliResult, ExitCode};
use crate::export;
use crate::format::{FormatConfig, FormatError, format_source_with_config};

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// while lexing.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &str) -> CliResult<String> {
    // Check file size before reading
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Print diagnostics to stderr through miette's report handler and pick the exit code.
fn report(file_path: &str, source: &str, diagnostics: &[Diagnostic]) -> ExitCode {
    if diagnostics.is_empty() {
        return ExitCode::SUCCESS;
    }
    for diagnostic in diagnostics {
        let report =
            miette::Report::new(diagnostic.clone()).with_source_code(NamedSource::new(file_path, source.to_string()));
        eprintln!("{:?}", report);
    }
    ExitCode::FAILURE
}

/// One line per token: `kind start..end text`.
pub fn render_tokens(tokens: &[lexer::Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let text = token.kind.text();
        if text.is_empty() {
            out.push_str(&format!("{} {}..{}\n", token.kind.kind_name(), token.span.start, token.span.end));
        } else {
            out.push_str(&format!(
                "{} {}..{} {:?}\n",
                token.kind.kind_name(),
                token.span.start,
                token.span.end,
                text
            ));
        }
    }
    out
}

/// Lex and display tokens.
pub fn lex_file(file_path: &str, options: &ParseOptions) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let lexed = lexer::lex_with_config(&source, &options.lexer);

    print!("{}", render_tokens(&lexed.tokens));
    Ok(report(file_path, &source, &lexed.diagnostics))
}

/// Parse and display the CST.
pub fn parse_file(file_path: &str, options: &ParseOptions, json: bool) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let parse = parser::parse_with_options(&source, options);

    if json {
        let text = export::to_json_string(&parse.root, &parse.diagnostics)
            .map_err(|e| CliError::failure(format!("Error serializing tree: {}", e)))?;
        println!("{}", text);
    } else {
        println!("{}", parse.root.to_sexp());
    }
    Ok(report(file_path, &source, &parse.diagnostics))
}

/// Check every file, reporting all diagnostics before failing.
pub fn check_files(file_paths: &[String], options: &ParseOptions) -> CliResult<ExitCode> {
    let mut failed = 0;
    for file_path in file_paths {
        let source = match read_source(file_path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{}", e.message);
                failed += 1;
                continue;
            }
        };
        let parse = parser::parse_with_options(&source, options);
        tracing::debug!(file = %file_path, diagnostics = parse.diagnostics.len(), "checked");
        if report(file_path, &source, &parse.diagnostics) != ExitCode::SUCCESS {
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(CliError::failure(format!(
            "\n{} of {} file(s) have syntax errors",
            failed,
            file_paths.len()
        )));
    }
    println!("✓ {} file(s) checked", file_paths.len());
    Ok(ExitCode::SUCCESS)
}

/// Print the formatted source of one file.
pub fn format_file(file_path: &str, indent_width: usize) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let config = FormatConfig::new().with_indent_width(indent_width);

    match format_source_with_config(&source, config) {
        Ok(formatted) => {
            print!("{}", formatted);
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ FormatError::Syntax(_)) => {
            let rendered = format_diagnostics(file_path, &source, err.diagnostics());
            Err(CliError::failure(format!("{}{}", rendered, err)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tokens_lists_layout_tokens_without_text() {
        let lexed = lexer::lex("def f() =\n  1\n");
        let rendered = render_tokens(&lexed.tokens);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "keyword 0..3 \"def\"");
        assert!(lines.iter().any(|l| l.starts_with("INDENT ")), "{rendered}");
        assert!(lines.iter().any(|l| l.starts_with("OUTDENT ")), "{rendered}");
        assert!(lines.last().unwrap().starts_with("EOF "));
    }

    #[test]
    fn test_check_files_counts_unreadable_files() {
        let err = check_files(&["does/not/exist.flix".to_string()], &ParseOptions::default()).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("1 of 1"));
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source("does/not/exist.flix").unwrap_err();
        assert!(err.message.starts_with("Cannot access file"));
    }
}
