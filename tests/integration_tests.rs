//! Integration tests for the Flix syntax frontend

use std::fs;
use std::path::{Path, PathBuf};

use flix::diagnostics::Diagnostic;
use flix::parser::{self, Parse};

fn fixtures(kind: &str) -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(kind);
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|e| e == "flix"))
        .collect();
    files.sort();
    assert!(!files.is_empty(), "no fixtures in {}", dir.display());
    files
}

/// Helper to run the full pipeline on a source file
fn parse_file(path: &Path) -> (String, Parse) {
    let source = fs::read_to_string(path).unwrap();
    let parse = parser::parse(&source);
    (source, parse)
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
    diagnostics.iter().map(Diagnostic::code).collect()
}

/// Test that all valid fixtures parse without diagnostics
#[test]
fn test_valid_fixtures() {
    for path in fixtures("valid") {
        let (source, parse) = parse_file(&path);
        assert!(
            parse.diagnostics.is_empty(),
            "Expected {} to parse cleanly, got:\n{}",
            path.display(),
            flix::diagnostics::format_diagnostics(&path.to_string_lossy(), &source, &parse.diagnostics)
        );
        assert!(!parse.root.has_error(), "{}: {}", path.display(), parse.root.to_sexp());
        assert_eq!(parse.root.span().end, source.len(), "{}", path.display());
    }
}

/// Test that invalid fixtures produce diagnostics and still yield a tree
#[test]
fn test_invalid_fixtures() {
    for path in fixtures("invalid") {
        let (source, parse) = parse_file(&path);
        assert!(
            !parse.diagnostics.is_empty(),
            "Expected {} to produce diagnostics",
            path.display()
        );
        assert_eq!(parse.root.kind(), flix::cst::NodeKind::CompilationUnit);
        assert_eq!(parse.root.span().end, source.len(), "{}", path.display());
        let starts: Vec<usize> = parse.diagnostics.iter().map(|d| d.span.start).collect();
        assert!(starts.windows(2).all(|w| w[0] <= w[1]), "diagnostics out of order in {}", path.display());
    }
}

/// Test that valid fixtures survive the formatter
#[test]
fn test_valid_fixtures_format_stably() {
    for path in fixtures("valid") {
        let source = fs::read_to_string(&path).unwrap();
        let formatted = flix::format_source(&source).unwrap();
        assert_eq!(
            parser::parse(&formatted).root.to_sexp(),
            parser::parse(&source).root.to_sexp(),
            "{} changed shape:\n{formatted}",
            path.display()
        );
        assert!(flix::check_formatted(&formatted).unwrap(), "{}:\n{formatted}", path.display());
    }
}

/// Each invalid fixture names the diagnostic it provokes
mod diagnostic_tests {
    use super::*;

    fn fixture_codes(name: &str) -> Vec<&'static str> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/invalid").join(name);
        let (_, parse) = parse_file(&path);
        codes(&parse.diagnostics)
    }

    #[test]
    fn test_unterminated_string() {
        assert!(fixture_codes("unterminated_string.flix").contains(&"flix::lex::unterminated_string"));
    }

    #[test]
    fn test_inconsistent_indentation() {
        assert!(fixture_codes("inconsistent_indentation.flix").contains(&"flix::lex::inconsistent_indentation"));
    }

    #[test]
    fn test_missing_body() {
        assert_eq!(fixture_codes("missing_body.flix"), vec!["flix::parse::unexpected_token"]);
    }

    #[test]
    fn test_unclosed_paren() {
        assert!(fixture_codes("unclosed_paren.flix").contains(&"flix::lex::unterminated_block"));
    }

    #[test]
    fn test_unmatched_delimiter() {
        assert!(fixture_codes("unmatched_delimiter.flix").contains(&"flix::lex::unmatched_delimiter"));
    }

    #[test]
    fn test_unterminated_comment() {
        assert!(fixture_codes("unterminated_comment.flix").contains(&"flix::lex::unterminated_comment"));
    }

    #[test]
    fn test_comprehension_without_yield() {
        assert_eq!(fixture_codes("comprehension_without_yield.flix"), vec!["flix::parse::unexpected_token"]);
    }
}

/// Test specific lexer behavior
mod lexer_tests {
    use flix::lexer::{TokenKind, lex};

    #[test]
    fn test_layout_tokens_for_indented_body() {
        let kinds: Vec<&'static str> = lex("def f(): Int32 =\n    1\ndef g(): Int32 = 2\n")
            .tokens
            .iter()
            .map(|t| t.kind.kind_name())
            .collect();
        let layout: Vec<&'static str> = kinds
            .into_iter()
            .filter(|k| matches!(*k, "INDENT" | "OUTDENT" | "AUTOMATIC_SEMICOLON"))
            .collect();
        assert_eq!(layout, vec!["INDENT", "OUTDENT", "AUTOMATIC_SEMICOLON"]);
    }

    #[test]
    fn test_tab_width_changes_columns() {
        use flix::lexer::lex_with_config;
        use flix_syntax::LexerConfig;

        // A tab and eight spaces are the same column only with a tab width of 8.
        let source = "def f(): Int32 =\n\tlet x = 1\n        x\n";
        let narrow = lex_with_config(source, &LexerConfig { tab_width: 4 });
        let wide = lex_with_config(source, &LexerConfig { tab_width: 8 });
        assert!(wide.diagnostics.is_empty(), "{:?}", wide.diagnostics);
        assert!(wide.tokens.iter().any(|t| t.kind == TokenKind::AutoSemicolon));
        assert!(!narrow.tokens.iter().any(|t| t.kind == TokenKind::AutoSemicolon));
    }
}

/// Test the command-line surface end to end
mod cli_tests {
    use super::*;
    use clap::Parser;
    use flix::cli::{Cli, ExitCode, execute};

    fn run(args: &[&str]) -> Result<ExitCode, flix::cli::CliError> {
        execute(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_check_valid_fixtures() {
        let paths: Vec<String> = fixtures("valid").iter().map(|p| p.to_string_lossy().into_owned()).collect();
        let mut args = vec!["flix", "check"];
        args.extend(paths.iter().map(String::as_str));
        assert_eq!(run(&args).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_check_invalid_fixture_fails() {
        let path = fixtures("invalid").remove(0);
        let err = run(&["flix", "check", &path.to_string_lossy()]).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_parse_and_lex_exit_codes() {
        let valid = fixtures("valid").remove(0);
        let valid = valid.to_string_lossy();
        assert_eq!(run(&["flix", "parse", &valid, "--json"]).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(&["flix", "lex", &valid]).unwrap(), ExitCode::SUCCESS);

        let invalid = fixtures("invalid").remove(0);
        assert_eq!(run(&["flix", "parse", &invalid.to_string_lossy()]).unwrap(), ExitCode::FAILURE);
    }

    #[test]
    fn test_fmt_refuses_invalid_source() {
        let invalid = fixtures("invalid").remove(0);
        assert!(run(&["flix", "fmt", &invalid.to_string_lossy()]).is_err());
    }
}
