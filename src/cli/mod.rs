//! CLI module for the Flix syntax tools
//!
//! This module provides the command-line interface over the lexer, parser and pretty printer.
//!
//! ## Commands
//!
//! - `lex <file>` - Print the token stream, one token per line
//! - `parse <file> [--json]` - Print the concrete syntax tree
//! - `check <file>...` - Report syntax diagnostics for each file
//! - `fmt <file>` - Print the pretty-printed source
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use flix_syntax::config::{DEFAULT_MAX_NESTING_DEPTH, DEFAULT_TAB_WIDTH};
use flix_syntax::ParseOptions;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create an error with a custom exit code.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Lexer, parser and formatter for the Flix language
#[derive(Parser, Debug)]
#[command(name = "flix")]
#[command(version = VERSION)]
#[command(about = "Lexer, parser and formatter for the Flix language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub options: SyntaxArgs,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Copy)]
pub struct SyntaxArgs {
    /// Column width of a tab in indentation
    #[arg(long, global = true, value_name = "N", default_value_t = DEFAULT_TAB_WIDTH)]
    pub tab_width: usize,

    /// Maximum syntactic nesting depth before parsing stops
    #[arg(long = "max-depth", global = true, value_name = "N", default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    pub max_depth: usize,
}

impl SyntaxArgs {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new()
            .with_tab_width(self.tab_width)
            .with_max_nesting_depth(self.max_depth)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream, one token per line
    Lex {
        /// Source file to tokenize
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the concrete syntax tree
    Parse {
        /// Source file to parse
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print the tree as JSON instead of an S-expression
        #[arg(long)]
        json: bool,
    },

    /// Report syntax diagnostics
    Check {
        /// Source files to check
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the pretty-printed source
    Fmt {
        /// Source file to format
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Spaces per indentation level
        #[arg(long, value_name = "N", default_value_t = 4)]
        indent_width: usize,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let options = cli.options.parse_options();
    tracing::debug!(?options, "parse options");

    match cli.command {
        Command::Lex { file } => commands::lex_file(&file.to_string_lossy(), &options),
        Command::Parse { file, json } => commands::parse_file(&file.to_string_lossy(), &options, json),
        Command::Check { files } => {
            let paths: Vec<String> = files.iter().map(|f| f.to_string_lossy().into_owned()).collect();
            commands::check_files(&paths, &options)
        }
        Command::Fmt { file, indent_width } => commands::format_file(&file.to_string_lossy(), indent_width),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_lex() {
        let cli = Cli::try_parse_from(["flix", "lex", "main.flix"]).unwrap();
        assert!(matches!(cli.command, Command::Lex { .. }));
        assert_eq!(cli.options.tab_width, DEFAULT_TAB_WIDTH);
        assert_eq!(cli.options.max_depth, DEFAULT_MAX_NESTING_DEPTH);
    }

    #[test]
    fn test_cli_parse_json_flag() {
        let cli = Cli::try_parse_from(["flix", "parse", "main.flix", "--json"]).unwrap();
        if let Command::Parse { json, .. } = cli.command {
            assert!(json);
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn test_cli_parse_check_many_files() {
        let cli = Cli::try_parse_from(["flix", "check", "a.flix", "b.flix"]).unwrap();
        if let Command::Check { files } = cli.command {
            assert_eq!(files.len(), 2);
        } else {
            panic!("Expected Check command");
        }
        assert!(Cli::try_parse_from(["flix", "check"]).is_err());
    }

    #[test]
    fn test_cli_parse_fmt_indent_width() {
        let cli = Cli::try_parse_from(["flix", "fmt", "main.flix", "--indent-width", "2"]).unwrap();
        if let Command::Fmt { indent_width, .. } = cli.command {
            assert_eq!(indent_width, 2);
        } else {
            panic!("Expected Fmt command");
        }
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["flix", "parse", "main.flix", "--tab-width", "8", "--max-depth", "16"]).unwrap();
        let options = cli.options.parse_options();
        assert_eq!(options.lexer.tab_width, 8);
        assert_eq!(options.max_nesting_depth, 16);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["flix"]).is_err());
    }

    #[test]
    fn test_execute_reports_missing_file() {
        let cli = Cli::try_parse_from(["flix", "lex", "does/not/exist.flix"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("does/not/exist.flix"));
    }
}
