//! Lexer and parser configuration.

/// Default column width of a tab in indentation.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Default nesting depth at which parsing stops.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

/// Configuration for the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerConfig {
    /// Column width of a tab stop when measuring indentation.
    pub tab_width: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Configuration for one parse session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub lexer: LexerConfig,
    /// Nesting depth (expressions, types, patterns, blocks) at which parsing stops with `NestingTooDeep`.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            lexer: LexerConfig::default(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tab width used for indentation columns
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.lexer.tab_width = width.max(1);
        self
    }

    /// Set the nesting guard
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}
