//! Formatting configuration for Flix

/// Formatting configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Whether top-level definitions are separated by a blank line
    pub blank_line_between_definitions: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            blank_line_between_definitions: true,
        }
    }
}

impl FormatConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width (at least one column, so nested blocks stay distinguishable)
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.max(1);
        self
    }

    /// Keep or drop the blank line between top-level definitions
    pub fn with_blank_line_between_definitions(mut self, enabled: bool) -> Self {
        self.blank_line_between_definitions = enabled;
        self
    }
}
