//! Output writer with indentation tracking
//!
//! Handles writing formatted code with proper indentation.

use super::config::FormatConfig;

/// Writer that tracks indentation and builds formatted output
pub struct FormatWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Configuration
    config: FormatConfig,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl FormatWriter {
    /// Create a new format writer with the given config
    pub fn new(config: FormatConfig) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            config,
            at_line_start: true,
        }
    }

    /// Get the formatted output, ending with exactly one newline (or empty)
    pub fn finish(mut self) -> String {
        let trimmed = self.output.trim_end().len();
        self.output.truncate(trimmed);
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write indentation if at line start
    fn write_indent(&mut self) {
        if self.at_line_start {
            let indent = " ".repeat(self.indent_level * self.config.indent_width);
            self.output.push_str(&indent);
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    /// Write a single space unless at the start of a line
    pub fn space(&mut self) {
        if !self.at_line_start {
            self.output.push(' ');
        }
    }

    /// End the current line; repeated calls at the start of a line do nothing
    pub fn newline(&mut self) {
        if !self.at_line_start {
            self.output.push('\n');
            self.at_line_start = true;
        }
    }

    /// End the current line and leave one blank line
    pub fn blank_line(&mut self) {
        self.newline();
        if !self.output.is_empty() && !self.output.ends_with("\n\n") {
            self.output.push('\n');
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &FormatConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> FormatWriter {
        FormatWriter::new(FormatConfig::default())
    }

    #[test]
    fn test_write_indents_only_at_line_start() {
        let mut w = writer();
        w.indent();
        w.write("a");
        w.space();
        w.write("b");
        w.newline();
        w.write("c");
        assert_eq!(w.finish(), "    a b\n    c\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut w = writer();
        w.dedent();
        w.indent();
        w.write("a");
        assert_eq!(w.finish(), "    a\n");
    }

    #[test]
    fn test_newline_and_blank_line_collapse() {
        let mut w = writer();
        w.write("a");
        w.newline();
        w.newline();
        w.blank_line();
        w.blank_line();
        w.write("b");
        assert_eq!(w.finish(), "a\n\nb\n");
    }

    #[test]
    fn test_empty_output_stays_empty() {
        let mut w = writer();
        w.newline();
        assert_eq!(w.finish(), "");
    }
}
