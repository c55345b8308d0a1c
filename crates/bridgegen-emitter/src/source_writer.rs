//! Indented text output for generated sources.

use bridgegen_common::limits::ARTIFACT_INITIAL_CAPACITY;

/// Buffer that indents the first write of every line.
#[derive(Debug)]
pub struct SourceWriter {
    output: String,
    indent_unit: String,
    indent_level: usize,
    at_line_start: bool,
}

impl SourceWriter {
    /// `indent` spaces per level, or a tab when `indent` is zero.
    #[must_use]
    pub fn new(indent: usize) -> Self {
        let indent_unit = if indent == 0 {
            "\t".to_string()
        } else {
            " ".repeat(indent)
        };
        Self {
            output: String::with_capacity(ARTIFACT_INITIAL_CAPACITY),
            indent_unit,
            indent_level: 0,
            at_line_start: true,
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    fn write_indent_if_needed(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(&self.indent_unit);
            }
            self.at_line_start = false;
        }
    }

    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.write_indent_if_needed();
        self.output.push_str(text);
    }

    pub fn write_char(&mut self, ch: char) {
        self.write_indent_if_needed();
        self.output.push(ch);
    }

    /// End the current line.
    pub fn write_line(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write `text` and end the line.
    pub fn line(&mut self, text: &str) {
        self.write(text);
        self.write_line();
    }

    /// Empty line without trailing indentation.
    pub fn blank_line(&mut self) {
        if !self.at_line_start {
            self.write_line();
        }
        self.output.push('\n');
    }

    /// Write `items` separated by `separator`.
    pub fn write_joined<I, S>(&mut self, separator: &str, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.write(separator);
            }
            self.write(item.as_ref());
        }
    }

    // =========================================================================
    // Indentation
    // =========================================================================

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// `{` on its own line, then indent.
    pub fn open_block(&mut self) {
        self.line("{");
        self.increase_indent();
    }

    /// Dedent, then `}` on its own line.
    pub fn close_block(&mut self) {
        self.decrease_indent();
        self.line("}");
    }

    #[must_use]
    pub const fn indent_level(&self) -> usize {
        self.indent_level
    }

    // =========================================================================
    // Result
    // =========================================================================

    #[must_use]
    pub fn get_output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }
}

#[cfg(test)]
#[path = "tests/source_writer_tests.rs"]
mod tests;
