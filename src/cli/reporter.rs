use colored::Colorize;

use bridgegen_common::{Diagnostic, DiagnosticCategory};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    #[must_use]
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    #[must_use]
    pub fn render<'a, I>(&self, diagnostics: I) -> String
    where
        I: IntoIterator<Item = &'a Diagnostic>,
    {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.into_iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    /// `Host.cs:12:5 - error BRG013: Type 'Demo.Host' must be ...`
    #[must_use]
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = match &diagnostic.location {
            Some(location) => {
                let text = format!("{}:{}:{}", location.file, location.line, location.column);
                if self.color {
                    text.cyan().to_string()
                } else {
                    text
                }
            }
            None => "<generator>".to_string(),
        };
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);
        output
    }

    /// `Found 2 errors and 1 warning.`, or `None` when there is nothing.
    #[must_use]
    pub fn summary(&self, errors: usize, warnings: usize) -> Option<String> {
        let count = |n: usize, what: &str| {
            if n == 1 {
                format!("1 {what}")
            } else {
                format!("{n} {what}s")
            }
        };
        let text = match (errors, warnings) {
            (0, 0) => return None,
            (e, 0) => format!("Found {}.", count(e, "error")),
            (0, w) => format!("Found {}.", count(w, "warning")),
            (e, w) => format!("Found {} and {}.", count(e, "error"), count(w, "warning")),
        };
        if self.color && errors > 0 {
            Some(text.red().bold().to_string())
        } else {
            Some(text)
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.as_str();
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
        }
    }

    fn format_code(&self, diagnostic: &Diagnostic) -> String {
        let label = diagnostic.id();
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
