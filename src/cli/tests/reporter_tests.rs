use super::reporter::Reporter;
use bridgegen_common::{Diagnostic, SourceLocation};

fn diagnostic(code: u32, args: &[&str], location: Option<SourceLocation>) -> Diagnostic {
    Diagnostic::new(code, args, location)
}

#[test]
fn test_format_diagnostic_plain() {
    let reporter = Reporter::new(false);
    let diag = diagnostic(3, &["Demo.Host.Get<T>()"], Some(SourceLocation::new("Host.cs", 12, 5)));
    let text = reporter.format_diagnostic(&diag);
    assert!(text.starts_with("Host.cs:12:5 - error BRG003: "), "{text}");
    assert!(text.ends_with(&diag.message_text));
}

#[test]
fn test_format_diagnostic_without_location() {
    let reporter = Reporter::new(false);
    let diag = diagnostic(1, &["System.Object"], None);
    let text = reporter.format_diagnostic(&diag);
    assert!(text.starts_with("<generator> - error BRG001: "), "{text}");
}

#[test]
fn test_render_joins_lines() {
    let reporter = Reporter::new(false);
    let diags = [
        diagnostic(1, &["System.Object"], None),
        diagnostic(1, &["System.String"], None),
    ];
    let text = reporter.render(&diags);
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn test_summary_counts() {
    let reporter = Reporter::new(false);
    assert_eq!(reporter.summary(0, 0), None);
    assert_eq!(reporter.summary(1, 0).as_deref(), Some("Found 1 error."));
    assert_eq!(reporter.summary(0, 3).as_deref(), Some("Found 3 warnings."));
    assert_eq!(
        reporter.summary(2, 1).as_deref(),
        Some("Found 2 errors and 1 warning.")
    );
}
