//! Lint result rendering.

use exercise_core::{Diagnostic, DiagnosticSeverity};
use serde::Serialize;

/// One marker, tagged with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub path: String,
    pub line: usize,
    pub column: usize,
    pub end_column: usize,
    pub severity: &'static str,
    pub message: String,
}

impl Finding {
    pub fn new(path: &str, diagnostic: &Diagnostic) -> Self {
        Self {
            path: path.to_string(),
            line: diagnostic.range.line,
            column: diagnostic.range.start_column,
            end_column: diagnostic.range.end_column,
            severity: diagnostic.severity.as_str(),
            message: diagnostic.message.clone(),
        }
    }

    /// `path:line:col: severity: message`
    pub fn to_line(&self) -> String {
        format!(
            "{}:{}:{}: {}: {}",
            self.path, self.line, self.column, self.severity, self.message
        )
    }
}

/// Error/warning totals over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl Summary {
    pub fn add(&mut self, diagnostics: &[Diagnostic]) {
        self.files += 1;
        for diagnostic in diagnostics {
            match diagnostic.severity {
                DiagnosticSeverity::Error => self.errors += 1,
                DiagnosticSeverity::Warning => self.warnings += 1,
            }
        }
    }

    /// Whether the run should exit non-zero.
    pub fn failed(&self, deny_warnings: bool) -> bool {
        self.errors > 0 || (deny_warnings && self.warnings > 0)
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    findings: &'a [Finding],
    summary: Summary,
}

pub fn to_json(findings: &[Finding], summary: Summary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport { findings, summary })
}
