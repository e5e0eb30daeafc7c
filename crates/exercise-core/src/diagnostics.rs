//! First-class diagnostics data model.
//!
//! Diagnostics are derived buffer state: positioned, advisory messages (warnings/errors) that
//! a host renders as inline markers or gutter icons. Every diagnostic set is published under a
//! [`DiagnosticOwner`] tag, so one producer replacing its markers never touches markers that
//! came from another producer.

use crate::LineIndex;
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Identifies the producer of a set of diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiagnosticOwner(Cow<'static, str>);

impl DiagnosticOwner {
    /// Markers produced by the built-in bracket/statement scanner.
    pub const MANUAL_DIAGNOSTICS: Self = Self(Cow::Borrowed("manualDiagnostics"));

    /// Create a new owner tag.
    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Self(tag.into())
    }

    /// The tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagnosticOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single-line marker range.
///
/// `line` and `start_column` are 1-based; `end_column` is exclusive. Columns count Unicode
/// scalar values (`char`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiagnosticRange {
    /// 1-based line number.
    pub line: usize,
    /// 1-based start column (inclusive).
    pub start_column: usize,
    /// End column (exclusive).
    pub end_column: usize,
}

impl DiagnosticRange {
    /// Create a new diagnostic range.
    pub fn new(line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            line,
            start_column,
            end_column,
        }
    }

    /// A range covering exactly one column.
    pub fn point(line: usize, column: usize) -> Self {
        Self::new(line, column, column + 1)
    }

    /// Map this range to a half-open document char-offset range.
    ///
    /// Both ends clamp to the line's text, so a marker placed one past the last character
    /// still resolves to a valid (possibly empty) range.
    pub fn to_char_range(&self, line_index: &LineIndex) -> Range<usize> {
        let line = self.line.saturating_sub(1);
        let start =
            line_index.position_to_char_offset(line, self.start_column.saturating_sub(1));
        let end = line_index
            .position_to_char_offset(line, self.end_column.saturating_sub(1))
            .max(start);
        start..end
    }
}

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    /// Structural problems (e.g. unbalanced brackets).
    Error,
    /// Style heuristics (e.g. a probable missing semicolon).
    Warning,
}

impl DiagnosticSeverity {
    /// Lowercase name, as printed by command line tools.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic item for a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Marker position.
    pub range: DiagnosticRange,
    /// Severity.
    pub severity: DiagnosticSeverity,
    /// Diagnostic message.
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(
        range: DiagnosticRange,
        severity: DiagnosticSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            range,
            severity,
            message: message.into(),
        }
    }

    /// A single-column error marker.
    pub fn error(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::new(
            DiagnosticRange::point(line, column),
            DiagnosticSeverity::Error,
            message,
        )
    }

    /// A single-column warning marker.
    pub fn warning(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::new(
            DiagnosticRange::point(line, column),
            DiagnosticSeverity::Warning,
            message,
        )
    }

    /// Returns `true` for [`DiagnosticSeverity::Error`].
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}
