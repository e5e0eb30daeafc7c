//! Single-pass bracket/statement scanner.
//!
//! The scanner is a lexical heuristic, not a parser: it looks at each line on its own for a
//! probable missing statement terminator, and keeps one stack per bracket kind to find
//! unbalanced `()`, `{}` and `[]`. String literals and comments are not skipped, and bracket
//! kinds are balanced independently of each other (`( ]` only fails for the `]`).

use exercise_core::{Diagnostic, DiagnosticRange, DiagnosticSeverity};
use exercise_core_lang::LanguageConfig;
use regex::Regex;

/// Message attached to missing-terminator warnings.
pub const MISSING_SEMICOLON_MESSAGE: &str = "Maybe missing a semicolon?";

/// The three tracked bracket families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketKind {
    /// `(` and `)`.
    Round,
    /// `{` and `}`.
    Curly,
    /// `[` and `]`.
    Square,
}

impl BracketKind {
    /// Report order for unmatched openers.
    pub const ALL: [Self; 3] = [Self::Round, Self::Curly, Self::Square];

    /// Human-readable name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Round => "parenthesis",
            Self::Curly => "brace",
            Self::Square => "bracket",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Round => 0,
            Self::Curly => 1,
            Self::Square => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symbol {
    Open(BracketKind),
    Close(BracketKind),
}

fn classify(c: char) -> Option<Symbol> {
    match c {
        '(' => Some(Symbol::Open(BracketKind::Round)),
        ')' => Some(Symbol::Close(BracketKind::Round)),
        '{' => Some(Symbol::Open(BracketKind::Curly)),
        '}' => Some(Symbol::Close(BracketKind::Curly)),
        '[' => Some(Symbol::Open(BracketKind::Square)),
        ']' => Some(Symbol::Close(BracketKind::Square)),
        _ => None,
    }
}

/// Position of an opening symbol still waiting for its closer (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenSymbolMark {
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in chars.
    pub column: usize,
}

/// Scans buffer text for probable missing semicolons and unbalanced brackets.
#[derive(Debug, Clone)]
pub struct DiagnosticsScanner {
    language: LanguageConfig,
    control_header: Option<Regex>,
    semicolon_heuristic: bool,
}

impl DiagnosticsScanner {
    /// Build a scanner from a language configuration.
    ///
    /// Control keywords become an anchored header pattern, e.g. for Java
    /// `^(?:if|for|while|switch|else)(?:\s*\([^\r\n\x{2028}\x{2029}]*\))?$`. The parenthesized
    /// part never spans a line terminator.
    pub fn new(language: &LanguageConfig) -> Result<Self, regex::Error> {
        let control_header = if language.control_keywords.is_empty() {
            None
        } else {
            let keywords = language
                .control_keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(
                r"^(?:{keywords})(?:\s*\([^\r\n\x{{2028}}\x{{2029}}]*\))?$"
            ))?)
        };

        Ok(Self {
            language: language.clone(),
            control_header,
            semicolon_heuristic: true,
        })
    }

    /// The Java scanner used by the exercise editors.
    pub fn java() -> Result<Self, regex::Error> {
        Self::new(&LanguageConfig::java())
    }

    /// Enable or disable the missing-semicolon warnings (bracket errors are always reported).
    pub fn with_semicolon_heuristic(mut self, enabled: bool) -> Self {
        self.semicolon_heuristic = enabled;
        self
    }

    /// Returns `true` if missing-semicolon warnings are enabled.
    pub fn semicolon_heuristic(&self) -> bool {
        self.semicolon_heuristic
    }

    /// Scan `text` and return every diagnostic, in report order:
    ///
    /// 1. line by line: the line's missing-semicolon warning, then its unmatched closers by
    ///    column;
    /// 2. unmatched openers, round then curly then square, each in push order.
    ///
    /// The result depends on `text` alone.
    pub fn scan(&self, text: &str) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut stacks: [Vec<OpenSymbolMark>; 3] = Default::default();

        for (idx, raw_line) in text.split('\n').enumerate() {
            let line_number = idx + 1;
            // Columns are measured without the `\r` of a CRLF ending.
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

            if self.semicolon_heuristic && self.missing_terminator(line) {
                let len = line.chars().count();
                diagnostics.push(Diagnostic::new(
                    DiagnosticRange::new(line_number, len, len + 1),
                    DiagnosticSeverity::Warning,
                    MISSING_SEMICOLON_MESSAGE,
                ));
            }

            for (col, ch) in line.chars().enumerate() {
                let column = col + 1;
                match classify(ch) {
                    Some(Symbol::Open(kind)) => stacks[kind.index()].push(OpenSymbolMark {
                        line: line_number,
                        column,
                    }),
                    Some(Symbol::Close(kind)) => {
                        if stacks[kind.index()].pop().is_none() {
                            diagnostics.push(Diagnostic::error(
                                line_number,
                                column,
                                format!("Unmatched closing {}.", kind.name()),
                            ));
                        }
                    }
                    None => {}
                }
            }
        }

        for kind in BracketKind::ALL {
            for mark in &stacks[kind.index()] {
                diagnostics.push(Diagnostic::error(
                    mark.line,
                    mark.column,
                    format!("Unmatched opening {}.", kind.name()),
                ));
            }
        }

        diagnostics
    }

    fn missing_terminator(&self, line: &str) -> bool {
        let trimmed = line.trim_matches(is_trimmable);
        let Some(last) = trimmed.chars().next_back() else {
            return false;
        };

        if self.language.is_statement_terminator(last) {
            return false;
        }
        if self
            .language
            .comment_line_prefixes()
            .into_iter()
            .any(|prefix| trimmed.starts_with(prefix))
        {
            return false;
        }
        !self
            .control_header
            .as_ref()
            .is_some_and(|header| header.is_match(trimmed))
    }
}

/// Whitespace plus the byte-order mark, which editors leave at the start of the first line.
fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}
