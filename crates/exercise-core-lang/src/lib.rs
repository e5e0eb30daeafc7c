#![warn(missing_docs)]
//! `exercise-core-lang` - data-driven language configuration helpers for `exercise-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any parsing system.
//! It provides small structs that lint and completion integrations use to behave in a
//! language-aware way.

/// Comment tokens/config for a given language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`, `#`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `/*`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `*/`).
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            block_start: None,
            block_end: None,
        }
    }

    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block_start: Some(block_start.into()),
            block_end: Some(block_end.into()),
        }
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment tokens are configured.
    pub fn has_block(&self) -> bool {
        self.block_start.as_deref().is_some_and(|s| !s.is_empty())
            && self.block_end.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Per-language knobs for line-level statement heuristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Language identifier (e.g. `java`).
    pub id: String,
    /// Comment tokens.
    pub comments: CommentConfig,
    /// Leading token of continuation lines inside block comments (e.g. `*` in Javadoc).
    pub comment_continuation: Option<String>,
    /// Characters that legitimately end a statement line.
    pub statement_terminators: Vec<char>,
    /// Keywords whose header lines (`if (...)`, bare `else`) end without a terminator.
    pub control_keywords: Vec<String>,
}

impl LanguageConfig {
    /// Java, as used by the exercise editors.
    pub fn java() -> Self {
        Self {
            id: "java".to_string(),
            comments: CommentConfig::line_and_block("//", "/*", "*/"),
            comment_continuation: Some("*".to_string()),
            statement_terminators: vec![';', '{', '}'],
            control_keywords: ["if", "for", "while", "switch", "else"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Look up a built-in configuration by language id.
    pub fn builtin(id: &str) -> Option<Self> {
        match id {
            "java" => Some(Self::java()),
            _ => None,
        }
    }

    /// Line prefixes that mark a line as comment text.
    ///
    /// Only the line-comment token and the block-comment continuation token count; a line
    /// opening a block comment is not treated as a comment line.
    pub fn comment_line_prefixes(&self) -> Vec<&str> {
        self.comments
            .line
            .as_deref()
            .into_iter()
            .chain(self.comment_continuation.as_deref())
            .filter(|prefix| !prefix.is_empty())
            .collect()
    }

    /// Returns `true` if `c` ends a statement line.
    pub fn is_statement_terminator(&self, c: char) -> bool {
        self.statement_terminators.contains(&c)
    }
}
