//! Completion item data model.

use serde::{Deserialize, Serialize};

/// A coarse completion kind tag (drives the icon a host shows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionItemKind {
    /// A method or function call.
    Function,
    /// A language keyword.
    Keyword,
    /// A multi-token code template.
    Snippet,
}

/// How `insert_text` should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertTextFormat {
    /// Inserted verbatim.
    #[default]
    PlainText,
    /// Tab stops and placeholders (`$1`, `${1:name}`, `$0`).
    Snippet,
}

/// A single completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    /// Text shown in the suggestion list and matched against the typed prefix.
    pub label: String,
    /// Item kind.
    pub kind: CompletionItemKind,
    /// Text inserted on accept.
    pub insert_text: String,
    /// Interpretation of `insert_text`.
    #[serde(default)]
    pub insert_text_format: InsertTextFormat,
    /// One-line description.
    pub documentation: String,
}

impl CompletionItem {
    /// Returns `true` if `insert_text` uses snippet syntax.
    pub fn is_snippet(&self) -> bool {
        self.insert_text_format == InsertTextFormat::Snippet
    }
}
