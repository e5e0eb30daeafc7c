//! The bundled completion catalog.

use crate::CompletionItem;
use thiserror::Error;

const JAVA_CATALOG: &str = include_str!("../data/java_completions.json");

/// Errors raised while loading a completion catalog.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The catalog JSON could not be parsed.
    #[error("invalid completion catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// An ordered list of completion items.
///
/// Order is preserved from the source data and is the order suggestions are offered in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionCatalog {
    items: Vec<CompletionItem>,
}

impl CompletionCatalog {
    /// Build a catalog from items.
    pub fn new(items: Vec<CompletionItem>) -> Self {
        Self { items }
    }

    /// Parse a catalog from a JSON array of items.
    pub fn from_json(json: &str) -> Result<Self, CompletionError> {
        let items: Vec<CompletionItem> = serde_json::from_str(json)?;
        tracing::debug!(items = items.len(), "loaded completion catalog");
        Ok(Self { items })
    }

    /// The bundled Java catalog (standard library calls, keywords and code templates).
    pub fn java() -> Result<Self, CompletionError> {
        Self::from_json(JAVA_CATALOG)
    }

    /// All items, in catalog order.
    pub fn items(&self) -> &[CompletionItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the catalog has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First item with the given label.
    pub fn get(&self, label: &str) -> Option<&CompletionItem> {
        self.items.iter().find(|item| item.label == label)
    }
}
