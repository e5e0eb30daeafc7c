#![warn(missing_docs)]
//! Exercise Core Completion - static Java completions for exercise editors
//!
//! Serves suggestions from a bundled catalog of Java standard library calls, keywords and
//! code templates, filtered by the prefix typed before the caret. Snippet items are expanded
//! to plain text with a caret position when accepted.
//!
//! ```rust
//! use exercise_core::EditorStateManager;
//! use exercise_core_completion::{CompletionProvider, apply_completion};
//!
//! let provider = CompletionProvider::java().unwrap();
//! let mut state = EditorStateManager::new("System.out.pri");
//!
//! let list = provider.complete(&state, 14);
//! let item = list.items[0].clone();
//! assert_eq!(item.label, "System.out.println");
//!
//! let cursor = apply_completion(&mut state, 14, &item).unwrap();
//! assert_eq!(state.text(), "System.out.println(message);");
//! assert_eq!(cursor, 26);
//! ```

pub mod catalog;
pub mod item;
pub mod provider;
pub mod snippet;

pub use catalog::{CompletionCatalog, CompletionError};
pub use item::{CompletionItem, CompletionItemKind, InsertTextFormat};
pub use provider::{
    CompletionList, CompletionProvider, TRIGGER_CHARACTERS, apply_completion, prefix_at,
};
pub use snippet::{ExpandedSnippet, expand_snippet};
