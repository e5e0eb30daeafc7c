//! Prefix-filtered completion over an [`EditorStateManager`].

use crate::{CompletionCatalog, CompletionError, CompletionItem, expand_snippet};
use exercise_core::{EditError, EditorStateManager, LineIndex};
use std::ops::Range;

/// Characters that should open the suggestion list when typed.
pub const TRIGGER_CHARACTERS: [char; 2] = ['.', '('];

/// Characters that make up the prefix completions are matched against.
fn is_prefix_char(c: char) -> bool {
    c == '_' || c == '.' || c.is_alphanumeric()
}

/// The typed prefix ending at `offset`, and the char range it covers.
///
/// The prefix never crosses a line boundary.
pub fn prefix_at(line_index: &LineIndex, offset: usize) -> (Range<usize>, String) {
    let offset = offset.min(line_index.char_count());
    let (line, column) = line_index.char_offset_to_position(offset);
    let line_text = line_index.get_line_text(line).unwrap_or_default();

    let before: Vec<char> = line_text.chars().take(column).collect();
    let prefix_len = before
        .iter()
        .rev()
        .take_while(|c| is_prefix_char(**c))
        .count();
    let prefix: String = before[before.len() - prefix_len..].iter().collect();

    (offset - prefix_len..offset, prefix)
}

/// Suggestions computed for one caret position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionList<'a> {
    /// Range the accepted item replaces (the typed prefix).
    pub replace_range: Range<usize>,
    /// The typed prefix.
    pub prefix: String,
    /// Matching items, in catalog order.
    pub items: Vec<&'a CompletionItem>,
}

/// Serves completions from a catalog.
#[derive(Debug, Clone)]
pub struct CompletionProvider {
    catalog: CompletionCatalog,
}

impl CompletionProvider {
    /// Create a provider over `catalog`.
    pub fn new(catalog: CompletionCatalog) -> Self {
        Self { catalog }
    }

    /// Provider over the bundled Java catalog.
    pub fn java() -> Result<Self, CompletionError> {
        Ok(Self::new(CompletionCatalog::java()?))
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &CompletionCatalog {
        &self.catalog
    }

    /// Returns `true` if typing `c` should request completions.
    pub fn is_trigger_character(&self, c: char) -> bool {
        TRIGGER_CHARACTERS.contains(&c)
    }

    /// Items whose label starts with `prefix` (ASCII case-insensitive). An empty prefix
    /// matches everything.
    pub fn matching<'a>(&'a self, prefix: &str) -> Vec<&'a CompletionItem> {
        self.catalog
            .items()
            .iter()
            .filter(|item| starts_with_ignore_ascii_case(&item.label, prefix))
            .collect()
    }

    /// Suggestions for the caret at char `offset` of `state`.
    pub fn complete<'a>(&'a self, state: &EditorStateManager, offset: usize) -> CompletionList<'a> {
        let (replace_range, prefix) = prefix_at(state.line_index(), offset);
        let items = self.matching(&prefix);
        tracing::debug!(prefix = %prefix, matches = items.len(), "completion requested");

        CompletionList {
            replace_range,
            prefix,
            items,
        }
    }
}

fn starts_with_ignore_ascii_case(label: &str, prefix: &str) -> bool {
    label
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Accept `item` at char `offset`: replace the typed prefix with the item's text (snippets are
/// expanded) and return the char offset the caret should move to.
pub fn apply_completion(
    state: &mut EditorStateManager,
    offset: usize,
    item: &CompletionItem,
) -> Result<usize, EditError> {
    let char_count = state.line_index().char_count();
    if offset > char_count {
        return Err(EditError::InvalidOffset(offset));
    }

    let (range, _) = prefix_at(state.line_index(), offset);
    let (text, cursor) = if item.is_snippet() {
        let expanded = expand_snippet(&item.insert_text);
        (expanded.text, expanded.cursor)
    } else {
        let len = item.insert_text.chars().count();
        (item.insert_text.clone(), len)
    };

    state.replace(range.start, range.len(), &text)?;
    Ok(range.start + cursor)
}
