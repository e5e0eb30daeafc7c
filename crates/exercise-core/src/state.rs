//! Buffer State Interface
//!
//! [`EditorStateManager`] owns the text of one editor buffer together with its derived state
//! (owner-tagged diagnostics) and exposes:
//!
//! - **Text Edits**: char-offset insert/delete/replace with validation
//! - **Version Tracking**: a version number bumped on every state change
//! - **Change Notifications**: subscriber callbacks for every [`StateChange`]
//! - **Attached Processors**: derived-state producers re-run after each content change
//!
//! # Example
//!
//! ```rust
//! use exercise_core::{EditorStateManager, StateChangeType};
//!
//! let mut manager = EditorStateManager::new("int x = 5");
//!
//! manager.subscribe(|change| {
//!     println!("State changed: {:?}", change.change_type);
//! });
//!
//! manager.insert(9, ";").unwrap();
//! assert_eq!(manager.text(), "int x = 5;");
//! assert!(manager.get_document_state().is_modified);
//! ```

use crate::diagnostics::{Diagnostic, DiagnosticOwner, DiagnosticSeverity};
use crate::processing::{AttachedProcessor, DocumentProcessor, ProcessingEdit};
use crate::LineIndex;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

/// Document state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    /// Total document line count
    pub line_count: usize,
    /// Total document character count
    pub char_count: usize,
    /// Total document byte count
    pub byte_count: usize,
    /// Whether document has been modified since creation or the last save
    pub is_modified: bool,
    /// State version number
    pub version: u64,
}

/// Diagnostics state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsState {
    /// Total number of diagnostics across all owners.
    pub diagnostics_count: usize,
    /// Number of error diagnostics.
    pub error_count: usize,
    /// Number of warning diagnostics.
    pub warning_count: usize,
    /// Number of owners with at least one diagnostic.
    pub owner_count: usize,
}

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Document content modified
    DocumentModified,
    /// Diagnostics changed
    DiagnosticsChanged,
}

/// State change record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// Change type
    pub change_type: StateChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
    /// Affected region in the post-edit document (character offset range)
    pub affected_region: Option<Range<usize>>,
}

impl StateChange {
    /// Create a new state change record without an affected region.
    pub fn new(change_type: StateChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            old_version,
            new_version,
            affected_region: None,
        }
    }

    /// Attach the affected character range to this change record.
    pub fn with_region(mut self, region: Range<usize>) -> Self {
        self.affected_region = Some(region);
        self
    }
}

/// State change callback function type
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Text edit errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The offset lies past the end of the document.
    InvalidOffset(usize),
    /// The range does not fit inside the document.
    InvalidRange {
        /// Range start (char offset).
        start: usize,
        /// Range end (char offset, exclusive).
        end: usize,
    },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::InvalidOffset(offset) => write!(f, "Invalid offset: {}", offset),
            EditError::InvalidRange { start, end } => {
                write!(f, "Invalid range: {}..{}", start, end)
            }
        }
    }
}

impl std::error::Error for EditError {}

/// Buffer state manager
///
/// Holds one buffer's text and derived diagnostics. Every successful, non-empty edit:
///
/// 1. increments the version number and marks the document modified,
/// 2. notifies subscribers with [`StateChangeType::DocumentModified`],
/// 3. re-runs every attached processor and applies its edits (which in turn notify
///    [`StateChangeType::DiagnosticsChanged`]).
pub struct EditorStateManager {
    line_index: LineIndex,
    diagnostics: BTreeMap<DiagnosticOwner, Vec<Diagnostic>>,
    state_version: u64,
    is_modified: bool,
    callbacks: Vec<StateChangeCallback>,
    processors: Vec<AttachedProcessor>,
}

impl fmt::Debug for EditorStateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorStateManager")
            .field("char_count", &self.line_index.char_count())
            .field("version", &self.state_version)
            .field("is_modified", &self.is_modified)
            .field("owner_count", &self.diagnostics.len())
            .field("callback_count", &self.callbacks.len())
            .field("processor_count", &self.processors.len())
            .finish()
    }
}

impl EditorStateManager {
    /// Create a new state manager
    pub fn new(text: &str) -> Self {
        Self {
            line_index: LineIndex::from_text(text),
            diagnostics: BTreeMap::new(),
            state_version: 0,
            is_modified: false,
            callbacks: Vec::new(),
            processors: Vec::new(),
        }
    }

    /// Create an empty state manager
    pub fn empty() -> Self {
        Self::new("")
    }

    /// The line index for the current text.
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// A snapshot of the full buffer text.
    pub fn text(&self) -> String {
        self.line_index.get_text()
    }

    /// Get current version number
    pub fn version(&self) -> u64 {
        self.state_version
    }

    /// Check if state has changed since a version
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.state_version > version
    }

    /// Insert `text` at char offset `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        self.replace(offset, 0, text)
    }

    /// Delete `len` chars starting at `start`.
    pub fn delete(&mut self, start: usize, len: usize) -> Result<(), EditError> {
        self.replace(start, len, "")
    }

    /// Replace `len` chars starting at `start` with `text`, as a single change.
    ///
    /// Edits that neither delete nor insert anything succeed without bumping the version.
    pub fn replace(&mut self, start: usize, len: usize, text: &str) -> Result<(), EditError> {
        let char_count = self.line_index.char_count();
        if start > char_count {
            return Err(EditError::InvalidOffset(start));
        }
        let end = start.saturating_add(len);
        if end > char_count {
            return Err(EditError::InvalidRange { start, end });
        }

        if len == 0 && text.is_empty() {
            return Ok(());
        }

        self.line_index.delete(start, len);
        self.line_index.insert(start, text);

        let inserted = text.chars().count();
        self.document_modified(start..start + inserted);
        Ok(())
    }

    /// Replace the whole buffer.
    pub fn set_text(&mut self, text: &str) {
        if self.line_index.get_text() == text {
            return;
        }

        self.line_index = LineIndex::from_text(text);
        self.document_modified(0..self.line_index.char_count());
    }

    /// Get document state
    pub fn get_document_state(&self) -> DocumentState {
        DocumentState {
            line_count: self.line_index.line_count(),
            char_count: self.line_index.char_count(),
            byte_count: self.line_index.byte_count(),
            is_modified: self.is_modified,
            version: self.state_version,
        }
    }

    /// Get diagnostics state
    pub fn get_diagnostics_state(&self) -> DiagnosticsState {
        let mut state = DiagnosticsState {
            diagnostics_count: 0,
            error_count: 0,
            warning_count: 0,
            owner_count: self.diagnostics.len(),
        };
        for (_, diagnostic) in self.all_diagnostics() {
            state.diagnostics_count += 1;
            match diagnostic.severity {
                DiagnosticSeverity::Error => state.error_count += 1,
                DiagnosticSeverity::Warning => state.warning_count += 1,
            }
        }
        state
    }

    /// Diagnostics currently published under `owner`.
    pub fn diagnostics(&self, owner: &DiagnosticOwner) -> &[Diagnostic] {
        self.diagnostics.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All diagnostics, grouped by owner (owners in sorted order).
    pub fn all_diagnostics(&self) -> impl Iterator<Item = (&DiagnosticOwner, &Diagnostic)> {
        self.diagnostics
            .iter()
            .flat_map(|(owner, items)| items.iter().map(move |d| (owner, d)))
    }

    /// Replace an owner's diagnostics wholesale.
    pub fn replace_diagnostics(&mut self, owner: DiagnosticOwner, diagnostics: Vec<Diagnostic>) {
        if diagnostics.is_empty() {
            self.diagnostics.remove(&owner);
        } else {
            self.diagnostics.insert(owner, diagnostics);
        }
        self.mark_modified(StateChangeType::DiagnosticsChanged);
    }

    /// Clear an owner's diagnostics.
    pub fn clear_diagnostics(&mut self, owner: &DiagnosticOwner) {
        self.diagnostics.remove(owner);
        self.mark_modified(StateChangeType::DiagnosticsChanged);
    }

    /// Apply derived-state edits produced by a document processor.
    pub fn apply_processing_edits<I>(&mut self, edits: I)
    where
        I: IntoIterator<Item = ProcessingEdit>,
    {
        for edit in edits {
            match edit {
                ProcessingEdit::ReplaceDiagnostics { owner, diagnostics } => {
                    self.replace_diagnostics(owner, diagnostics);
                }
                ProcessingEdit::ClearDiagnostics { owner } => {
                    self.clear_diagnostics(&owner);
                }
            }
        }
    }

    /// Run a [`DocumentProcessor`] against the current document and apply its edits.
    pub fn apply_processor<P>(&mut self, processor: &mut P) -> Result<(), P::Error>
    where
        P: DocumentProcessor,
    {
        let edits = processor.process(self)?;
        self.apply_processing_edits(edits);
        Ok(())
    }

    /// Attach a processor to this buffer.
    ///
    /// The processor runs once immediately, then again after every document modification.
    pub fn attach_processor(&mut self, mut processor: AttachedProcessor) {
        let edits = processor.process(self).unwrap_or_else(|never| match never {});
        self.apply_processing_edits(edits);
        self.processors.push(processor);
        tracing::debug!(
            processors = self.processors.len(),
            version = self.state_version,
            "attached document processor"
        );
    }

    /// Number of attached processors.
    pub fn attached_processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Detach every attached processor. Their published diagnostics stay in place.
    pub fn detach_processors(&mut self) -> usize {
        let count = self.processors.len();
        self.processors.clear();
        count
    }

    /// Subscribe to state change notifications
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Mark state as changed and increment version number
    pub fn mark_modified(&mut self, change_type: StateChangeType) {
        let change = self.bump_version(change_type);
        self.notify_callbacks(&change);
    }

    /// Mark document as unmodified (e.g., after saving)
    pub fn mark_saved(&mut self) {
        self.is_modified = false;
    }

    fn document_modified(&mut self, region: Range<usize>) {
        let change = self
            .bump_version(StateChangeType::DocumentModified)
            .with_region(region);
        self.notify_callbacks(&change);
        self.run_attached_processors();
    }

    fn bump_version(&mut self, change_type: StateChangeType) -> StateChange {
        let old_version = self.state_version;
        self.state_version += 1;

        // Only document content changes affect the modified flag
        if matches!(change_type, StateChangeType::DocumentModified) {
            self.is_modified = true;
        }

        StateChange::new(change_type, old_version, self.state_version)
    }

    fn run_attached_processors(&mut self) {
        if self.processors.is_empty() {
            return;
        }

        let mut processors = std::mem::take(&mut self.processors);
        for processor in &mut processors {
            let edits = processor.process(self).unwrap_or_else(|never| match never {});
            self.apply_processing_edits(edits);
        }
        self.processors = processors;
        tracing::debug!(
            processors = self.processors.len(),
            version = self.state_version,
            "re-ran attached processors"
        );
    }

    fn notify_callbacks(&mut self, change: &StateChange) {
        for callback in &mut self.callbacks {
            callback(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_document_state() {
        let manager = EditorStateManager::new("class A {\n}");
        let doc_state = manager.get_document_state();

        assert_eq!(doc_state.line_count, 2);
        assert_eq!(doc_state.char_count, 11);
        assert!(!doc_state.is_modified);
        assert_eq!(doc_state.version, 0);
    }

    #[test]
    fn test_version_tracking() {
        let mut manager = EditorStateManager::new("Test");

        assert!(!manager.has_changed_since(0));
        manager.insert(4, "!").unwrap();

        assert_eq!(manager.version(), 1);
        assert!(manager.has_changed_since(0));
        assert!(!manager.has_changed_since(1));
    }

    #[test]
    fn test_modification_tracking() {
        let mut manager = EditorStateManager::new("Test");

        manager.delete(0, 1).unwrap();
        assert!(manager.get_document_state().is_modified);

        manager.mark_saved();
        assert!(!manager.get_document_state().is_modified);
    }

    #[test]
    fn test_empty_edits_are_noops() {
        let mut manager = EditorStateManager::new("abc");
        manager.insert(1, "").unwrap();
        manager.delete(2, 0).unwrap();
        manager.set_text("abc");
        assert_eq!(manager.version(), 0);
        assert!(!manager.get_document_state().is_modified);
    }

    #[test]
    fn test_out_of_range_edits_fail() {
        let mut manager = EditorStateManager::new("abc");
        assert_eq!(manager.insert(4, "x"), Err(EditError::InvalidOffset(4)));
        assert_eq!(
            manager.delete(2, 5),
            Err(EditError::InvalidRange { start: 2, end: 7 })
        );
        assert_eq!(manager.text(), "abc");
        assert_eq!(manager.version(), 0);
    }

    #[test]
    fn test_replace_reports_region() {
        let mut manager = EditorStateManager::new("int x = 5;");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        manager.subscribe(move |change| {
            seen_clone.lock().unwrap().push(change.clone());
        });

        manager.replace(4, 1, "count").unwrap();
        assert_eq!(manager.text(), "int count = 5;");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].change_type, StateChangeType::DocumentModified);
        assert_eq!(seen[0].affected_region, Some(4..9));
        assert_eq!((seen[0].old_version, seen[0].new_version), (0, 1));
    }

    #[test]
    fn test_diagnostics_state_counts_by_severity() {
        let mut manager = EditorStateManager::new("x");
        manager.replace_diagnostics(
            DiagnosticOwner::MANUAL_DIAGNOSTICS,
            vec![
                Diagnostic::warning(1, 1, "w"),
                Diagnostic::error(1, 1, "e1"),
                Diagnostic::error(1, 1, "e2"),
            ],
        );

        let state = manager.get_diagnostics_state();
        assert_eq!(state.diagnostics_count, 3);
        assert_eq!(state.error_count, 2);
        assert_eq!(state.warning_count, 1);
        assert_eq!(state.owner_count, 1);
    }
}
