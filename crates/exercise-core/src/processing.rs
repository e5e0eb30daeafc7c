//! Generic document processing interfaces.
//!
//! This module defines a shared "edit" format for derived buffer state. Integration crates
//! (`exercise-core-*`) produce [`ProcessingEdit`] values and apply them to an
//! [`EditorStateManager`] via
//! [`EditorStateManager::apply_processing_edits`](crate::EditorStateManager::apply_processing_edits).

use crate::EditorStateManager;
use crate::diagnostics::{Diagnostic, DiagnosticOwner};
use std::convert::Infallible;

/// A change to derived buffer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingEdit {
    /// Replace every diagnostic published under `owner` with `diagnostics`.
    ReplaceDiagnostics {
        /// The producer whose markers are replaced.
        owner: DiagnosticOwner,
        /// The complete new set for that producer.
        diagnostics: Vec<Diagnostic>,
    },
    /// Drop every diagnostic published under `owner`.
    ClearDiagnostics {
        /// The producer whose markers are cleared.
        owner: DiagnosticOwner,
    },
}

/// A generic processor that produces [`ProcessingEdit`]s for a buffer.
pub trait DocumentProcessor {
    /// The error type returned by [`DocumentProcessor::process`].
    type Error;

    /// Compute derived state updates to apply to the buffer.
    ///
    /// Implementations should avoid mutating `state`; instead, return edits that the caller can
    /// apply (e.g. via [`EditorStateManager::apply_processing_edits`](crate::EditorStateManager::apply_processing_edits)).
    fn process(&mut self, state: &EditorStateManager) -> Result<Vec<ProcessingEdit>, Self::Error>;
}

/// A processor that can be attached to a buffer and re-run on every content change.
///
/// See [`EditorStateManager::attach_processor`](crate::EditorStateManager::attach_processor).
pub type AttachedProcessor = Box<dyn DocumentProcessor<Error = Infallible> + Send>;
