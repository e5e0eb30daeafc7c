#![warn(missing_docs)]
//! Exercise Core - headless buffer model for coding-exercise editors
//!
//! # Overview
//!
//! `exercise-core` models the editor widgets of a coding-exercise page without rendering
//! anything: buffer text, version tracking, change notifications and owner-tagged diagnostics.
//! Integration crates compute derived state (lint markers and the like) through the
//! [`DocumentProcessor`] interface and hand it back as [`ProcessingEdit`]s.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Workspace (multiple buffers)               │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  State Management + Attached Processors     │  ← Notifications
//! ├─────────────────────────────────────────────┤
//! │  Diagnostics (owner-tagged markers)         │  ← Derived State
//! ├─────────────────────────────────────────────┤
//! │  Line Index (Rope-based)                    │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use exercise_core::{Diagnostic, DiagnosticOwner, EditorStateManager, ProcessingEdit};
//!
//! let mut manager = EditorStateManager::new("foo(");
//!
//! manager.apply_processing_edits(vec![ProcessingEdit::ReplaceDiagnostics {
//!     owner: DiagnosticOwner::MANUAL_DIAGNOSTICS,
//!     diagnostics: vec![Diagnostic::error(1, 4, "Unmatched opening parenthesis.")],
//! }]);
//!
//! assert_eq!(manager.get_diagnostics_state().error_count, 1);
//! ```
//!
//! # Module Description
//!
//! - [`line_index`] - Rope based line index
//! - [`diagnostics`] - Diagnostic markers and owner tags
//! - [`processing`] - Derived-state processors and edits
//! - [`state`] - Buffer state management and change notifications
//! - [`workspace`] - Multi-buffer workspace

pub mod diagnostics;
pub mod line_index;
pub mod processing;
pub mod state;
pub mod workspace;

pub use diagnostics::{Diagnostic, DiagnosticOwner, DiagnosticRange, DiagnosticSeverity};
pub use line_index::LineIndex;
pub use processing::{AttachedProcessor, DocumentProcessor, ProcessingEdit};
pub use state::{
    DiagnosticsState, DocumentState, EditError, EditorStateManager, StateChange,
    StateChangeCallback, StateChangeType,
};
pub use workspace::{BufferId, BufferMetadata, Workspace, WorkspaceError};
