//! `exercise-core-lint` - lightweight bracket/statement diagnostics for `exercise-core`.
//!
//! This crate is a single-pass lexical check intended for exercise editors, where a full
//! compiler round-trip is too slow for as-you-type feedback. It is *not* a parser: it flags
//! probable missing semicolons and unbalanced `()`, `{}`, `[]`.
//!
//! ```rust
//! use exercise_core::{DiagnosticOwner, Workspace};
//! use exercise_core_lint::{DiagnosticsScanner, init_manual_diagnostics};
//!
//! let mut workspace = Workspace::new();
//! let answer = workspace.open_buffer(None, "int x = 5").unwrap();
//!
//! let scanner = DiagnosticsScanner::java().unwrap();
//! init_manual_diagnostics(&mut workspace, &[answer], &scanner);
//!
//! let buffer = workspace.buffer(answer).unwrap();
//! assert_eq!(buffer.diagnostics(&DiagnosticOwner::MANUAL_DIAGNOSTICS).len(), 1);
//! ```

pub mod config;
pub mod processor;
pub mod scanner;

pub use config::{LintConfig, LintConfigError};
pub use processor::ManualDiagnosticsProcessor;
pub use scanner::{BracketKind, DiagnosticsScanner, MISSING_SEMICOLON_MESSAGE, OpenSymbolMark};

use exercise_core::{BufferId, Workspace};

/// Attach a [`ManualDiagnosticsProcessor`] to each listed buffer.
///
/// Each buffer is scanned once right away and again after every content change. Ids that are
/// not open in `workspace` are skipped with a warning. Returns the number of buffers attached.
pub fn init_manual_diagnostics(
    workspace: &mut Workspace,
    buffers: &[BufferId],
    scanner: &DiagnosticsScanner,
) -> usize {
    let mut attached = 0;
    for &id in buffers {
        let Ok(state) = workspace.buffer_mut(id) else {
            tracing::warn!(buffer = %id, "init_manual_diagnostics: buffer not open, skipping");
            continue;
        };
        state.attach_processor(Box::new(ManualDiagnosticsProcessor::new(scanner.clone())));
        attached += 1;
    }
    tracing::info!(
        requested = buffers.len(),
        attached,
        "manual diagnostics initialized"
    );
    attached
}
