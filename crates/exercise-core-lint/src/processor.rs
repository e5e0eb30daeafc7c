//! `DocumentProcessor` integration for [`DiagnosticsScanner`].

use crate::scanner::DiagnosticsScanner;
use exercise_core::processing::{DocumentProcessor, ProcessingEdit};
use exercise_core::{DiagnosticOwner, EditorStateManager};
use std::convert::Infallible;

/// Publishes [`DiagnosticsScanner`] results under a fixed owner tag.
///
/// Every run replaces the owner's previous markers wholesale, so stale markers never outlive
/// the scan that superseded them.
#[derive(Debug, Clone)]
pub struct ManualDiagnosticsProcessor {
    owner: DiagnosticOwner,
    scanner: DiagnosticsScanner,
}

impl ManualDiagnosticsProcessor {
    pub fn new(scanner: DiagnosticsScanner) -> Self {
        Self {
            owner: DiagnosticOwner::MANUAL_DIAGNOSTICS,
            scanner,
        }
    }

    pub fn java() -> Result<Self, regex::Error> {
        Ok(Self::new(DiagnosticsScanner::java()?))
    }

    /// Publish under a different owner tag.
    pub fn with_owner(mut self, owner: DiagnosticOwner) -> Self {
        self.owner = owner;
        self
    }

    pub fn owner(&self) -> &DiagnosticOwner {
        &self.owner
    }

    pub fn scanner(&self) -> &DiagnosticsScanner {
        &self.scanner
    }
}

impl DocumentProcessor for ManualDiagnosticsProcessor {
    type Error = Infallible;

    fn process(&mut self, state: &EditorStateManager) -> Result<Vec<ProcessingEdit>, Self::Error> {
        let diagnostics = self.scanner.scan(&state.text());
        tracing::debug!(
            owner = %self.owner,
            version = state.version(),
            count = diagnostics.len(),
            "scanned buffer"
        );
        Ok(vec![ProcessingEdit::ReplaceDiagnostics {
            owner: self.owner.clone(),
            diagnostics,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exercise_core::Diagnostic;

    #[test]
    fn test_process_replaces_owner_markers() {
        let mut processor = ManualDiagnosticsProcessor::java().unwrap();
        let state = EditorStateManager::new(")");

        let edits = processor.process(&state).unwrap();
        assert_eq!(
            edits,
            vec![ProcessingEdit::ReplaceDiagnostics {
                owner: DiagnosticOwner::MANUAL_DIAGNOSTICS,
                diagnostics: vec![
                    Diagnostic::warning(1, 1, "Maybe missing a semicolon?"),
                    Diagnostic::error(1, 1, "Unmatched closing parenthesis."),
                ],
            }]
        );
    }

    #[test]
    fn test_custom_owner() {
        let owner = DiagnosticOwner::new("scratch-lint");
        let mut processor = ManualDiagnosticsProcessor::java()
            .unwrap()
            .with_owner(owner.clone());
        let mut state = EditorStateManager::new("int x = 5");
        state.apply_processor(&mut processor).unwrap();

        assert_eq!(processor.owner(), &owner);
        assert_eq!(state.diagnostics(&owner).len(), 1);
        assert!(
            state
                .diagnostics(&DiagnosticOwner::MANUAL_DIAGNOSTICS)
                .is_empty()
        );
    }
}
