//! Serializable lint settings.

use crate::processor::ManualDiagnosticsProcessor;
use crate::scanner::DiagnosticsScanner;
use exercise_core::DiagnosticOwner;
use exercise_core_lang::LanguageConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while turning a [`LintConfig`] into a processor.
pub enum LintConfigError {
    #[error("unknown language '{0}'")]
    /// No built-in configuration exists for the language id.
    UnknownLanguage(String),

    #[error("regex compile error: {0}")]
    /// The control-header pattern failed to compile.
    Regex(#[from] regex::Error),
}

/// Lint settings, typically read from the `[lint]` table of a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Built-in language id.
    pub language: String,
    /// Owner tag the markers are published under.
    pub owner: String,
    /// Report probable missing semicolons.
    pub semicolon_heuristic: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            language: "java".to_string(),
            owner: DiagnosticOwner::MANUAL_DIAGNOSTICS.as_str().to_string(),
            semicolon_heuristic: true,
        }
    }
}

impl LintConfig {
    pub fn language_config(&self) -> Result<LanguageConfig, LintConfigError> {
        LanguageConfig::builtin(&self.language)
            .ok_or_else(|| LintConfigError::UnknownLanguage(self.language.clone()))
    }

    pub fn build_scanner(&self) -> Result<DiagnosticsScanner, LintConfigError> {
        let scanner = DiagnosticsScanner::new(&self.language_config()?)?;
        Ok(scanner.with_semicolon_heuristic(self.semicolon_heuristic))
    }

    pub fn build_processor(&self) -> Result<ManualDiagnosticsProcessor, LintConfigError> {
        Ok(ManualDiagnosticsProcessor::new(self.build_scanner()?)
            .with_owner(DiagnosticOwner::new(self.owner.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_table() {
        let config: LintConfig = toml::from_str("").unwrap();
        assert_eq!(config, LintConfig::default());
        let processor = config.build_processor().unwrap();
        assert_eq!(processor.owner(), &DiagnosticOwner::MANUAL_DIAGNOSTICS);
        assert!(processor.scanner().semicolon_heuristic());
    }

    #[test]
    fn test_overrides() {
        let config: LintConfig = toml::from_str(
            r#"
owner = "lint"
semicolon_heuristic = false
"#,
        )
        .unwrap();
        let processor = config.build_processor().unwrap();
        assert_eq!(processor.owner().as_str(), "lint");
        assert!(!processor.scanner().semicolon_heuristic());
    }

    #[test]
    fn test_unknown_language() {
        let config = LintConfig {
            language: "kotlin".to_string(),
            ..LintConfig::default()
        };
        let err = config.build_processor().unwrap_err();
        assert!(matches!(err, LintConfigError::UnknownLanguage(ref id) if id == "kotlin"));
        assert_eq!(err.to_string(), "unknown language 'kotlin'");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(toml::from_str::<LintConfig>("colour = true").is_err());
    }
}
