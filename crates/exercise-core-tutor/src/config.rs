//! Tutor settings.

use serde::{Deserialize, Serialize};

/// Model loaded when none is configured.
pub const DEFAULT_MODEL_ID: &str = "Llama-3.2-1B-Instruct-q4f32_1-MLC";

/// Generation parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.2,
        }
    }
}

/// Per-call overrides; unset fields fall back to the session's [`GenerationConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOverrides {
    /// Overrides [`GenerationConfig::max_tokens`].
    pub max_tokens: Option<u32>,
    /// Overrides [`GenerationConfig::temperature`].
    pub temperature: Option<f32>,
}

impl GenerationOverrides {
    /// Override the token limit.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Override the temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Merge over `defaults`.
    pub fn resolve(&self, defaults: &GenerationConfig) -> GenerationConfig {
        GenerationConfig {
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
        }
    }
}

/// Tutor session settings, typically read from the `[tutor]` table of a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TutorConfig {
    /// Model loaded on first use.
    pub model_id: String,
    /// Default generation parameters.
    pub generation: GenerationConfig,
    /// Emit prompt/reply telemetry events.
    pub telemetry: bool,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            generation: GenerationConfig::default(),
            telemetry: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_merge() {
        let defaults = GenerationConfig::default();
        assert_eq!(GenerationOverrides::default().resolve(&defaults), defaults);

        let resolved = GenerationOverrides::default()
            .max_tokens(180)
            .resolve(&defaults);
        assert_eq!(resolved.max_tokens, 180);
        assert_eq!(resolved.temperature, 0.2);
    }

    #[test]
    fn test_config_from_toml() {
        let config: TutorConfig = toml::from_str("").unwrap();
        assert_eq!(config, TutorConfig::default());

        let config: TutorConfig = toml::from_str(
            r#"
model_id = "tiny"
telemetry = false

[generation]
max_tokens = 64
"#,
        )
        .unwrap();
        assert_eq!(config.model_id, "tiny");
        assert!(!config.telemetry);
        assert_eq!(config.generation.max_tokens, 64);
        assert_eq!(config.generation.temperature, 0.2);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(toml::from_str::<TutorConfig>("model = \"x\"").is_err());
    }
}
