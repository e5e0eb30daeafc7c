//! Chat-completion engine abstraction.
//!
//! The model runtime (a local WebGPU engine in the browser, or anything else that speaks the
//! OpenAI-style chat shape) sits behind two traits: an [`EngineLoader`] that reports whether
//! the host can run a model at all and loads one, and the loaded [`ChatEngine`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Role of a chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model.
    System,
    /// The student.
    User,
    /// The model.
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a message.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A completion request, with generation settings already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far.
    pub messages: Vec<ChatMessage>,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// One generated alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    pub message: ChatMessage,
}

/// A completion response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated alternatives; may be empty.
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// Response with a single assistant choice.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: ChatMessage::assistant(text),
            }],
        }
    }

    /// Text of the first choice, or `""` if there is none.
    pub fn first_text(&self) -> &str {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or("")
    }
}

/// Model download/compile progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadProgress {
    /// Fraction done, `0.0..=1.0`.
    pub progress: f32,
    /// Human-readable status line.
    pub text: String,
}

#[derive(Debug, Error)]
/// Errors raised by engine implementations.
pub enum EngineError {
    #[error("this host cannot run a local model")]
    /// The host lacks the required accelerator support.
    Unsupported,

    #[error("failed to load model '{model_id}': {reason}")]
    /// Loading the model failed.
    Load {
        /// Requested model id.
        model_id: String,
        /// Engine-provided reason.
        reason: String,
    },

    #[error("generation interrupted")]
    /// The running generation was interrupted.
    Interrupted,

    #[error("generation failed: {0}")]
    /// The engine failed while generating.
    Generation(String),
}

/// A loaded model that can answer chat requests.
///
/// Implementations must tolerate [`ChatEngine::interrupt`] being called from another thread
/// while [`ChatEngine::complete`] is running.
pub trait ChatEngine: Send + Sync {
    /// Run a completion to the end.
    fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, EngineError>;

    /// Interrupt the running generation.
    ///
    /// Returns `false` if this engine cannot be interrupted.
    fn interrupt(&self) -> bool {
        false
    }

    /// Id of the loaded model.
    fn model_id(&self) -> &str;
}

/// Creates [`ChatEngine`]s.
pub trait EngineLoader: Send + Sync {
    /// Returns `true` if the host can run a local model.
    fn is_supported(&self) -> bool;

    /// Load `model_id`, reporting progress along the way.
    fn load(
        &self,
        model_id: &str,
        progress: &mut dyn FnMut(&LoadProgress),
    ) -> Result<Arc<dyn ChatEngine>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text() {
        assert_eq!(ChatResponse::default().first_text(), "");
        assert_eq!(ChatResponse::from_text("hi").first_text(), "hi");
    }

    #[test]
    fn test_message_wire_shape() {
        let json = serde_json::to_value(ChatMessage::system("be brief")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "role": "system", "content": "be brief" })
        );
    }
}
