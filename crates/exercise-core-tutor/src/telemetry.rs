//! Prompt/reply telemetry.
//!
//! Events carry sizes and identifiers only, never prompt or reply text.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which exercise attempt a request belongs to. Both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptContext {
    /// Attempt counter for the current question.
    pub attempt_no: Option<u32>,
    /// Question being worked on.
    pub question_id: Option<String>,
}

/// A telemetry event, serialized as `{"event": "ai_prompt", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A request was sent to the model.
    AiPrompt {
        /// See [`AttemptContext::attempt_no`].
        attempt_no: Option<u32>,
        /// See [`AttemptContext::question_id`].
        question_id: Option<String>,
        /// Model answering the request.
        model_id: String,
        /// Length of the last user message, in chars.
        prompt_chars: usize,
        /// RFC 3339 timestamp.
        client_ts: String,
    },
    /// The model answered or failed.
    AiReply {
        /// See [`AttemptContext::attempt_no`].
        attempt_no: Option<u32>,
        /// See [`AttemptContext::question_id`].
        question_id: Option<String>,
        /// Model that answered.
        model_id: String,
        /// Length of the reply in chars; `None` on failure.
        reply_chars: Option<usize>,
        /// Failure description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        /// RFC 3339 timestamp.
        client_ts: String,
    },
}

fn client_ts() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl TelemetryEvent {
    /// A prompt event stamped with the current time.
    pub fn prompt(context: &AttemptContext, model_id: &str, prompt_chars: usize) -> Self {
        Self::AiPrompt {
            attempt_no: context.attempt_no,
            question_id: context.question_id.clone(),
            model_id: model_id.to_string(),
            prompt_chars,
            client_ts: client_ts(),
        }
    }

    /// A successful reply event stamped with the current time.
    pub fn reply(context: &AttemptContext, model_id: &str, reply_chars: usize) -> Self {
        Self::AiReply {
            attempt_no: context.attempt_no,
            question_id: context.question_id.clone(),
            model_id: model_id.to_string(),
            reply_chars: Some(reply_chars),
            error: None,
            client_ts: client_ts(),
        }
    }

    /// A failed reply event stamped with the current time.
    pub fn failure(context: &AttemptContext, model_id: &str, error: impl Into<String>) -> Self {
        Self::AiReply {
            attempt_no: context.attempt_no,
            question_id: context.question_id.clone(),
            model_id: model_id.to_string(),
            reply_chars: None,
            error: Some(error.into()),
            client_ts: client_ts(),
        }
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AiPrompt { .. } => "ai_prompt",
            Self::AiReply { .. } => "ai_reply",
        }
    }
}

#[derive(Debug, Error)]
/// Errors reported by telemetry sinks.
pub enum TelemetryError {
    #[error("failed to encode telemetry event: {0}")]
    /// The event could not be serialized.
    Encode(#[from] serde_json::Error),

    #[error("telemetry sink rejected event: {0}")]
    /// The sink refused or failed to store the event.
    Rejected(String),
}

/// Destination for telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Record one event.
    fn record(&self, event: &TelemetryEvent) -> Result<(), TelemetryError>;
}

/// Logs every event as JSON through `tracing` at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn record(&self, event: &TelemetryEvent) -> Result<(), TelemetryError> {
        let payload = serde_json::to_string(event)?;
        tracing::info!(target: "ai_telemetry", event = event.name(), %payload);
        Ok(())
    }
}
