#![warn(missing_docs)]
//! Exercise Core Tutor - hint tutor over a local chat model
//!
//! A [`TutorSession`] owns the lifecycle of a locally running chat model: it loads the model
//! on first use, serializes requests, supports interrupting and unloading, and turns a
//! student's question into a teaching-assistant prompt. Prompt and reply sizes are reported
//! to a [`TelemetrySink`].
//!
//! The model runtime itself is supplied by the host through [`EngineLoader`] and
//! [`ChatEngine`].

pub mod config;
pub mod engine;
pub mod session;
pub mod telemetry;

pub use config::{DEFAULT_MODEL_ID, GenerationConfig, GenerationOverrides, TutorConfig};
pub use engine::{
    ChatChoice, ChatEngine, ChatMessage, ChatRequest, ChatResponse, EngineError, EngineLoader,
    LoadProgress, Role,
};
pub use session::{
    HINT_GENERATION, HINT_SYSTEM_PROMPT, TutorError, TutorSession, UNSUPPORTED_FALLBACK,
};
pub use telemetry::{
    AttemptContext, TelemetryError, TelemetryEvent, TelemetrySink, TracingTelemetry,
};
