//! The tutor session: lazy engine lifecycle and serialized requests.

use crate::config::{GenerationOverrides, TutorConfig};
use crate::engine::{
    ChatEngine, ChatMessage, ChatRequest, EngineError, EngineLoader, LoadProgress, Role,
};
use crate::telemetry::{AttemptContext, TelemetryEvent, TelemetrySink, TracingTelemetry};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use thiserror::Error;

/// Returned by [`TutorSession::hint`] when the host cannot run a local model.
pub const UNSUPPORTED_FALLBACK: &str = "This browser doesn't support WebGPU; please try an updated Chrome/Edge/Safari, or switch to the compiler hints.";

/// System prompt used for hints.
pub const HINT_SYSTEM_PROMPT: &str = "You are a teaching assistant. First list 1–3 likely root causes tied to the failing tests. Then propose a small patch (≤5 lines) with line refs. Do not output full solutions.";

/// Generation limits used for hints.
pub const HINT_GENERATION: GenerationOverrides = GenerationOverrides {
    max_tokens: Some(180),
    temperature: Some(0.2),
};

#[derive(Debug, Error)]
/// Errors returned by [`TutorSession`].
pub enum TutorError {
    #[error("local model not supported on this host")]
    /// The loader reports no support.
    Unsupported,

    #[error(transparent)]
    /// The engine failed to load or generate.
    Engine(#[from] EngineError),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A tutor backed by a lazily loaded chat engine.
///
/// All methods take `&self`; share the session behind an `Arc` to call it from several
/// threads. At most one request runs at a time, later callers wait their turn.
pub struct TutorSession {
    config: TutorConfig,
    loader: Arc<dyn EngineLoader>,
    engine: Mutex<Option<Arc<dyn ChatEngine>>>,
    in_flight: Mutex<()>,
    context: Mutex<AttemptContext>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
}

impl std::fmt::Debug for TutorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorSession")
            .field("config", &self.config)
            .field("loaded", &self.is_loaded())
            .field("telemetry", &self.telemetry.is_some())
            .finish()
    }
}

impl TutorSession {
    /// Create a session. Nothing is loaded until the first request or [`Self::init`].
    ///
    /// When telemetry is enabled in `config`, events are logged with [`TracingTelemetry`].
    pub fn new(config: TutorConfig, loader: Arc<dyn EngineLoader>) -> Self {
        let telemetry: Option<Arc<dyn TelemetrySink>> = if config.telemetry {
            Some(Arc::new(TracingTelemetry))
        } else {
            None
        };

        Self {
            config,
            loader,
            engine: Mutex::new(None),
            in_flight: Mutex::new(()),
            context: Mutex::new(AttemptContext::default()),
            telemetry,
        }
    }

    /// Send telemetry to `sink` instead of the default. Ignored if telemetry is disabled.
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        if self.config.telemetry {
            self.telemetry = Some(sink);
        }
        self
    }

    /// Session settings.
    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    /// Returns `true` if the host can run a local model.
    pub fn is_supported(&self) -> bool {
        self.loader.is_supported()
    }

    /// Returns `true` if an engine is currently loaded.
    pub fn is_loaded(&self) -> bool {
        match self.engine.try_lock() {
            Ok(slot) => slot.is_some(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
            Err(TryLockError::WouldBlock) => false,
        }
    }

    /// Set the attempt context attached to subsequent telemetry events.
    pub fn set_attempt_context(&self, context: AttemptContext) {
        *lock(&self.context) = context;
    }

    /// Load the engine if needed; progress is logged.
    pub fn init(&self) -> Result<Arc<dyn ChatEngine>, TutorError> {
        self.init_with_progress(&mut |progress: &LoadProgress| {
            tracing::info!(progress = progress.progress, status = %progress.text, "loading model");
        })
    }

    /// Load the engine if needed, reporting progress to `on_progress`.
    ///
    /// Idempotent: concurrent callers wait for one load and share its engine.
    pub fn init_with_progress(
        &self,
        on_progress: &mut dyn FnMut(&LoadProgress),
    ) -> Result<Arc<dyn ChatEngine>, TutorError> {
        let mut slot = lock(&self.engine);
        if let Some(engine) = slot.as_ref() {
            return Ok(Arc::clone(engine));
        }
        if !self.loader.is_supported() {
            tracing::warn!("local model not supported on this host");
            return Err(TutorError::Unsupported);
        }

        tracing::info!(model_id = %self.config.model_id, "initializing model engine");
        let engine = self.loader.load(&self.config.model_id, on_progress)?;
        *slot = Some(Arc::clone(&engine));
        Ok(engine)
    }

    /// Send `messages` and return the first choice's text (`""` if the engine returned none).
    ///
    /// Loads the engine on first use. Calls are serialized.
    pub fn ask(
        &self,
        messages: Vec<ChatMessage>,
        overrides: GenerationOverrides,
    ) -> Result<String, TutorError> {
        let engine = self.init()?;
        let _turn = lock(&self.in_flight);

        let context = lock(&self.context).clone();
        let model_id = engine.model_id().to_string();
        let prompt_chars = messages
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .map(|message| message.content.chars().count())
            .unwrap_or(0);
        self.emit(&TelemetryEvent::prompt(&context, &model_id, prompt_chars));

        let generation = overrides.resolve(&self.config.generation);
        let request = ChatRequest {
            messages,
            max_tokens: generation.max_tokens,
            temperature: generation.temperature,
        };

        match engine.complete(&request) {
            Ok(response) => {
                let text = response.first_text().to_string();
                self.emit(&TelemetryEvent::reply(
                    &context,
                    &model_id,
                    text.chars().count(),
                ));
                Ok(text)
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat completion failed");
                self.emit(&TelemetryEvent::failure(&context, &model_id, err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Ask for a hint about `question`.
    ///
    /// Returns [`UNSUPPORTED_FALLBACK`] instead of an error when the host cannot run a model.
    pub fn hint(&self, question: &str) -> Result<String, TutorError> {
        if !self.loader.is_supported() {
            return Ok(UNSUPPORTED_FALLBACK.to_string());
        }

        let messages = vec![
            ChatMessage::system(HINT_SYSTEM_PROMPT),
            ChatMessage::user(format!("Question:\n{question}")),
        ];
        self.ask(messages, HINT_GENERATION)
    }

    /// Interrupt the running generation, if any.
    ///
    /// Returns `true` if the engine accepted the interrupt. Does nothing while the engine is
    /// still loading.
    pub fn cancel(&self) -> bool {
        let engine = match self.engine.try_lock() {
            Ok(slot) => slot.clone(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().clone(),
            Err(TryLockError::WouldBlock) => return false,
        };
        engine.is_some_and(|engine| engine.interrupt())
    }

    /// Drop the engine handle. The next request loads a fresh engine.
    ///
    /// A request already running keeps its engine until it finishes. Returns `true` if an
    /// engine was loaded.
    pub fn unload(&self) -> bool {
        let unloaded = lock(&self.engine).take().is_some();
        if unloaded {
            tracing::info!("model engine unloaded");
        }
        unloaded
    }

    fn emit(&self, event: &TelemetryEvent) {
        let Some(sink) = self.telemetry.as_ref() else {
            return;
        };
        if let Err(err) = sink.record(event) {
            tracing::warn!(event = event.name(), error = %err, "dropping telemetry event");
        }
    }
}
