use exercise_core_tutor::{
    AttemptContext, ChatEngine, ChatMessage, ChatRequest, ChatResponse, EngineError,
    EngineLoader, GenerationOverrides, HINT_SYSTEM_PROMPT, LoadProgress, TelemetryError,
    TelemetryEvent, TelemetrySink, TutorConfig, TutorError, TutorSession, UNSUPPORTED_FALLBACK,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Replies with a canned answer and records what it was asked.
struct FakeEngine {
    model_id: String,
    reply: Option<String>,
    fail: bool,
    delay: Duration,
    active: AtomicUsize,
    max_active: AtomicUsize,
    interrupted: AtomicBool,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeEngine {
    fn new(model_id: &str, reply: Option<&str>) -> Self {
        Self {
            model_id: model_id.to_string(),
            reply: reply.map(String::from),
            fail: false,
            delay: Duration::ZERO,
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            interrupted: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl ChatEngine for FakeEngine {
    fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, EngineError> {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        thread::sleep(self.delay);
        self.requests.lock().unwrap().push(request.clone());
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(EngineError::Generation("out of memory".to_string()));
        }
        Ok(match &self.reply {
            Some(text) => ChatResponse::from_text(text.clone()),
            None => ChatResponse::default(),
        })
    }

    fn interrupt(&self) -> bool {
        self.interrupted.store(true, Ordering::SeqCst);
        true
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

struct FakeLoader {
    supported: bool,
    engine: Arc<FakeEngine>,
    loads: AtomicUsize,
    requested_models: Mutex<Vec<String>>,
}

impl FakeLoader {
    fn new(engine: FakeEngine) -> Arc<Self> {
        Arc::new(Self {
            supported: true,
            engine: Arc::new(engine),
            loads: AtomicUsize::new(0),
            requested_models: Mutex::new(Vec::new()),
        })
    }

    fn unsupported() -> Arc<Self> {
        Arc::new(Self {
            supported: false,
            engine: Arc::new(FakeEngine::new("none", None)),
            loads: AtomicUsize::new(0),
            requested_models: Mutex::new(Vec::new()),
        })
    }
}

impl EngineLoader for FakeLoader {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn load(
        &self,
        model_id: &str,
        progress: &mut dyn FnMut(&LoadProgress),
    ) -> Result<Arc<dyn ChatEngine>, EngineError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.requested_models
            .lock()
            .unwrap()
            .push(model_id.to_string());
        progress(&LoadProgress {
            progress: 0.5,
            text: "fetching weights".to_string(),
        });
        progress(&LoadProgress {
            progress: 1.0,
            text: "ready".to_string(),
        });
        let engine: Arc<dyn ChatEngine> = self.engine.clone();
        Ok(engine)
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl TelemetrySink for RecordingSink {
    fn record(&self, event: &TelemetryEvent) -> Result<(), TelemetryError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

struct FailingSink;

impl TelemetrySink for FailingSink {
    fn record(&self, _event: &TelemetryEvent) -> Result<(), TelemetryError> {
        Err(TelemetryError::Rejected("offline".to_string()))
    }
}

#[test]
fn test_lazy_init_on_first_ask() {
    let loader = FakeLoader::new(FakeEngine::new("tiny", Some("Check line 3.")));
    let session = TutorSession::new(TutorConfig::default(), loader.clone());
    assert!(!session.is_loaded());

    let reply = session
        .ask(vec![ChatMessage::user("why?")], GenerationOverrides::default())
        .unwrap();
    assert_eq!(reply, "Check line 3.");
    assert!(session.is_loaded());
    assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    assert_eq!(
        loader.requested_models.lock().unwrap().as_slice(),
        ["Llama-3.2-1B-Instruct-q4f32_1-MLC".to_string()]
    );

    let request = loader.engine.requests.lock().unwrap()[0].clone();
    assert_eq!(request.max_tokens, 1000);
    assert_eq!(request.temperature, 0.2);
}

#[test]
fn test_init_is_idempotent_and_reports_progress() {
    let loader = FakeLoader::new(FakeEngine::new("tiny", Some("ok")));
    let session = TutorSession::new(TutorConfig::default(), loader.clone());

    let mut seen = Vec::new();
    session
        .init_with_progress(&mut |p: &LoadProgress| seen.push(p.progress))
        .unwrap();
    session.init().unwrap();
    session
        .ask(vec![ChatMessage::user("q")], GenerationOverrides::default())
        .unwrap();

    assert_eq!(seen, vec![0.5, 1.0]);
    assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_choices_give_empty_string() {
    let loader = FakeLoader::new(FakeEngine::new("tiny", None));
    let session = TutorSession::new(TutorConfig::default(), loader);
    let reply = session
        .ask(vec![ChatMessage::user("q")], GenerationOverrides::default())
        .unwrap();
    assert_eq!(reply, "");
}

#[test]
fn test_overrides_apply_per_call() {
    let loader = FakeLoader::new(FakeEngine::new("tiny", Some("ok")));
    let session = TutorSession::new(TutorConfig::default(), loader.clone());
    session
        .ask(
            vec![ChatMessage::user("q")],
            GenerationOverrides::default().max_tokens(12),
        )
        .unwrap();

    let request = loader.engine.requests.lock().unwrap()[0].clone();
    assert_eq!(request.max_tokens, 12);
    assert_eq!(request.temperature, 0.2);
}

#[test]
fn test_concurrent_asks_are_serialized() {
    let mut engine = FakeEngine::new("tiny", Some("ok"));
    engine.delay = Duration::from_millis(20);
    let loader = FakeLoader::new(engine);
    let session = Arc::new(TutorSession::new(TutorConfig::default(), loader.clone()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                session.ask(
                    vec![ChatMessage::user(format!("q{i}"))],
                    GenerationOverrides::default(),
                )
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "ok");
    }

    assert_eq!(loader.engine.max_active.load(Ordering::SeqCst), 1);
    assert_eq!(loader.engine.requests.lock().unwrap().len(), 4);
    assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unload_then_reload() {
    let loader = FakeLoader::new(FakeEngine::new("tiny", Some("ok")));
    let session = TutorSession::new(TutorConfig::default(), loader.clone());

    assert!(!session.unload());
    session.init().unwrap();
    assert!(session.unload());
    assert!(!session.is_loaded());

    session
        .ask(vec![ChatMessage::user("q")], GenerationOverrides::default())
        .unwrap();
    assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
}

#[test]
fn test_cancel() {
    let loader = FakeLoader::new(FakeEngine::new("tiny", Some("ok")));
    let session = TutorSession::new(TutorConfig::default(), loader.clone());

    // Nothing loaded yet.
    assert!(!session.cancel());
    session.init().unwrap();
    assert!(session.cancel());
    assert!(loader.engine.interrupted.load(Ordering::SeqCst));
}

#[test]
fn test_unsupported_host() {
    let session = TutorSession::new(TutorConfig::default(), FakeLoader::unsupported());

    assert_eq!(session.hint("why?").unwrap(), UNSUPPORTED_FALLBACK);
    assert!(matches!(
        session.ask(vec![ChatMessage::user("q")], GenerationOverrides::default()),
        Err(TutorError::Unsupported)
    ));
}

#[test]
fn test_hint_prompt() {
    let loader = FakeLoader::new(FakeEngine::new("tiny", Some("Root cause: off by one.")));
    let session = TutorSession::new(TutorConfig::default(), loader.clone());

    let reply = session.hint("Why does test 2 fail?").unwrap();
    assert_eq!(reply, "Root cause: off by one.");

    let request = loader.engine.requests.lock().unwrap()[0].clone();
    assert_eq!(
        request.messages,
        vec![
            ChatMessage::system(HINT_SYSTEM_PROMPT),
            ChatMessage::user("Question:\nWhy does test 2 fail?"),
        ]
    );
    assert_eq!(request.max_tokens, 180);
    assert_eq!(request.temperature, 0.2);
}

#[test]
fn test_telemetry_events() {
    let loader = FakeLoader::new(FakeEngine::new("tiny", Some("four")));
    let sink = Arc::new(RecordingSink::default());
    let session = TutorSession::new(TutorConfig::default(), loader).with_telemetry(sink.clone());
    session.set_attempt_context(AttemptContext {
        attempt_no: Some(3),
        question_id: Some("q-9".to_string()),
    });

    session
        .ask(
            vec![
                ChatMessage::user("first question"),
                ChatMessage::assistant("answer"),
                ChatMessage::user("héllo"),
            ],
            GenerationOverrides::default(),
        )
        .unwrap();

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 2);
    match &events[0] {
        TelemetryEvent::AiPrompt {
            attempt_no,
            question_id,
            model_id,
            prompt_chars,
            ..
        } => {
            assert_eq!(*attempt_no, Some(3));
            assert_eq!(question_id.as_deref(), Some("q-9"));
            assert_eq!(model_id, "tiny");
            assert_eq!(*prompt_chars, 5);
        }
        other => panic!("unexpected event {other:?}"),
    }
    match &events[1] {
        TelemetryEvent::AiReply {
            reply_chars, error, ..
        } => {
            assert_eq!(*reply_chars, Some(4));
            assert_eq!(*error, None);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_failed_generation_is_reported() {
    let mut engine = FakeEngine::new("tiny", Some("unused"));
    engine.fail = true;
    let loader = FakeLoader::new(engine);
    let sink = Arc::new(RecordingSink::default());
    let session = TutorSession::new(TutorConfig::default(), loader).with_telemetry(sink.clone());

    let err = session
        .ask(vec![ChatMessage::user("q")], GenerationOverrides::default())
        .unwrap_err();
    assert!(matches!(err, TutorError::Engine(EngineError::Generation(_))));

    let events = sink.events.lock().unwrap();
    match &events[1] {
        TelemetryEvent::AiReply {
            reply_chars, error, ..
        } => {
            assert_eq!(*reply_chars, None);
            assert_eq!(error.as_deref(), Some("generation failed: out of memory"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_sink_failures_do_not_affect_requests() {
    let loader = FakeLoader::new(FakeEngine::new("tiny", Some("ok")));
    let session =
        TutorSession::new(TutorConfig::default(), loader).with_telemetry(Arc::new(FailingSink));
    let reply = session
        .ask(vec![ChatMessage::user("q")], GenerationOverrides::default())
        .unwrap();
    assert_eq!(reply, "ok");
}

#[test]
fn test_disabled_telemetry_ignores_sink() {
    let loader = FakeLoader::new(FakeEngine::new("tiny", Some("ok")));
    let sink = Arc::new(RecordingSink::default());
    let config = TutorConfig {
        telemetry: false,
        ..TutorConfig::default()
    };
    let session = TutorSession::new(config, loader).with_telemetry(sink.clone());
    session
        .ask(vec![ChatMessage::user("q")], GenerationOverrides::default())
        .unwrap();
    assert!(sink.events.lock().unwrap().is_empty());
}
