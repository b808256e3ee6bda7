#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use conductor::actions::{Action, ActionBackend, ActionOutcome};
use conductor::kernel::intent::{Args, Intent, Slot};
use conductor::kernel::{InterruptSignal, KernelConfig, TurnOrchestrator};
use conductor::memory::{Role, TranscriptStore};
use conductor::nlp::{ArgumentExtractor, HeuristicExtractor};

/// Records every dispatched action. Fails on demand, and can raise the
/// interrupt while "running" to simulate a trigger during dispatch.
pub struct RecordingBackend {
    pub calls: Arc<Mutex<Vec<Action>>>,
    pub fail: Arc<AtomicBool>,
    pub trigger_during_dispatch: Option<InterruptSignal>,
}

impl ActionBackend for RecordingBackend {
    fn dispatch(&self, action: &Action, _interrupt: &InterruptSignal) -> ActionOutcome {
        self.calls.lock().unwrap().push(action.clone());
        if let Some(signal) = &self.trigger_during_dispatch {
            signal.trigger();
        }
        if self.fail.load(Ordering::SeqCst) {
            ActionOutcome::failed("backend exploded")
        } else {
            ActionOutcome::ok(format!("done: {}", action.name()))
        }
    }
}

/// Returns the same arguments for every call. Optionally raises the
/// interrupt from inside `extract`.
pub struct ScriptedExtractor {
    pub args: Args,
    pub trigger_during_extract: Option<InterruptSignal>,
    pub validation: Result<(), String>,
}

impl ScriptedExtractor {
    pub fn returning(args: Args) -> Self {
        Self {
            args,
            trigger_during_extract: None,
            validation: Ok(()),
        }
    }
}

impl ArgumentExtractor for ScriptedExtractor {
    fn extract(&self, _text: &str, _intent: Intent) -> Args {
        if let Some(signal) = &self.trigger_during_extract {
            signal.trigger();
        }
        self.args.clone()
    }

    fn validate(&self, _args: &Args, _intent: Intent) -> Result<(), String> {
        self.validation.clone()
    }
}

#[derive(Clone, Default)]
pub struct RecordingTranscript {
    pub lines: Arc<Mutex<Vec<(Role, String, Intent)>>>,
}

impl TranscriptStore for RecordingTranscript {
    fn save(&mut self, role: Role, text: &str, intent: Intent) {
        self.lines.lock().unwrap().push((role, text.to_string(), intent));
    }
}

pub struct Harness {
    pub orchestrator: TurnOrchestrator,
    pub signal: InterruptSignal,
    pub calls: Arc<Mutex<Vec<Action>>>,
    pub fail: Arc<AtomicBool>,
}

impl Harness {
    pub fn dispatched(&self) -> Vec<Action> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

pub fn harness() -> Harness {
    harness_with(KernelConfig::default(), Box::new(heuristic()))
}

pub fn harness_with(config: KernelConfig, extractor: Box<dyn ArgumentExtractor>) -> Harness {
    build(config, extractor, None)
}

/// The backend raises the shared signal on every dispatch.
pub fn harness_triggering_on_dispatch() -> Harness {
    let signal = InterruptSignal::new();
    build_with_signal(
        KernelConfig::default(),
        Box::new(heuristic()),
        Some(signal.clone()),
        signal,
    )
}

pub fn build(
    config: KernelConfig,
    extractor: Box<dyn ArgumentExtractor>,
    trigger_during_dispatch: Option<InterruptSignal>,
) -> Harness {
    build_with_signal(config, extractor, trigger_during_dispatch, InterruptSignal::new())
}

pub fn build_with_signal(
    config: KernelConfig,
    extractor: Box<dyn ArgumentExtractor>,
    trigger_during_dispatch: Option<InterruptSignal>,
    signal: InterruptSignal,
) -> Harness {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let fail = Arc::new(AtomicBool::new(false));
    let backend = RecordingBackend {
        calls: calls.clone(),
        fail: fail.clone(),
        trigger_during_dispatch,
    };
    let orchestrator = TurnOrchestrator::new(config, extractor, Box::new(backend), signal.clone());
    Harness {
        orchestrator,
        signal,
        calls,
        fail,
    }
}

/// Extractor rooted in the temp dir so known folders resolve somewhere real.
pub fn heuristic() -> HeuristicExtractor {
    HeuristicExtractor::with_home(std::env::temp_dir())
}

pub fn args(pairs: &[(Slot, &str)]) -> Args {
    pairs
        .iter()
        .map(|(slot, value)| (*slot, value.to_string()))
        .collect()
}
