use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
///
/// The only piece of kernel state that may be written from outside the
/// orchestrator's thread (a Ctrl+C handler, a hotword listener). Clones share
/// the same flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptSignal {
    flag: Arc<AtomicBool>,
}

impl InterruptSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Observe and clear in one step. Returns true at most once per trigger.
    pub fn consume(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

/// Where an interrupt was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum InterruptSource {
    /// The shared signal was raised from outside the turn.
    ExternalSignal,
    /// An interrupt phrase appeared inside the utterance.
    EmbeddedKeyword,
    /// The caller asked for a reset through `cancel_pending`.
    CallerCancel,
}
