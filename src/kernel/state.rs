use super::context::{ContextEntry, ConversationContext};
use super::pending::{PendingSlots, SlotPhase};
use super::time::Tick;

/// Strict state delta. This is the ONLY way turn-scoped state mutates.
#[derive(Debug, Clone)]
pub enum StateDelta {
    /// Start of a turn. Ages the context out when its TTL has passed.
    Tick(Tick),
    ContextRecorded(ContextEntry),
    ContextCleared,
    PendingOpened(PendingSlots),
    PendingUpdated(PendingSlots),
    PendingClosed,
    /// Caller-level reset between turns: drops pending slots and context.
    Reset,
}

/// State that persists between turns: conversation context, pending slots
/// and the logical turn clock.
#[derive(Debug, Clone, Default)]
pub struct KernelState {
    pub tick: Tick,
    /// Monotonic version, bumped on every reduction.
    pub version: u64,
    context: ConversationContext,
    pending: Option<PendingSlots>,
    context_writes_this_turn: u8,
}

impl KernelState {
    pub fn new(context_ttl_turns: Option<u64>) -> Self {
        Self {
            context: ConversationContext::new(context_ttl_turns),
            ..Self::default()
        }
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn pending(&self) -> Option<&PendingSlots> {
        self.pending.as_ref()
    }

    pub fn slot_phase(&self) -> SlotPhase {
        if self.pending.is_some() {
            SlotPhase::AwaitingSlots
        } else {
            SlotPhase::NoPending
        }
    }

    /// Pure reduction: State + Delta -> Mutated State
    pub fn reduce(&mut self, delta: StateDelta) {
        self.version += 1;

        match delta {
            StateDelta::Tick(tick) => {
                self.tick = tick;
                self.context_writes_this_turn = 0;
                // Eviction is atomic: the whole entry goes, never part of it.
                if self.context.is_stale_at(tick) {
                    self.context.clear();
                }
            }
            StateDelta::ContextRecorded(entry) => {
                self.note_context_write();
                self.context.record(entry);
            }
            StateDelta::ContextCleared => {
                self.note_context_write();
                self.context.clear();
            }
            StateDelta::PendingOpened(pending) | StateDelta::PendingUpdated(pending) => {
                // An empty missing list is never a pending request.
                self.pending = if pending.is_complete() { None } else { Some(pending) };
            }
            StateDelta::PendingClosed => {
                self.pending = None;
            }
            StateDelta::Reset => {
                self.pending = None;
                self.context.clear();
            }
        }
    }

    fn note_context_write(&mut self) {
        self.context_writes_this_turn = self.context_writes_this_turn.saturating_add(1);
        debug_assert!(
            self.context_writes_this_turn <= 1,
            "conversation context mutated more than once in a turn"
        );
    }
}
