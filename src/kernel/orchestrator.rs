use tracing::{debug, info, warn};
use uuid::Uuid;

use super::cancel::{InterruptSignal, InterruptSource};
use super::config::KernelConfig;
use super::context::{ContextEntry, ConversationContext};
use super::error::TurnError;
use super::gate::{ConfidenceGate, GateDecision};
use super::history::{ExecutionHistory, HistoryRecord};
use super::intent::{missing_slots, ActionRequest, Args, Intent, Provenance, Slot};
use super::pending::{recover_single_slot, PendingSlots};
use super::policy::{detect_embedded_interrupt, resolve_policy, InterruptPolicy};
use super::resolver::{ReferenceResolver, Resolution};
use super::state::{KernelState, StateDelta};
use super::telemetry::event::{OutcomeKind, ReferenceKind, SlotEventKind, TelemetryEvent};
use super::telemetry::recorder::TelemetryRecorder;
use super::utterance::Utterance;
use crate::actions::{Action, ActionBackend, ActionOutcome};
use crate::nlp::extractor::ArgumentExtractor;

/// Outcome of one turn. Output only; never stored by the kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub success: bool,
    /// User-facing text.
    pub message: String,
    pub confidence: f32,
    /// True once the backend was called, whatever it reported.
    pub executed: bool,
    pub args: Args,
    /// What the backend reported, when it was called.
    pub result: Option<ActionOutcome>,
    pub is_followup: bool,
    pub intent: Intent,
    pub provenance: Option<Provenance>,
    /// Why the turn did not succeed.
    pub reason: Option<TurnError>,
}

impl TurnResult {
    fn rejected(intent: Intent, confidence: f32, reason: TurnError) -> Self {
        Self {
            success: false,
            message: reason.to_string(),
            confidence,
            executed: false,
            args: Args::new(),
            result: None,
            is_followup: false,
            intent,
            provenance: None,
            reason: Some(reason),
        }
    }

    pub fn reason_code(&self) -> Option<&'static str> {
        self.reason.as_ref().map(TurnError::code)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.reason, Some(TurnError::InterruptCancelled { .. }))
    }

    fn outcome_kind(&self) -> OutcomeKind {
        match &self.reason {
            None => OutcomeKind::Executed,
            Some(TurnError::InterruptCancelled { .. }) => OutcomeKind::Cancelled,
            Some(TurnError::MissingRequiredSlot { .. }) => OutcomeKind::Prompted,
            Some(_) if self.executed => OutcomeKind::Failed,
            Some(_) => OutcomeKind::Rejected,
        }
    }
}

/// The single conversation-context write a turn is allowed.
#[derive(Debug)]
enum ContextCommit {
    Keep,
    Clear,
    Record(ContextEntry),
}

#[derive(Debug)]
struct Turn {
    result: TurnResult,
    commit: ContextCommit,
}

impl Turn {
    /// Every rejection clears the context unless told otherwise.
    fn rejected(intent: Intent, confidence: f32, reason: TurnError) -> Self {
        Self {
            result: TurnResult::rejected(intent, confidence, reason),
            commit: ContextCommit::Clear,
        }
    }
}

/// Single entry point for a turn.
///
/// Sequences interrupt handling, slot recovery, reference resolution, the
/// confidence gate, argument extraction and dispatch into one decision per
/// utterance. Synchronous; the only state it shares is the interrupt signal.
pub struct TurnOrchestrator {
    config: KernelConfig,
    state: KernelState,
    gate: ConfidenceGate,
    resolver: ReferenceResolver,
    extractor: Box<dyn ArgumentExtractor>,
    backend: Box<dyn ActionBackend>,
    signal: InterruptSignal,
    history: ExecutionHistory,
    telemetry: TelemetryRecorder,
}

impl TurnOrchestrator {
    pub fn new(
        config: KernelConfig,
        extractor: Box<dyn ArgumentExtractor>,
        backend: Box<dyn ActionBackend>,
        signal: InterruptSignal,
    ) -> Self {
        Self {
            state: KernelState::new(config.context_ttl_turns),
            gate: ConfidenceGate::new(config.min_confidence, config.high_confidence),
            resolver: ReferenceResolver::new(
                config.min_reference_confidence,
                config.followup_boost,
            ),
            history: ExecutionHistory::new(config.history_capacity),
            telemetry: TelemetryRecorder::new(),
            config,
            extractor,
            backend,
            signal,
        }
    }

    /// A handle on the shared interrupt signal, for producers outside the loop.
    pub fn signal(&self) -> InterruptSignal {
        self.signal.clone()
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn state(&self) -> &KernelState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingSlots> {
        self.state.pending()
    }

    pub fn context(&self) -> &ConversationContext {
        self.state.context()
    }

    pub fn history(&self) -> &ExecutionHistory {
        &self.history
    }

    pub fn telemetry(&self) -> &TelemetryRecorder {
        &self.telemetry
    }

    /// Required slots `text` leaves unfilled for `intent`. Empty while an
    /// interrupt is pending, so the caller goes straight to `execute_turn`.
    pub fn get_missing_args(&self, intent: Intent, text: &str) -> Vec<Slot> {
        if self.signal.is_triggered() {
            return Vec::new();
        }
        let args = self.extractor.extract(text, intent);
        missing_slots(intent, &args)
    }

    /// Slot-recovery extraction: scoped to `intent`, with the single-slot
    /// fallback applied.
    pub fn fill_missing(&self, intent: Intent, text: &str, missing: &[Slot]) -> Args {
        if self.signal.is_triggered() {
            return Args::new();
        }
        let extracted = self.extractor.extract(text, intent);
        recover_single_slot(extracted, text, missing)
    }

    /// Caller-level reset: drops pending slots and the conversation context
    /// and consumes any raised interrupt. Returns whether a request was pending.
    pub fn cancel_pending(&mut self) -> bool {
        self.signal.consume();
        let dropped = self.state.pending().map(|p| p.intent);

        self.state.reduce(StateDelta::Reset);
        self.telemetry.record(TelemetryEvent::Interruption {
            source: InterruptSource::CallerCancel,
            policy: InterruptPolicy::Hard,
        });
        if let Some(intent) = dropped {
            self.telemetry.record(TelemetryEvent::Slot {
                intent,
                event: SlotEventKind::Dropped,
            });
        }

        info!(dropped = ?dropped, "pending state cancelled by caller");
        dropped.is_some()
    }

    pub fn execute_turn(
        &mut self,
        intent: Intent,
        text: &str,
        confidence: f32,
        replay_args: Option<Args>,
    ) -> TurnResult {
        let tick = self.state.tick.next();
        self.state.reduce(StateDelta::Tick(tick));

        let utterance = Utterance::new(text);
        debug!(%intent, confidence, tick = tick.frame, "turn entry");
        debug!(text = utterance.text(), "turn text");

        let turn = self.run(intent, &utterance, confidence, replay_args);
        self.finish(turn)
    }

    fn run(
        &mut self,
        intent: Intent,
        utterance: &Utterance,
        confidence: f32,
        replay_args: Option<Args>,
    ) -> Turn {
        // 1. Interrupts outrank everything, including a pending request.
        let pending_policy = resolve_policy(self.state.pending().map(|p| p.intent));
        if self.signal.consume() {
            return self.cancel(intent, confidence, InterruptSource::ExternalSignal, pending_policy);
        }
        if let Some(hit) = detect_embedded_interrupt(utterance.tokens()) {
            debug!(phrase = %hit.phrase, position = hit.position, "embedded interrupt");
            return self.cancel(intent, confidence, InterruptSource::EmbeddedKeyword, pending_policy);
        }

        // 2. A pending request consumes the whole utterance.
        if let Some(pending) = self.state.pending().cloned() {
            return self.continue_pending(pending, utterance);
        }

        // 3.
        if intent == Intent::Unknown {
            return Turn::rejected(intent, confidence, TurnError::UnknownIntent);
        }

        // 4. References end the turn unless nothing was ever recorded.
        let resolution = self
            .resolver
            .resolve(utterance, intent, confidence, self.state.context());
        debug!(reason = resolution.reason(), "reference check");
        match resolution {
            Resolution::Resolved(reference) => {
                self.telemetry.record(TelemetryEvent::Reference {
                    kind: ReferenceKind::Resolved,
                });
                debug!(source = %reference.source_text, "reference resolved");
                let request = ActionRequest {
                    intent,
                    args: reference.args,
                    confidence: reference.confidence,
                    provenance: Provenance::Followup,
                };
                return self.route(request, utterance.text());
            }
            Resolution::Blocked(reason) => {
                self.telemetry.record(TelemetryEvent::Reference {
                    kind: ReferenceKind::Blocked,
                });
                return Turn::rejected(intent, confidence, reason);
            }
            Resolution::NoContext => {
                self.telemetry.record(TelemetryEvent::Reference {
                    kind: ReferenceKind::FellThrough,
                });
            }
            Resolution::NotAReference => {}
        }

        // 5.
        if let GateDecision::Reject(reason) = self.gate.decide(intent, confidence, utterance) {
            return Turn::rejected(intent, confidence, reason);
        }

        // 6. Explicit replay values win over extracted ones.
        let mut args = self.extractor.extract(utterance.text(), intent);
        if self.signal.consume() {
            return self.cancel(intent, confidence, InterruptSource::ExternalSignal, InterruptPolicy::Hard);
        }

        let mut provenance = Provenance::Fresh;
        if let Some(replay) = replay_args {
            for (slot, value) in replay {
                if !value.trim().is_empty() {
                    args.insert(slot, value);
                    provenance = Provenance::Replay;
                }
            }
        }

        let request = ActionRequest {
            intent,
            args,
            confidence,
            provenance,
        };
        self.route(request, utterance.text())
    }

    /// Slot recovery: merge what this utterance fills, then either prompt
    /// again or dispatch with the accumulated arguments.
    fn continue_pending(&mut self, mut pending: PendingSlots, utterance: &Utterance) -> Turn {
        let extracted = self.extractor.extract(utterance.text(), pending.intent);
        if self.signal.consume() {
            return self.cancel(
                pending.intent,
                pending.confidence,
                InterruptSource::ExternalSignal,
                InterruptPolicy::Hard,
            );
        }

        let before = extracted.len();
        let filled = recover_single_slot(extracted, utterance.text(), &pending.missing);
        if filled.len() > before {
            self.telemetry.record(TelemetryEvent::Slot {
                intent: pending.intent,
                event: SlotEventKind::Recovered,
            });
        }
        pending.merge(filled);

        if pending.is_complete() {
            self.state.reduce(StateDelta::PendingClosed);
            let text = pending.text.clone();
            let request = ActionRequest {
                intent: pending.intent,
                args: pending.args,
                confidence: pending.confidence,
                provenance: Provenance::Replay,
            };
            return self.route(request, &text);
        }

        let (intent, confidence) = (pending.intent, pending.confidence);
        let mut turn = Turn::rejected(intent, confidence, pending.prompt());
        turn.result.args = pending.args.clone();
        self.state.reduce(StateDelta::PendingUpdated(pending));
        self.telemetry.record(TelemetryEvent::Slot {
            intent,
            event: SlotEventKind::Reprompted,
        });
        turn
    }

    /// Steps 7 to 10: slot check, validation, dispatch, history.
    fn route(&mut self, request: ActionRequest, text: &str) -> Turn {
        let ActionRequest {
            intent,
            args,
            confidence,
            provenance,
        } = request;

        let missing = missing_slots(intent, &args);
        if !missing.is_empty() {
            let reason = TurnError::MissingRequiredSlot { intent, missing };
            let mut turn = Turn::rejected(intent, confidence, reason);
            turn.result.args = args.clone();
            if let Some(pending) = PendingSlots::open(intent, args, confidence, text, self.state.tick) {
                self.state.reduce(StateDelta::PendingOpened(pending));
                self.telemetry.record(TelemetryEvent::Slot {
                    intent,
                    event: SlotEventKind::Opened,
                });
            }
            return turn;
        }

        if let Err(message) = self.extractor.validate(&args, intent) {
            let reason = TurnError::ArgumentValidationFailed { intent, message };
            let mut turn = Turn::rejected(intent, confidence, reason);
            turn.result.args = args;
            return turn;
        }

        let Some(action) = Action::from_request(intent, &args) else {
            return Turn::rejected(intent, confidence, TurnError::UnknownIntent);
        };

        if self.signal.consume() {
            return self.cancel(intent, confidence, InterruptSource::ExternalSignal, InterruptPolicy::Hard);
        }

        let outcome = self.backend.dispatch(&action, &self.signal);
        info!(
            action = action.name(),
            success = outcome.success,
            ?provenance,
            "action dispatched"
        );

        self.history.push(HistoryRecord {
            id: Uuid::new_v4(),
            tick: self.state.tick,
            intent,
            text: text.to_string(),
            confidence,
            provenance,
            success: outcome.success,
        });
        self.telemetry.record(TelemetryEvent::Dispatch {
            intent,
            provenance,
            success: outcome.success,
        });

        let is_followup = provenance == Provenance::Followup;
        let base = TurnResult {
            success: outcome.success,
            message: outcome.message.clone(),
            confidence,
            executed: true,
            args: args.clone(),
            result: Some(outcome.clone()),
            is_followup,
            intent,
            provenance: Some(provenance),
            reason: None,
        };

        // Raised while the backend ran: the action stands, the state does not.
        if self.signal.consume() {
            let reason = TurnError::InterruptCancelled {
                origin: InterruptSource::ExternalSignal,
                policy: InterruptPolicy::Hard,
            };
            warn!(action = action.name(), "interrupt raised during dispatch");
            self.telemetry.record(TelemetryEvent::Interruption {
                source: InterruptSource::ExternalSignal,
                policy: InterruptPolicy::Hard,
            });
            return Turn {
                result: TurnResult {
                    success: false,
                    message: reason.to_string(),
                    reason: Some(reason),
                    ..base
                },
                commit: ContextCommit::Clear,
            };
        }

        if outcome.success {
            let entry = ContextEntry {
                intent,
                text: text.to_string(),
                entities: args,
                recorded_at: self.state.tick,
            };
            return Turn {
                result: base,
                commit: ContextCommit::Record(entry),
            };
        }

        let reason = TurnError::BackendExecutionFailure {
            intent,
            message: outcome.message,
        };
        Turn {
            result: TurnResult {
                success: false,
                reason: Some(reason),
                ..base
            },
            commit: ContextCommit::Clear,
        }
    }

    /// Pending slots never survive an interrupt. The context survives only
    /// a soft or ignored one.
    fn cancel(
        &mut self,
        intent: Intent,
        confidence: f32,
        source: InterruptSource,
        policy: InterruptPolicy,
    ) -> Turn {
        warn!(?source, ?policy, "turn cancelled by interrupt");

        if let Some(dropped) = self.state.pending().map(|p| p.intent) {
            self.state.reduce(StateDelta::PendingClosed);
            self.telemetry.record(TelemetryEvent::Slot {
                intent: dropped,
                event: SlotEventKind::Dropped,
            });
        }
        self.telemetry.record(TelemetryEvent::Interruption { source, policy });

        let reason = TurnError::InterruptCancelled {
            origin: source,
            policy,
        };
        let mut turn = Turn::rejected(intent, confidence, reason);
        if policy != InterruptPolicy::Hard {
            turn.commit = ContextCommit::Keep;
        }
        turn
    }

    fn finish(&mut self, turn: Turn) -> TurnResult {
        let Turn { result, commit } = turn;

        match commit {
            ContextCommit::Keep => {}
            ContextCommit::Clear => self.state.reduce(StateDelta::ContextCleared),
            ContextCommit::Record(entry) => self.state.reduce(StateDelta::ContextRecorded(entry)),
        }

        let code = result.reason_code();
        match code {
            Some(code) => info!(intent = %result.intent, reason = code, "turn rejected"),
            None => info!(intent = %result.intent, "turn executed"),
        }
        self.telemetry.record(TelemetryEvent::TurnCompleted {
            tick: self.state.tick,
            intent: result.intent,
            outcome: result.outcome_kind(),
            reason: code.map(str::to_string),
        });

        result
    }
}
