use std::collections::VecDeque;

use super::event::{OutcomeKind, ReferenceKind, SlotEventKind, TelemetryEvent};
use crate::kernel::cancel::InterruptSource;
use crate::kernel::intent::Provenance;
use crate::kernel::policy::InterruptPolicy;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub turn_stats: TurnStats,
    pub interrupt_stats: InterruptStats,
    pub slot_stats: SlotStats,
    pub reference_stats: ReferenceStats,
    pub dispatch_stats: DispatchStats,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnStats {
    pub total: u64,
    pub executed: u64,
    pub failed: u64,
    pub rejected: u64,
    pub prompted: u64,
    pub cancelled: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterruptStats {
    pub count: u64,
    pub external: u64,
    pub embedded: u64,
    pub caller: u64,
    pub hard: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotStats {
    pub opened: u64,
    pub reprompted: u64,
    pub recovered: u64,
    pub dropped: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceStats {
    pub resolved: u64,
    pub blocked: u64,
    pub fell_through: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchStats {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub followups: u64,
    pub replays: u64,
    pub success_rate: f64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::TurnCompleted { outcome, .. } => {
                snap.turn_stats.total += 1;
                match outcome {
                    OutcomeKind::Executed => snap.turn_stats.executed += 1,
                    OutcomeKind::Failed => snap.turn_stats.failed += 1,
                    OutcomeKind::Rejected => snap.turn_stats.rejected += 1,
                    OutcomeKind::Prompted => snap.turn_stats.prompted += 1,
                    OutcomeKind::Cancelled => snap.turn_stats.cancelled += 1,
                }
            }
            TelemetryEvent::Interruption { source, policy } => {
                snap.interrupt_stats.count += 1;
                match source {
                    InterruptSource::ExternalSignal => snap.interrupt_stats.external += 1,
                    InterruptSource::EmbeddedKeyword => snap.interrupt_stats.embedded += 1,
                    InterruptSource::CallerCancel => snap.interrupt_stats.caller += 1,
                }
                if *policy == InterruptPolicy::Hard {
                    snap.interrupt_stats.hard += 1;
                }
            }
            TelemetryEvent::Slot { event, .. } => match event {
                SlotEventKind::Opened => snap.slot_stats.opened += 1,
                SlotEventKind::Reprompted => snap.slot_stats.reprompted += 1,
                SlotEventKind::Recovered => snap.slot_stats.recovered += 1,
                SlotEventKind::Dropped => snap.slot_stats.dropped += 1,
            },
            TelemetryEvent::Reference { kind } => match kind {
                ReferenceKind::Resolved => snap.reference_stats.resolved += 1,
                ReferenceKind::Blocked => snap.reference_stats.blocked += 1,
                ReferenceKind::FellThrough => snap.reference_stats.fell_through += 1,
            },
            TelemetryEvent::Dispatch { provenance, success, .. } => {
                snap.dispatch_stats.total += 1;
                if *success {
                    snap.dispatch_stats.succeeded += 1;
                } else {
                    snap.dispatch_stats.failed += 1;
                }
                match provenance {
                    Provenance::Followup => snap.dispatch_stats.followups += 1,
                    Provenance::Replay => snap.dispatch_stats.replays += 1,
                    Provenance::Fresh => {}
                }
            }
        }
    }

    if snap.dispatch_stats.total > 0 {
        snap.dispatch_stats.success_rate =
            snap.dispatch_stats.succeeded as f64 / snap.dispatch_stats.total as f64;
    }

    snap
}
