use tracing::info;

use super::action::{Action, ActionOutcome};
use crate::kernel::cancel::InterruptSignal;

/// Executes actions on behalf of the orchestrator.
///
/// `interrupt` is the shared signal. Backends may poll it during long work;
/// cancellation is cooperative and an action already started is not killed.
pub trait ActionBackend: Send {
    fn dispatch(&self, action: &Action, interrupt: &InterruptSignal) -> ActionOutcome;
}

/// Reports success without touching the system. Used in safe mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunBackend;

impl ActionBackend for DryRunBackend {
    fn dispatch(&self, action: &Action, _interrupt: &InterruptSignal) -> ActionOutcome {
        info!(action = action.name(), "[DRY-RUN] skipping dispatch");
        ActionOutcome::ok(format!("[dry run] {}", action.name()))
    }
}
