//! Dispatch targets. The kernel only sees `Action` and `ActionBackend`.

pub mod action;
pub mod backend;
pub mod notes;
pub mod system;

pub use action::{Action, ActionOutcome};
pub use backend::{ActionBackend, DryRunBackend};
pub use notes::NoteBook;
pub use system::SystemActions;
