pub mod actions;
pub mod kernel;
pub mod memory;
pub mod nlp;
pub mod session;

// Entry points for the driver and integration tests
pub use kernel::{KernelConfig, TurnOrchestrator, TurnResult};
pub use session::{Session, SessionReply};
