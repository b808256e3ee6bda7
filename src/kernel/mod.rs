//! The turn kernel: one deterministic decision per utterance.

pub mod cancel;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod gate;
pub mod history;
pub mod intent;
pub mod orchestrator;
pub mod pending;
pub mod policy;
pub mod resolver;
pub mod state;
pub mod telemetry;
pub mod time;
pub mod utterance;

pub use cancel::{InterruptSignal, InterruptSource};
pub use config::KernelConfig;
pub use error::{ConfigError, TurnError};
pub use orchestrator::{TurnOrchestrator, TurnResult};
