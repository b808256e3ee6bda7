//! Turn telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read inside decision logic (gate, resolver, orchestrator).
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain user content.
//! Only intents, reason codes, enums and counts are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;
