mod common;

use common::harness;
use conductor::kernel::gate::{ConfidenceGate, GateDecision};
use conductor::kernel::intent::Intent;
use conductor::kernel::utterance::Utterance;
use conductor::kernel::{ConfigError, KernelConfig, TurnError};

fn gate() -> ConfidenceGate {
    ConfidenceGate::new(0.3, 0.7)
}

#[test]
fn test_gate_rules_in_order() {
    let u = Utterance::new("whatever");

    assert_eq!(
        gate().decide(Intent::Unknown, 1.0, &u),
        GateDecision::Reject(TurnError::UnknownIntent)
    );
    assert_eq!(
        gate().decide(Intent::OpenBrowser, 0.29, &u),
        GateDecision::Reject(TurnError::LowConfidence { confidence: 0.29 })
    );
    assert_eq!(
        gate().decide(Intent::OpenTerminal, 0.69, &u),
        GateDecision::Reject(TurnError::InsufficientConfidenceForDangerousAction {
            intent: Intent::OpenTerminal,
            confidence: 0.69,
        })
    );
    assert_eq!(gate().decide(Intent::OpenTerminal, 0.7, &u), GateDecision::Allow);
    assert_eq!(gate().decide(Intent::OpenBrowser, 0.3, &u), GateDecision::Allow);
}

#[test]
fn test_low_confidence_dangerous_reports_low_confidence_first() {
    let u = Utterance::new("open terminal");
    assert!(matches!(
        gate().decide(Intent::OpenTerminal, 0.1, &u),
        GateDecision::Reject(TurnError::LowConfidence { .. })
    ));
}

#[test]
fn test_gate_rejection_never_dispatches_or_opens_slots() {
    let mut h = harness();

    let low = h
        .orchestrator
        .execute_turn(Intent::SearchWeb, "web search", 0.1, None);
    assert_eq!(low.reason_code(), Some("low_confidence"));
    assert_eq!(low.message, "I can't perform that action.");

    let risky = h
        .orchestrator
        .execute_turn(Intent::OpenTerminal, "open terminal ls", 0.5, None);
    assert_eq!(
        risky.reason_code(),
        Some("insufficient_confidence_for_dangerous_action")
    );
    assert_eq!(risky.message, "I need to be more certain before I open a terminal.");

    assert!(h.orchestrator.pending().is_none());
    assert!(h.dispatched().is_empty());
}

#[test]
fn test_unknown_intent_clears_context() {
    let mut h = harness();
    h.orchestrator
        .execute_turn(Intent::OpenBrowser, "open youtube", 0.9, None);
    assert!(h.orchestrator.context().is_live());

    let result = h
        .orchestrator
        .execute_turn(Intent::Unknown, "sing me a song", 0.9, None);

    assert_eq!(result.reason, Some(TurnError::UnknownIntent));
    assert_eq!(result.message, "Intent not supported.");
    assert!(!h.orchestrator.context().is_live());
}

#[test]
fn test_non_finite_or_out_of_range_confidence_is_rejected() {
    let u = Utterance::new("open terminal ls -la");

    for confidence in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -0.5, 1.5] {
        for intent in [Intent::OpenTerminal, Intent::OpenBrowser] {
            assert!(
                matches!(
                    gate().decide(intent, confidence, &u),
                    GateDecision::Reject(TurnError::LowConfidence { .. })
                ),
                "{intent} at {confidence} should be rejected"
            );
        }
    }
}

#[test]
fn test_nan_confidence_never_opens_a_terminal() {
    let mut h = harness();

    let result = h
        .orchestrator
        .execute_turn(Intent::OpenTerminal, "open terminal ls -la", f32::NAN, None);

    assert!(!result.executed);
    assert_eq!(result.reason_code(), Some("low_confidence"));
    assert!(h.dispatched().is_empty());
    assert!(h.orchestrator.pending().is_none());
}

#[test]
fn test_gate_is_stateless() {
    let u = Utterance::new("open terminal");
    let g = gate();
    let first = g.decide(Intent::OpenTerminal, 0.65, &u);
    for _ in 0..10 {
        assert_eq!(g.decide(Intent::OpenTerminal, 0.65, &u), first);
    }
}

#[test]
fn test_config_defaults() {
    let config = KernelConfig::default();
    assert_eq!(config.min_confidence, 0.3);
    assert_eq!(config.high_confidence, 0.7);
    assert_eq!(config.min_reference_confidence, 0.5);
    assert_eq!(config.history_capacity, 20);
    assert_eq!(config.context_ttl_turns, None);
    assert!(!config.safe_mode);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_partial_json_fills_defaults() {
    let config = KernelConfig::from_json_str(r#"{ "min_confidence": 0.4, "safe_mode": true }"#)
        .expect("valid config");
    assert_eq!(config.min_confidence, 0.4);
    assert_eq!(config.high_confidence, 0.7);
    assert!(config.safe_mode);
}

#[test]
fn test_config_rejects_bad_values() {
    let inverted = KernelConfig::from_json_str(r#"{ "min_confidence": 0.9, "high_confidence": 0.5 }"#);
    assert!(matches!(
        inverted,
        Err(ConfigError::Invalid { field: "high_confidence", .. })
    ));

    let out_of_range = KernelConfig::from_json_str(r#"{ "min_reference_confidence": 1.5 }"#);
    assert!(matches!(
        out_of_range,
        Err(ConfigError::Invalid { field: "min_reference_confidence", .. })
    ));

    let shrinking = KernelConfig::from_json_str(r#"{ "followup_boost": 0.5 }"#);
    assert!(matches!(shrinking, Err(ConfigError::Invalid { field: "followup_boost", .. })));

    let empty_history = KernelConfig::from_json_str(r#"{ "history_capacity": 0 }"#);
    assert!(matches!(
        empty_history,
        Err(ConfigError::Invalid { field: "history_capacity", .. })
    ));

    assert!(matches!(KernelConfig::from_json_str("{ nope"), Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conductor.json");
    std::fs::write(&path, r#"{ "context_ttl_turns": 3, "history_capacity": 5 }"#).unwrap();

    let config = KernelConfig::from_json_file(&path).unwrap();
    assert_eq!(config.context_ttl_turns, Some(3));
    assert_eq!(config.history_capacity, 5);

    let missing = KernelConfig::from_json_file(dir.path().join("absent.json"));
    assert!(matches!(missing, Err(ConfigError::Io(_))));
}
