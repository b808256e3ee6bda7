mod common;

use common::{args, harness, harness_with, heuristic};
use conductor::actions::{Action, ActionOutcome};
use conductor::kernel::context::ContextStatus;
use conductor::kernel::intent::{Intent, Provenance, Slot};
use conductor::kernel::telemetry::event::{OutcomeKind, ReferenceKind, TelemetryEvent};
use conductor::kernel::telemetry::recorder::TelemetryRecorder;
use conductor::kernel::{KernelConfig, TurnError};

#[test]
fn test_fresh_command_executes_and_records_context() {
    let mut h = harness();

    let result = h
        .orchestrator
        .execute_turn(Intent::OpenBrowser, "open youtube", 0.9, None);

    assert!(result.success);
    assert!(result.executed);
    assert!(!result.is_followup);
    assert_eq!(result.reason, None);
    assert_eq!(result.message, "done: open_browser");
    assert_eq!(result.result, Some(ActionOutcome::ok("done: open_browser")));
    assert_eq!(
        result.args,
        args(&[(Slot::Url, "https://youtube.com"), (Slot::Target, "youtube")])
    );

    match h.orchestrator.context().status() {
        ContextStatus::Live(entry) => {
            assert_eq!(entry.intent, Intent::OpenBrowser);
            assert_eq!(entry.text, "open youtube");
            assert_eq!(entry.entities, result.args);
        }
        other => panic!("Expected live context, got {:?}", other),
    }
}

#[test]
fn test_backend_failure_clears_context() {
    let mut h = harness();
    h.orchestrator
        .execute_turn(Intent::OpenBrowser, "open youtube", 0.9, None);

    h.set_failing(true);
    let result = h
        .orchestrator
        .execute_turn(Intent::SearchWeb, "search rust lifetimes", 0.9, None);

    assert!(result.executed);
    assert!(!result.success);
    assert_eq!(
        result.reason,
        Some(TurnError::BackendExecutionFailure {
            intent: Intent::SearchWeb,
            message: "backend exploded".to_string(),
        })
    );
    assert_eq!(result.message, "backend exploded");
    assert!(matches!(h.orchestrator.context().status(), ContextStatus::Expired));
}

#[test]
fn test_explicit_replay_arguments_win() {
    let mut h = harness();

    let result = h.orchestrator.execute_turn(
        Intent::SearchWeb,
        "search cats",
        0.9,
        Some(args(&[(Slot::Query, "dogs"), (Slot::Target, "  ")])),
    );

    assert_eq!(result.provenance, Some(Provenance::Replay));
    assert_eq!(result.args.get(&Slot::Query).map(String::as_str), Some("dogs"));
    assert_eq!(
        result.args.get(&Slot::Target).map(String::as_str),
        Some("web_search"),
        "Blank replay values do not erase extracted ones"
    );
    assert_eq!(
        h.dispatched(),
        vec![Action::SearchWeb {
            query: "dogs".to_string()
        }]
    );
}

#[test]
fn test_replay_arguments_complete_a_request() {
    let mut h = harness();

    let result = h.orchestrator.execute_turn(
        Intent::SearchWeb,
        "web search",
        0.9,
        Some(args(&[(Slot::Query, "tokio select")])),
    );

    assert!(result.success);
    assert!(h.orchestrator.pending().is_none());
}

#[test]
fn test_identical_turns_decide_alike() {
    let mut h = harness();

    let first = h
        .orchestrator
        .execute_turn(Intent::ListFiles, "list files in downloads", 0.6, None);
    let second = h
        .orchestrator
        .execute_turn(Intent::ListFiles, "list files in downloads", 0.6, None);

    assert_eq!(first, second, "No hidden counter may change gating");

    let risky_a = h
        .orchestrator
        .execute_turn(Intent::OpenTerminal, "open terminal top", 0.6, None);
    let risky_b = h
        .orchestrator
        .execute_turn(Intent::OpenTerminal, "open terminal top", 0.6, None);
    assert_eq!(risky_a, risky_b);
}

#[test]
fn test_conversational_intent_has_nothing_to_dispatch() {
    let mut h = harness();
    let result = h.orchestrator.execute_turn(Intent::Greeting, "hello", 0.9, None);

    assert!(!result.executed);
    assert_eq!(result.reason, Some(TurnError::UnknownIntent));
    assert!(h.dispatched().is_empty());
}

#[test]
fn test_argument_validation_failure() {
    let mut h = harness();

    let result = h.orchestrator.execute_turn(
        Intent::OpenFileManager,
        "open folder /definitely/not/here",
        0.9,
        None,
    );

    assert_eq!(
        result.reason,
        Some(TurnError::ArgumentValidationFailed {
            intent: Intent::OpenFileManager,
            message: "Path does not exist: /definitely/not/here".to_string(),
        })
    );
    assert!(!result.executed);
    assert!(h.dispatched().is_empty());
}

#[test]
fn test_history_is_bounded_and_ordered() {
    let config = KernelConfig {
        history_capacity: 2,
        ..KernelConfig::default()
    };
    let mut h = harness_with(config, Box::new(heuristic()));

    h.orchestrator
        .execute_turn(Intent::OpenBrowser, "open youtube", 0.9, None);
    h.orchestrator
        .execute_turn(Intent::SearchWeb, "search rust", 0.9, None);
    h.orchestrator
        .execute_turn(Intent::OpenBrowser, "open github", 0.9, None);
    // Rejections never reach the history.
    h.orchestrator
        .execute_turn(Intent::Unknown, "mumble", 0.9, None);

    let history = h.orchestrator.history();
    assert_eq!(history.len(), 2);
    let texts: Vec<&str> = history.records().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["search rust", "open github"]);
    assert!(history.records().all(|r| r.success));
    assert_eq!(history.last().map(|r| r.tick.frame), Some(3));
}

#[test]
fn test_telemetry_tracks_outcomes_without_text() {
    let mut h = harness();

    h.orchestrator
        .execute_turn(Intent::OpenBrowser, "open youtube", 0.9, None);
    h.orchestrator
        .execute_turn(Intent::OpenBrowser, "open it again", 0.9, None);
    h.orchestrator
        .execute_turn(Intent::SearchWeb, "web search", 0.9, None);
    h.orchestrator
        .execute_turn(Intent::Unknown, "stop", 0.0, None);
    h.orchestrator
        .execute_turn(Intent::Unknown, "mumble mumble", 0.2, None);

    let snap = h.orchestrator.telemetry().snapshot();
    assert_eq!(snap.turn_stats.total, 5);
    assert_eq!(snap.turn_stats.executed, 2);
    assert_eq!(snap.turn_stats.prompted, 1);
    assert_eq!(snap.turn_stats.cancelled, 1);
    assert_eq!(snap.turn_stats.rejected, 1);
    assert_eq!(snap.interrupt_stats.embedded, 1);
    assert_eq!(snap.slot_stats.opened, 1);
    assert_eq!(snap.slot_stats.dropped, 1);
    assert_eq!(snap.reference_stats.resolved, 1);
    assert_eq!(snap.dispatch_stats.total, 2);
    assert_eq!(snap.dispatch_stats.followups, 1);
    assert_eq!(snap.dispatch_stats.success_rate, 1.0);

    let last = h.orchestrator.telemetry().events().last().cloned();
    assert!(matches!(
        last,
        Some(TelemetryEvent::TurnCompleted {
            intent: Intent::Unknown,
            outcome: OutcomeKind::Rejected,
            ..
        })
    ));

    // Privacy: serialized events carry no utterance text.
    let dump = serde_json::to_string(&h.orchestrator.telemetry().events().collect::<Vec<_>>())
        .unwrap();
    assert!(!dump.contains("youtube"));
    assert!(!dump.contains("mumble"));
}

#[test]
fn test_tick_advances_once_per_turn() {
    let mut h = harness();
    for _ in 0..3 {
        h.orchestrator
            .execute_turn(Intent::Unknown, "mumble", 0.0, None);
    }
    assert_eq!(h.orchestrator.state().tick.frame, 3);
}

#[test]
fn test_telemetry_recorder_is_bounded() {
    let mut recorder = TelemetryRecorder::with_capacity(2);

    for kind in [ReferenceKind::Blocked, ReferenceKind::Resolved, ReferenceKind::Resolved] {
        recorder.record(TelemetryEvent::Reference { kind });
    }

    assert_eq!(recorder.len(), 2);
    assert_eq!(recorder.evicted(), 1, "Oldest event falls off");

    let snapshot = recorder.snapshot();
    assert_eq!(snapshot.reference_stats.resolved, 2);
    assert_eq!(snapshot.reference_stats.blocked, 0);
}
