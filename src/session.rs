//! The thin read-loop around the kernel: validate, classify, refine, run
//! the turn, write the transcript.

use tracing::{debug, info};

use crate::kernel::event::{Event, InputContent};
use crate::kernel::intent::{Intent, Slot};
use crate::kernel::policy::{detect_embedded_interrupt, InterruptPolicy};
use crate::kernel::utterance::Utterance;
use crate::kernel::{InterruptSignal, TurnOrchestrator, TurnResult};
use crate::memory::{Role, TranscriptStore};
use crate::nlp::{refine_confidence, Classifier, InputValidator, RejectReason, Validation};

pub const CLARIFICATION_MESSAGES: [&str; 3] = [
    "I'm not sure what you meant. Can you rephrase?",
    "Could you explain that a bit more?",
    "I didn't fully get that. What would you like to do?",
];

const GREETING_REPLY: &str = "Hello! What would you like me to do?";
const HELP_REPLY: &str = "You can ask me to open a website, search the web, open a folder, \
list files, open or read a file, save or read notes, or open a terminal. Say \"stop\" to cancel.";
const EXIT_REPLY: &str = "Goodbye!";
const REPEAT_REPLY: &str = "Please repeat.";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionReply {
    /// The input was noise and never reached the kernel.
    Repeat(RejectReason),
    /// Greeting or help, answered without dispatch.
    Chat(String),
    /// The kernel could not tell what was meant.
    Clarify(String),
    Turn(TurnResult),
    /// Caller-level cancellation between turns.
    Cancelled(String),
    Exit(String),
}

impl SessionReply {
    pub fn text(&self) -> &str {
        match self {
            SessionReply::Repeat(_) => REPEAT_REPLY,
            SessionReply::Chat(text)
            | SessionReply::Clarify(text)
            | SessionReply::Cancelled(text)
            | SessionReply::Exit(text) => text,
            SessionReply::Turn(result) => &result.message,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, SessionReply::Exit(_))
    }
}

pub struct Session {
    validator: InputValidator,
    classifier: Box<dyn Classifier>,
    orchestrator: TurnOrchestrator,
    transcript: Box<dyn TranscriptStore>,
    last_intent: Option<Intent>,
    clarify_index: usize,
}

impl Session {
    pub fn new(
        classifier: Box<dyn Classifier>,
        orchestrator: TurnOrchestrator,
        transcript: Box<dyn TranscriptStore>,
    ) -> Self {
        Self {
            validator: InputValidator::new(),
            classifier,
            orchestrator,
            transcript,
            last_intent: None,
            clarify_index: 0,
        }
    }

    pub fn orchestrator(&self) -> &TurnOrchestrator {
        &self.orchestrator
    }

    pub fn signal(&self) -> InterruptSignal {
        self.orchestrator.signal()
    }

    /// Raise the interrupt from the caller's side. The next suspension
    /// point in the kernel observes and consumes it.
    pub fn interrupt(&self) {
        self.orchestrator.signal().trigger();
    }

    /// Reset pending slots and context without running a turn. The last
    /// line may be said again afterwards.
    pub fn cancel_pending(&mut self) -> SessionReply {
        self.orchestrator.cancel_pending();
        self.validator.reset();
        SessionReply::Cancelled(InterruptPolicy::Hard.cancel_message().to_string())
    }

    /// `None` for events that need no reply.
    pub fn handle_event(&mut self, event: Event) -> Option<SessionReply> {
        match event {
            Event::Input(input) => match input.content {
                InputContent::Text(text) => Some(self.handle_line(&text)),
            },
            // Still raised means no turn consumed it.
            Event::Interrupt if self.orchestrator.signal().is_triggered() => {
                Some(self.cancel_pending())
            }
            Event::Interrupt => None,
            Event::Eof => Some(SessionReply::Exit(EXIT_REPLY.to_string())),
        }
    }

    pub fn handle_line(&mut self, raw: &str) -> SessionReply {
        let pending = self.orchestrator.pending().is_some();

        if let Validation::Invalid { reason, .. } = self.validator.validate(raw, pending) {
            debug!(?reason, "input rejected");
            return SessionReply::Repeat(reason);
        }

        let text = raw.trim();
        let utterance = Utterance::new(text);
        let tokens = utterance.tokens();

        let scores = self.classifier.classify(tokens);
        let classified = self.classifier.pick_best(&scores, tokens);
        let confidence =
            refine_confidence(classified.confidence, tokens, classified.intent, self.last_intent);
        let intent = classified.intent;
        debug!(%intent, raw = classified.confidence, refined = confidence, "classified");

        self.transcript.save_scored(Role::User, text, intent, confidence);

        let signalled = self.orchestrator.signal().is_triggered();
        let embedded = detect_embedded_interrupt(tokens).is_some();
        // "quit" is both an exit word and an interrupt word; with nothing
        // pending it ends the session.
        let conversational = match intent {
            Intent::Exit => true,
            _ => intent.is_conversational() && !embedded,
        };

        let reply = if !pending && !signalled && conversational {
            self.converse(intent)
        } else {
            let result = self.orchestrator.execute_turn(intent, text, confidence, None);
            if result.success {
                self.last_intent = Some(result.intent);
            }
            match result.reason_code() {
                Some("unknown_intent") | Some("low_confidence") => {
                    SessionReply::Clarify(self.next_clarification())
                }
                _ => SessionReply::Turn(result),
            }
        };

        self.transcript.save(Role::Assistant, reply.text(), intent);
        reply
    }

    /// Required slots the caller would be asked for, without running a turn.
    pub fn preview_missing(&self, intent: Intent, text: &str) -> Vec<Slot> {
        self.orchestrator.get_missing_args(intent, text)
    }

    fn converse(&mut self, intent: Intent) -> SessionReply {
        match intent {
            Intent::Exit => {
                info!("exit requested");
                SessionReply::Exit(EXIT_REPLY.to_string())
            }
            Intent::Help => SessionReply::Chat(HELP_REPLY.to_string()),
            _ => SessionReply::Chat(GREETING_REPLY.to_string()),
        }
    }

    fn next_clarification(&mut self) -> String {
        let message = CLARIFICATION_MESSAGES[self.clarify_index];
        self.clarify_index = (self.clarify_index + 1) % CLARIFICATION_MESSAGES.len();
        message.to_string()
    }
}
