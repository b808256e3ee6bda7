use crate::kernel::intent::Intent;
use crate::memory::types::Role;

/// Write-only transcript sink. Nothing in the turn kernel reads it back.
pub trait TranscriptStore: Send {
    fn save(&mut self, role: Role, text: &str, intent: Intent);

    /// Stores that keep a confidence override this; others ignore the score.
    fn save_scored(&mut self, role: Role, text: &str, intent: Intent, _confidence: f32) {
        self.save(role, text, intent);
    }
}
