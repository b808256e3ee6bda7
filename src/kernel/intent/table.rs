//! Static per-intent tables: required slots, follow-up entity whitelist,
//! the dangerous-intent list and the dictation list. Read-only.

use super::types::{Args, Intent, Slot};

/// Intents whose unattended re-execution is never allowed.
pub const DANGEROUS_INTENTS: &[Intent] = &[Intent::OpenTerminal];

pub fn is_dangerous(intent: Intent) -> bool {
    DANGEROUS_INTENTS.contains(&intent)
}

/// Intents whose text is dictated content: "that" or "again" inside a note
/// is part of the note, never a reference to an earlier turn.
pub const DICTATION_INTENTS: &[Intent] = &[Intent::SaveNote];

pub fn takes_dictation(intent: Intent) -> bool {
    DICTATION_INTENTS.contains(&intent)
}

/// Slots that must be non-empty before an intent may be dispatched.
pub fn required_slots(intent: Intent) -> &'static [Slot] {
    match intent {
        Intent::OpenBrowser => &[Slot::Url],
        Intent::SearchWeb => &[Slot::Query],
        Intent::OpenFileManager => &[Slot::Path],
        Intent::ListFiles => &[Slot::Path],
        Intent::OpenFile => &[Slot::Filename],
        Intent::OpenTerminal => &[Slot::Command],
        Intent::ReadFile => &[Slot::Filename],
        Intent::SaveNote => &[Slot::Note],
        Intent::ReadNotes => &[],
        Intent::Greeting | Intent::Help | Intent::Exit | Intent::Unknown => &[],
    }
}

/// Entities a follow-up may carry over into `intent`.
pub fn entity_whitelist(intent: Intent) -> &'static [Slot] {
    match intent {
        Intent::OpenBrowser => &[Slot::Url, Slot::Target],
        Intent::SearchWeb => &[Slot::Query, Slot::Target],
        Intent::OpenFileManager => &[Slot::Path, Slot::Target],
        Intent::ListFiles => &[Slot::Path, Slot::Target],
        Intent::OpenFile => &[Slot::Filename, Slot::FullPath, Slot::Target],
        Intent::OpenTerminal => &[Slot::Command, Slot::Target],
        Intent::ReadFile => &[Slot::Filename, Slot::FullPath, Slot::Target],
        Intent::ReadNotes => &[Slot::Target],
        Intent::SaveNote
        | Intent::Greeting
        | Intent::Help
        | Intent::Exit
        | Intent::Unknown => &[],
    }
}

/// Keep only the entities `intent` is allowed to receive.
pub fn filter_entities(intent: Intent, entities: &Args) -> Args {
    let allowed = entity_whitelist(intent);
    entities
        .iter()
        .filter(|(slot, _)| allowed.contains(slot))
        .map(|(slot, value)| (*slot, value.clone()))
        .collect()
}

/// Required slots of `intent` that are absent or blank in `args`, in table order.
pub fn missing_slots(intent: Intent, args: &Args) -> Vec<Slot> {
    required_slots(intent)
        .iter()
        .filter(|slot| args.get(slot).map_or(true, |v| v.trim().is_empty()))
        .copied()
        .collect()
}
