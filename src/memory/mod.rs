pub mod short_term;
pub mod store;
pub mod types;

pub use short_term::{RecentQuery, ShortTermMemory};
pub use store::TranscriptStore;
pub use types::{Role, TranscriptEntry};
