//! Fixed phrases of the training-record template shared by `extract` and `reformat`.

pub const HUMAN_PREFIX: &str = "human: ";
pub const STRUCTURE_LEAD_IN: &str = "Given the user's current eCTD structure:";
pub const TEXT_CHUNK_MARKER: &str = "and the provided text chunk:";
pub const BOT_MARKER: &str = "bot:";

/// Words of document text kept in each training record.
pub const DEFAULT_MAX_WORDS: usize = 300;
