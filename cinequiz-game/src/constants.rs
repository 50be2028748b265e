//! Centralized rules and storage constants for Cinequiz game logic.
//!
//! Keeping them together ensures that the attempt budget and the persisted
//! layout can only change through reviewed code, never through catalog data.

// Rules ---------------------------------------------------------------------
/// Attempts granted at the start of every daily session.
pub const ATTEMPT_BUDGET: u8 = 6;
/// Maximum number of autocomplete suggestions the UI shows.
pub const SUGGESTION_LIMIT: usize = 5;

// Storage keys --------------------------------------------------------------
/// Marker holding the ISO date of the last session that was played.
pub const LAST_PLAYED_KEY: &str = "cinequiz.lastPlayedDate";
/// Serialized [`crate::session::Session`] record.
pub const SESSION_KEY: &str = "cinequiz.quizState";
/// Schema version written alongside every persisted session.
pub const SAVE_VERSION: u32 = 1;

// Catalog -------------------------------------------------------------------
/// Separator used by the upstream top-250 feed for list-valued fields.
pub(crate) const FEED_LIST_SEPARATOR: char = ',';
pub(crate) const FALLBACK_CATALOG_JSON: &str = include_str!("../assets/catalog.json");
