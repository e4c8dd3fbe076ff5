//! Glyphs used throughout the UI.

// Issue status, by class
pub const STATUS_IN_PROGRESS: &str = "◑";
pub const STATUS_DONE: &str = "●";
pub const STATUS_OPEN: &str = "○";
pub const STATUS_CLOSED: &str = "⊘";

// Priority (signal bar style)
pub const PRIORITY_HIGH: &str = "▮▮▮";
pub const PRIORITY_MEDIUM: &str = "▮▮╌";
pub const PRIORITY_LOW: &str = "▮╌╌";
pub const PRIORITY_NONE: &str = "╌╌╌";

// Header cards
pub const CARD_TOTAL: &str = "📋";
pub const CARD_LINKS: &str = "🔗";
pub const CARD_IN_PROGRESS: &str = "🔄";
pub const CARD_DONE: &str = "✅";

pub const LINK_INWARD: &str = "←";
pub const LINK_OUTWARD: &str = "→";
pub const SEARCH: &str = "🔍";
pub const FILTER: &str = "⚙";
pub const SELECTED: &str = "▶ ";
