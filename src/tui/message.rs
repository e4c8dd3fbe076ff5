//! Message enum for Elm Architecture (TEA) pattern.
//!
//! Every user action is a message. Key and mouse events are mapped to
//! messages in `input`, and `App::update()` applies them.

use super::app::Tab;
use crate::data::SortColumn;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ─────────────────────────────────────────────────────────────────────────
    // App lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    Quit,
    /// Reload statistics, issues and sprint stats
    Refresh,

    // ─────────────────────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────────────────────
    NextTab,
    PrevTab,
    SelectTab(Tab),

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    MoveUp,
    MoveDown,
    GotoTop,
    GotoBottom,
    PageUp,
    PageDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Selection actions
    // ─────────────────────────────────────────────────────────────────────────
    /// Open the selected issue or graph node in the tracker
    OpenSelected,
    /// Fetch and show the selected issue with its links
    ShowIssueDetails,
    /// Load the current user's SEO tasks into the issues panel
    ShowSeoTasks,

    // ─────────────────────────────────────────────────────────────────────────
    // Search mode
    // ─────────────────────────────────────────────────────────────────────────
    EnterSearch,
    /// Leave search mode and clear the query
    ExitSearch,
    /// Leave search mode keeping the query
    ConfirmSearch,
    SearchInput(char),
    SearchBackspace,

    // ─────────────────────────────────────────────────────────────────────────
    // Sorting and filters
    // ─────────────────────────────────────────────────────────────────────────
    SortBy(SortColumn),
    ToggleFilterMenu,
    FilterMenuUp,
    FilterMenuDown,
    /// Step the focused filter through its options
    CycleFilter { forward: bool },
    ClearFilters,

    // ─────────────────────────────────────────────────────────────────────────
    // Link graph
    // ─────────────────────────────────────────────────────────────────────────
    TogglePhysics,
    FitGraph,
    /// Open the rendered graph page in the browser
    OpenGraphPage,

    // ─────────────────────────────────────────────────────────────────────────
    // Mouse
    // ─────────────────────────────────────────────────────────────────────────
    MouseMoved { column: u16, row: u16 },
    MouseClick { column: u16, row: u16 },

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    ToggleHelp,
    CloseModal,

    /// No operation
    None,
}
