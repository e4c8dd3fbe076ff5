//! TUI rendering module.
//!
//! - `icons` - glyphs used throughout the UI
//! - `layout` - layout calculations and text utilities
//! - `status` - status configuration, tab bar, status bar and help
//! - `table` - table nodes, the issues tab and the sprints tab
//! - `sprint` - header cards and the sprint load tab
//! - `graph` - the links tab
//! - `modals` / `menus` - popups

pub mod icons;
pub mod layout;
mod graph;
mod menus;
mod modals;
mod sprint;
mod status;
mod table;

pub use self::draw::draw;

mod draw {
    use super::graph::draw_links_tab;
    use super::menus::draw_filter_menu;
    use super::modals::{draw_alert, draw_issue_details};
    use super::sprint::{draw_header, draw_sprint_load_tab};
    use super::status::{draw_help_popup, draw_status_bar, draw_tabs};
    use super::table::{draw_issues_tab, draw_sprints_tab};
    use crate::tui::{App, ModalState, Tab};
    use ratatui::{
        layout::{Constraint, Direction, Layout},
        Frame,
    };

    /// Main draw function - renders the entire TUI.
    pub fn draw(f: &mut Frame, app: &App) {
        app.hits.clear();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Counter cards
                Constraint::Length(1), // Tab bar
                Constraint::Min(0),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        draw_header(f, app, chunks[0]);
        draw_tabs(f, app, chunks[1]);
        match app.tab {
            Tab::Issues => draw_issues_tab(f, app, chunks[2]),
            Tab::Sprints => draw_sprints_tab(f, app, chunks[2]),
            Tab::SprintLoad => draw_sprint_load_tab(f, app, chunks[2]),
            Tab::Links => draw_links_tab(f, app, chunks[2]),
        }
        draw_status_bar(f, app, chunks[3]);

        // Overlays
        match &app.modal {
            ModalState::None => {}
            ModalState::Help => draw_help_popup(f),
            ModalState::FilterMenu { .. } => draw_filter_menu(f, app),
            ModalState::Alert(message) => draw_alert(f, message),
            ModalState::IssueDetails { .. } => draw_issue_details(f, app),
        }
    }
}
