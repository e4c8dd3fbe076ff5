//! Tests for `App::update` and load event handling.
//!
//! The app is built with a stub graph renderer. Tests that trigger a
//! background fetch run on a tokio runtime; the fetches target an
//! unreachable backend and their results are never polled.

mod test_utils;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use jira_dashboard::data::{
    CurrentSprintIssues, CurrentSprintStats, FilterField, IssueDetails, IssuesPanel, SeoTask,
    SortColumn, SortDirection, Statistics, StatusCount,
};
use jira_dashboard::graph::{GraphHandle, GraphOptions, GraphRenderer, GraphStatus, VisEdge, VisNode};
use jira_dashboard::integrations::LoadEvent;
use jira_dashboard::tui::app::{DetailsState, SprintIssuesState, GRAPH_FAILED, LOAD_FAILED};
use jira_dashboard::tui::input::{dispatch, InputState};
use jira_dashboard::tui::{App, Message, ModalState, Tab};
use jira_dashboard::view::tables::NO_SEO_TASKS;
use ratatui::layout::Rect;
use test_utils::*;

// ============================================================================
// Test Helpers
// ============================================================================

struct StubRenderer {
    next_id: u64,
}

impl GraphRenderer for StubRenderer {
    fn render(&mut self, _: &[VisNode], _: &[VisEdge], _: &GraphOptions) -> Result<GraphHandle> {
        self.next_id += 1;
        Ok(GraphHandle {
            id: self.next_id,
            location: None,
        })
    }

    fn destroy(&mut self, _: GraphHandle) -> Result<()> {
        Ok(())
    }

    fn set_physics(&mut self, _: &GraphHandle, _: bool) -> Result<()> {
        Ok(())
    }

    fn fit(&mut self, _: &GraphHandle) -> Result<()> {
        Ok(())
    }
}

fn app() -> App {
    App::with_renderer(test_config(), Box::new(StubRenderer { next_id: 0 }))
}

fn app_with_issues() -> App {
    let mut app = app();
    app.handle_load_event(LoadEvent::Issues(sample_issues()));
    app
}

fn visible_keys(app: &App) -> Vec<String> {
    app.state
        .visible_issues()
        .iter()
        .map(|i| i.issue_key.clone())
        .collect()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

fn seo_task(key: &str) -> SeoTask {
    SeoTask {
        issue_key: key.to_string(),
        ..Default::default()
    }
}

// ============================================================================
// Load Event Tests
// ============================================================================

mod load_events {
    use super::*;

    #[test]
    fn test_statistics_update_counters() {
        let mut app = app();
        app.handle_load_event(LoadEvent::Statistics(Statistics {
            total: 7,
            total_links: 3,
            by_status: vec![
                StatusCount {
                    status: Some("В работе".to_string()),
                    count: 2,
                },
                StatusCount {
                    status: Some("Готово".to_string()),
                    count: 5,
                },
            ],
            ..Default::default()
        }));
        assert_eq!(app.counters.total, 7);
        assert_eq!(app.counters.in_progress, 2);
        assert_eq!(app.counters.completed, 5);
        assert!(app.state.statistics.is_some());
    }

    #[test]
    fn test_issues_replace_collection() {
        let mut app = app_with_issues();
        assert_eq!(app.state.issues.len(), 4);
        assert_eq!(app.state.last_synced(), None);

        app.update(Message::GotoBottom).unwrap();
        assert_eq!(app.selected, 3);

        // A smaller collection clamps the selection
        app.handle_load_event(LoadEvent::Issues(vec![make_issue(
            "MAR-9", "Задача", "Открыто", "MAR #24",
        )]));
        assert_eq!(app.state.issues.len(), 1);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_load_failure_shows_alert() {
        let mut app = app();
        app.handle_load_event(LoadEvent::LoadFailed(anyhow::anyhow!("connection refused")));
        match &app.modal {
            ModalState::Alert(message) => assert_eq!(message, LOAD_FAILED),
            other => panic!("expected alert, got {:?}", other),
        }
        assert!(app.error_message.is_some());
    }

    #[tokio::test]
    async fn test_loading_counter_tracks_refresh_sequence() {
        let mut app = app();
        app.update(Message::Refresh).unwrap();
        assert!(app.is_loading());

        app.handle_load_event(LoadEvent::Statistics(Statistics::default()));
        app.handle_load_event(LoadEvent::Issues(sample_issues()));
        assert!(app.is_loading());

        app.handle_load_event(LoadEvent::SprintStats(Ok(CurrentSprintStats::Unavailable {
            error: "Нет данных по спринтам".to_string(),
        })));
        assert!(!app.is_loading());
        assert!(matches!(app.sprint_issues, SprintIssuesState::NotLoaded));
    }

    #[tokio::test]
    async fn test_available_sprint_stats_fetch_sprint_issues() {
        let mut app = app();
        app.handle_load_event(LoadEvent::SprintStats(Ok(CurrentSprintStats::Available(
            sprint_stats(80.0),
        ))));
        assert!(matches!(app.sprint_issues, SprintIssuesState::Loading));
        assert!(app.is_loading());

        app.handle_load_event(LoadEvent::SprintIssues(Ok(CurrentSprintIssues::Available {
            issues: sample_issues(),
            sprint_name: Some("MAR #24".to_string()),
        })));
        assert!(matches!(app.sprint_issues, SprintIssuesState::Loaded(_)));
        assert!(!app.is_loading());
    }

    #[test]
    fn test_sprint_stats_error_keeps_previous_stats() {
        let mut app = app();
        app.sprint_stats = Some(CurrentSprintStats::Available(sprint_stats(80.0)));
        app.handle_load_event(LoadEvent::SprintStats(Err(anyhow::anyhow!("timeout"))));
        assert!(matches!(app.sprint_stats, Some(CurrentSprintStats::Available(_))));
    }

    #[test]
    fn test_empty_seo_tasks_alert() {
        let mut app = app_with_issues();
        app.handle_load_event(LoadEvent::SeoTasks(Ok(Vec::new())));
        match &app.modal {
            ModalState::Alert(message) => assert_eq!(message, NO_SEO_TASKS),
            other => panic!("expected alert, got {:?}", other),
        }
        assert_eq!(app.state.panel, IssuesPanel::Issues);
    }

    #[test]
    fn test_seo_tasks_replace_issue_panel() {
        let mut app = app_with_issues();
        app.tab = Tab::Sprints;
        app.handle_load_event(LoadEvent::SeoTasks(Ok(vec![seo_task("SEO-1"), seo_task("SEO-2")])));
        assert_eq!(app.tab, Tab::Issues);
        assert_eq!(app.issue_row_count(), 2);
        assert_eq!(app.selected_issue_key(), Some("SEO-1".to_string()));

        // Any sort interaction returns to the issue table
        app.update(Message::SortBy(SortColumn::Key)).unwrap();
        assert_eq!(app.state.panel, IssuesPanel::Issues);
        assert_eq!(app.issue_row_count(), 4);
    }

    #[test]
    fn test_stale_issue_details_are_ignored() {
        let mut app = app();
        app.modal = ModalState::IssueDetails {
            issue_key: "MAR-2".to_string(),
            details: DetailsState::Loading,
            scroll: 0,
        };
        let details = IssueDetails {
            issue: make_issue("MAR-1", "Задача", "Открыто", "MAR #24"),
            links: Vec::new(),
        };
        app.handle_load_event(LoadEvent::IssueDetails {
            issue_key: "MAR-1".to_string(),
            result: Ok(details),
        });
        assert!(matches!(
            app.modal,
            ModalState::IssueDetails {
                details: DetailsState::Loading,
                ..
            }
        ));

        app.handle_load_event(LoadEvent::IssueDetails {
            issue_key: "MAR-2".to_string(),
            result: Err(anyhow::anyhow!("404")),
        });
        assert!(matches!(
            app.modal,
            ModalState::IssueDetails {
                details: DetailsState::Failed(_),
                ..
            }
        ));
    }
}

// ============================================================================
// Filter, Search and Sort Tests
// ============================================================================

mod issue_interactions {
    use super::*;

    #[test]
    fn test_filter_menu_cycles_options() {
        let mut app = app_with_issues();
        app.update(Message::ToggleFilterMenu).unwrap();
        assert_eq!(app.filter_menu_field(), Some(FilterField::Type));

        app.update(Message::CycleFilter { forward: true }).unwrap();
        assert_eq!(app.state.filters.get(FilterField::Type), Some("Задача"));
        assert_eq!(visible_keys(&app), vec!["MAR-3", "SEO-7"]);

        // Backwards from the first option returns to "all"
        app.update(Message::CycleFilter { forward: false }).unwrap();
        assert_eq!(app.state.filters.get(FilterField::Type), None);

        // Backwards from "all" wraps to the last option
        app.update(Message::CycleFilter { forward: false }).unwrap();
        assert_eq!(app.state.filters.get(FilterField::Type), Some("Эпик"));
    }

    #[test]
    fn test_filter_menu_focus_moves_between_fields() {
        let mut app = app_with_issues();
        app.update(Message::ToggleFilterMenu).unwrap();
        app.update(Message::FilterMenuDown).unwrap();
        app.update(Message::FilterMenuDown).unwrap();
        app.update(Message::FilterMenuDown).unwrap();
        app.update(Message::FilterMenuDown).unwrap();
        assert_eq!(app.filter_menu_field(), Some(FilterField::Sprint));

        app.update(Message::CycleFilter { forward: true }).unwrap();
        assert_eq!(app.state.filters.get(FilterField::Sprint), Some("MAR #24"));
        assert_eq!(visible_keys(&app), vec!["MAR-3", "MAR-1"]);
    }

    #[test]
    fn test_search_typing_filters_and_escape_clears() {
        let mut app = app_with_issues();
        let mut input = InputState::new();

        let msg = dispatch(&app, &mut input, key(KeyCode::Char('/')));
        app.update(msg).unwrap();
        assert!(app.state.search_mode);

        for c in "seo".chars() {
            let msg = dispatch(&app, &mut input, key(KeyCode::Char(c)));
            app.update(msg).unwrap();
        }
        assert_eq!(visible_keys(&app), vec!["SEO-7"]);

        let msg = dispatch(&app, &mut input, key(KeyCode::Esc));
        app.update(msg).unwrap();
        assert!(!app.state.search_mode);
        assert_eq!(app.state.search_query, "");
        assert_eq!(visible_keys(&app).len(), 4);
    }

    #[test]
    fn test_confirm_search_keeps_query() {
        let mut app = app_with_issues();
        app.update(Message::EnterSearch).unwrap();
        app.update(Message::SearchInput('A')).unwrap();
        app.update(Message::SearchInput('x')).unwrap();
        app.update(Message::SearchBackspace).unwrap();
        app.update(Message::ConfirmSearch).unwrap();
        assert!(!app.state.search_mode);
        assert_eq!(app.state.search_query, "A");
    }

    #[test]
    fn test_sort_chord_through_dispatch() {
        let mut app = app_with_issues();
        let mut input = InputState::new();

        for code in [KeyCode::Char('s'), KeyCode::Char('1')] {
            let msg = dispatch(&app, &mut input, key(code));
            app.update(msg).unwrap();
        }
        assert_eq!(app.state.sort.column, Some(SortColumn::Key));
        assert_eq!(visible_keys(&app)[0], "MAR-1");

        app.update(Message::SortBy(SortColumn::Key)).unwrap();
        assert_eq!(app.state.sort.direction, SortDirection::Desc);
        assert_eq!(visible_keys(&app)[0], "SEO-7");
    }

    #[test]
    fn test_clear_filters_resets_query_and_sort() {
        let mut app = app_with_issues();
        app.state.filters.set(FilterField::Status, Some("Готово".to_string()));
        app.state.search_query = "mar".to_string();
        app.update(Message::SortBy(SortColumn::Spent)).unwrap();

        app.update(Message::ClearFilters).unwrap();
        assert!(!app.state.filters.is_active());
        assert!(app.state.search_query.is_empty());
        assert_eq!(app.state.sort.column, None);
        assert_eq!(visible_keys(&app).len(), 4);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = app_with_issues();
        app.update(Message::MoveUp).unwrap();
        assert_eq!(app.selected, 0);
        app.update(Message::PageDown).unwrap();
        assert_eq!(app.selected, 3);
        app.update(Message::GotoTop).unwrap();
        assert_eq!(app.selected, 0);
        assert_eq!(app.selected_issue_key(), Some("MAR-3".to_string()));
    }
}

// ============================================================================
// Tab and Graph Tests
// ============================================================================

mod tabs_and_graph {
    use super::*;

    #[tokio::test]
    async fn test_links_tab_loads_graph_once() {
        let mut app = app();
        app.update(Message::SelectTab(Tab::Links)).unwrap();
        assert_eq!(app.graph.status(), &GraphStatus::Loading);
        assert!(app.is_loading());

        app.handle_load_event(LoadEvent::Graph(Ok(sample_graph())));
        assert_eq!(app.graph.status(), &GraphStatus::Ready);
        assert_eq!(app.graph.nodes().len(), 3);
        assert_eq!(app.graph.edge_count(), 2);
        assert!(!app.is_loading());

        app.update(Message::SelectTab(Tab::Issues)).unwrap();
        app.update(Message::SelectTab(Tab::Links)).unwrap();
        assert!(!app.is_loading());
        assert_eq!(app.graph.status(), &GraphStatus::Ready);
    }

    #[tokio::test]
    async fn test_graph_failure_is_retried_on_next_activation() {
        let mut app = app();
        app.update(Message::SelectTab(Tab::Links)).unwrap();
        app.handle_load_event(LoadEvent::Graph(Err(anyhow::anyhow!("500"))));
        assert_eq!(app.graph.status(), &GraphStatus::Failed(GRAPH_FAILED.to_string()));

        app.update(Message::NextTab).unwrap();
        app.update(Message::PrevTab).unwrap();
        assert_eq!(app.tab, Tab::Links);
        assert_eq!(app.graph.status(), &GraphStatus::Loading);
    }

    #[tokio::test]
    async fn test_graph_selection_and_physics() {
        let mut app = app();
        app.update(Message::SelectTab(Tab::Links)).unwrap();
        app.handle_load_event(LoadEvent::Graph(Ok(sample_graph())));

        app.update(Message::MoveDown).unwrap();
        assert_eq!(app.selected_issue_key(), Some("MAR-2".to_string()));

        assert!(app.graph.physics());
        app.update(Message::TogglePhysics).unwrap();
        assert!(!app.graph.physics());
        app.update(Message::FitGraph).unwrap();
        assert_eq!(app.graph.scroll, 0);
    }

    #[test]
    fn test_sprints_tab_scrolls() {
        let mut app = app();
        app.update(Message::SelectTab(Tab::Sprints)).unwrap();
        app.update(Message::MoveDown).unwrap();
        app.update(Message::MoveDown).unwrap();
        assert_eq!(app.scroll, 2);
        app.update(Message::GotoTop).unwrap();
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(app.update(Message::Quit).unwrap());
        assert!(!app.update(Message::None).unwrap());
    }
}

// ============================================================================
// Modal and Mouse Tests
// ============================================================================

mod modals_and_mouse {
    use super::*;

    #[test]
    fn test_help_toggle() {
        let mut app = app();
        app.update(Message::ToggleHelp).unwrap();
        assert!(app.show_help());
        app.update(Message::ToggleHelp).unwrap();
        assert!(app.modal.is_none());
    }

    #[test]
    fn test_details_modal_scrolls_instead_of_moving_selection() {
        let mut app = app_with_issues();
        app.modal = ModalState::IssueDetails {
            issue_key: "MAR-3".to_string(),
            details: DetailsState::Loading,
            scroll: 0,
        };
        app.update(Message::MoveDown).unwrap();
        app.update(Message::MoveDown).unwrap();
        app.update(Message::MoveUp).unwrap();
        assert!(matches!(app.modal, ModalState::IssueDetails { scroll: 1, .. }));
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_click_on_tab_selects_it() {
        let mut app = app();
        app.hits.tabs.borrow_mut().push((Rect::new(10, 3, 9, 1), Tab::Sprints));
        app.update(Message::MouseClick { column: 12, row: 3 }).unwrap();
        assert_eq!(app.tab, Tab::Sprints);
    }

    #[test]
    fn test_click_on_header_sorts() {
        let mut app = app_with_issues();
        app.hits
            .headers
            .borrow_mut()
            .push((Rect::new(0, 5, 8, 1), SortColumn::Assignee));
        app.update(Message::MouseClick { column: 2, row: 5 }).unwrap();
        assert_eq!(app.state.sort.column, Some(SortColumn::Assignee));
        assert_eq!(visible_keys(&app)[0], "MAR-2");
    }

    #[test]
    fn test_click_on_row_selects_it() {
        let mut app = app_with_issues();
        app.hits.issue_rows.set(Some(Rect::new(0, 6, 80, 10)));
        app.update(Message::MouseClick { column: 5, row: 8 }).unwrap();
        assert_eq!(app.selected, 2);

        // Below the last row
        app.update(Message::MouseClick { column: 5, row: 12 }).unwrap();
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_click_closes_modal() {
        let mut app = app();
        app.modal = ModalState::Alert("x".to_string());
        app.hits.tabs.borrow_mut().push((Rect::new(0, 0, 10, 1), Tab::Sprints));
        app.update(Message::MouseClick { column: 1, row: 0 }).unwrap();
        assert!(app.modal.is_none());
        assert_eq!(app.tab, Tab::Issues);
    }

    #[test]
    fn test_hover_over_graph_node() {
        let mut app = app();
        app.tab = Tab::Links;
        app.handle_load_event(LoadEvent::Graph(Ok(sample_graph())));
        app.hits.graph_nodes.set(Some(Rect::new(1, 5, 40, 10)));

        app.update(Message::MouseMoved { column: 4, row: 6 }).unwrap();
        assert_eq!(app.hovered_node(), Some(1));

        app.update(Message::MouseMoved { column: 4, row: 9 }).unwrap();
        assert_eq!(app.hovered_node(), None);
    }
}
