//! Jira Dashboard - terminal dashboard for issues, sprint workload and issue links
//!
//! This library crate exposes internal modules for integration testing.

pub mod config;
pub mod data;
pub mod format;
pub mod graph;
pub mod integrations;
pub mod tui;
pub mod util;
pub mod view;
pub mod workload;
