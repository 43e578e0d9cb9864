//! This module aggregates various utility submodules used throughout the application.

/// Per-guild settings stored in SQLite.
pub mod database;
/// Locale string tables.
pub mod localizer;
/// Packs text lines into embed pages.
pub mod paginator;
/// Reaction-driven multiple choice menus.
pub mod selector;
