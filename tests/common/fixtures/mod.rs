//! Test fixtures for roxbot
//! This module contains sample data and configurations used in tests

use std::sync::Arc;

use roxbot::utils::localizer::Localizer;

/// User who invokes the selector in tests
pub const AUTHOR_ID: u64 = 123456789;

/// Some other member reacting to the same message
pub const OTHER_USER_ID: u64 = 555000111;

/// Message id the scripted surface hands out for the prompt
pub const PROMPT_MESSAGE_ID: u64 = 987654321;

/// Localizer backed by `tests/common/fixtures/locales`
pub fn localizer() -> Arc<Localizer> {
    let dir = super::fixtures_path().join("locales");
    Arc::new(Localizer::load(dir, "en").expect("fixture locales should load"))
}

/// `count` labels named after their position
pub fn labels(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("Result {}", i)).collect()
}
