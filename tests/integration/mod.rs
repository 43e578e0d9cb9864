//! Integration tests
//! Selector sessions driven through in-memory chat surfaces

pub mod localizer;
pub mod selector;
