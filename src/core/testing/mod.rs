//! Test infrastructure shared by unit and integration tests
//!
//! This module provides:
//! - Fixture builders for runtimes and fake installation directories
//! - In-memory implementations of the registry store, active link and prompt
//! - A temporary LangM home for filesystem-level tests

#![allow(clippy::unwrap_used, clippy::expect_used)]

pub mod fixtures;
pub mod helpers;
pub mod mocks;

// Re-export commonly used test utilities
pub use fixtures::*;
pub use helpers::*;
pub use mocks::*;
