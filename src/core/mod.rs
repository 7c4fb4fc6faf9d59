//! Core module - shared types, errors, and paths

mod error;
pub mod paths;
pub mod testing;
mod types;

pub use error::{LangmError, Result, format_error_with_suggestion};
pub use types::*;
