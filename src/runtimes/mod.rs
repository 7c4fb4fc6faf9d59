//! Runtime directories: capability detection and the active link

pub mod detector;
pub mod link;

pub use detector::{detect, directory_exists, executable_name};
pub use link::{ActiveLink, SymlinkSwitcher};
