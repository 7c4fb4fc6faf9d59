//! Error types for LangM with helpful suggestions

use std::path::PathBuf;

use thiserror::Error;

/// Convenience Result type for LangM operations
pub type Result<T> = std::result::Result<T, LangmError>;

#[derive(Error, Debug)]
pub enum LangmError {
    #[error("Config file is corrupt or invalid: {}", .path.display())]
    CorruptConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Runtime \"{0}\" already exists")]
    DuplicateName(String),

    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error(
        "Could not detect the runtime type of {dir}\nNo bin/{node} or bin/{java} found in that directory\nPass the type explicitly:\n  langm add {dir} --node\n  langm add {dir} --java",
        dir = .0.display(),
        node = crate::runtimes::executable_name("node"),
        java = crate::runtimes::executable_name("java")
    )]
    UndetectableRuntime(PathBuf),

    #[error("Cannot derive a runtime name from {}", .0.display())]
    InvalidRuntimePath(PathBuf),

    #[error(
        "Failed to create link {}: insufficient privilege\nTry one of the following:\n  1. Enable Developer Mode (allows unprivileged symlinks)\n  2. Run the terminal as administrator",
        .link.display()
    )]
    InsufficientPrivilege {
        link: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Selected runtime not found: {0}")]
    SelectionNotFound(String),

    #[error("Selection failed: {0}")]
    Prompt(String),

    #[error("Invalid settings in {}: {message}", .path.display())]
    Settings { path: PathBuf, message: String },

    #[error("Failed to encode registry: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LangmError {
    /// Get a helpful suggestion for how to fix this error
    #[must_use]
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::CorruptConfig { path, .. } => Some(format!(
                "Fix the JSON by hand, or move it away to start over: mv {0} {0}.bak",
                path.display()
            )),
            Self::DuplicateName(_) => Some(
                "Runtime names come from the directory name; rename the directory to register both"
                    .to_string(),
            ),
            Self::Prompt(_) => {
                Some("Run `langm use` from an interactive terminal".to_string())
            }
            Self::Settings { path, .. } => Some(format!(
                "Check {} for syntax errors, or delete it to use the defaults",
                path.display()
            )),
            Self::DirectoryNotFound(_) => {
                Some("Check the path, or pass the installation root (the directory containing bin/)".to_string())
            }
            Self::UndetectableRuntime(_)
            | Self::InsufficientPrivilege { .. }
            | Self::InvalidRuntimePath(_)
            | Self::SelectionNotFound(_)
            | Self::Encode(_)
            | Self::Io(_) => None,
        }
    }
}

/// Format an error with its suggestion for display
pub fn format_error_with_suggestion(err: &anyhow::Error) -> String {
    let mut msg = format!("Error: {err}");
    if let Some(suggestion) = err
        .downcast_ref::<LangmError>()
        .and_then(LangmError::suggestion)
    {
        msg.push_str("\n\n");
        msg.push_str(&suggestion);
    }
    msg
}
