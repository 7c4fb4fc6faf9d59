//! Capability detection for runtime directories
//!
//! A directory provides a capability when the matching executable exists
//! under its `bin/` directory. Content, version and architecture are never
//! inspected.

use std::path::Path;

use crate::core::Capability;

/// Platform file name of an executable (`node` / `node.exe`)
#[must_use]
pub fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

/// Infer the capabilities `dir` provides, in detection order
pub fn detect(dir: &Path) -> Vec<Capability> {
    let capabilities: Vec<Capability> = Capability::all()
        .iter()
        .copied()
        .filter(|cap| {
            dir.join("bin")
                .join(executable_name(cap.as_str()))
                .is_file()
        })
        .collect();

    tracing::debug!("Detected {:?} in {}", capabilities, dir.display());
    capabilities
}

/// True only for an existing directory. Stat errors count as absent.
#[must_use]
pub fn directory_exists(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_dir())
}
