//! The `add`, `list` and `use` commands
//!
//! Commands write their report to the writer they are given and return
//! errors to the caller. Only the binary decides exit codes.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::cli::prompt::{Selection, SelectionPrompt, build_choices};
use crate::cli::style;
use crate::config::{Registry, RegistryStore};
use crate::core::{Capability, LangmError, Runtime, group_by_capability};
use crate::runtimes::{self, ActiveLink};

/// Register the runtime directory at `path`.
///
/// Relative paths are resolved against `cwd`. Without `forced`, the
/// capabilities are detected from the directory contents.
pub fn add<S: RegistryStore>(
    registry: &mut Registry<S>,
    path: &Path,
    forced: Option<Capability>,
    cwd: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    let dir = absolutize(path, cwd);

    if !runtimes::directory_exists(&dir) {
        return Err(LangmError::DirectoryNotFound(dir).into());
    }

    let capabilities = match forced {
        Some(cap) => vec![cap],
        None => {
            let detected = runtimes::detect(&dir);
            if detected.is_empty() {
                return Err(LangmError::UndetectableRuntime(dir).into());
            }
            detected
        }
    };

    let (Some(name), Some(path_str)) = (
        dir.file_name().and_then(|n| n.to_str()),
        dir.to_str(),
    ) else {
        return Err(LangmError::InvalidRuntimePath(dir).into());
    };

    let runtime = Runtime::new(name, path_str, capabilities);
    registry.add_runtime(runtime.clone())?;

    writeln!(
        out,
        "{}",
        style::success(&format!("Registered runtime: {}", style::runtime(&runtime.name)))
    )?;
    write_details(out, &runtime)?;
    Ok(())
}

#[derive(Serialize)]
struct ListEntry<'a> {
    name: &'a str,
    path: &'a str,
    capabilities: &'a [Capability],
    current: bool,
}

/// Print registered runtimes, optionally restricted to one capability.
pub fn list<S: RegistryStore>(
    registry: &mut Registry<S>,
    filter: Option<Capability>,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let runtimes = registry.runtimes_matching(filter)?;
    let current = registry.current()?;

    if let Some(name) = current.as_deref()
        && registry.runtime_by_name(name)?.is_none()
    {
        tracing::warn!("Active runtime {name} is not registered");
    }

    if json {
        let entries: Vec<ListEntry<'_>> = runtimes
            .iter()
            .map(|r| ListEntry {
                name: &r.name,
                path: &r.path,
                capabilities: &r.capabilities,
                current: current.as_deref() == Some(r.name.as_str()),
            })
            .collect();
        let text = serde_json::to_string_pretty(&entries).map_err(LangmError::Encode)?;
        writeln!(out, "{text}")?;
        return Ok(());
    }

    if runtimes.is_empty() {
        return write_empty_guidance(out, filter);
    }

    let groups = match filter {
        Some(cap) => vec![(cap, runtimes.iter().collect())],
        None => group_by_capability(&runtimes),
    };

    for (cap, members) in groups {
        writeln!(out, "{}", style::heading(&format!("{cap}:")))?;
        for runtime in members {
            let marker = if current.as_deref() == Some(runtime.name.as_str()) {
                style::current_marker()
            } else {
                String::new()
            };
            writeln!(out, "  {}{marker}", style::runtime(&runtime.name))?;
            writeln!(out, "    {}", style::dim(&runtime.path))?;
        }
    }
    Ok(())
}

/// Let the user pick a runtime and make it the active one.
pub fn use_runtime<S: RegistryStore>(
    registry: &mut Registry<S>,
    link: &dyn ActiveLink,
    prompt: &mut dyn SelectionPrompt,
    filter: Option<Capability>,
    out: &mut dyn Write,
) -> Result<()> {
    let runtimes = registry.runtimes_matching(filter)?;
    if runtimes.is_empty() {
        return write_empty_guidance(out, filter);
    }

    let choices = build_choices(&runtimes, filter);
    let value = match prompt.select("Select a runtime", &choices)? {
        Selection::Chosen(value) => value,
        Selection::Cancelled => {
            writeln!(out, "Cancelled")?;
            return Ok(());
        }
    };

    let Some(runtime) = runtimes.iter().find(|r| r.name == value) else {
        return Err(LangmError::SelectionNotFound(value).into());
    };

    link.switch_to(Path::new(&runtime.path))?;
    registry.set_current(Some(runtime.name.clone()))?;

    writeln!(
        out,
        "{}",
        style::success(&format!("Switched to: {}", style::runtime(&runtime.name)))
    )?;
    write_details(out, runtime)?;
    writeln!(out)?;
    writeln!(out, "{}", style::arrow(&path_hint(&link.bin_dir())))?;
    Ok(())
}

fn write_details(out: &mut dyn Write, runtime: &Runtime) -> Result<()> {
    writeln!(out, "  path: {}", style::path(&runtime.path))?;
    writeln!(out, "  capabilities: {}", runtime.capability_list())?;
    Ok(())
}

fn write_empty_guidance(out: &mut dyn Write, filter: Option<Capability>) -> Result<()> {
    match filter {
        Some(cap) => writeln!(out, "No runtimes with the {cap} capability")?,
        None => writeln!(out, "No runtimes registered")?,
    }
    writeln!(
        out,
        "Use {} to register one",
        style::command("langm add <path>")
    )?;
    Ok(())
}

/// Reminder that the active runtime's executables must be on PATH
#[must_use]
pub fn path_hint(bin_dir: &Path) -> String {
    if cfg!(windows) {
        format!(
            "Make sure {} is on your PATH (default: %USERPROFILE%\\.langm\\current\\bin)",
            bin_dir.display()
        )
    } else {
        format!(
            "Make sure {0} is on your PATH, e.g. export PATH=\"{0}:$PATH\"",
            bin_dir.display()
        )
    }
}

/// Make `path` absolute against `cwd` and collapse `.` and `..` lexically.
#[must_use]
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::core::RegistryDocument;
    use crate::core::testing::{
        MemoryLink, MemoryStore, RuntimeDirBuilder, RuntimeFixture, ScriptedPrompt,
    };
    use tempfile::TempDir;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    fn registry_with(runtimes: Vec<Runtime>, current: Option<&str>) -> Registry<MemoryStore> {
        Registry::new(MemoryStore::with_document(RegistryDocument {
            current: current.map(str::to_string),
            runtimes,
        }))
    }

    fn langm_error(err: &anyhow::Error) -> &LangmError {
        err.downcast_ref::<LangmError>().expect("LangmError")
    }

    #[test]
    fn test_absolutize() {
        let cwd = Path::new("/home/u/work");
        assert_eq!(absolutize(Path::new("node"), cwd), PathBuf::from("/home/u/work/node"));
        assert_eq!(absolutize(Path::new("./a/../b"), cwd), PathBuf::from("/home/u/work/b"));
        assert_eq!(absolutize(Path::new("../.."), cwd), PathBuf::from("/home"));
        assert_eq!(absolutize(Path::new("/opt/x/"), cwd), PathBuf::from("/opt/x"));
        assert_eq!(absolutize(Path::new("/.."), cwd), PathBuf::from("/"));
    }

    #[test]
    fn test_add_detects_capabilities() {
        let temp = TempDir::new().unwrap();
        let dir = RuntimeDirBuilder::new(temp.path(), "node-20").with_node().build();
        let store = MemoryStore::new();
        let mut registry = Registry::new(store.clone());
        let mut out = Vec::new();

        add(&mut registry, &dir, None, temp.path(), &mut out).unwrap();

        let doc = store.document().unwrap();
        assert_eq!(doc.runtimes.len(), 1);
        assert_eq!(doc.runtimes[0].name, "node-20");
        assert_eq!(doc.runtimes[0].path, dir.to_str().unwrap());
        assert_eq!(doc.runtimes[0].capabilities, vec![Capability::Node]);

        let text = output(out);
        assert!(text.contains("Registered runtime: node-20"));
        assert!(text.contains("capabilities: node"));
    }

    #[test]
    fn test_add_relative_path() {
        let temp = TempDir::new().unwrap();
        RuntimeDirBuilder::new(temp.path(), "jdk-21").with_java().build();
        let store = MemoryStore::new();
        let mut registry = Registry::new(store.clone());

        add(
            &mut registry,
            Path::new("./jdk-21"),
            None,
            temp.path(),
            &mut Vec::new(),
        )
        .unwrap();

        let runtime = &store.document().unwrap().runtimes[0];
        assert_eq!(runtime.path, temp.path().join("jdk-21").to_str().unwrap());
    }

    #[test]
    fn test_add_forced_capability_skips_detection() {
        let temp = TempDir::new().unwrap();
        let dir = RuntimeDirBuilder::new(temp.path(), "graalvm-25").with_node().build();
        let store = MemoryStore::new();
        let mut registry = Registry::new(store.clone());

        add(
            &mut registry,
            &dir,
            Some(Capability::Java),
            temp.path(),
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(
            store.document().unwrap().runtimes[0].capabilities,
            vec![Capability::Java]
        );
    }

    #[test]
    fn test_add_undetectable() {
        let temp = TempDir::new().unwrap();
        let dir = RuntimeDirBuilder::new(temp.path(), "x").build();
        let store = MemoryStore::new();
        let mut registry = Registry::new(store.clone());

        let err = add(&mut registry, &dir, None, temp.path(), &mut Vec::new()).unwrap_err();

        assert!(matches!(langm_error(&err), LangmError::UndetectableRuntime(_)));
        assert!(err.to_string().contains("--node"));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_add_missing_directory() {
        let temp = TempDir::new().unwrap();
        let mut registry = Registry::new(MemoryStore::new());

        let err = add(
            &mut registry,
            Path::new("missing"),
            Some(Capability::Node),
            temp.path(),
            &mut Vec::new(),
        )
        .unwrap_err();

        assert!(matches!(
            langm_error(&err),
            LangmError::DirectoryNotFound(p) if p == &temp.path().join("missing")
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_add_root_has_no_name() {
        let mut registry = Registry::new(MemoryStore::new());

        let err = add(
            &mut registry,
            Path::new("/"),
            Some(Capability::Node),
            Path::new("/"),
            &mut Vec::new(),
        )
        .unwrap_err();

        assert!(matches!(langm_error(&err), LangmError::InvalidRuntimePath(_)));
    }

    #[test]
    fn test_add_same_final_segment_rejected() {
        let temp = TempDir::new().unwrap();
        let a = RuntimeDirBuilder::new(&temp.path().join("a"), "v1").with_node().build();
        let b = RuntimeDirBuilder::new(&temp.path().join("b"), "v1").with_java().build();
        let store = MemoryStore::new();
        let mut registry = Registry::new(store.clone());

        add(&mut registry, &a, None, temp.path(), &mut Vec::new()).unwrap();
        let err = add(&mut registry, &b, None, temp.path(), &mut Vec::new()).unwrap_err();

        assert!(matches!(langm_error(&err), LangmError::DuplicateName(n) if n == "v1"));
        assert_eq!(store.document().unwrap().runtimes.len(), 1);
    }

    #[test]
    fn test_list_empty() {
        let mut registry = Registry::new(MemoryStore::new());
        let mut out = Vec::new();

        list(&mut registry, None, false, &mut out).unwrap();

        let text = output(out);
        assert!(text.starts_with("No runtimes registered\n"));
        assert!(text.contains("langm add <path>"));
    }

    #[test]
    fn test_list_empty_filtered() {
        let mut registry = registry_with(vec![RuntimeFixture::node("node-20")], None);
        let mut out = Vec::new();

        list(&mut registry, Some(Capability::Java), false, &mut out).unwrap();

        assert!(output(out).starts_with("No runtimes with the java capability\n"));
    }

    #[test]
    fn test_list_grouped_with_marker() {
        let mut registry = registry_with(
            vec![
                RuntimeFixture::node("node-20"),
                RuntimeFixture::graalvm("graal"),
                RuntimeFixture::jdk("jdk-21"),
            ],
            Some("graal"),
        );
        let mut out = Vec::new();

        list(&mut registry, None, false, &mut out).unwrap();

        assert_eq!(
            output(out),
            "\
node:
  node-20
    /opt/node-20
  graal *
    /opt/graal
java:
  graal *
    /opt/graal
  jdk-21
    /opt/jdk-21
"
        );
    }

    #[test]
    fn test_list_filtered() {
        let mut registry = registry_with(
            vec![
                RuntimeFixture::node("node-20"),
                RuntimeFixture::jdk("jdk-17"),
                RuntimeFixture::jdk("jdk-21"),
            ],
            Some("jdk-21"),
        );
        let mut out = Vec::new();

        list(&mut registry, Some(Capability::Java), false, &mut out).unwrap();

        assert_eq!(
            output(out),
            "java:\n  jdk-17\n    /opt/jdk-17\n  jdk-21 *\n    /opt/jdk-21\n"
        );
    }

    #[test]
    fn test_list_json() {
        let mut registry = registry_with(
            vec![RuntimeFixture::node("node-20"), RuntimeFixture::jdk("jdk-21")],
            Some("jdk-21"),
        );
        let mut out = Vec::new();

        list(&mut registry, None, true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"name": "node-20", "path": "/opt/node-20", "capabilities": ["node"], "current": false},
                {"name": "jdk-21", "path": "/opt/jdk-21", "capabilities": ["java"], "current": true},
            ])
        );
    }

    #[test]
    fn test_list_json_empty_is_array() {
        let mut registry = Registry::new(MemoryStore::new());
        let mut out = Vec::new();

        list(&mut registry, None, true, &mut out).unwrap();

        assert_eq!(output(out), "[]\n");
    }

    #[test]
    fn test_use_empty_does_not_prompt() {
        let mut registry = Registry::new(MemoryStore::new());
        let link = MemoryLink::new();
        let mut prompt = ScriptedPrompt::choosing("anything");
        let mut out = Vec::new();

        use_runtime(&mut registry, &link, &mut prompt, Some(Capability::Node), &mut out).unwrap();

        assert!(prompt.message().is_none());
        assert!(output(out).starts_with("No runtimes with the node capability"));
        assert_eq!(link.switches(), 0);
    }

    #[test]
    fn test_use_switches_and_records_current() {
        let store = MemoryStore::with_document(RegistryDocument {
            current: None,
            runtimes: vec![RuntimeFixture::jdk("jdk-17"), RuntimeFixture::jdk("jdk-21")],
        });
        let mut registry = Registry::new(store.clone());
        let link = MemoryLink::new();
        let mut prompt = ScriptedPrompt::choosing("jdk-21");
        let mut out = Vec::new();

        use_runtime(&mut registry, &link, &mut prompt, Some(Capability::Java), &mut out).unwrap();

        assert_eq!(link.target(), Some(PathBuf::from("/opt/jdk-21")));
        assert_eq!(store.document().unwrap().current.as_deref(), Some("jdk-21"));
        assert_eq!(prompt.shown().len(), 2);

        let text = output(out);
        assert!(text.contains("Switched to: jdk-21"));
        assert!(text.contains("path: /opt/jdk-21"));
        assert!(text.contains(&Path::new("/langm/current/bin").display().to_string()));
    }

    #[test]
    fn test_use_cancelled() {
        let store = MemoryStore::with_document(RegistryDocument {
            current: None,
            runtimes: vec![RuntimeFixture::node("node-20")],
        });
        let mut registry = Registry::new(store.clone());
        let link = MemoryLink::new();
        let mut prompt = ScriptedPrompt::cancelling();
        let mut out = Vec::new();

        use_runtime(&mut registry, &link, &mut prompt, None, &mut out).unwrap();

        assert_eq!(output(out), "Cancelled\n");
        assert_eq!(link.switches(), 0);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_use_link_failure_leaves_registry_untouched() {
        let store = MemoryStore::with_document(RegistryDocument {
            current: Some("node-18".to_string()),
            runtimes: vec![RuntimeFixture::node("node-18"), RuntimeFixture::node("node-20")],
        });
        let mut registry = Registry::new(store.clone());
        let link = MemoryLink::refusing();
        let mut prompt = ScriptedPrompt::choosing("node-20");
        let mut out = Vec::new();

        let err = use_runtime(&mut registry, &link, &mut prompt, None, &mut out).unwrap_err();

        assert!(matches!(
            langm_error(&err),
            LangmError::InsufficientPrivilege { link: path, .. } if path == Path::new("/langm/current")
        ));
        assert_eq!(store.writes(), 0);
        assert_eq!(store.document().unwrap().current.as_deref(), Some("node-18"));
        assert_eq!(link.target(), None);
        assert!(!output(out).contains("Switched to"));
    }

    #[test]
    fn test_use_unknown_selection() {
        let mut registry = registry_with(vec![RuntimeFixture::node("node-20")], None);
        let link = MemoryLink::new();
        let mut prompt = ScriptedPrompt::choosing("ghost");

        let err = use_runtime(&mut registry, &link, &mut prompt, None, &mut Vec::new())
            .unwrap_err();

        assert!(matches!(
            langm_error(&err),
            LangmError::SelectionNotFound(v) if v == "ghost"
        ));
        assert_eq!(link.switches(), 0);
    }

    #[test]
    fn test_use_unfiltered_shows_headers() {
        let mut registry = registry_with(
            vec![RuntimeFixture::node("node-20"), RuntimeFixture::jdk("jdk-21")],
            None,
        );
        let link = MemoryLink::new();
        let mut prompt = ScriptedPrompt::choosing("node-20");

        use_runtime(&mut registry, &link, &mut prompt, None, &mut Vec::new()).unwrap();

        let shown = prompt.shown();
        assert_eq!(shown.len(), 4);
        assert!(shown[0].is_header());
        assert!(shown[2].is_header());
    }

    #[test]
    fn test_path_hint_names_bin_dir() {
        let hint = path_hint(Path::new("/home/u/.langm/current/bin"));
        assert!(hint.contains("/home/u/.langm/current/bin"));
    }
}
