//! Workspace-relative filenames

use std::path::{Component, Path, PathBuf};

/// Shortest path of `path` relative to any of `roots`, or an empty string when the
/// path lies under none of them. Ties keep the earliest root.
pub fn short_workspace_filename(path: &Path, roots: &[PathBuf]) -> String {
    let full = normalize(path);
    let mut best: Option<String> = None;
    for root in roots {
        let root = normalize(root);
        let Ok(relative) = full.strip_prefix(&root) else {
            continue;
        };
        let candidate = relative.to_string_lossy().into_owned();
        match &best {
            Some(current) if candidate.len() >= current.len() => {}
            _ => best = Some(candidate),
        }
    }
    best.unwrap_or_default()
}

/// Lexically resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
