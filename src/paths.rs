//! Relative path computation against an explicit base directory.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::Error;

/// Rewrites file paths relative to a fixed base directory. The base is
/// passed in by the caller rather than read from the process.
#[derive(Debug)]
pub struct PathNormalizer {
    /// Symlink-resolved base directory.
    base: PathBuf,
    /// Already-computed relative forms, keyed by the input path.
    cache: HashMap<String, String>,
}

impl PathNormalizer {
    /// Create a normalizer for `base`, resolving symlinks when possible.
    pub fn new(base: &Path) -> Self {
        return Self {
            base: resolve_symlinks(base),
            cache: HashMap::new(),
        };
    }

    /// Slash-separated form of `path` relative to the base directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::RelativePath` if no relative form exists.
    pub fn relative(&mut self, path: &str) -> Result<String, Error> {
        if let Some(hit) = self.cache.get(path) {
            return Ok(hit.clone());
        }
        let resolved = resolve_symlinks(Path::new(path));
        let relative = relative_to(&self.base, &resolved).ok_or_else(|| return Error::RelativePath {
            base: self.base.clone(),
            path: PathBuf::from(path),
        })?;
        self.cache.insert(path.to_string(), relative.clone());
        return Ok(relative);
    }
}

/// Lexically compute `path` relative to `base` as a slash-separated string.
/// Returns `None` when the two share no root.
pub fn relative_to(base: &Path, path: &Path) -> Option<String> {
    if base.is_absolute() != path.is_absolute() {
        return None;
    }

    let base_parts: Vec<Component<'_>> = base.components().filter(|c| return *c != Component::CurDir).collect();
    let path_parts: Vec<Component<'_>> = path.components().filter(|c| return *c != Component::CurDir).collect();

    let shared = base_parts
        .iter()
        .zip(&path_parts)
        .take_while(|(a, b)| return a == b)
        .count();

    let base_prefix = base_parts.iter().find(|c| return matches!(c, Component::Prefix(_)));
    let path_prefix = path_parts.iter().find(|c| return matches!(c, Component::Prefix(_)));
    if base_prefix != path_prefix {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for component in base_parts.iter().skip(shared) {
        match component {
            Component::Normal(_) => parts.push("..".to_string()),
            Component::ParentDir => return None,
            Component::CurDir | Component::Prefix(_) | Component::RootDir => {},
        }
    }
    for component in path_parts.iter().skip(shared) {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        return Some(".".to_string());
    }
    return Some(parts.join("/"));
}

/// Resolve symlinks in `path`, falling back to `path` itself when it
/// cannot be resolved (for example when it does not exist).
pub fn resolve_symlinks(path: &Path) -> PathBuf {
    return std::fs::canonicalize(path).unwrap_or_else(|_err| return path.to_path_buf());
}
