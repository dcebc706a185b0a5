//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Backslashes become forward slashes, empty and `.` segments are dropped and
/// `..` segments are resolved lexically. A `..` that would climb above the
/// start of the path is discarded, so a relative path can never point above
/// the directory it is later joined to. No filesystem access is performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment, resolving dot segments afterwards.
    ///
    /// Because `..` is resolved after joining, the result may lie outside
    /// `self`; callers enforcing containment must check [`Self::starts_with`].
    pub fn join(&self, segment: &str) -> Self {
        let segment_clean = clean(segment);
        if segment_clean.is_empty() {
            return self.clone();
        }
        let raw = segment.replace('\\', "/");
        let joined = if self.inner.is_empty() {
            raw
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, raw)
        } else {
            format!("{}/{}", self.inner, raw)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Whether the path carries a root (`/`, `//server`, or a drive letter).
    pub fn is_absolute(&self) -> bool {
        !split_root(&self.inner).0.is_empty()
    }

    /// Component-wise prefix test.
    ///
    /// `/a/bc` does not start with `/a/b`, while `/a/b/c` does.
    pub fn starts_with(&self, base: &NormalizedPath) -> bool {
        self.strip_prefix(base).is_some()
    }

    /// The remainder of this path below `base`, without a leading slash.
    ///
    /// Returns `Some("")` when both paths are equal.
    pub fn strip_prefix(&self, base: &NormalizedPath) -> Option<&str> {
        if base.inner.is_empty() {
            return Some(&self.inner);
        }
        let rest = self.inner.strip_prefix(base.inner.as_str())?;
        if rest.is_empty() {
            Some(rest)
        } else if base.inner.ends_with('/') {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

/// Split a forward-slashed path into its root prefix and the remainder.
///
/// Recognised roots: `//` (UNC), `/`, `X:/` and bare `X:`.
fn split_root(path: &str) -> (&str, &str) {
    if path.starts_with("//") && !path.starts_with("///") {
        return (&path[..2], &path[2..]);
    }
    if path.starts_with('/') {
        return (&path[..1], &path[1..]);
    }
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        if bytes.get(2) == Some(&b'/') {
            return (&path[..3], &path[3..]);
        }
        return (&path[..2], &path[2..]);
    }
    ("", path)
}

fn clean(raw: &str) -> String {
    let slashed = raw.replace('\\', "/");
    let (root, rest) = split_root(&slashed);

    let mut parts: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    let mut out = String::with_capacity(slashed.len());
    out.push_str(root);
    out.push_str(&parts.join("/"));
    out
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
