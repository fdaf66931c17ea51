//! Source files and source-tree scanning.
//!
//! A [`SourceFile`] is the immutable per-file input to a handler: a
//! slash-separated path relative to the source root plus the raw bytes.
//! Scanning is pure - it reads the filesystem and returns data.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use jwalk::WalkDir;

/// One source file handed to a handler for conversion.
///
/// Immutable for the duration of a convert call; handlers receive a
/// shared reference and never mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Slash-separated path relative to the source root.
    path: String,
    /// Raw byte payload.
    bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    /// Read a source file from disk, keyed by its path relative to `root`.
    pub fn load(root: &Path, relative: &Path) -> Result<Self> {
        let abs = root.join(relative);
        let bytes =
            fs::read(&abs).with_context(|| format!("Failed to read: {}", abs.display()))?;
        let path = slash_path(relative)
            .ok_or_else(|| anyhow!("Non-unicode path: {}", relative.display()))?;
        Ok(Self { path, bytes })
    }

    /// Relative slash-separated path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase extension without the leading dot, empty if none.
    pub fn extension(&self) -> String {
        Path::new(&self.path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default()
    }

    /// Whether the file stem ends in `.min` (pre-minified asset).
    pub fn is_preminified(&self) -> bool {
        Path::new(&self.path)
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.ends_with(".min"))
    }
}

/// Convert a relative path to slash-separated form.
fn slash_path(path: &Path) -> Option<String> {
    let parts: Option<Vec<&str>> = path.iter().map(|c| c.to_str()).collect();
    Some(parts?.join("/"))
}

/// Scan the source tree and return relative paths of all regular files.
///
/// Hidden files and directories (leading dot) are skipped. Results are
/// sorted for deterministic processing order.
pub fn scan_source_files(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return vec![];
    }

    let mut files: Vec<_> = WalkDir::new(root)
        .skip_hidden(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(root).map(Path::to_path_buf).ok())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_file_accessors() {
        let file = SourceFile::new("css/Style.CSS", b"body {}".to_vec());
        assert_eq!(file.path(), "css/Style.CSS");
        assert_eq!(file.bytes(), b"body {}");
        assert_eq!(file.extension(), "css");
    }

    #[test]
    fn test_source_file_no_extension() {
        let file = SourceFile::new("CNAME", b"example.com".to_vec());
        assert_eq!(file.extension(), "");
    }

    #[test]
    fn test_preminified_stem() {
        assert!(SourceFile::new("js/app.min.js", vec![]).is_preminified());
        assert!(!SourceFile::new("js/app.js", vec![]).is_preminified());
        assert!(!SourceFile::new("js/min.js", vec![]).is_preminified());
    }

    #[test]
    fn test_load_relative_slash_path() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("img");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("logo.png"), b"fake png").unwrap();

        let file = SourceFile::load(dir.path(), Path::new("img/logo.png")).unwrap();
        assert_eq!(file.path(), "img/logo.png");
        assert_eq!(file.bytes(), b"fake png");
    }

    #[test]
    fn test_scan_source_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/main.css"), "body {}").unwrap();
        fs::write(dir.path().join("logo.png"), "fake png").unwrap();
        fs::write(dir.path().join(".DS_Store"), "junk").unwrap();

        let files = scan_source_files(dir.path());
        assert_eq!(
            files,
            vec![PathBuf::from("css/main.css"), PathBuf::from("logo.png")]
        );
    }

    #[test]
    fn test_scan_missing_root() {
        let files = scan_source_files(Path::new("/nonexistent/assets"));
        assert!(files.is_empty());
    }
}
