//! Publish sink: durable writes of named byte streams to the output tree.
//!
//! Handlers call [`Publisher::publish`] zero or more times per source file
//! and never retry - retry/transaction policy belongs to the surrounding
//! build. Concurrent writes to distinct paths must be independently safe.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Sink that durably writes named content to the build output.
///
/// Implementations must create intermediate directories as needed and
/// overwrite existing content at `path`.
pub trait Publisher: Send + Sync {
    /// Write `content` at the slash-separated relative `path`.
    fn publish(&self, path: &str, content: &[u8]) -> Result<()>;
}

/// Filesystem-backed publisher rooted at the output directory.
pub struct FsPublisher {
    root: PathBuf,
}

impl FsPublisher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root this publisher writes under.
    #[allow(dead_code)]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Publisher for FsPublisher {
    fn publish(&self, path: &str, content: &[u8]) -> Result<()> {
        let dest = self.root.join(path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&dest, content).with_context(|| format!("Failed to write: {}", dest.display()))
    }
}
