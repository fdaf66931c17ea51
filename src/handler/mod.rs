//! Handler dispatch: file-type strategies and the registry that selects them.
//!
//! A [`Handler`] describes how one class of source file is converted into
//! published output. Handlers declare the extensions they claim (or the
//! wildcard `"*"`) and are registered once, before any file is processed;
//! after that the [`HandlerRegistry`] is read-only and safe to share across
//! worker threads without locking.

mod css;
mod js;
mod passthrough;

pub use css::CssHandler;
pub use js::JsHandler;
pub use passthrough::PassthroughHandler;

use std::sync::Arc;

use anyhow::Result;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::publish::Publisher;
use crate::source::SourceFile;

/// Extension key that marks a handler as the fallback for unclaimed files.
pub const WILDCARD: &str = "*";

/// A rendered page passed through the page-conversion hook.
///
/// Page compilation itself lives outside this crate; handlers that rewrite
/// page output override [`Handler::convert_page`], everything else keeps
/// the default pass-through.
#[derive(Debug, Clone)]
pub struct Page {
    /// Output route, slash-separated, relative to the output root.
    pub route: String,
    /// Rendered body.
    pub body: Vec<u8>,
}

/// Strategy for converting one class of source file.
///
/// Handlers are stateless and invoked concurrently, one file per rayon
/// task; a conversion is a bounded synchronous sequence of CPU work
/// followed by sink writes. Success references the (possibly unmodified)
/// input file; failure carries the underlying error - never both.
pub trait Handler: Send + Sync {
    /// Extensions this handler claims, lowercase, no leading dot.
    /// [`WILDCARD`] makes it the registry fallback.
    fn extensions(&self) -> &'static [&'static str];

    /// Convert the whole file, publishing derived artifacts to `sink`.
    fn convert<'f>(&self, file: &'f SourceFile, sink: &dyn Publisher) -> Result<&'f SourceFile>;

    /// Hook for handlers that rewrite parsed pages. File handlers keep the
    /// default, which leaves the page untouched.
    fn convert_page(&self, _page: &mut Page) -> Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for dyn Handler + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("extensions", &self.extensions())
            .finish()
    }
}

/// Registry configuration errors - fatal at startup, never per-file.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no wildcard handler registered, cannot dispatch extension `{0}`")]
    MissingWildcard(String),
}

/// Extension → handler table with a designated wildcard fallback.
///
/// Built by the orchestrator during initialization and passed by reference
/// into the dispatch path. Registration is not synchronized against
/// lookups; all `register` calls happen before any file is processed.
#[derive(Default)]
pub struct HandlerRegistry {
    by_ext: FxHashMap<String, Arc<dyn Handler>>,
    wildcard: Option<Arc<dyn Handler>>,
}

impl HandlerRegistry {
    /// Empty registry with no handlers and no fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in handlers installed: CSS (minify +
    /// fingerprint), JS (minify in place) and the wildcard passthrough.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CssHandler));
        registry.register(Arc::new(JsHandler));
        registry.register(Arc::new(PassthroughHandler));
        registry
    }

    /// Add `handler` under every extension it declares.
    ///
    /// Extension keys are lowercased. Registering a second handler for the
    /// same key overwrites the first: last registration wins, per key. This
    /// is the required policy, since registration order across independent
    /// handler modules is otherwise unspecified. Declaring [`WILDCARD`]
    /// installs the handler as the fallback (same overwrite rule).
    pub fn register(&mut self, handler: Arc<dyn Handler>) {
        for ext in handler.extensions() {
            if *ext == WILDCARD {
                self.wildcard = Some(Arc::clone(&handler));
            } else {
                self.by_ext
                    .insert(ext.to_ascii_lowercase(), Arc::clone(&handler));
            }
        }
    }

    /// Resolve the handler for an extension.
    ///
    /// Extensions compare lowercase, no leading dot. Falls back to the
    /// wildcard handler when no specific registration exists; fails only
    /// if no wildcard handler was ever registered.
    pub fn lookup(&self, extension: &str) -> Result<&dyn Handler, RegistryError> {
        let key = extension.to_ascii_lowercase();
        self.by_ext
            .get(&key)
            .or(self.wildcard.as_ref())
            .map(|h| &**h)
            .ok_or(RegistryError::MissingWildcard(key))
    }

    /// Resolve a handler for `file` and run its conversion.
    ///
    /// The only runtime entry point the build orchestrator needs.
    pub fn resolve_and_convert<'f>(
        &self,
        file: &'f SourceFile,
        sink: &dyn Publisher,
    ) -> Result<&'f SourceFile> {
        let handler = self.lookup(&file.extension())?;
        handler.convert(file, sink)
    }
}
