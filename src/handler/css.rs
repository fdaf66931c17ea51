//! CSS handler: minify once, publish twice (fingerprinted + stable path).

use std::borrow::Cow;

use anyhow::Result;

use super::Handler;
use crate::fingerprint::{fingerprint, fingerprinted_path};
use crate::manifest;
use crate::minify::minify_css;
use crate::publish::Publisher;
use crate::source::SourceFile;

/// Handler for `.css` files.
///
/// Minifies the stylesheet and publishes the minified bytes at two paths:
/// `stem-<hexdigest>.css` (cache-busting) and the original path (stable),
/// so both URLs resolve to the same content. The digest is computed over
/// the *original, unminified* bytes - the fingerprint tracks input
/// identity, not post-minification output.
///
/// Write order is fixed: the fingerprinted path first, then the original
/// path. If the first write fails the second is not attempted; if the
/// second fails, the fingerprinted artifact stays published and the error
/// is surfaced (documented partial publish, handled by the orchestrator).
pub struct CssHandler;

impl Handler for CssHandler {
    fn extensions(&self) -> &'static [&'static str] {
        &["css"]
    }

    fn convert<'f>(&self, file: &'f SourceFile, sink: &dyn Publisher) -> Result<&'f SourceFile> {
        let raw = file.bytes();
        let minified = minify_payload(file);

        let hash = fingerprint(raw);
        let hashed_path = fingerprinted_path(file.path(), &hash);

        sink.publish(&hashed_path, &minified)?;
        manifest::record(file.path(), &hashed_path);
        sink.publish(file.path(), &minified)?;
        Ok(file)
    }
}

/// Minified bytes for publishing.
///
/// Pre-minified sources (`.min` stem) and stylesheets that fail to parse
/// pass through unchanged; only sink errors fail a conversion.
fn minify_payload(file: &SourceFile) -> Cow<'_, [u8]> {
    if file.is_preminified() {
        return Cow::Borrowed(file.bytes());
    }
    std::str::from_utf8(file.bytes())
        .ok()
        .and_then(minify_css)
        .map_or(Cow::Borrowed(file.bytes()), |code| {
            Cow::Owned(code.into_bytes())
        })
}
