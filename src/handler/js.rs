//! JavaScript handler: minify in place, no fingerprinting.

use std::borrow::Cow;

use anyhow::Result;

use super::Handler;
use crate::minify::minify_js;
use crate::publish::Publisher;
use crate::source::SourceFile;

/// Handler for `.js`/`.mjs` files.
///
/// Publishes the minified script at the original path only. Scripts are
/// not fingerprinted; cache busting applies to stylesheets.
pub struct JsHandler;

impl Handler for JsHandler {
    fn extensions(&self) -> &'static [&'static str] {
        &["js", "mjs"]
    }

    fn convert<'f>(&self, file: &'f SourceFile, sink: &dyn Publisher) -> Result<&'f SourceFile> {
        let payload: Cow<'_, [u8]> = if file.is_preminified() {
            Cow::Borrowed(file.bytes())
        } else {
            std::str::from_utf8(file.bytes())
                .ok()
                .and_then(minify_js)
                .map_or(Cow::Borrowed(file.bytes()), |code| {
                    Cow::Owned(code.into_bytes())
                })
        };

        sink.publish(file.path(), &payload)?;
        Ok(file)
    }
}
