//! Wildcard passthrough handler.

use anyhow::Result;

use super::Handler;
use crate::publish::Publisher;
use crate::source::SourceFile;

/// Fallback handler for files no specific handler claims.
///
/// Copies the bytes to the sink unchanged, at the original path. Fails
/// only if the sink write fails; the error is propagated without retry.
pub struct PassthroughHandler;

impl Handler for PassthroughHandler {
    fn extensions(&self) -> &'static [&'static str] {
        &[super::WILDCARD]
    }

    fn convert<'f>(&self, file: &'f SourceFile, sink: &dyn Publisher) -> Result<&'f SourceFile> {
        sink.publish(file.path(), file.bytes())?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::testing::RecordingSink;

    #[test]
    fn test_passthrough_is_byte_identical() {
        let sink = RecordingSink::new();
        let bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff];
        let file = SourceFile::new("img/logo.png", bytes.clone());

        let result = PassthroughHandler.convert(&file, &sink).unwrap();

        assert_eq!(result.path(), "img/logo.png");
        assert_eq!(sink.attempts(), vec!["img/logo.png"]);
        assert_eq!(sink.written("img/logo.png").unwrap(), bytes);
    }

    #[test]
    fn test_passthrough_single_write_only() {
        let sink = RecordingSink::new();
        let file = SourceFile::new("fonts/body.woff2", b"font data".to_vec());

        PassthroughHandler.convert(&file, &sink).unwrap();

        assert_eq!(sink.write_count(), 1);
    }

    #[test]
    fn test_passthrough_propagates_sink_error() {
        let sink = RecordingSink::new();
        sink.fail_on("logo.png");
        let file = SourceFile::new("logo.png", b"bytes".to_vec());

        let err = PassthroughHandler.convert(&file, &sink).unwrap_err();

        assert!(err.to_string().contains("logo.png"));
        assert_eq!(sink.write_count(), 0);
    }
}
