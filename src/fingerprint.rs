//! Content fingerprinting for cache-busting filenames.
//!
//! A fingerprint is the blake3 digest of an asset's bytes, hex-encoded and
//! inserted into the filename before the extension (`style.css` →
//! `style-<hex>.css`). Consumers that rewrite asset references depend on
//! this exact pattern.

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Full hex encoding (64 chars). Derived filenames always embed the
    /// full digest, never a truncation.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

/// Compute the fingerprint of a byte payload.
///
/// Handlers fingerprint the *original* bytes of an asset, never the
/// minified output - the fingerprint tracks input identity.
pub fn fingerprint(bytes: &[u8]) -> ContentHash {
    ContentHash::new(*blake3::hash(bytes).as_bytes())
}

/// Derive the fingerprinted variant of a slash-separated relative path.
///
/// Inserts `-<hexdigest>` immediately before the extension of the final
/// path component. A component without an extension gets the digest
/// appended: `CNAME` → `CNAME-<hex>`.
pub fn fingerprinted_path(path: &str, hash: &ContentHash) -> String {
    let digest = hash.to_hex();
    match split_extension(path) {
        Some((stem, ext)) => format!("{stem}-{digest}.{ext}"),
        None => format!("{path}-{digest}"),
    }
}

/// Split `path` into (everything before the final dot, extension).
///
/// Only dots in the final path component count, and a leading dot in a
/// filename (`.gitignore`) is not an extension separator.
fn split_extension(path: &str) -> Option<(&str, &str)> {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    let name = &path[name_start..];
    let dot = name.rfind('.')?;
    if dot == 0 {
        return None;
    }
    let split = name_start + dot;
    Some((&path[..split], &path[split + 1..]))
}
