//! Fingerprint manifest: original path → fingerprinted path.
//!
//! Every fingerprinted publish records its mapping here; after a build the
//! table is written to `asset-manifest.json` at the output root so
//! reference-rewriting stages can map stable URLs to cache-busting ones.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use dashmap::DashMap;

/// Original path → fingerprinted path, filled during conversion.
///
/// Thread-safe; handlers insert concurrently from rayon workers.
static FINGERPRINTS: LazyLock<DashMap<String, String>> = LazyLock::new(DashMap::new);

/// Record a fingerprinted publish.
pub fn record(original: &str, fingerprinted: &str) {
    FINGERPRINTS.insert(original.to_string(), fingerprinted.to_string());
}

/// Fingerprinted path for an original path, if one was published.
pub fn get(original: &str) -> Option<String> {
    FINGERPRINTS.get(original).map(|v| v.clone())
}

/// Number of recorded mappings.
pub fn len() -> usize {
    FINGERPRINTS.len()
}

/// Drop all recorded mappings (start of a build pass).
pub fn clear() {
    FINGERPRINTS.clear();
}

/// Write the manifest as JSON to `<output_dir>/asset-manifest.json`.
///
/// Keys are sorted for stable output across runs.
pub fn write_manifest(output_dir: &Path) -> Result<()> {
    let sorted: BTreeMap<String, String> = FINGERPRINTS
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();

    let path = output_dir.join("asset-manifest.json");
    let json = serde_json::to_string_pretty(&sorted)?;
    fs::write(&path, json).with_context(|| format!("Failed to write: {}", path.display()))
}
