//! Build orchestration: scan the source tree, dispatch every file through
//! the handler registry, publish to the output directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;

use crate::config::Config;
use crate::handler::HandlerRegistry;
use crate::log;
use crate::logger::ProgressLine;
use crate::manifest;
use crate::publish::FsPublisher;
use crate::source::{SourceFile, scan_source_files};

/// Process the whole source tree into the output directory.
///
/// Handlers run in parallel, one file per rayon task; the first per-file
/// failure aborts the build and is reported with its path. Returns the
/// number of files processed.
pub fn build_tree(config: &Config, quiet: bool) -> Result<usize> {
    let source_root = &config.build.source;
    let output_root = &config.build.output;

    prepare_output(output_root, config.build.clean)?;

    let registry = HandlerRegistry::with_defaults();
    let publisher = FsPublisher::new(output_root);

    let files = scan_source_files(source_root);
    let progress = create_progress(files.len(), quiet);

    process_files(
        &files,
        source_root,
        config,
        &registry,
        &publisher,
        progress.as_ref(),
    )?;

    if let Some(p) = progress {
        p.finish();
    }

    if config.build.manifest {
        manifest::write_manifest(output_root)?;
        crate::debug!("manifest"; "{} fingerprinted asset(s)", manifest::len());
    }

    Ok(files.len())
}

/// Ensure the output directory exists, clearing it first when requested.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Create progress display if not quiet
fn create_progress(asset_count: usize, quiet: bool) -> Option<ProgressLine> {
    if quiet {
        return None;
    }
    Some(ProgressLine::new(&[("assets", asset_count)]))
}

/// Dispatch source files in parallel, first error wins.
fn process_files(
    files: &[PathBuf],
    source_root: &Path,
    config: &Config,
    registry: &HandlerRegistry,
    publisher: &FsPublisher,
    progress: Option<&ProgressLine>,
) -> Result<()> {
    let has_error = AtomicBool::new(false);

    files.par_iter().try_for_each(|relative| {
        if has_error.load(Ordering::Relaxed) {
            return Err(anyhow!("Aborted"));
        }
        if let Err(e) = process_one(relative, source_root, registry, publisher) {
            if !has_error.swap(true, Ordering::Relaxed) {
                log!("error"; "{}: {:#}", config.root_relative(&source_root.join(relative)).display(), e);
            }
            return Err(anyhow!("Build failed"));
        }
        if let Some(p) = progress {
            p.inc("assets");
        }
        Ok(())
    })
}

/// Load one source file and run its conversion.
fn process_one(
    relative: &Path,
    source_root: &Path,
    registry: &HandlerRegistry,
    publisher: &FsPublisher,
) -> Result<()> {
    let file = SourceFile::load(source_root, relative)?;
    registry.resolve_and_convert(&file, publisher)?;
    crate::debug!("assets"; "{}", file.path());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{fingerprint, fingerprinted_path};
    use tempfile::TempDir;

    fn test_config(root: &Path, clean: bool, manifest: bool) -> Config {
        let mut config = Config::default();
        config.root = root.to_path_buf();
        config.build.source = root.join("assets");
        config.build.output = root.join("public");
        config.build.clean = clean;
        config.build.manifest = manifest;
        config
    }

    fn seed_assets(root: &Path) {
        let assets = root.join("assets");
        fs::create_dir_all(assets.join("css")).unwrap();
        fs::create_dir_all(assets.join("img")).unwrap();
        fs::write(assets.join("css/main.css"), "body { color: red; }").unwrap();
        fs::write(assets.join("img/logo.png"), b"fake png bytes").unwrap();
        fs::write(assets.join("robots.txt"), "User-agent: *").unwrap();
    }

    #[test]
    fn test_build_tree_end_to_end() {
        let dir = TempDir::new().unwrap();
        seed_assets(dir.path());
        let config = test_config(dir.path(), false, true);

        let count = build_tree(&config, true).unwrap();
        assert_eq!(count, 3);

        let public = dir.path().join("public");

        // Passthrough files are byte-identical
        assert_eq!(
            fs::read(public.join("img/logo.png")).unwrap(),
            b"fake png bytes"
        );
        assert_eq!(
            fs::read(public.join("robots.txt")).unwrap(),
            b"User-agent: *"
        );

        // CSS is minified and double-published
        let raw = b"body { color: red; }";
        let hashed = fingerprinted_path("css/main.css", &fingerprint(raw));
        let stable = fs::read(public.join("css/main.css")).unwrap();
        let busted = fs::read(public.join(&hashed)).unwrap();
        assert_eq!(stable, b"body{color:red}");
        assert_eq!(stable, busted);

        // Manifest maps the stable path to the fingerprinted one
        let json = fs::read_to_string(public.join("asset-manifest.json")).unwrap();
        assert!(json.contains("css/main.css"));
        assert!(json.contains(&hashed));
    }

    #[test]
    fn test_build_tree_clean_removes_stale_output() {
        let dir = TempDir::new().unwrap();
        seed_assets(dir.path());
        let public = dir.path().join("public");
        fs::create_dir_all(&public).unwrap();
        fs::write(public.join("stale.html"), "old").unwrap();

        // Incremental build keeps stale files
        build_tree(&test_config(dir.path(), false, false), true).unwrap();
        assert!(public.join("stale.html").exists());

        // Clean build removes them
        build_tree(&test_config(dir.path(), true, false), true).unwrap();
        assert!(!public.join("stale.html").exists());
        assert!(public.join("img/logo.png").exists());
    }

    #[test]
    fn test_build_tree_surfaces_publish_failure() {
        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir_all(assets.join("css")).unwrap();
        fs::write(assets.join("css/main.css"), "body { color: red; }").unwrap();

        // Occupy the output subdirectory with a regular file so the
        // publisher's create_dir_all fails for css/ artifacts
        let public = dir.path().join("public");
        fs::create_dir_all(&public).unwrap();
        fs::write(public.join("css"), "not a directory").unwrap();

        let config = test_config(dir.path(), false, false);
        let result = build_tree(&config, true);

        assert!(result.is_err());
        // The failed file was never published at its stable path
        assert!(!public.join("css/main.css").exists());
    }

    #[test]
    fn test_build_tree_empty_source() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), false, false);

        let count = build_tree(&config, true).unwrap();
        assert_eq!(count, 0);
        assert!(dir.path().join("public").is_dir());
    }

    #[test]
    fn test_manifest_disabled() {
        let dir = TempDir::new().unwrap();
        seed_assets(dir.path());
        let config = test_config(dir.path(), false, false);

        build_tree(&config, true).unwrap();
        assert!(!dir.path().join("public/asset-manifest.json").exists());
    }
}
