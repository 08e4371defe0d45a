//! Integration tests for ArrayFire discovery.
//!
//! These tests verify the full workflow: probing a fake installation
//! tree, persisting the configuration cache, and serving later passes
//! from the reloaded cache.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use af_probe::locator::{keys, probe};
use af_probe::{resolve, resolve_required, Backend, ConfigCache, LocateHints};

/// Lay out a fake ArrayFire installation under `dir`.
fn install_tree(dir: &Path, backends: &[Backend]) {
    let include = dir.join("include");
    fs::create_dir_all(include.join("af")).unwrap();
    fs::write(include.join("arrayfire.h"), "#pragma once\n").unwrap();
    fs::write(
        include.join("af").join("version.h"),
        "#define AF_VERSION \"3.8.2\"\n#define AF_VERSION_MAJOR 3\n",
    )
    .unwrap();

    let lib = dir.join("lib");
    fs::create_dir_all(&lib).unwrap();
    for backend in backends {
        let name = &probe::library_file_names(backend.library_stem())[0];
        fs::write(lib.join(name), "").unwrap();
    }
}

// ============================================================================
// End-to-end resolution
// ============================================================================

#[test]
fn test_resolve_and_consume_outputs() {
    let tmp = TempDir::new().unwrap();
    install_tree(tmp.path(), &[Backend::Cpu, Backend::Cuda]);

    let hints = LocateHints::isolated().with_root(tmp.path());
    let mut cache = ConfigCache::new();
    let result = resolve(&hints, &mut cache);

    assert!(result.found);
    assert_eq!(result.include_dir, Some(tmp.path().join("include")));
    assert_eq!(
        result.version.as_ref().map(|v| v.to_string()),
        Some("3.8.2".to_string())
    );

    // CPU and CUDA found, OpenCL not; aggregate carries only CUDA
    // (last backend in probing order wins).
    assert!(result.backend(Backend::Cpu).found);
    assert!(!result.backend(Backend::OpenCl).found);
    assert!(result.backend(Backend::Cuda).found);
    assert_eq!(
        result.libraries,
        vec![result.backend(Backend::Cuda).library.clone().unwrap()]
    );
}

#[test]
fn test_install_prefix_fallback() {
    let tmp = TempDir::new().unwrap();
    install_tree(tmp.path(), &[Backend::OpenCl]);

    // No explicit root; only the install-prefix hint matches.
    let hints = LocateHints::isolated().with_install_prefix(tmp.path());
    let mut cache = ConfigCache::new();
    let result = resolve(&hints, &mut cache);

    assert!(result.found);
    assert_eq!(result.root.as_deref(), Some(tmp.path()));
    assert_eq!(
        result.libraries,
        vec![result.backend(Backend::OpenCl).library.clone().unwrap()]
    );
}

#[test]
fn test_lib64_sibling_is_probed() {
    let tmp = TempDir::new().unwrap();
    let include = tmp.path().join("include");
    fs::create_dir_all(&include).unwrap();
    fs::write(include.join("arrayfire.h"), "").unwrap();

    // Libraries only under lib64, no lib directory at all.
    let lib64 = tmp.path().join("lib64");
    fs::create_dir_all(&lib64).unwrap();
    let name = &probe::library_file_names("afcpu")[0];
    fs::write(lib64.join(name), "").unwrap();

    let hints = LocateHints::isolated().with_root(tmp.path());
    let mut cache = ConfigCache::new();
    let result = resolve(&hints, &mut cache);

    assert!(result.found);
    assert_eq!(result.backend(Backend::Cpu).library, Some(lib64.join(name)));
}

// ============================================================================
// Cache persistence across sessions
// ============================================================================

#[test]
fn test_cache_survives_save_and_reload() {
    let tmp = TempDir::new().unwrap();
    let install = tmp.path().join("arrayfire");
    fs::create_dir_all(&install).unwrap();
    install_tree(&install, &[Backend::Cpu]);

    let cache_path = tmp.path().join("config").join("af-cache.toml");
    let hints = LocateHints::isolated().with_root(&install);

    // First session: probe and persist.
    let mut cache = ConfigCache::new();
    let first = resolve(&hints, &mut cache);
    assert!(first.found);
    assert!(cache.is_dirty());
    cache.save(&cache_path).unwrap();

    // The cache file is plain TOML holding the output variables.
    let raw = fs::read_to_string(&cache_path).unwrap();
    assert!(raw.contains(keys::FOUND));
    assert!(raw.contains(keys::INCLUDE_DIR));

    // Second session: the installation is gone, the cache answers.
    fs::remove_dir_all(&install).unwrap();
    let mut reloaded = ConfigCache::load(&cache_path).unwrap();
    let second = resolve(&hints, &mut reloaded);

    assert_eq!(first, second);
    assert!(!reloaded.is_dirty());
}

#[test]
fn test_partial_cache_triggers_reprobe() {
    let tmp = TempDir::new().unwrap();
    install_tree(tmp.path(), &[Backend::Cpu]);

    // A cache holding unrelated keys but no completion marker must not
    // short-circuit resolution.
    let mut cache = ConfigCache::new();
    cache.set(keys::ROOT_DIR, "/stale/path");

    let hints = LocateHints::isolated().with_root(tmp.path());
    let result = resolve(&hints, &mut cache);

    assert!(result.found);
    assert_eq!(result.root.as_deref(), Some(tmp.path()));
    assert_eq!(cache.get(keys::ROOT_DIR), Some(&*tmp.path().display().to_string()));
}

// ============================================================================
// Failure paths
// ============================================================================

#[test]
fn test_required_resolution_fails_loudly() {
    let tmp = TempDir::new().unwrap();

    let hints = LocateHints::isolated().with_root(tmp.path());
    let mut cache = ConfigCache::new();
    let err = resolve_required(&hints, &mut cache).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("could not find ArrayFire"));
    assert!(err.searched.contains(&tmp.path().to_path_buf()));
}

#[test]
fn test_optional_resolution_fails_quietly() {
    let tmp = TempDir::new().unwrap();

    let hints = LocateHints::isolated().with_root(tmp.path());
    let mut cache = ConfigCache::new();
    let result = resolve(&hints, &mut cache);

    assert!(!result.found);
    assert!(!cache.get_flag(keys::FOUND));

    // Failure is cached: a later pass in the same session returns the
    // same negative answer without re-probing.
    let again = resolve(&hints, &mut cache);
    assert_eq!(result, again);
}
