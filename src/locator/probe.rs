//! Filesystem probes for the header and backend libraries.
//!
//! Probes are plain existence checks, authoritative on first attempt.
//! Absence is reported as `None`; nothing here errors.

use std::path::{Path, PathBuf};

use glob::glob;

/// Canonical public header of the library being located.
pub const HEADER_NAME: &str = "arrayfire.h";

/// First candidate directory containing `include/arrayfire.h`.
pub fn find_root(candidates: &[PathBuf]) -> Option<PathBuf> {
    for candidate in candidates {
        if candidate.join("include").join(HEADER_NAME).is_file() {
            tracing::debug!("resolved installation root: {}", candidate.display());
            return Some(candidate.clone());
        }
        tracing::trace!("no header under {}", candidate.display());
    }
    None
}

/// Directory containing the public header.
///
/// Probes `${root}/include` when a root was resolved, falling back to an
/// independently supplied include hint. The two probes are deliberately
/// separate: a header-only hint can succeed with no resolved root.
pub fn find_include_dir(root: Option<&Path>, hint: Option<&Path>) -> Option<PathBuf> {
    if let Some(root) = root {
        let dir = root.join("include");
        if dir.join(HEADER_NAME).is_file() {
            return Some(dir);
        }
    }
    if let Some(hint) = hint {
        if hint.join(HEADER_NAME).is_file() {
            return Some(hint.to_path_buf());
        }
    }
    None
}

/// Locate a library by its undecorated stem (`afcpu`) across `dirs`.
///
/// Checks the platform link-library names first, then falls back to a
/// glob for versioned shared objects: non-dev packages frequently ship
/// only `libafcuda.so.3` without the unversioned symlink.
pub fn find_library(stem: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        for name in library_file_names(stem) {
            let path = dir.join(&name);
            if path.is_file() {
                tracing::debug!("found {} at {}", stem, path.display());
                return Some(path);
            }
        }
        if let Some(path) = find_versioned_library(stem, dir) {
            tracing::debug!("found versioned {} at {}", stem, path.display());
            return Some(path);
        }
    }
    None
}

/// Platform-decorated file names for a link library, in preference order.
pub fn library_file_names(stem: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![format!("{stem}.lib"), format!("{stem}.dll")]
    } else if cfg!(target_os = "macos") {
        vec![format!("lib{stem}.dylib"), format!("lib{stem}.a")]
    } else {
        vec![format!("lib{stem}.so"), format!("lib{stem}.a")]
    }
}

/// Match versioned shared-object names in `dir`, preferring the highest
/// version when several are installed side by side.
fn find_versioned_library(stem: &str, dir: &Path) -> Option<PathBuf> {
    if cfg!(windows) {
        return None;
    }

    // Linux decorates after the suffix (libaf.so.3.8), macOS before it
    // (libaf.3.8.dylib).
    let pattern = if cfg!(target_os = "macos") {
        dir.join(format!("lib{stem}.*.dylib"))
    } else {
        dir.join(format!("lib{stem}.so.*"))
    };

    let mut matches: Vec<PathBuf> = glob(&pattern.to_string_lossy())
        .ok()?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    matches.sort();
    matches.pop()
}

/// Standard system library directories for the host platform.
pub fn system_lib_dirs() -> Vec<PathBuf> {
    if cfg!(windows) {
        return Vec::new();
    }

    let mut dirs = vec![
        PathBuf::from("/usr/local/lib"),
        PathBuf::from("/usr/local/lib64"),
        PathBuf::from("/usr/lib"),
        PathBuf::from("/usr/lib64"),
    ];
    if cfg!(target_os = "linux") {
        dirs.push(PathBuf::from("/usr/lib/x86_64-linux-gnu"));
        dirs.push(PathBuf::from("/usr/lib/aarch64-linux-gnu"));
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fake_install(tmp: &TempDir) -> PathBuf {
        let root = tmp.path().join("arrayfire");
        fs::create_dir_all(root.join("include")).unwrap();
        fs::write(root.join("include").join(HEADER_NAME), "#pragma once\n").unwrap();
        root
    }

    #[test]
    fn test_find_root_first_match_wins() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty");
        fs::create_dir_all(&empty).unwrap();
        let root = fake_install(&tmp);

        let candidates = vec![empty, root.clone(), tmp.path().join("missing")];
        assert_eq!(find_root(&candidates), Some(root));
    }

    #[test]
    fn test_find_root_requires_header_not_just_include_dir() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("bare");
        fs::create_dir_all(root.join("include")).unwrap();

        assert_eq!(find_root(&[root]), None);
    }

    #[test]
    fn test_find_include_dir_from_hint_without_root() {
        let tmp = TempDir::new().unwrap();
        let headers = tmp.path().join("headers");
        fs::create_dir_all(&headers).unwrap();
        fs::write(headers.join(HEADER_NAME), "").unwrap();

        assert_eq!(find_include_dir(None, Some(&headers)), Some(headers));
    }

    #[test]
    fn test_find_library_decorated_name() {
        let tmp = TempDir::new().unwrap();
        let lib = tmp.path().join("lib");
        fs::create_dir_all(&lib).unwrap();
        let name = &library_file_names("afcpu")[0];
        fs::write(lib.join(name), "").unwrap();

        let found = find_library("afcpu", &[lib.clone()]).unwrap();
        assert_eq!(found, lib.join(name));
    }

    #[test]
    fn test_find_library_skips_missing_dirs() {
        let tmp = TempDir::new().unwrap();
        let dirs = vec![tmp.path().join("no-such-dir")];
        assert_eq!(find_library("afcpu", &dirs), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_library_versioned_soname() {
        let tmp = TempDir::new().unwrap();
        let lib = tmp.path().join("lib");
        fs::create_dir_all(&lib).unwrap();
        let versioned = if cfg!(target_os = "macos") {
            "libafcuda.3.dylib"
        } else {
            "libafcuda.so.3"
        };
        fs::write(lib.join(versioned), "").unwrap();

        let found = find_library("afcuda", &[lib.clone()]).unwrap();
        assert_eq!(found, lib.join(versioned));
    }
}
