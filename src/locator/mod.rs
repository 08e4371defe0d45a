//! ArrayFire installation discovery.
//!
//! One resolution pass walks a fixed sequence of filesystem probes:
//! resolve the installation root, the include directory, then each
//! backend library independently. All outputs land in the caller's
//! [`ConfigCache`] so repeated passes within one configuration session
//! are probe-free and quiet.

pub mod hints;
pub mod probe;
pub mod version;

use std::fmt;
use std::path::PathBuf;

use semver::Version;

use crate::util::cache::ConfigCache;
use crate::util::diagnostic::{self, ArrayFireNotFound};

pub use hints::LocateHints;

/// One of the alternative native compute implementations of ArrayFire.
///
/// Probing order is fixed: CPU, then OpenCL, then CUDA. The order
/// matters for the aggregate library list, which each successful probe
/// overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Cpu,
    OpenCl,
    Cuda,
}

impl Backend {
    /// All backends in probing order.
    pub const ALL: [Backend; 3] = [Backend::Cpu, Backend::OpenCl, Backend::Cuda];

    /// Undecorated library stem (`libafcpu.so` on Linux, `afcpu.lib` on
    /// Windows).
    pub fn library_stem(self) -> &'static str {
        match self {
            Backend::Cpu => "afcpu",
            Backend::OpenCl => "afopencl",
            Backend::Cuda => "afcuda",
        }
    }

    fn index(self) -> usize {
        match self {
            Backend::Cpu => 0,
            Backend::OpenCl => 1,
            Backend::Cuda => 2,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Cpu => write!(f, "CPU"),
            Backend::OpenCl => write!(f, "OpenCL"),
            Backend::Cuda => write!(f, "CUDA"),
        }
    }
}

/// Cache key names, mirroring the output variables consumed downstream.
pub mod keys {
    use super::Backend;

    pub const ROOT_DIR: &str = "ArrayFire_ROOT_DIR";
    pub const INCLUDE_DIR: &str = "ArrayFire_INCLUDE_DIR";
    pub const LIBRARIES: &str = "ArrayFire_LIBRARIES";
    pub const VERSION: &str = "ArrayFire_VERSION";
    pub const FOUND: &str = "ArrayFire_FOUND";

    /// Key holding one backend's resolved library path.
    pub fn backend_library(backend: Backend) -> String {
        format!("ArrayFire_{}_LIBRARY", backend)
    }

    /// Key holding one backend's found flag.
    pub fn backend_found(backend: Backend) -> String {
        format!("ArrayFire_{}_FOUND", backend)
    }
}

/// Outcome of probing one backend.
///
/// Backends are independent: a missing CUDA build never blocks CPU
/// resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendResult {
    /// Resolved library file, if any.
    pub library: Option<PathBuf>,
    /// Whether the backend library was located.
    pub found: bool,
}

/// Write-once outputs of a resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocatorResult {
    /// Installation prefix containing `include/arrayfire.h`, if resolved.
    pub root: Option<PathBuf>,

    /// Directory containing the public header.
    pub include_dir: Option<PathBuf>,

    /// Per-backend probe outcomes, indexed in probing order.
    pub backends: [BackendResult; 3],

    /// Aggregate library list: the library of the backend resolved last
    /// in probing order, not a union of all backends.
    pub libraries: Vec<PathBuf>,

    /// Version parsed from the installed headers, when available.
    pub version: Option<Version>,

    /// Overall success: include dir and aggregate libraries both set.
    pub found: bool,
}

impl LocatorResult {
    /// Probe outcome for one backend.
    pub fn backend(&self, backend: Backend) -> &BackendResult {
        &self.backends[backend.index()]
    }

    /// Rehydrate a previous pass from the cache.
    ///
    /// Returns `None` unless the cache holds a complete result; the
    /// overall found flag doubles as the completion marker since it is
    /// written last.
    pub fn from_cache(cache: &ConfigCache) -> Option<Self> {
        if !cache.contains(keys::FOUND) {
            return None;
        }

        let mut result = LocatorResult {
            root: cache.get(keys::ROOT_DIR).map(PathBuf::from),
            include_dir: cache.get(keys::INCLUDE_DIR).map(PathBuf::from),
            ..Default::default()
        };
        for backend in Backend::ALL {
            let entry = &mut result.backends[backend.index()];
            entry.library = cache.get(&keys::backend_library(backend)).map(PathBuf::from);
            entry.found = cache.get_flag(&keys::backend_found(backend));
        }
        result.libraries = cache
            .get(keys::LIBRARIES)
            .map(|list| {
                list.split(';')
                    .filter(|s| !s.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();
        result.version = cache.get(keys::VERSION).and_then(|v| Version::parse(v).ok());
        result.found = cache.get_flag(keys::FOUND);
        Some(result)
    }

    /// Persist this pass into the cache.
    ///
    /// Only present values are written; the found flag is always written
    /// and marks the entry complete for [`LocatorResult::from_cache`].
    fn store(&self, cache: &mut ConfigCache) {
        if let Some(root) = &self.root {
            cache.set(keys::ROOT_DIR, root.display().to_string());
        }
        if let Some(dir) = &self.include_dir {
            cache.set(keys::INCLUDE_DIR, dir.display().to_string());
        }
        for backend in Backend::ALL {
            let entry = self.backend(backend);
            if let Some(library) = &entry.library {
                cache.set(keys::backend_library(backend), library.display().to_string());
            }
            cache.set_flag(keys::backend_found(backend), entry.found);
        }
        if !self.libraries.is_empty() {
            let list = self
                .libraries
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(";");
            cache.set(keys::LIBRARIES, list);
        }
        if let Some(version) = &self.version {
            cache.set(keys::VERSION, version.to_string());
        }
        cache.set_flag(keys::FOUND, self.found);
    }
}

/// Resolve an ArrayFire installation (optional-dependency arm).
///
/// A populated cache short-circuits the pass entirely: no filesystem
/// probes, identical outputs, no diagnostics. On a miss the standard
/// not-found message is emitted once and the result carries
/// `found == false`; absence is never an error here.
pub fn resolve(hints: &LocateHints, cache: &mut ConfigCache) -> LocatorResult {
    if let Some(result) = LocatorResult::from_cache(cache) {
        tracing::debug!("ArrayFire resolution served from cache");
        return result;
    }

    let candidates = hints.candidate_roots();
    let root = probe::find_root(&candidates);
    let include_dir = probe::find_include_dir(root.as_deref(), hints.include_dir.as_deref());
    let lib_dirs = hints.library_dirs(root.as_deref());

    let mut result = LocatorResult {
        root,
        include_dir,
        ..Default::default()
    };

    // Each successful backend probe overwrites the aggregate list, so
    // the last backend found (CPU, then OpenCL, then CUDA) wins.
    // Downstream consumers depend on this; do not turn it into a union.
    for backend in Backend::ALL {
        let library = probe::find_library(backend.library_stem(), &lib_dirs);
        let entry = &mut result.backends[backend.index()];
        entry.found = library.is_some();
        if let Some(library) = library {
            result.libraries = vec![library.clone()];
            entry.library = Some(library);
        }
    }

    result.version = result.include_dir.as_deref().and_then(version::read_version);
    result.found = result.include_dir.is_some() && !result.libraries.is_empty();

    if !result.found {
        diagnostic::report_not_found(&missing_outputs(&result), &candidates, cache);
    }
    result.store(cache);
    result
}

/// Resolve a required ArrayFire installation: a miss is a hard error.
pub fn resolve_required(
    hints: &LocateHints,
    cache: &mut ConfigCache,
) -> Result<LocatorResult, ArrayFireNotFound> {
    let result = resolve(hints, cache);
    if result.found {
        Ok(result)
    } else {
        Err(ArrayFireNotFound {
            missing: missing_outputs(&result),
            searched: hints.candidate_roots(),
        })
    }
}

fn missing_outputs(result: &LocatorResult) -> String {
    let mut missing = Vec::new();
    if result.include_dir.is_none() {
        missing.push("include directory");
    }
    if result.libraries.is_empty() {
        missing.push("backend libraries");
    }
    missing.join(" and ")
}
