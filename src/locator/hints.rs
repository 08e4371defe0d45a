//! Input hints for a resolution pass.
//!
//! Hints are an explicit value object rather than ambient process state,
//! so callers (and tests) control exactly which locations the locator
//! probes. [`LocateHints::from_env`] is the convenience constructor that
//! picks up the conventional override variables.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use super::probe;

/// Environment variable naming an explicit installation root override.
pub const ROOT_DIR_VAR: &str = "ArrayFire_ROOT_DIR";

/// Legacy override variable used by ArrayFire's own installers.
pub const AF_PATH_VAR: &str = "AF_PATH";

/// Candidate locations and overrides for one resolution pass.
#[derive(Debug, Clone)]
pub struct LocateHints {
    /// Explicit installation root override. Highest priority.
    pub root: Option<PathBuf>,

    /// Install prefix of the surrounding build (e.g. `/usr/local`).
    pub install_prefix: Option<PathBuf>,

    /// Directory probed for the header independently of the root search.
    pub include_dir: Option<PathBuf>,

    /// Additional library directories, probed before system paths.
    pub lib_dirs: Vec<PathBuf>,

    /// Whether to fall back to conventional prefixes and system library
    /// paths when no hint matches.
    pub use_default_paths: bool,
}

impl Default for LocateHints {
    fn default() -> Self {
        LocateHints {
            root: None,
            install_prefix: None,
            include_dir: None,
            lib_dirs: Vec::new(),
            use_default_paths: true,
        }
    }
}

impl LocateHints {
    /// Hints with no overrides; conventional locations are searched.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hints restricted to explicitly supplied locations.
    ///
    /// Used by tests and hermetic builds that must not pick up a system
    /// installation by accident.
    pub fn isolated() -> Self {
        LocateHints {
            use_default_paths: false,
            ..Self::default()
        }
    }

    /// Read overrides from the process environment.
    ///
    /// `ArrayFire_ROOT_DIR` takes precedence over `AF_PATH`.
    pub fn from_env() -> Self {
        let mut hints = Self::new();
        hints.root = std::env::var_os(ROOT_DIR_VAR)
            .or_else(|| std::env::var_os(AF_PATH_VAR))
            .map(PathBuf::from);
        if let Some(root) = &hints.root {
            tracing::debug!("installation root override from environment: {}", root.display());
        }
        hints
    }

    /// Set the explicit installation root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the install prefix fallback.
    pub fn with_install_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.install_prefix = Some(prefix.into());
        self
    }

    /// Set the independent include-directory hint.
    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dir = Some(dir.into());
        self
    }

    /// Add a library directory to probe before system paths.
    pub fn with_lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lib_dirs.push(dir.into());
        self
    }

    /// Candidate installation roots in priority order.
    pub fn candidate_roots(&self) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(root) = &self.root {
            roots.push(root.clone());
        }
        if let Some(prefix) = &self.install_prefix {
            roots.push(prefix.clone());
        }
        if self.use_default_paths {
            roots.extend(conventional_prefixes());
        }
        roots.dedup();
        roots
    }

    /// Library directories to probe for a backend, in priority order.
    ///
    /// `lib64` is always probed as a sibling of `lib` under the resolved
    /// root; some distributions install 64-bit libraries there only.
    pub fn library_dirs(&self, root: Option<&Path>) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(root) = root {
            dirs.push(root.join("lib"));
            dirs.push(root.join("lib64"));
        }
        dirs.extend(self.lib_dirs.iter().cloned());
        if self.use_default_paths {
            dirs.extend(probe::system_lib_dirs());
        }
        dirs.dedup();
        dirs
    }
}

/// Conventional installation prefixes probed when no hint matches.
fn conventional_prefixes() -> Vec<PathBuf> {
    let mut prefixes = Vec::new();

    if cfg!(windows) {
        let program_files = std::env::var_os("ProgramFiles")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("C:\\Program Files"));
        prefixes.push(program_files.join("ArrayFire").join("v3"));
    } else {
        prefixes.push(PathBuf::from("/opt/arrayfire"));
        prefixes.push(PathBuf::from("/opt/ArrayFire"));
        prefixes.push(PathBuf::from("/usr/local"));
        prefixes.push(PathBuf::from("/usr"));
    }

    // The upstream installer defaults to ~/arrayfire on macOS.
    if let Some(base) = BaseDirs::new() {
        prefixes.push(base.home_dir().join("arrayfire"));
    }

    prefixes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_hints_search_nothing_by_default() {
        let hints = LocateHints::isolated();
        assert!(hints.candidate_roots().is_empty());
        assert!(hints.library_dirs(None).is_empty());
    }

    #[test]
    fn test_candidate_roots_priority_order() {
        let hints = LocateHints::isolated()
            .with_root("/explicit/root")
            .with_install_prefix("/usr/local");

        let roots = hints.candidate_roots();
        assert_eq!(roots[0], PathBuf::from("/explicit/root"));
        assert_eq!(roots[1], PathBuf::from("/usr/local"));
    }

    #[test]
    fn test_default_hints_include_conventional_prefixes() {
        let hints = LocateHints::new().with_root("/explicit/root");
        let roots = hints.candidate_roots();

        // Explicit root stays first, conventional prefixes follow.
        assert_eq!(roots[0], PathBuf::from("/explicit/root"));
        assert!(roots.len() > 1);
    }

    #[test]
    fn test_library_dirs_derive_lib64_sibling() {
        let hints = LocateHints::isolated().with_lib_dir("/extra/lib");
        let dirs = hints.library_dirs(Some(Path::new("/opt/arrayfire")));

        assert_eq!(dirs[0], PathBuf::from("/opt/arrayfire/lib"));
        assert_eq!(dirs[1], PathBuf::from("/opt/arrayfire/lib64"));
        assert_eq!(dirs[2], PathBuf::from("/extra/lib"));
    }
}
