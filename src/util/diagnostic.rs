//! User-facing diagnostic messages.
//!
//! Resolution failures follow the standard build-system convention: the
//! optional arm emits one diagnostic per configuration session and leaves
//! the found flag false, the required arm surfaces a typed error.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::cache::ConfigCache;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no installation root could be resolved.
    pub const SET_ROOT_DIR: &str =
        "Set ArrayFire_ROOT_DIR (or AF_PATH) to the installation prefix";

    /// Suggestion when the header was found but no backend library.
    pub const INSTALL_BACKEND: &str =
        "Install at least one backend library (afcpu, afopencl or afcuda)";
}

/// Cache key marking that the not-found diagnostic was already emitted.
const NOTFOUND_REPORTED_KEY: &str = "ArrayFire_NOTFOUND_REPORTED";

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with optional context and suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
                Severity::Note => "\x1b[1;36mnote\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Note => "note",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        for ctx in &self.context {
            output.push_str(&format!("  -> {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Required-mode resolution failure.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("could not find ArrayFire (missing: {missing})")]
#[diagnostic(
    code(af_probe::locate::not_found),
    help("Set ArrayFire_ROOT_DIR (or AF_PATH) to the installation prefix containing include/arrayfire.h")
)]
pub struct ArrayFireNotFound {
    /// Which required outputs were unset.
    pub missing: String,
    /// Root candidates that were probed.
    pub searched: Vec<PathBuf>,
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

/// Emit the standard not-found diagnostic once per configuration session.
///
/// Repeat invocations against the same cache stay quiet, matching the
/// convention that cached resolution steps do not re-report.
pub fn report_not_found(missing: &str, searched: &[PathBuf], cache: &mut ConfigCache) {
    if cache.get_flag(NOTFOUND_REPORTED_KEY) {
        return;
    }
    cache.set_flag(NOTFOUND_REPORTED_KEY, true);

    let mut diag = Diagnostic::error(format!("could not find ArrayFire (missing: {missing})"))
        .with_suggestion(suggestions::SET_ROOT_DIR)
        .with_suggestion(suggestions::INSTALL_BACKEND);
    for root in searched {
        diag = diag.with_context(format!("searched {}", root.display()));
    }
    emit(&diag, false);
}
