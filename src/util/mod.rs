//! Shared utilities

pub mod cache;
pub mod diagnostic;

pub use cache::ConfigCache;
pub use diagnostic::Diagnostic;
