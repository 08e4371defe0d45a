//! af-probe - discovery of installed ArrayFire distributions
//!
//! This crate locates an ArrayFire installation on the host filesystem:
//! the public header (`include/arrayfire.h`) and the per-backend compute
//! libraries (`afcpu`, `afopencl`, `afcuda`). Resolved paths are exposed
//! to the surrounding build configuration and cached in an injectable
//! [`ConfigCache`] so repeated passes within one session are probe-free.

pub mod locator;
pub mod util;

pub use locator::{
    resolve, resolve_required, Backend, BackendResult, LocateHints, LocatorResult,
};
pub use util::cache::ConfigCache;
pub use util::diagnostic::ArrayFireNotFound;
