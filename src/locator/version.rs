//! Version detection from the installed headers.

use std::path::Path;

use regex::Regex;
use semver::Version;

/// Parse the installed version from `af/version.h` under the include dir.
///
/// Prefers the `AF_VERSION` string define, reconstructing from the
/// MAJOR/MINOR/PATCH component defines when it is absent. Best-effort:
/// a missing or unparseable header yields `None`, never an error.
pub fn read_version(include_dir: &Path) -> Option<Version> {
    let header = include_dir.join("af").join("version.h");
    let contents = std::fs::read_to_string(&header).ok()?;
    let version = parse_version_header(&contents);
    if let Some(version) = &version {
        tracing::debug!("detected version {} from {}", version, header.display());
    }
    version
}

fn parse_version_header(contents: &str) -> Option<Version> {
    let string_define =
        Regex::new(r#"#define\s+AF_VERSION\s+"([0-9]+\.[0-9]+(?:\.[0-9]+)?)""#).ok()?;
    if let Some(caps) = string_define.captures(contents) {
        return parse_lenient(&caps[1]);
    }

    let component = |name: &str| -> Option<u64> {
        let re = Regex::new(&format!(r"#define\s+AF_VERSION_{name}\s+([0-9]+)")).ok()?;
        re.captures(contents)?.get(1)?.as_str().parse().ok()
    };
    Some(Version::new(
        component("MAJOR")?,
        component("MINOR")?,
        component("PATCH").unwrap_or(0),
    ))
}

/// Accept two-component versions ("3.8"); semver itself requires three.
fn parse_lenient(text: &str) -> Option<Version> {
    if let Ok(version) = Version::parse(text) {
        return Some(version);
    }
    let mut parts = text.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    Some(Version::new(major, minor, patch))
}
