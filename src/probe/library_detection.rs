//! Detection of native driver libraries mapped into the current process.
//!
//! A vendor driver library appearing in the process address space is the
//! observable trace of driver initialization: runtimes load the driver lazily
//! on first device use, and unload it rarely if ever. This module reads the
//! process memory map and matches library file names against glob patterns.
//!
//! # Platform Support
//!
//! - **Linux**: parses `/proc/self/maps`
//! - **Other platforms**: reports [`ProbeError::Unsupported`], which the
//!   driver probes treat as "not initialized"

use super::ProbeError;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Read the memory map of the current process.
#[cfg(target_os = "linux")]
pub fn read_process_maps() -> Result<String, ProbeError> {
    use crate::constants::probes::PROC_SELF_MAPS;

    std::fs::read_to_string(PROC_SELF_MAPS).map_err(|e| ProbeError::Unreadable {
        path: PROC_SELF_MAPS.into(),
        source: e,
    })
}

/// Read the memory map of the current process.
#[cfg(not(target_os = "linux"))]
pub fn read_process_maps() -> Result<String, ProbeError> {
    Err(ProbeError::Unsupported)
}

/// Extract the distinct file names of mapped files from a `/proc/<pid>/maps`
/// listing.
///
/// Each line has the form `address perms offset dev inode [pathname]`.
/// Anonymous mappings and pseudo-paths like `[heap]` are skipped.
pub fn mapped_file_names(maps: &str) -> BTreeSet<&str> {
    maps.lines()
        .filter_map(|line| line.find('/').map(|idx| &line[idx..]))
        .filter_map(|path| {
            // Deleted mappings carry a " (deleted)" suffix
            let path = path.strip_suffix(" (deleted)").unwrap_or(path);
            Path::new(path).file_name().and_then(|n| n.to_str())
        })
        .collect()
}

/// Check whether any mapped file name in `maps` matches one of `patterns`.
pub fn maps_contain_library(maps: &str, patterns: &[&str]) -> bool {
    for name in mapped_file_names(maps) {
        for pattern in patterns {
            if matches_pattern(name, pattern) {
                debug!("Found mapped library matching pattern '{}': {}", pattern, name);
                return true;
            }
        }
    }
    false
}

/// Check whether a library matching any of `patterns` is mapped into the
/// current process.
pub fn is_library_mapped(patterns: &[&str]) -> Result<bool, ProbeError> {
    let maps = read_process_maps()?;
    Ok(maps_contain_library(&maps, patterns))
}

/// Simple glob pattern matcher for library filenames.
///
/// Supports `*` (matches any characters) and `?` (matches single character).
///
/// # Examples
///
/// ```
/// use forkguard::probe::library_detection::matches_pattern;
///
/// assert!(matches_pattern("libcuda.so.1", "libcuda.so*"));
/// assert!(!matches_pattern("libcudart.so.12", "libcuda.so*"));
/// ```
pub fn matches_pattern(filename: &str, pattern: &str) -> bool {
    matches_pattern_impl(filename.as_bytes(), pattern.as_bytes())
}

fn matches_pattern_impl(filename: &[u8], pattern: &[u8]) -> bool {
    let mut f_idx = 0;
    let mut p_idx = 0;

    while p_idx < pattern.len() {
        match pattern[p_idx] {
            b'*' => {
                p_idx += 1;
                // '*' at end matches everything
                if p_idx >= pattern.len() {
                    return true;
                }

                return (f_idx..=filename.len())
                    .any(|i| matches_pattern_impl(&filename[i..], &pattern[p_idx..]));
            }
            b'?' => {
                if f_idx >= filename.len() {
                    return false;
                }
                f_idx += 1;
                p_idx += 1;
            }
            c => {
                if f_idx >= filename.len() || filename[f_idx] != c {
                    return false;
                }
                f_idx += 1;
                p_idx += 1;
            }
        }
    }

    f_idx >= filename.len()
}
