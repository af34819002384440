//! Test helpers for writing vendor header fixtures

use std::path::PathBuf;

/// The pinned-version header excerpt shipped with the tests
pub const VENDOR_HEADER: &str = include_str!("fixtures/libbladeRF.h");

/// Vendor header with one `#define` line replaced
///
/// # Arguments
/// * `name` - Macro whose definition is replaced
/// * `body` - New macro body
pub fn header_with(name: &str, body: &str) -> String {
    let prefix = format!("#define {} ", name);
    VENDOR_HEADER
        .lines()
        .map(|line| {
            if line.starts_with(&prefix) {
                format!("{}{}", prefix, body)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Vendor header with every line defining `name` removed
pub fn header_without(name: &str) -> String {
    let prefix = format!("#define {} ", name);
    VENDOR_HEADER
        .lines()
        .filter(|line| !line.starts_with(&prefix))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write header text to a unique temporary file
pub fn write_temp_header(tag: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "bladerf_shim_{}_{}.h",
        tag,
        std::process::id()
    ));
    std::fs::write(&path, contents).expect("Failed to write header fixture");
    path
}
