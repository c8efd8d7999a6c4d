//! Shared test utilities for renderer-backed services
//!
//! Writes small shell scripts that stand in for `pdfinfo` and `pdftoppm`,
//! so page counting and rasterization run without poppler installed.
//! Tests that spawn these scripts are marked `#[serial]`: a script still
//! open for writing in a concurrently forked child fails with ETXTBSY.

use crate::config::RenderConfig;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script and return its path
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}

/// Renderer config whose `pdfinfo` reports `pages` pages and whose
/// `pdftoppm` prints a PNG signature followed by `fake-png`
pub fn fake_poppler(dir: &Path, pages: u32) -> RenderConfig {
    let pdfinfo = write_script(
        dir,
        "pdfinfo",
        &format!("echo 'Producer:       fake'\necho 'Pages:          {}'", pages),
    );
    let pdftoppm = write_script(dir, "pdftoppm", r"printf '\211PNG\r\n\032\nfake-png'");

    RenderConfig {
        pdftoppm: pdftoppm.to_string_lossy().to_string(),
        pdfinfo: pdfinfo.to_string_lossy().to_string(),
        dpi: 72,
        timeout_secs: 5,
    }
}

/// Bytes printed by the fake `pdftoppm`
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-png";
