//! Test helpers for locating fixtures and writing scratch files.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// The demo fixture shipped with the CLI.
pub(super) fn demo_fixture() -> Utf8PathBuf {
    Utf8Path::new(env!("CARGO_MANIFEST_DIR")).join("data/demo_places.json")
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}
