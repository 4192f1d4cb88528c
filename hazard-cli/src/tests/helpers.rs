//! Test helpers for writing report batches into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace")
}

/// Three reports within fifteen kilometres of each other near Mumbai.
pub(super) const MUMBAI_TRIPLE: &str = r#"[
  { "id": 1, "lat": 19.50, "lon": 72.76, "weight": 3 },
  { "id": 2, "lat": 19.27, "lon": 72.79, "weight": 4 },
  { "id": 3, "lat": 19.29, "lon": 72.91, "weight": 2 }
]"#;

/// A batch whose second record lies beyond the north pole.
pub(super) const OUT_OF_RANGE: &str = r#"[
  { "id": 1, "lat": 19.50, "lon": 72.76, "weight": 3 },
  { "id": 2, "lat": 95.00, "lon": 72.79, "weight": 4 }
]"#;
