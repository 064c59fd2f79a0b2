//! Test helpers for fixture-based loader tests

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Absolute path of a file under `tests/fixtures`
pub fn fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);
    path
}

/// Fixture path as the `&str` form the loader accepts
pub fn fixture(filename: &str) -> String {
    fixture_path(filename)
        .to_str()
        .unwrap_or_else(|| panic!("Fixture path for {} is not UTF-8", filename))
        .to_string()
}

/// A mixer document written to a temporary directory
pub struct MixerFile {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl MixerFile {
    /// Write `xml` to `mixer_paths.xml` in a fresh temporary directory
    pub fn new(xml: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("mixer_paths.xml");
        fs::write(&path, xml).expect("Failed to write mixer file");
        Self { dir, path }
    }

    pub fn path_str(&self) -> &str {
        path_str(&self.path)
    }
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("Temp path is not UTF-8")
}

/// Build a mixer document with one `pcmdai` element per `(link, value)` pair
pub fn mixer_document(links: &[(&str, &str)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<mixer>\n");
    for (link, value) in links {
        xml.push_str(&format!("    <pcmdai {}=\"{}\" />\n", link, value));
    }
    xml.push_str("    <ctl name=\"SPK Switch\" value=\"0\" />\n</mixer>\n");
    xml
}
