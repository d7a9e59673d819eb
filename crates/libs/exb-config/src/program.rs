//! Test programs.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::prelude::*;

/// Directory holding the test groups of the newer releases.
pub const TESTS_DIR: &str = "TESTS";

/// A test program of the older releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Index used on the command line (`-p`).
    pub id: usize,
    /// Program name, e.g. `MBED_BLINKY`.
    pub name: String,
    #[serde(default)]
    pub source_dirs: Vec<PathBuf>,
}

/// Find the test cases below `<root>/TESTS`.
///
/// Every `TESTS/<group>/<case>` directory is a test named
/// `tests-<group>-<case>`. A missing `TESTS` directory yields no tests.
pub fn discover_os_tests(root: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let tests_dir = root.join(TESTS_DIR);
    let mut tests = BTreeMap::new();
    if !tests_dir.is_dir() {
        debug!("No test directory at {:?}", tests_dir);
        return Ok(tests);
    }

    let cases = WalkDir::new(&tests_dir)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name();
    for case in cases {
        let case = case?;
        if !case.file_type().is_dir() {
            continue;
        }
        let Some(group) = case.path().parent().and_then(Path::file_name) else {
            continue;
        };
        let name = format!(
            "tests-{}-{}",
            group.to_string_lossy(),
            case.file_name().to_string_lossy()
        );
        tests.insert(name, case.into_path());
    }
    Ok(tests)
}
