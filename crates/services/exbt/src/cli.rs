//! Command-line interface for the exb test runner.

use clap::Parser;
use std::path::PathBuf;

/// IDEs exported when `-i` is not given.
pub const DEFAULT_IDES: [&str; 5] = ["iar", "uvision", "make_gcc_arm", "make_iar", "make_armc5"];

/// Command-line interface for the exb test runner.
#[derive(Parser, Debug)]
#[command(name = "exbt")]
#[command(about = "Export test programs for every target and IDE, then build the exported projects")]
pub struct Cli {
    /// Path to the catalog file
    #[arg(long)]
    pub catalog: PathBuf,

    /// IDEs to export, comma separated
    #[arg(short, long = "ides", value_delimiter = ',', default_values_t = DEFAULT_IDES.map(String::from))]
    pub ides: Vec<String>,

    /// Test program indices to export (release 2), comma separated
    #[arg(short = 'p', long = "programs", value_delimiter = ',')]
    pub program_ids: Vec<usize>,

    /// Test program names to export (release 2), comma separated
    #[arg(short = 'n', long = "names", value_delimiter = ',')]
    pub program_names: Vec<String>,

    /// Targets to export for, comma separated. Defaults to every target of the release
    #[arg(short, long = "mcu", value_delimiter = ',')]
    pub mcu: Vec<String>,

    /// OS tests to export (release 5), comma separated
    #[arg(long, value_delimiter = ',')]
    pub os_tests: Vec<String>,

    /// Remove each export directory after its build
    #[arg(short, long)]
    pub clean: bool,

    /// SDK release to test. Defaults to the newest release of the catalog
    #[arg(long)]
    pub release: Option<String>,

    /// Build profile file, may be repeated
    #[arg(long = "profile")]
    pub profiles: Vec<PathBuf>,

    /// Directory receiving the exported projects
    #[arg(long, default_value = exb_harness::orchestrator::DEFAULT_EXPORT_ROOT)]
    pub export_dir: PathBuf,

    /// Number of concurrent export workers
    #[arg(short, long, default_value_t = exb_harness::pool::DEFAULT_POOL_SIZE)]
    pub jobs: usize,

    /// SDK root, sources are resolved against it
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}
