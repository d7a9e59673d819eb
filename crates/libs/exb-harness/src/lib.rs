//! Parallel export and sequential build test harness.
//!
//! Takes a matrix of (target, IDE, program) test cases, exports every case
//! concurrently through a [`exb_export::ProjectExporter`], then builds the
//! exported projects one at a time and reports which ones built, failed or
//! were skipped.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::{path::Path, sync::Arc};
//!
//! use exb_config::Catalog;
//! use exb_export::Exporters;
//! use exb_harness::{
//!     ExportBuildTest, HarnessOptions, Progress, TestProgram, test_matrix,
//! };
//!
//! let catalog = Arc::new(Catalog::from_file(Path::new("catalog.toml")).unwrap());
//! let program = TestProgram::classic(catalog.program(0).unwrap());
//! let tests = test_matrix(
//!     &[String::from("K64F")],
//!     &[String::from("make_gcc_arm")],
//!     &[program],
//!     &catalog,
//! );
//! let mut harness = ExportBuildTest::new(
//!     Exporters::new(catalog, "."),
//!     tests,
//!     HarnessOptions::default(),
//!     Arc::new(Progress::stdout()),
//! );
//! let results = harness.batch_tests().unwrap();
//! results.print(std::io::stdout()).unwrap();
//! std::process::exit(results.exit_code().into());
//! ```

pub mod error;
pub mod orchestrator;
pub mod pool;
pub mod prelude;
pub mod progress;
pub mod queue;
pub mod results;
pub mod test_case;

pub use orchestrator::{BuildUnit, ExportBuildTest, ExportStep, HarnessOptions, HarnessState};
pub use pool::WorkerPool;
pub use progress::Progress;
pub use queue::WorkQueue;
pub use results::{BuildOutcome, ResultSets};
pub use test_case::{TestCase, TestProgram, test_matrix};
