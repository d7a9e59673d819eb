//! Catalogs for the exb export test harness.
//!
//! Provides the lookup tables the harness consumes as external data: the
//! releases of the SDK, the targets available in each release, the compiler
//! toolchains and their command lines, the IDE exporters and the test
//! programs. Build profiles are loaded from JSON files.
//!
//! # Usage
//!
//! ```rust,no_run
//! use exb_config::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::from_file(Path::new("catalog.toml")).unwrap();
//! let release = catalog.latest_release().unwrap();
//! for target in catalog.targets_in_release(&release.version) {
//!     println!("{}", target.name);
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod prelude;
pub mod profile;
pub mod program;
pub mod target;
pub mod toolchain;

pub use catalog::Catalog;
pub use profile::{ToolchainFlags, extract_profile};
pub use program::{Program, discover_os_tests};
pub use target::Target;
pub use toolchain::{Compiler, Ide, IdeKind};
