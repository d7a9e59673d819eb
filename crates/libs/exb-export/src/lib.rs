//! Project exporters for the exb export test harness.
//!
//! An exporter turns a target, an IDE id and a set of source directories into
//! an on-disk project for an external build tool, and binds the command that
//! builds it. The harness only relies on the [`ProjectExporter`] trait;
//! [`Exporters`] implements it for every IDE listed in a catalog:
//!
//! - **Makefile** IDEs (`make_gcc_arm`, `make_armc5`, `make_iar`) get a
//!   generated `Makefile`, built with `make -C <dir> -j`.
//! - **Command** IDEs (`iar`, `uvision`) get a project descriptor, built with
//!   the IDE's configured command line.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::{path::{Path, PathBuf}, sync::Arc};
//!
//! use exb_config::{Catalog, ToolchainFlags};
//! use exb_export::{BuildResult, ExportRequest, ExportResult, Exporters, ProjectExporter};
//!
//! let catalog = Catalog::from_file(Path::new("catalog.toml")).unwrap();
//! let exporters = Exporters::new(Arc::new(catalog), ".");
//! let request = ExportRequest {
//!     target: "K64F".into(),
//!     ide: "make_gcc_arm".into(),
//!     project_name: "MBED_BLINKY".into(),
//!     project_id: Some(0),
//!     sources: vec![],
//!     export_path: PathBuf::from("BUILD/export/K64F_make_gcc_arm_MBED_BLINKY"),
//!     archive_name: None,
//!     build_profile: ToolchainFlags::default(),
//! };
//! if let ExportResult::Exported(project) = exporters.export(&request).unwrap() {
//!     match project.build().unwrap() {
//!         BuildResult::Succeeded(status) => println!("{status}"),
//!         BuildResult::Failed(failure) => println!("{failure}"),
//!     }
//! }
//! ```

pub mod archive;
pub mod build;
pub mod command;
pub mod context;
pub mod error;
pub mod exporter;
pub mod makefile;
pub mod prelude;
pub mod registry;
pub mod resources;

pub use build::{BuildFailure, BuildInvocation, BuildResult};
pub use exporter::{ExportRequest, ExportResult, ExportedProject, ProjectExporter};
pub use registry::Exporters;
