//! Process execution for the exb export test harness.
//!
//! Provides utilities for spawning external build tools and capturing their
//! complete output once they terminate.
//!
//! # Usage
//!
//! ```rust,no_run
//! use exb_io::runner::Runner;
//!
//! let runner = Runner::new("make", vec!["-C", "BUILD/export/K64F_make_gcc_arm_MBED_BLINKY", "-j"]);
//! let output = runner.run().unwrap();
//! println!("{} exited with {:?}", runner.get_full_command(), output.code());
//! print!("{}", output.stdout);
//! ```

pub mod process;
pub mod runner;
