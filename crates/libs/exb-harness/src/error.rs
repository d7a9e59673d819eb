//! Harness error types.
//!
//! Any of these aborts a test run. Per test outcomes (unsupported pairs,
//! failed builds, log handling problems) never surface as errors.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] exb_config::error::Error),

    #[error(transparent)]
    Export(#[from] exb_export::error::Error),
}
