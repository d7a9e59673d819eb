#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] exb_config::error::Error),

    #[error(transparent)]
    Harness(#[from] exb_harness::error::Error),

    /// A command line selection does not match the catalog.
    #[error("{0}")]
    Selection(String),
}
