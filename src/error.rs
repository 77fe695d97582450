use thiserror::Error;

/// Errors raised by the simulation core and its configuration layer.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("cell ({x}, {y}) is outside the {cols}x{rows} grid")]
    OutOfBounds {
        x: i64,
        y: i64,
        cols: usize,
        rows: usize,
    },

    #[error("config file could not be read or written: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid: {0}")]
    Config(#[from] serde_json::Error),

    #[error("unable to start the worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
