/// Errors produced by fallible constructors and the logging setup.
///
/// Message-driven setters never return errors: an out-of-range index sent to
/// a widget is logged with `tracing::warn!` and ignored. `Error` covers the
/// cases where a caller asked for something that cannot be built at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error, e.g. while opening a log file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value range whose minimum is not below its maximum.
    #[error("invalid range: min {min} must be less than max {max}")]
    InvalidRange { min: f64, max: f64 },

    /// A non-positive or non-finite step.
    #[error("invalid step {0}: must be positive and finite")]
    InvalidStep(f64),

    /// An index outside a collection.
    #[error("index {index} out of bounds for {len} items")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The index names an item that cannot take focus or selection.
    #[error("item {0} is disabled")]
    Disabled(usize),

    /// The tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}
