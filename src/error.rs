/*!
Errors raised while building, training and running a forecast
*/
use thiserror::Error;

/// An error aborting a pipeline run
#[derive(Debug, Error)]
pub enum Error {
    /// Too few prices or windows to do what was asked
    #[error("insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// The minimum acceptable count
        required: usize,
        /// The count actually available
        actual: usize,
    },
    /// A scaler was applied to data derived from a different price series
    #[error("scaler was fit on series {expected:016x}, but the input comes from series {found:016x}")]
    ScalerMismatch {
        /// Fingerprint of the series the scaler was fit on
        expected: u64,
        /// Fingerprint of the series the input was taken from
        found: u64,
    },
    /// A window does not have the configured length
    #[error("expected a window of {expected} prices, got {actual}")]
    Shape {
        /// The configured window size
        expected: usize,
        /// The length actually received
        actual: usize,
    },
    /// A price series with no observations
    #[error("price series is empty")]
    EmptySeries,
    /// A price series whose dates are not strictly increasing
    #[error("price series dates are not strictly increasing at row {index}")]
    UnorderedSeries {
        /// The first offending row
        index: usize,
    },
    /// A price series containing a NaN or infinite close
    #[error("non-finite closing price at row {index}")]
    NonFinite {
        /// The offending row
        index: usize,
    },
    /// An error from libtorch
    #[error("torch error: {0}")]
    Torch(#[from] tch::TchError),
    /// An error reading or writing CSV data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// An IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A result whose error is a pipeline [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_counts() {
        let err = Error::InsufficientData {
            required: 21,
            actual: 20,
        };
        assert_eq!(err.to_string(), "insufficient data: need at least 21, got 20");
        let err = Error::Shape {
            expected: 20,
            actual: 3,
        };
        assert_eq!(err.to_string(), "expected a window of 20 prices, got 3");
    }
}
