/*!
# Errors

All fallible operations of this crate return [`Result<T>`].
Failures are always caused by the data handed in by the caller and are never transient,
so there is no retry logic anywhere: errors surface immediately.
*/

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building or querying tables
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input: negative or non-finite distances, non-square or
    /// inconsistently indexed matrices, invalid configuration values, ...
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The reference identifier of a query has no data to aggregate over
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Reading or writing a table failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand for returning `Err(Error::InvalidInput)` early when a condition fails
macro_rules! invalid_input_unless {
    ($cond : expr, $($fmt : tt)+) => {
        if !($cond) {
            return Err($crate::error::Error::InvalidInput(format!($($fmt)+)));
        }
    };
}

pub(crate) use invalid_input_unless;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Error::InvalidInput("negative distance".into()).to_string(),
            "Invalid input: negative distance"
        );
        assert_eq!(
            Error::InvalidReference("42".into()).to_string(),
            "Invalid reference: 42"
        );

        let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(io, Error::Io(_)));
    }

    #[test]
    fn early_return() {
        fn check(x: f64) -> Result<f64> {
            invalid_input_unless!(x >= 0.0, "{x} is negative");
            Ok(x)
        }

        assert_eq!(check(1.0).unwrap(), 1.0);
        assert!(matches!(check(-1.0), Err(Error::InvalidInput(msg)) if msg == "-1 is negative"));
    }
}
