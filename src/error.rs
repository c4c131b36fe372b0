//! Crate-level error types
//!
//! Expected runtime conditions (unknown asset, saturated queue, departed
//! subscriber) are handled where they occur and never show up here. Rejected
//! reports surface as [`ReportError`](crate::location::ReportError). What is
//! left is failures of the surrounding I/O.

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for tracker and server operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Binding or accepting on the listen socket failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP server stopped with an error
    #[error("Server error: {0}")]
    Serve(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: Error = io.into();

        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: port taken");
    }
}
