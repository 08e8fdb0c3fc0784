//! Result type alias for queuekeeper operations

use crate::error::QueueKeeperError;

/// Standard Result type for queuekeeper operations
pub type Result<T> = std::result::Result<T, QueueKeeperError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Turn a non-fatal error into `Ok(None)`, keep fatal ones
    fn recoverable(self) -> Result<Option<T>>;

    /// Log the error and continue with None
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if !err.is_fatal() => {
                tracing::warn!("Recoverable error: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn log_and_continue(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                if err.is_fatal() {
                    tracing::error!("Error: {}", err);
                } else {
                    tracing::warn!("Continuing after error: {}", err);
                }
                None
            }
        }
    }
}
