use std::io;
use thiserror::Error;

/// Errors raised by sensor drivers
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("Sensor not found: {reason}")]
    NotFound { reason: String },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("Sensor I/O fault: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid sensor data: {reason}")]
    InvalidData { reason: String },

    #[error("Unsupported sensor operation: {reason}")]
    Unsupported { reason: String },
}

impl SensorError {
    pub fn not_found(reason: impl Into<String>) -> Self {
        SensorError::NotFound {
            reason: reason.into(),
        }
    }

    pub fn invalid_data(reason: impl Into<String>) -> Self {
        SensorError::InvalidData {
            reason: reason.into(),
        }
    }

    /// Map an I/O error raised while opening a device.
    ///
    /// Missing device nodes and access errors become their dedicated variants
    /// so acquisition can keep retrying on them.
    pub fn from_open_error(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SensorError::NotFound {
                reason: err.to_string(),
            },
            io::ErrorKind::PermissionDenied => SensorError::PermissionDenied {
                reason: err.to_string(),
            },
            _ => SensorError::Io(err),
        }
    }

    /// Failures worth waiting out during acquisition.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SensorError::NotFound { .. } | SensorError::PermissionDenied { .. }
        )
    }
}
