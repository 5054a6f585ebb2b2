//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Driver error: {0}")]
    Driver(#[from] sbxlog_driver::Error),

    #[error("Type error: {0}")]
    Types(#[from] sbxlog_types::Error),

    #[error("Device not connected")]
    NotConnected,

    #[error("Device already connected")]
    AlreadyConnected,

    #[error("Connection failed (driver error code {code})")]
    ConnectFailed { code: i32 },

    #[error("Failed to read serial number (driver error code {code})")]
    SerialNumber { code: i32 },

    #[error("Bulk log read failed (driver error code {code})")]
    BulkRead { code: i32 },

    #[error("Stopped after {limit} records; driver never signaled end of stream")]
    RecordLimit { limit: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
