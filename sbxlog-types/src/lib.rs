//! Type definitions for sbxlog

pub mod error;
pub mod record;

pub use error::{Error, Result};
pub use record::{LogRecord, LogTimestamp};
