//! # sbxlog
//!
//! Attendance log export for ONtime SBXPC biometric terminals.
//!
//! The vendor driver does all device communication; this crate sequences the
//! calls into it — connect, read the serial number, stage a bulk log read,
//! drain records until the driver signals end of stream — and writes the
//! result to CSV.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sbxlog::{report, Device, NativeDriver, DEFAULT_DRIVER_PATH};
//!
//! fn main() -> sbxlog::Result<()> {
//!     let driver = NativeDriver::load(DEFAULT_DRIVER_PATH)?;
//!     let mut device = Device::new(driver, "192.168.1.70", 5005).with_password(123);
//!
//!     device.connect()?;
//!
//!     device.read_all_logs(false)?;
//!     let count = report::write_csv_path("attendance_log.csv", device.records()?)?;
//!     println!("Wrote {count} records");
//!
//!     device.disconnect();
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod report;
pub mod session;

// Re-exports
pub use device::{Device, Records};
pub use error::{Error, Result};
pub use session::{Session, SessionState};

// Re-export the driver boundary and record types
pub use sbxlog_driver::{Driver, NativeDriver, RawLogFields, StringHandle, DEFAULT_DRIVER_PATH};
pub use sbxlog_types::{LogRecord, LogTimestamp};
