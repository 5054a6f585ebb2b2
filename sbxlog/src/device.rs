//! High-level device interface
//!
//! Sequences calls into the vendor driver: connect, identity, bulk log read,
//! and the per-record drain. All driver calls block until the driver returns;
//! there is no concurrency here.

use tracing::{debug, info, warn};

use sbxlog_driver::{Driver, RawLogFields, StringHandle};
use sbxlog_types::{LogRecord, LogTimestamp};

use crate::error::{Error, Result};
use crate::session::Session;

/// SBXPC attendance terminal
///
/// Owns the driver and the session state explicitly, rather than leaning on
/// the driver's process-global connection. Generic over [`Driver`] so the
/// call sequence can be tested against a fake.
///
/// # Examples
///
/// ```no_run
/// use sbxlog::{Device, NativeDriver, DEFAULT_DRIVER_PATH};
///
/// fn main() -> sbxlog::Result<()> {
///     let driver = NativeDriver::load(DEFAULT_DRIVER_PATH)?;
///     let mut device = Device::new(driver, "192.168.1.70", 5005).with_password(123);
///
///     device.connect()?;
///     println!("Serial: {}", device.serial_number()?);
///     device.disconnect();
///     Ok(())
/// }
/// ```
pub struct Device<D: Driver> {
    driver: D,
    machine: i32,
    address: String,
    port: i32,
    password: i32,
    session: Session,
    record_limit: Option<usize>,
}

impl<D: Driver> Device<D> {
    /// Create a new device instance
    ///
    /// Machine number defaults to 1 (first terminal on the line) and the
    /// password to 0.
    pub fn new(driver: D, address: impl Into<String>, port: i32) -> Self {
        Self {
            driver,
            machine: 1,
            address: address.into(),
            port,
            password: 0,
            session: Session::new(),
            record_limit: None,
        }
    }

    /// Set the communication password
    pub fn with_password(mut self, password: i32) -> Self {
        self.password = password;
        self
    }

    /// Set the machine number (for daisy-chained terminals)
    pub fn with_machine(mut self, machine: i32) -> Self {
        self.machine = machine;
        self
    }

    /// Cap the record drain at `limit` records
    ///
    /// A driver that never signals end of stream would otherwise keep the
    /// drain running forever. With a cap set, the drain yields
    /// [`Error::RecordLimit`] once and then ends. Default: no cap.
    pub fn with_record_limit(mut self, limit: usize) -> Self {
        self.record_limit = Some(limit);
        self
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Borrow the underlying driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Connect to the terminal
    ///
    /// The address travels as a driver-owned string handle; it is released on
    /// every exit path, success or failure. On failure the driver error code
    /// is surfaced and a disconnect is issued to release any partial
    /// driver-side state.
    pub fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        info!("Connecting to {}:{}...", self.address, self.port);

        let mut handle = self.driver.alloc_string(&self.address)?;
        let ok = self
            .driver
            .connect(self.machine, &mut handle, self.port, self.password);
        self.driver.free_string(handle);

        if ok {
            self.session.open()?;
            info!("Connected to {}:{}", self.address, self.port);
            Ok(())
        } else {
            let code = self.driver.last_error();
            self.driver.disconnect();
            Err(Error::ConnectFailed { code })
        }
    }

    /// Disconnect from the terminal
    ///
    /// Unconditional and idempotent; the driver call is always safe.
    pub fn disconnect(&mut self) {
        info!("Disconnecting from {}:{}", self.address, self.port);
        self.driver.disconnect();
        self.session.close();
    }

    /// Read the terminal serial number
    ///
    /// Copies the driver-owned string into process memory and releases the
    /// handle before returning.
    pub fn serial_number(&mut self) -> Result<String> {
        self.ensure_connected()?;

        debug!("Reading serial number...");

        let mut out = StringHandle::NULL;
        if self.driver.serial_number(self.machine, &mut out) {
            let serial = self.driver.string_value(out);
            self.driver.free_string(out);
            Ok(serial?)
        } else {
            Err(Error::SerialNumber {
                code: self.driver.last_error(),
            })
        }
    }

    /// Stage all general log records in driver memory
    ///
    /// When the driver exposes read-mark control, `mark_as_read` decides
    /// whether drained records are flagged as read on the terminal; otherwise
    /// the driver default applies and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BulkRead`] with the driver code on failure; the
    /// caller must not proceed to [`records`](Device::records).
    pub fn read_all_logs(&mut self, mark_as_read: bool) -> Result<()> {
        self.ensure_connected()?;

        if self.driver.supports_read_mark() {
            self.driver.set_read_mark(mark_as_read);
            debug!("Read mark set to {}", mark_as_read);
        } else {
            warn!("Read-mark control unavailable; using driver default behavior");
        }

        if self.driver.read_all_logs(self.machine) {
            debug!("All general log records staged");
            Ok(())
        } else {
            Err(Error::BulkRead {
                code: self.driver.last_error(),
            })
        }
    }

    /// Drain staged log records
    ///
    /// Returns a lazy iterator that polls the driver once per record and ends
    /// when the driver signals end of stream. Records come back in whatever
    /// order the driver yields them.
    pub fn records(&mut self) -> Result<Records<'_, D>> {
        self.ensure_connected()?;

        Ok(Records {
            device: self,
            yielded: 0,
            done: false,
        })
    }

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }
}

/// Lazy record drain
///
/// Finite in practice: each `next()` is one driver poll, and a `false` driver
/// return ends the iteration. See [`Device::with_record_limit`] for the
/// defensive cap.
pub struct Records<'a, D: Driver> {
    device: &'a mut Device<D>,
    yielded: usize,
    done: bool,
}

impl<D: Driver> Iterator for Records<'_, D> {
    type Item = Result<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(limit) = self.device.record_limit {
            if self.yielded >= limit {
                self.done = true;
                return Some(Err(Error::RecordLimit { limit }));
            }
        }

        let mut raw = RawLogFields::default();
        if !self.device.driver.next_record(self.device.machine, &mut raw) {
            self.done = true;
            debug!("End of log stream after {} records", self.yielded);
            return None;
        }

        self.yielded += 1;

        let record = LogRecord {
            terminal: raw.terminal,
            user_id: raw.user_id,
            origin_terminal: raw.origin_terminal,
            verify_mode: raw.verify_mode,
            timestamp: LogTimestamp::new(
                raw.year, raw.month, raw.day, raw.hour, raw.minute, raw.second,
            ),
        };

        // A record with impossible calendar fields is an error, not a row.
        if let Err(e) = record.timestamp.to_datetime() {
            return Some(Err(e.into()));
        }

        Some(Ok(record))
    }
}
