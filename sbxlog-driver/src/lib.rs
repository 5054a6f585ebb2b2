//! # sbxlog-driver
//!
//! Driver boundary for ONtime SBXPC attendance terminals.
//!
//! The vendor ships all device communication as a closed native library
//! (`SBXPCDLL.dll`). This crate captures its fixed entry-point contract as the
//! [`Driver`] trait and provides [`NativeDriver`], which loads the library at
//! runtime and marshals the BSTR string handles the entry points expect.
//!
//! Everything above this crate talks to the trait, so the call sequence can be
//! exercised against a fake driver without the vendor library installed.

pub mod error;
pub mod native;

pub use error::{Error, Result};
pub use native::{NativeDriver, COMPANION_LIBRARY, DEFAULT_DRIVER_PATH};

/// Opaque driver-owned string handle
///
/// On the native driver this is a BSTR allocated by `SysAllocString`. The
/// owner must release it exactly once via [`Driver::free_string`], immediately
/// after copying its value into process-owned memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringHandle(pub u64);

impl StringHandle {
    /// The null handle, used as the initial value for by-reference outputs
    pub const NULL: StringHandle = StringHandle(0);

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// Output fields of the per-record fetch entry point
///
/// The driver fills all ten fields by reference on every successful poll.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RawLogFields {
    /// Terminal index that answered the poll
    pub terminal: i32,
    /// Enrolled user identifier
    pub user_id: i32,
    /// Terminal index where the event originated
    pub origin_terminal: i32,
    /// Vendor-defined verification method code
    pub verify_mode: i32,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
}

/// The vendor driver's entry-point contract
///
/// Boolean returns mirror the native calling convention: `false` from
/// [`connect`](Driver::connect), [`serial_number`](Driver::serial_number) or
/// [`read_all_logs`](Driver::read_all_logs) means failure (query
/// [`last_error`](Driver::last_error) for the code), while `false` from
/// [`next_record`](Driver::next_record) means the staged log buffer is
/// exhausted and is not an error.
pub trait Driver {
    /// Allocate a driver-owned string handle holding `value`
    fn alloc_string(&mut self, value: &str) -> Result<StringHandle>;

    /// Copy the contents of a driver-owned string into process-owned memory
    fn string_value(&mut self, handle: StringHandle) -> Result<String>;

    /// Release a driver-owned string handle
    ///
    /// Must be called exactly once per allocated handle. Releasing the null
    /// handle is a no-op.
    fn free_string(&mut self, handle: StringHandle);

    /// Open a TCP session to the terminal
    ///
    /// The address travels as a string handle passed by reference; the caller
    /// keeps ownership and must release it after the call returns.
    fn connect(&mut self, machine: i32, address: &mut StringHandle, port: i32, password: i32)
        -> bool;

    /// Close the session; always safe to call
    fn disconnect(&mut self);

    /// Fetch the code of the most recent failure
    fn last_error(&mut self) -> i32;

    /// Request the terminal serial number as a driver-owned string handle
    fn serial_number(&mut self, machine: i32, out: &mut StringHandle) -> bool;

    /// Stage all available general log records in driver memory
    fn read_all_logs(&mut self, machine: i32) -> bool;

    /// Whether the optional read-mark control was resolved at load time
    fn supports_read_mark(&self) -> bool;

    /// Control whether staged records are marked as read on the terminal
    ///
    /// Only meaningful when [`supports_read_mark`](Driver::supports_read_mark)
    /// is true; otherwise the driver default applies.
    fn set_read_mark(&mut self, mark: bool);

    /// Fetch the next staged record, filling `out` by reference
    ///
    /// Returns `false` when no records remain.
    fn next_record(&mut self, machine: i32, out: &mut RawLogFields) -> bool;
}
