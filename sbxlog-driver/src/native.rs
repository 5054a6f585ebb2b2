//! Native SBXPC driver
//!
//! Loads the vendor library at runtime, resolves the fixed entry points, and
//! implements [`Driver`] over them. String parameters and results travel as
//! BSTRs, allocated and released through `oleaut32`.

use std::os::raw::c_long;
use std::path::Path;

use libloading::Library;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::{Driver, RawLogFields, StringHandle};

/// Default vendor install path
pub const DEFAULT_DRIVER_PATH: &str = r"C:\Program Files (x86)\ONtime\SBXPCDLL.dll";

/// Companion library expected alongside the main driver
///
/// Some entry points depend on it; its absence is a warning, not a failure.
pub const COMPANION_LIBRARY: &str = "SBPCCOMM.dll";

/// BSTR as the driver sees it: pointer to a nul-terminated UTF-16 buffer
type Bstr = *mut u16;

type ConnectTcpipFn = unsafe extern "system" fn(c_long, *mut Bstr, c_long, c_long) -> bool;
type DisconnectFn = unsafe extern "system" fn();
type GetLastErrorFn = unsafe extern "system" fn(*mut c_long);
type GetSerialNumberFn = unsafe extern "system" fn(c_long, *mut Bstr) -> bool;
type ReadAllGLogDataFn = unsafe extern "system" fn(c_long) -> bool;
type SetReadMarkFn = unsafe extern "system" fn(bool);
type GetGeneralLogDataFn = unsafe extern "system" fn(
    c_long,
    *mut c_long,
    *mut c_long,
    *mut c_long,
    *mut c_long,
    *mut c_long,
    *mut c_long,
    *mut c_long,
    *mut c_long,
    *mut c_long,
    *mut c_long,
) -> bool;

type SysAllocStringFn = unsafe extern "system" fn(*const u16) -> Bstr;
type SysFreeStringFn = unsafe extern "system" fn(Bstr);

/// Driver implementation backed by the vendor library
///
/// Function pointers are resolved once at load time; the library handles are
/// held for the lifetime of the driver so the pointers stay valid.
#[derive(Debug)]
pub struct NativeDriver {
    connect_fn: ConnectTcpipFn,
    disconnect_fn: DisconnectFn,
    last_error_fn: GetLastErrorFn,
    serial_number_fn: GetSerialNumberFn,
    read_all_logs_fn: ReadAllGLogDataFn,
    next_record_fn: GetGeneralLogDataFn,
    set_read_mark_fn: Option<SetReadMarkFn>,
    sys_alloc_string: SysAllocStringFn,
    sys_free_string: SysFreeStringFn,
    _library: Library,
    _oleaut: Library,
}

impl NativeDriver {
    /// Load the vendor library and resolve its entry points
    ///
    /// # Errors
    ///
    /// Fails when the library file is absent, cannot be loaded, or lacks one
    /// of the required entry points. A missing `_SetReadMark` is not an
    /// error; its absence is recorded and read-mark control is skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::DriverNotFound {
                path: path.display().to_string(),
            });
        }

        // The companion ships in the same directory on a standard install.
        if let Some(dir) = path.parent() {
            let companion = dir.join(COMPANION_LIBRARY);
            if !companion.exists() {
                warn!(
                    "{} not found at {}; some driver functions may not work",
                    COMPANION_LIBRARY,
                    companion.display()
                );
            }
        }

        debug!("Loading driver library {}", path.display());

        let library = unsafe { Library::new(path) }.map_err(|source| Error::Load {
            path: path.display().to_string(),
            source,
        })?;

        let oleaut = unsafe { Library::new("oleaut32.dll") }.map_err(|source| Error::Load {
            path: "oleaut32.dll".to_string(),
            source,
        })?;

        let connect_fn: ConnectTcpipFn = resolve(&library, "_ConnectTcpip")?;
        let disconnect_fn: DisconnectFn = resolve(&library, "_Disconnect")?;
        let last_error_fn: GetLastErrorFn = resolve(&library, "_GetLastError")?;
        let serial_number_fn: GetSerialNumberFn = resolve(&library, "_GetSerialNumber")?;
        let read_all_logs_fn: ReadAllGLogDataFn = resolve(&library, "_ReadAllGLogData")?;
        let next_record_fn: GetGeneralLogDataFn = resolve(&library, "_GetGeneralLogData")?;

        // Optional capability: older driver builds lack it.
        let set_read_mark_fn: Option<SetReadMarkFn> = match resolve(&library, "_SetReadMark") {
            Ok(f) => Some(f),
            Err(_) => {
                warn!("_SetReadMark not found in driver; read-mark control unavailable");
                None
            }
        };

        let sys_alloc_string: SysAllocStringFn = resolve(&oleaut, "SysAllocString")?;
        let sys_free_string: SysFreeStringFn = resolve(&oleaut, "SysFreeString")?;

        debug!("Driver library loaded, all required entry points resolved");

        Ok(Self {
            connect_fn,
            disconnect_fn,
            last_error_fn,
            serial_number_fn,
            read_all_logs_fn,
            next_record_fn,
            set_read_mark_fn,
            sys_alloc_string,
            sys_free_string,
            _library: library,
            _oleaut: oleaut,
        })
    }
}

fn resolve<T: Copy>(library: &Library, name: &str) -> Result<T> {
    unsafe { library.get::<T>(name.as_bytes()) }
        .map(|symbol| *symbol)
        .map_err(|source| Error::MissingSymbol {
            name: name.to_string(),
            source,
        })
}

fn as_bstr(handle: StringHandle) -> Bstr {
    handle.0 as usize as Bstr
}

impl Driver for NativeDriver {
    fn alloc_string(&mut self, value: &str) -> Result<StringHandle> {
        let wide: Vec<u16> = value.encode_utf16().chain(std::iter::once(0)).collect();

        let bstr = unsafe { (self.sys_alloc_string)(wide.as_ptr()) };
        if bstr.is_null() {
            return Err(Error::StringAlloc);
        }

        Ok(StringHandle(bstr as usize as u64))
    }

    fn string_value(&mut self, handle: StringHandle) -> Result<String> {
        let ptr = as_bstr(handle);
        if ptr.is_null() {
            return Err(Error::NullStringHandle);
        }

        // Read up to the nul terminator, as the vendor sample does.
        let mut len = 0usize;
        unsafe {
            while *ptr.add(len) != 0 {
                len += 1;
            }
        }
        let units = unsafe { std::slice::from_raw_parts(ptr, len) };

        Ok(String::from_utf16_lossy(units))
    }

    fn free_string(&mut self, handle: StringHandle) {
        if handle.is_null() {
            return;
        }
        unsafe { (self.sys_free_string)(as_bstr(handle)) }
    }

    fn connect(
        &mut self,
        machine: i32,
        address: &mut StringHandle,
        port: i32,
        password: i32,
    ) -> bool {
        let mut bstr = as_bstr(*address);

        let ok = unsafe {
            (self.connect_fn)(
                machine as c_long,
                &mut bstr,
                port as c_long,
                password as c_long,
            )
        };

        // The entry point takes the handle by reference; reflect any rewrite
        // back to the caller, who still owns the release.
        *address = StringHandle(bstr as usize as u64);
        ok
    }

    fn disconnect(&mut self) {
        unsafe { (self.disconnect_fn)() }
    }

    fn last_error(&mut self) -> i32 {
        let mut code: c_long = 0;
        unsafe { (self.last_error_fn)(&mut code) };
        code as i32
    }

    fn serial_number(&mut self, machine: i32, out: &mut StringHandle) -> bool {
        let mut bstr: Bstr = std::ptr::null_mut();
        let ok = unsafe { (self.serial_number_fn)(machine as c_long, &mut bstr) };
        *out = StringHandle(bstr as usize as u64);
        ok
    }

    fn read_all_logs(&mut self, machine: i32) -> bool {
        unsafe { (self.read_all_logs_fn)(machine as c_long) }
    }

    fn supports_read_mark(&self) -> bool {
        self.set_read_mark_fn.is_some()
    }

    fn set_read_mark(&mut self, mark: bool) {
        if let Some(f) = self.set_read_mark_fn {
            unsafe { f(mark) }
        }
    }

    fn next_record(&mut self, machine: i32, out: &mut RawLogFields) -> bool {
        let mut terminal: c_long = 0;
        let mut user_id: c_long = 0;
        let mut origin_terminal: c_long = 0;
        let mut verify_mode: c_long = 0;
        let mut year: c_long = 0;
        let mut month: c_long = 0;
        let mut day: c_long = 0;
        let mut hour: c_long = 0;
        let mut minute: c_long = 0;
        let mut second: c_long = 0;

        let ok = unsafe {
            (self.next_record_fn)(
                machine as c_long,
                &mut terminal,
                &mut user_id,
                &mut origin_terminal,
                &mut verify_mode,
                &mut year,
                &mut month,
                &mut day,
                &mut hour,
                &mut minute,
                &mut second,
            )
        };

        if ok {
            *out = RawLogFields {
                terminal: terminal as i32,
                user_id: user_id as i32,
                origin_terminal: origin_terminal as i32,
                verify_mode: verify_mode as i32,
                year: year as i32,
                month: month as i32,
                day: day as i32,
                hour: hour as i32,
                minute: minute as i32,
                second: second as i32,
            };
        }

        ok
    }
}
