//! Attendance log export
//!
//! Connects to the terminal, stages a bulk log read, drains every record into
//! the CSV report, and disconnects. Connection parameters are fixed constants;
//! there are no CLI flags.

use tracing::{error, info, warn};

use sbxlog::{report, Device, NativeDriver, DEFAULT_DRIVER_PATH};

const DEVICE_ADDRESS: &str = "192.168.1.70";
const DEVICE_PORT: i32 = 5005;
const DEVICE_PASSWORD: i32 = 123;
const MACHINE_NUMBER: i32 = 1;
const OUTPUT_FILE: &str = "attendance_log.csv";

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Missing driver is fatal before any device interaction.
    let driver = match NativeDriver::load(DEFAULT_DRIVER_PATH) {
        Ok(driver) => driver,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut device = Device::new(driver, DEVICE_ADDRESS, DEVICE_PORT)
        .with_password(DEVICE_PASSWORD)
        .with_machine(MACHINE_NUMBER);

    if let Err(e) = device.connect() {
        error!("{}", e);
        std::process::exit(1);
    }

    match device.serial_number() {
        Ok(serial) => info!("Serial number: {}", serial),
        Err(e) => warn!("{}", e),
    }

    match device.read_all_logs(false) {
        Ok(()) => {
            info!("Retrieving log entries and writing to {}...", OUTPUT_FILE);

            let result = device
                .records()
                .and_then(|records| report::write_csv_path(OUTPUT_FILE, records));

            // A failed write leaves whatever rows were already flushed.
            match result {
                Ok(count) => info!("Wrote {} records to {}", count, OUTPUT_FILE),
                Err(e) => error!("Failed to write {}: {}", OUTPUT_FILE, e),
            }
        }
        Err(e) => error!("{}", e),
    }

    device.disconnect();
}
