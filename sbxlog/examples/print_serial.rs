//! Read the terminal serial number

use sbxlog::{Device, NativeDriver, DEFAULT_DRIVER_PATH};

fn main() -> sbxlog::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Change to your terminal address
    let address = "192.168.1.70";

    let driver = NativeDriver::load(DEFAULT_DRIVER_PATH)?;
    let mut device = Device::new(driver, address, 5005).with_password(123);

    device.connect()?;
    println!("✓ Connected!");

    let serial = device.serial_number()?;
    println!("✓ Serial number: {}", serial);

    device.disconnect();
    println!("✓ Disconnected");

    Ok(())
}
