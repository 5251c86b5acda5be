//! I2C bus scan, run before the driver is started.
use anyhow::Context;
use rppal::i2c::I2c;

/// Addresses selectable with the ADS1115's ADDR pin.
const ADS1115_ADDRESSES: std::ops::RangeInclusive<u16> = 0x48..=0x4B;

/// Print a grid of the addresses that acknowledge a quick write.
///
/// Quick writes send only the address byte, so no device is left driving
/// the bus. Reserved addresses are shown blank.
pub(crate) fn action(bus: &mut I2c) -> anyhow::Result<()> {
    println!("Scanning I2C bus {}...\n", bus.bus());
    let mut found = Vec::new();
    for address in 0..128u16 {
        if start_line(address) {
            print!("{address:02X}:  ");
        }
        if reserved(address) {
            print!("   ");
        } else if acknowledges(bus, address) {
            print!("{address:02X} ");
            found.push(address);
        } else {
            print!("-- ");
        }
        if end_line(address) {
            println!();
        }
    }
    println!();

    let candidates: Vec<_> = found
        .iter()
        .filter(|a| ADS1115_ADDRESSES.contains(a))
        .map(|a| format!("{a:#04X}"))
        .collect();
    if candidates.is_empty() {
        println!("No device at an ADS1115 address (0x48 to 0x4B).");
    } else {
        println!("Possible ADS1115 at {}.", candidates.join(", "));
    }
    Ok(())
}

fn acknowledges(bus: &mut I2c, address: u16) -> bool {
    let result = bus
        .set_slave_address(address)
        .and_then(|()| bus.smbus_quick_command(false))
        .with_context(|| format!("quick write to {address:#04X}"));
    match result {
        Ok(()) => true,
        Err(e) => {
            log::trace!("{e:#}");
            false
        }
    }
}

fn reserved(address: u16) -> bool {
    !(0x08..=0x77).contains(&address)
}

fn start_line(n: u16) -> bool {
    n % 16 == 0
}

fn end_line(n: u16) -> bool {
    n % 16 == 15
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reserved_addresses_are_skipped() {
        assert!(reserved(0x00));
        assert!(reserved(0x07));
        assert!(!reserved(0x08));
        assert!(!reserved(0x48));
        assert!(!reserved(0x77));
        assert!(reserved(0x78));
    }

    #[test]
    fn grid_rows_are_sixteen_wide() {
        assert!(start_line(0x40) && !start_line(0x48));
        assert!(end_line(0x4F) && !end_line(0x4B));
    }
}
