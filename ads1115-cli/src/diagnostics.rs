use ads1115_hal::registers::{self, ConfigFields};
use anyhow::Context;

use crate::Adc;

pub(crate) fn show_config(adc: &mut Adc) -> anyhow::Result<()> {
    let value = adc.read_config().context("reading config register")?;
    let fields = ConfigFields::decode(value);
    println!("Config register: {value:#06X}");
    println!("Conversion in progress: {}", !registers::is_idle(value));
    println!("{fields:#?}");
    Ok(())
}

pub(crate) fn probe(adc: &mut Adc) -> anyhow::Result<()> {
    let address = adc.config().address;
    adc.probe()
        .with_context(|| format!("probing {address:#04X}"))?;
    println!("ADS1115 found at {address:#04X}");
    Ok(())
}

pub(crate) fn health(adc: &mut Adc) -> anyhow::Result<()> {
    if let Err(e) = adc.recover() {
        log::warn!("recovery read failed: {e}");
    }
    print_health(adc);
    Ok(())
}

pub(crate) fn stress(adc: &mut Adc, count: u32, wait_ms: u32) -> anyhow::Result<()> {
    let mut failed = 0u32;
    for n in 0..count {
        if let Err(e) = adc.read_blocking(wait_ms) {
            log::warn!("conversion {} of {count} failed: {e}", n + 1);
            failed += 1;
        }
    }
    println!("Conversions: {count}, failed: {failed}");
    print_health(adc);
    Ok(())
}

fn print_health(adc: &Adc) {
    let health = adc.health();
    println!("State: {}", adc.state());
    println!("Consecutive failures: {}", health.consecutive_failures);
    println!("Total successes: {}", health.total_success);
    println!("Total failures: {}", health.total_failures);
    println!("Last success: {} ms", health.last_ok_ms);
    if let Some(error) = health.last_error {
        println!("Last error: {error} at {} ms", health.last_error_ms);
    }
}
