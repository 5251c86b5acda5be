use anyhow::Context;

use crate::Adc;

pub(crate) fn thresholds(adc: &mut Adc, low: Option<i16>, high: Option<i16>) -> anyhow::Result<()> {
    if let (Some(low), Some(high)) = (low, high) {
        adc.set_thresholds(low, high)
            .context("writing threshold registers")?;
    }
    let (low, high) = adc
        .get_thresholds()
        .context("reading threshold registers")?;
    println!("Low:  {low:>6} ({:+.6} V)", adc.raw_to_voltage(low));
    println!("High: {high:>6} ({:+.6} V)", adc.raw_to_voltage(high));
    Ok(())
}

pub(crate) fn ready_pin(adc: &mut Adc) -> anyhow::Result<()> {
    adc.enable_conversion_ready_pin()
        .context("configuring comparator")?;
    println!(
        "ALERT/RDY now signals conversion ready ({:?})",
        adc.comparator_polarity()
    );
    Ok(())
}
