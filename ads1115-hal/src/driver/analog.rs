//! Code to voltage conversion helpers.
use super::ADS1115;
use crate::transport::{Clock, ReadySignal, Transport};

impl<T: Transport, R: ReadySignal, C: Clock> ADS1115<T, R, C> {
    /// Scale a raw conversion code to volts at the current gain.
    ///
    /// ```rust
    /// # use ads1115_hal::{ADS1115, Error, Transport};
    /// # use std::time::Duration;
    /// # struct Nothing;
    /// # impl Transport for Nothing {
    /// #     fn write(&mut self, _: u8, _: &[u8], _: Duration) -> Result<(), Error> { Ok(()) }
    /// #     fn write_read(&mut self, _: u8, _: &[u8], _: &mut [u8], _: Duration) -> Result<(), Error> { Ok(()) }
    /// # }
    /// let adc = ADS1115::new(Nothing);
    /// // Default gain is ±2.048 V, 62.5 µV per code.
    /// assert!((adc.raw_to_voltage(1000) - 0.0625).abs() < 1e-6);
    /// ```
    pub fn raw_to_voltage(&self, raw: i16) -> f32 {
        f32::from(raw) * self.lsb_voltage()
    }

    /// Size of one conversion code in volts at the current gain.
    pub fn lsb_voltage(&self) -> f32 {
        self.config.gain.lsb_volts()
    }

    /// Time from starting a single-shot conversion until the driver first
    /// checks for its result, at the current data rate.
    pub fn conversion_time_ms(&self) -> u32 {
        self.config.data_rate.conversion_time_ms()
    }
}
