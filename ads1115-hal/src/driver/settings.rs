//! Configuration register driver public methods.
use log::debug;

use super::ADS1115;
use crate::config::{DataRate, Gain, Mode, Mux};
use crate::error::{Error, ErrorKind};
use crate::registers::{self, ConfigFields, OS_START, Register};
use crate::transport::{Clock, ReadySignal, Transport};

/// Input, gain, rate and mode settings.
///
/// Each setter updates the stored configuration and then rewrites the
/// thresholds and configuration register. Rewriting the configuration aborts
/// any outstanding single-shot conversion, so it is forgotten. If the write
/// fails the stored configuration still holds the new value, and the next
/// successful write will apply it.
impl<T: Transport, R: ReadySignal, C: Clock> ADS1115<T, R, C> {
    /// Select the input multiplexer setting.
    pub fn set_mux(&mut self, mux: Mux) -> Result<(), Error> {
        self.require_initialized()?;
        self.config.mux = mux;
        self.apply_config()
    }

    /// Currently selected input.
    pub fn mux(&self) -> Mux {
        self.config.mux
    }

    /// Set the full-scale range.
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error> {
        self.require_initialized()?;
        self.config.gain = gain;
        self.apply_config()
    }

    /// Current full-scale range.
    pub fn gain(&self) -> Gain {
        self.config.gain
    }

    /// Set the output data rate.
    ///
    /// This also changes [`ADS1115::conversion_time_ms`].
    pub fn set_data_rate(&mut self, data_rate: DataRate) -> Result<(), Error> {
        self.require_initialized()?;
        self.config.data_rate = data_rate;
        self.apply_config()
    }

    /// Current data rate.
    pub fn data_rate(&self) -> DataRate {
        self.config.data_rate
    }

    /// Switch between continuous and single-shot operation.
    ///
    /// # Datasheet
    ///
    /// See section 8.4 of the datasheet for the operating modes.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        self.require_initialized()?;
        self.config.mode = mode;
        // The old cycle is void even if the write below fails.
        self.clear_conversion();
        self.apply_config()
    }

    /// Current operating mode.
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Read the raw configuration register from the device.
    ///
    /// The driver's stored configuration is not changed.
    pub fn read_config(&mut self) -> Result<u16, Error> {
        self.require_initialized()?;
        self.read_register(Register::Config)
    }

    /// Write a raw value to the configuration register.
    ///
    /// On success the stored configuration is updated to match. Writing a
    /// single-shot value with the OS bit set starts a conversion, which the
    /// driver then tracks as if [`ADS1115::start_conversion`] had been called.
    /// Any other value forgets the outstanding conversion.
    ///
    /// The thresholds are not written.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidParam`] if the value uses a reserved PGA code.
    ///   Nothing is written.
    /// - Any transport error, in which case the stored configuration is
    ///   unchanged.
    pub fn write_config(&mut self, value: u16) -> Result<(), Error> {
        self.require_initialized()?;
        if !registers::is_valid(value) {
            return Err(Error::new(ErrorKind::InvalidParam, "Invalid config value"));
        }
        self.write_register(Register::Config, value)?;
        self.config.apply_fields(ConfigFields::decode(value));

        if self.config.mode == Mode::SingleShot && value & OS_START != 0 {
            self.conversion.started = true;
            self.conversion.ready = false;
            self.conversion.started_at_ms = self.clock.now_ms();
            debug!("conversion started by raw config write {value:#06X}");
        } else {
            self.clear_conversion();
        }
        Ok(())
    }
}
