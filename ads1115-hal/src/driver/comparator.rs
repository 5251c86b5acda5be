//! Comparator and ALERT/RDY driver public methods.
use super::ADS1115;
use crate::config::{ComparatorLatch, ComparatorMode, ComparatorPolarity, ComparatorQueue};
use crate::error::Error;
use crate::registers::Register;
use crate::transport::{Clock, ReadySignal, Transport};

/// Comparator thresholds and ALERT/RDY behaviour.
///
/// # Datasheet
///
/// See section 8.3.7 of the datasheet for the comparator, and section 8.3.8
/// for the conversion-ready function of the ALERT/RDY pin.
impl<T: Transport, R: ReadySignal, C: Clock> ADS1115<T, R, C> {
    /// Write the low and high threshold registers.
    ///
    /// The configuration register is not touched. If the low threshold write
    /// succeeds but the high one fails, the device holds the new low threshold
    /// only; the stored configuration holds both.
    pub fn set_thresholds(&mut self, low: i16, high: i16) -> Result<(), Error> {
        self.require_initialized()?;
        self.config.threshold_low = low;
        self.config.threshold_high = high;
        self.write_register(Register::LowThreshold, low as u16)?;
        self.write_register(Register::HighThreshold, high as u16)
    }

    /// Read `(low, high)` thresholds back from the device.
    ///
    /// The stored configuration is updated to match.
    pub fn get_thresholds(&mut self) -> Result<(i16, i16), Error> {
        self.require_initialized()?;
        let low = self.read_register(Register::LowThreshold)? as i16;
        let high = self.read_register(Register::HighThreshold)? as i16;
        self.config.threshold_low = low;
        self.config.threshold_high = high;
        Ok((low, high))
    }

    /// Set the comparator mode.
    pub fn set_comparator_mode(&mut self, mode: ComparatorMode) -> Result<(), Error> {
        self.require_initialized()?;
        self.config.comparator_mode = mode;
        self.apply_config()
    }

    /// Current comparator mode.
    pub fn comparator_mode(&self) -> ComparatorMode {
        self.config.comparator_mode
    }

    /// Set the ALERT/RDY polarity.
    ///
    /// Completion detection through a [`ReadySignal`] follows this setting.
    pub fn set_comparator_polarity(&mut self, polarity: ComparatorPolarity) -> Result<(), Error> {
        self.require_initialized()?;
        self.config.comparator_polarity = polarity;
        self.apply_config()
    }

    /// Current ALERT/RDY polarity.
    pub fn comparator_polarity(&self) -> ComparatorPolarity {
        self.config.comparator_polarity
    }

    /// Set whether ALERT/RDY latches.
    pub fn set_comparator_latch(&mut self, latch: ComparatorLatch) -> Result<(), Error> {
        self.require_initialized()?;
        self.config.comparator_latch = latch;
        self.apply_config()
    }

    /// Current latching setting.
    pub fn comparator_latch(&self) -> ComparatorLatch {
        self.config.comparator_latch
    }

    /// Set the comparator queue, or disable the comparator.
    pub fn set_comparator_queue(&mut self, queue: ComparatorQueue) -> Result<(), Error> {
        self.require_initialized()?;
        self.config.comparator_queue = queue;
        self.apply_config()
    }

    /// Current comparator queue.
    pub fn comparator_queue(&self) -> ComparatorQueue {
        self.config.comparator_queue
    }

    /// Configure ALERT/RDY to pulse at the end of each conversion.
    ///
    /// Sets the thresholds and comparator fields described by
    /// [`Config::with_conversion_ready_comparator`](crate::Config::with_conversion_ready_comparator),
    /// then writes them to the device. Polarity is left unchanged.
    pub fn enable_conversion_ready_pin(&mut self) -> Result<(), Error> {
        self.require_initialized()?;
        self.config = std::mem::take(&mut self.config).with_conversion_ready_comparator();
        self.apply_config()
    }

    /// Disable the comparator, putting ALERT/RDY into high impedance.
    ///
    /// Completion detection falls back to polling the OS bit.
    pub fn disable_comparator(&mut self) -> Result<(), Error> {
        self.require_initialized()?;
        self.config.comparator_queue = ComparatorQueue::Disable;
        self.apply_config()
    }
}
