//! Conversion-related driver public methods.
use log::debug;

use super::{ADS1115, InProgress};
use crate::config::{Mode, Mux};
use crate::error::{Error, ErrorKind};
use crate::registers::{OS_START, Register};
use crate::transport::{Clock, ReadySignal, Transport};

/// True if `a` is strictly earlier than `b`, allowing for clock rollover.
fn is_before(a: u32, b: u32) -> bool {
    (a.wrapping_sub(b) as i32) < 0
}

/// Conversion start and result retrieval.
impl<T: Transport, R: ReadySignal, C: Clock> ADS1115<T, R, C> {
    /// Start a single-shot conversion on the configured input.
    ///
    /// Writes the configuration register with the OS bit set. Completion is
    /// detected by [`ADS1115::conversion_ready`], [`ADS1115::tick`], or
    /// [`ADS1115::read_raw`].
    ///
    /// A completed but unread result is discarded by starting a new conversion.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Busy`] in continuous mode, or while a conversion is
    ///   still outstanding.
    /// - Any transport error from the register write.
    ///
    /// # Datasheet
    ///
    /// See section 8.4.2 of the datasheet for single-shot mode.
    pub fn start_conversion(&mut self) -> Result<InProgress, Error> {
        self.start_conversion_with(self.config.mux)
    }

    /// Switch the input multiplexer and start a single-shot conversion.
    ///
    /// The new input is kept for later conversions. If the register write fails
    /// the previous input remains selected.
    ///
    /// # Errors
    ///
    /// As for [`ADS1115::start_conversion`].
    pub fn start_conversion_on(&mut self, mux: Mux) -> Result<InProgress, Error> {
        self.start_conversion_with(mux)
    }

    fn start_conversion_with(&mut self, mux: Mux) -> Result<InProgress, Error> {
        self.require_initialized()?;
        if self.config.mode == Mode::Continuous {
            return Err(Error::new(ErrorKind::Busy, "Continuous mode active"));
        }
        if self.conversion.started {
            return Err(Error::new(ErrorKind::Busy, "Conversion already in progress"));
        }

        let mut fields = self.config_fields();
        fields.mux = mux;
        self.write_register(Register::Config, fields.encode() | OS_START)?;
        self.config.mux = mux;

        let started_at_ms = self.clock.now_ms();
        self.conversion.started = true;
        self.conversion.ready = false;
        self.conversion.started_at_ms = started_at_ms;
        debug!("conversion started on {mux:?} at {started_at_ms} ms");
        Ok(InProgress { started_at_ms })
    }

    /// Check whether a result is available to read.
    ///
    /// Always true in continuous mode, and always false before
    /// [`ADS1115::begin`]. In single-shot mode this polls the ALERT/RDY pin or
    /// the OS bit once the conversion time has elapsed. A failed poll reports
    /// false and is counted against the device's health.
    pub fn conversion_ready(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        if self.config.mode == Mode::Continuous {
            return true;
        }
        let now_ms = self.clock.now_ms();
        self.poll_completion(now_ms).unwrap_or(false)
    }

    /// Read the latest conversion result as a raw two's complement code.
    ///
    /// In single-shot mode the result of the completed conversion is consumed,
    /// so a second call fails until another conversion is started.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::ConversionNotReady`] in single-shot mode if no conversion
    ///   was started, it has not finished, or its result was already read.
    /// - Any transport error.
    pub fn read_raw(&mut self) -> Result<i16, Error> {
        self.require_initialized()?;
        let single_shot = self.config.mode == Mode::SingleShot;
        if single_shot {
            let now_ms = self.clock.now_ms();
            if !self.poll_completion(now_ms)? {
                return Err(Error::not_ready());
            }
        }

        let raw = self.read_register(Register::Conversion)? as i16;
        self.conversion.last_raw = raw;
        if single_shot {
            self.conversion.ready = false;
        }
        Ok(raw)
    }

    /// [`ADS1115::read_raw`], converted to volts at the current gain.
    pub fn read_voltage(&mut self) -> Result<f32, Error> {
        self.read_raw().map(|raw| self.raw_to_voltage(raw))
    }

    /// Start a conversion and wait for its result.
    ///
    /// If a conversion is already outstanding, waits for that one instead. In
    /// continuous mode this is the same as [`ADS1115::read_raw`].
    ///
    /// The deadline is measured from the start of the conversion. Nothing is
    /// read from the device until the conversion time has elapsed, after which
    /// the completion status is polled continuously.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Timeout`] if no result arrives within `timeout_ms`.
    /// - Any transport error, which ends the wait immediately.
    pub fn read_blocking(&mut self, timeout_ms: u32) -> Result<i16, Error> {
        self.require_initialized()?;
        if self.config.mode == Mode::Continuous {
            return self.read_raw();
        }

        let started_at_ms = match self.start_conversion() {
            Ok(progress) => progress.started_at_ms,
            Err(e) if e.kind() == ErrorKind::Busy => self.conversion.started_at_ms,
            Err(e) => return Err(e),
        };
        let deadline = started_at_ms.wrapping_add(timeout_ms);
        let ready_at = started_at_ms.wrapping_add(self.conversion_time_ms());

        loop {
            let now_ms = self.clock.now_ms();
            if !is_before(now_ms, deadline) {
                break;
            }
            if is_before(now_ms, ready_at) {
                std::hint::spin_loop();
                continue;
            }
            match self.read_raw() {
                Ok(raw) => return Ok(raw),
                Err(e) if e.kind() == ErrorKind::ConversionNotReady => continue,
                Err(e) => return Err(e),
            }
        }
        Err(Error::new(ErrorKind::Timeout, "Conversion timeout"))
    }

    /// [`ADS1115::read_blocking`], converted to volts at the current gain.
    pub fn read_blocking_voltage(&mut self, timeout_ms: u32) -> Result<f32, Error> {
        self.read_blocking(timeout_ms)
            .map(|raw| self.raw_to_voltage(raw))
    }

    /// The last result returned by any read, or 0 if there has been none.
    pub fn last_raw(&self) -> i16 {
        self.conversion.last_raw
    }
}
