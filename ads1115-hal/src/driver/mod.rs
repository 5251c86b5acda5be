use log::{debug, info, trace, warn};

use crate::config::{ComparatorPolarity, Config, Mode};
use crate::error::{DETAIL_READY_PIN_WITHOUT_READER, Error, ErrorKind};
use crate::health::{DriverState, Health};
use crate::registers::{self, ConfigFields, Register};
use crate::transport::{Clock, NoReadySignal, ReadySignal, StdClock, Transport};

mod analog;
mod comparator;
mod conversion;
mod settings;

/// A single-shot conversion was started and its result is not yet available.
///
/// This is a progress signal rather than a failure. Poll
/// [`ADS1115::conversion_ready`], call [`ADS1115::tick`] periodically, or just
/// retry [`ADS1115::read_raw`] until it stops returning
/// [`ErrorKind::ConversionNotReady`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InProgress {
    /// Driver clock time at which the conversion was started.
    pub started_at_ms: u32,
}

/// Single-shot conversion lifecycle: idle, started, ready, then back to idle
/// once the result has been read.
#[derive(Debug, Clone, Copy, Default)]
struct ConversionState {
    started: bool,
    ready: bool,
    started_at_ms: u32,
    last_raw: i16,
}

/// Driver for the ADS1115.
///
/// # Quick start
///
/// Create the driver from a [`Transport`] with [`ADS1115::new`], then call
/// [`ADS1115::begin`] with a [`Config`]. For any bus implementing
/// [`embedded_hal::i2c::I2c`], wrap it in an [`I2cTransport`].
///
/// [`I2cTransport`]: crate::I2cTransport
///
/// To detect conversion completion from the ALERT/RDY pin instead of polling
/// the device over the bus, supply a [`ReadySignal`] through
/// [`ADS1115::from_parts`], set [`Config::ready_pin`], and put the comparator
/// into conversion-ready mode.
///
/// # Health
///
/// Every bus transaction made after [`ADS1115::begin`] (other than
/// [`ADS1115::probe`]) is tracked. Failures degrade the [`DriverState`] and
/// eventually mark the device offline, while any success restores it to
/// [`DriverState::Ready`]. The driver never retries on its own: use the state
/// to decide when to back off, and [`ADS1115::recover`] to check for the device
/// coming back.
///
/// # Concurrency
///
/// All methods run the transport to completion before returning. The only
/// loop is in [`ADS1115::read_blocking`], which polls until its deadline.
/// Nothing happens in the background; single-shot completion is only noticed
/// when the driver is polled or ticked.
#[derive(Debug)]
pub struct ADS1115<T, R = NoReadySignal, C = StdClock> {
    transport: T,
    ready_signal: Option<R>,
    clock: C,
    config: Config,
    initialized: bool,
    state: DriverState,
    health: Health,
    conversion: ConversionState,
}

impl<T: Transport> ADS1115<T> {
    /// Create a driver that polls the OS bit for conversion completion and
    /// measures time with [`StdClock`].
    ///
    /// No bus traffic occurs until [`ADS1115::begin`] is called.
    pub fn new(transport: T) -> Self {
        Self::from_parts(transport, None, StdClock::new())
    }
}

impl<T: Transport, R: ReadySignal, C: Clock> ADS1115<T, R, C> {
    /// Create a driver with an optional ALERT/RDY reader and a custom clock.
    pub fn from_parts(transport: T, ready_signal: Option<R>, clock: C) -> Self {
        Self {
            transport,
            ready_signal,
            clock,
            config: Config::default(),
            initialized: false,
            state: DriverState::Uninitialized,
            health: Health::default(),
            conversion: ConversionState::default(),
        }
    }

    /// Give back the transport.
    pub fn release(self) -> T {
        self.transport
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Lifecycle
    ////////////////////////////////////////////////////////////////////////////////

    /// Validate `config`, check the device responds, and program it.
    ///
    /// All driver state, including the health counters, is reset first. On
    /// failure the driver is left [`DriverState::Uninitialized`].
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidConfig`] for a zero timeout, an address outside
    ///   `0x48..=0x4B`, or a ready pin without a [`ReadySignal`]. The detail is
    ///   one of the `DETAIL_*` constants in [`crate::error`].
    /// - [`ErrorKind::DeviceNotFound`] if the probe read fails.
    /// - Any transport error from programming the registers.
    pub fn begin(&mut self, config: Config) -> Result<(), Error> {
        self.config = config;
        self.initialized = false;
        self.state = DriverState::Uninitialized;
        self.conversion = ConversionState::default();
        self.health = Health::default();

        self.config.validate()?;
        if self.config.ready_pin.is_some() && self.ready_signal.is_none() {
            return Err(
                Error::new(ErrorKind::InvalidConfig, "ALERT/RDY reader required")
                    .with_detail(DETAIL_READY_PIN_WITHOUT_READER),
            );
        }
        if self.config.offline_threshold == 0 {
            self.config.offline_threshold = 1;
        }

        self.probe()?;
        self.apply_config()?;

        self.initialized = true;
        self.state = DriverState::Ready;
        debug!("ADS1115 at {:#04X} initialised", self.config.address);
        Ok(())
    }

    /// Advance single-shot completion detection.
    ///
    /// Once the conversion time has elapsed since the outstanding conversion was
    /// started, this checks the ALERT/RDY pin or reads the OS bit, and marks the
    /// result ready if the conversion has finished. Does nothing before
    /// [`ADS1115::begin`], in continuous mode, or with no conversion outstanding,
    /// so it is safe to call at any rate.
    pub fn tick(&mut self, now_ms: u32) {
        if !self.initialized || !self.is_single_shot() || self.conversion.ready {
            return;
        }
        // A failed status read has already been recorded by the health tracker.
        let _ = self.poll_completion(now_ms);
    }

    /// Stop using the device.
    ///
    /// The configuration is kept, but no bus traffic happens until
    /// [`ADS1115::begin`] is called again.
    pub fn end(&mut self) {
        self.initialized = false;
        self.state = DriverState::Uninitialized;
        self.conversion.started = false;
        self.conversion.ready = false;
        debug!("ADS1115 at {:#04X} released", self.config.address);
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Diagnostics
    ////////////////////////////////////////////////////////////////////////////////

    /// Check that the device answers a read of its configuration register.
    ///
    /// This is purely diagnostic: the outcome is not recorded in the health
    /// counters and does not change the driver state.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::DeviceNotFound`], with the transport's detail code, if the
    /// read fails for any reason other than a configuration problem.
    pub fn probe(&mut self) -> Result<(), Error> {
        match self.read_register_untracked(Register::Config) {
            Ok(_) => Ok(()),
            Err(e) if e.is_caller_fault() => Err(e),
            Err(e) => Err(
                Error::new(ErrorKind::DeviceNotFound, "ADS1115 not responding")
                    .with_detail(e.detail()),
            ),
        }
    }

    /// Make one tracked read of the configuration register.
    ///
    /// A success clears the failure streak and returns the driver to
    /// [`DriverState::Ready`]; a failure extends the streak.
    pub fn recover(&mut self) -> Result<(), Error> {
        self.require_initialized()?;
        self.read_register(Register::Config).map(|_| ())
    }

    ////////////////////////////////////////////////////////////////////////////////
    // State and health
    ////////////////////////////////////////////////////////////////////////////////

    /// Current driver state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// True if the driver is initialised and the device is believed reachable.
    pub fn is_online(&self) -> bool {
        self.state.is_online()
    }

    /// Health counters.
    pub fn health(&self) -> &Health {
        &self.health
    }

    /// Failed transport calls since the last success.
    pub fn consecutive_failures(&self) -> u8 {
        self.health.consecutive_failures
    }

    /// Failed transport calls since `begin`.
    pub fn total_failures(&self) -> u32 {
        self.health.total_failures
    }

    /// Successful transport calls since `begin`.
    pub fn total_success(&self) -> u32 {
        self.health.total_success
    }

    /// Clock time of the last successful transport call.
    pub fn last_ok_ms(&self) -> u32 {
        self.health.last_ok_ms
    }

    /// Clock time of the last failed transport call.
    pub fn last_error_ms(&self) -> u32 {
        self.health.last_error_ms
    }

    /// Most recent transport failure.
    pub fn last_error(&self) -> Option<Error> {
        self.health.last_error
    }

    /// The configuration as last applied.
    pub fn config(&self) -> &Config {
        &self.config
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Register access
    ////////////////////////////////////////////////////////////////////////////////

    fn require_initialized(&self) -> Result<(), Error> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::not_initialized())
        }
    }

    fn is_single_shot(&self) -> bool {
        self.config.mode == Mode::SingleShot
    }

    /// Record the outcome of a transport call and update the driver state.
    ///
    /// This is the only place the state changes after `begin`. Caller faults
    /// pass through untouched.
    fn track<V>(&mut self, result: Result<V, Error>) -> Result<V, Error> {
        if matches!(&result, Err(e) if e.is_caller_fault()) {
            return result;
        }
        let now_ms = self.clock.now_ms();
        match &result {
            Ok(_) => self.health.record_success(now_ms),
            Err(e) => self.health.record_failure(*e, now_ms),
        }

        if self.initialized {
            let next = self.health.classify(self.config.offline_threshold);
            if next != self.state {
                match (next, &result) {
                    (DriverState::Ready, _) => {
                        info!("ADS1115 at {:#04X} is ready again", self.config.address)
                    }
                    (_, Err(e)) => warn!(
                        "ADS1115 at {:#04X} is {next} after {} consecutive failures: {e}",
                        self.config.address, self.health.consecutive_failures
                    ),
                    _ => {}
                }
                self.state = next;
            }
        }
        result
    }

    fn read_register_untracked(&mut self, register: Register) -> Result<u16, Error> {
        let mut rx = [0u8; 2];
        self.transport.write_read(
            self.config.address,
            &[u8::from(register)],
            &mut rx,
            self.config.timeout,
        )?;
        let value = u16::from_be_bytes(rx);
        trace!("read {register:?} = {value:#06X}");
        Ok(value)
    }

    fn read_register(&mut self, register: Register) -> Result<u16, Error> {
        let result = self.read_register_untracked(register);
        self.track(result)
    }

    fn write_register(&mut self, register: Register, value: u16) -> Result<(), Error> {
        let [high, low] = value.to_be_bytes();
        trace!("write {register:?} = {value:#06X}");
        let result = self.transport.write(
            self.config.address,
            &[register.into(), high, low],
            self.config.timeout,
        );
        self.track(result)
    }

    /// Register image of the current configuration, OS bit clear.
    fn config_fields(&self) -> ConfigFields {
        ConfigFields::from(&self.config)
    }

    /// Program both thresholds and the full configuration register.
    ///
    /// Any outstanding conversion is forgotten, as rewriting the configuration
    /// register aborts it on the device.
    fn apply_config(&mut self) -> Result<(), Error> {
        self.write_register(Register::LowThreshold, self.config.threshold_low as u16)?;
        self.write_register(Register::HighThreshold, self.config.threshold_high as u16)?;
        let value = self.config_fields().encode();
        self.write_register(Register::Config, value)?;
        self.clear_conversion();
        debug!("ADS1115 config applied: {value:#06X}");
        Ok(())
    }

    fn clear_conversion(&mut self) {
        self.conversion.started = false;
        self.conversion.ready = false;
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Completion detection
    ////////////////////////////////////////////////////////////////////////////////

    /// Pin to watch for completion, if ALERT/RDY detection is usable.
    ///
    /// Requires a pin number, a reader, and the comparator set up as a
    /// conversion-ready signal; otherwise the OS bit is polled.
    fn ready_pin(&self) -> Option<u8> {
        self.config
            .ready_pin
            .filter(|_| self.ready_signal.is_some() && self.config.is_conversion_ready_mode())
    }

    fn ready_asserted(&mut self, pin: u8) -> bool {
        let Some(signal) = self.ready_signal.as_mut() else {
            return false;
        };
        let high = signal.is_high(pin);
        match self.config.comparator_polarity {
            ComparatorPolarity::ActiveHigh => high,
            ComparatorPolarity::ActiveLow => !high,
        }
    }

    /// Check whether the outstanding single-shot conversion has finished.
    ///
    /// Nothing is read from the device until the conversion time has elapsed.
    /// On completion the conversion moves from started to ready.
    fn poll_completion(&mut self, now_ms: u32) -> Result<bool, Error> {
        if self.conversion.ready {
            return Ok(true);
        }
        if !self.conversion.started {
            return Ok(false);
        }
        if now_ms.wrapping_sub(self.conversion.started_at_ms) < self.conversion_time_ms() {
            return Ok(false);
        }

        let complete = match self.ready_pin() {
            Some(pin) => self.ready_asserted(pin),
            None => registers::is_idle(self.read_register(Register::Config)?),
        };
        if complete {
            self.conversion.started = false;
            self.conversion.ready = true;
            trace!("conversion complete");
        }
        Ok(complete)
    }
}
